use std::collections::HashMap;
use std::sync::Arc;

use byteorder::LittleEndian;
use futures_io::{AsyncRead, AsyncWrite};

use crate::collation;
use crate::io::MySqlBufExt;
use crate::protocol::response::{EofPacket, ErrPacket, LocalInfilePacket, OkPacket, Response};
use crate::protocol::text::{ColumnDefinition, Query, TextRow};
use crate::protocol::{Capabilities, Status};
use crate::result_set::{name_index, MySqlResultSet};
use crate::row::{MySqlRow, MySqlValue};
use crate::{Error, MySqlConnection, Result};

/// The outcome of a text-protocol statement.
#[derive(Debug)]
pub enum QueryResponse {
    /// The statement produced no result set.
    Done(OkPacket),

    /// A bare end-of-result marker from a server running without
    /// `DEPRECATE_EOF`.
    Eof(EofPacket),

    /// The server asks for a local data upload; performing it is delegated
    /// to the caller.
    LocalInfile(LocalInfilePacket),

    /// A fully-streamed result set.
    Results(MySqlResultSet),
}

impl<S> MySqlConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Executes a statement over the text protocol.
    ///
    /// The first reply decides the shape of the response; a result set is
    /// streamed to completion (column definitions, rows, terminating ACK)
    /// before this returns, so the session is always drained.
    pub async fn query(&mut self, statement: &str) -> Result<QueryResponse> {
        tracing::debug!(statement, "COM_QUERY");

        self.send_command(Query { statement }).await?;

        match self.recv_response(true).await? {
            Response::Ok(ok) => Ok(QueryResponse::Done(ok)),
            Response::Eof(eof) => Ok(QueryResponse::Eof(eof)),
            Response::Err(err) => Err(err.into()),
            Response::LocalInfile(infile) => Ok(QueryResponse::LocalInfile(infile)),

            // anything else is the column-count header of a result set
            Response::Data(header) => {
                self.recv_result_set(&header).await.map(QueryResponse::Results)
            }
        }
    }

    async fn recv_result_set(&mut self, mut header: &[u8]) -> Result<MySqlResultSet> {
        let count = header.get_uint_lenenc::<LittleEndian>()? as usize;

        let columns = self.recv_columns(count).await?;

        let mut text_rows = Vec::new();
        let mut status = self.recv_rows(columns.len(), Some(&mut text_rows)).await?;

        // Drain any follow-on result sets so the stream is clean before
        // control returns; only the first set is surfaced.
        while status.contains(Status::MORE_RESULTS_EXISTS) {
            status = self.drain_result_set().await?;
        }

        let column_names = Arc::new(name_index(&columns));
        let rows = text_rows
            .into_iter()
            .map(|row| decode_row(row, &columns, &column_names))
            .collect();

        tracing::debug!(
            columns = columns.len(),
            "received result set"
        );

        Ok(MySqlResultSet::new(columns, rows))
    }

    async fn recv_columns(&mut self, count: usize) -> Result<Vec<ColumnDefinition>> {
        let mut columns = Vec::with_capacity(count);

        for _ in 0..count {
            match self.recv_response(false).await? {
                Response::Data(body) => columns.push(ColumnDefinition::read(&body)?),
                Response::Err(err) => return Err(err.into()),
                response => return Err(Error::UnexpectedPacket(response.header())),
            }
        }

        self.maybe_recv_eof().await?;

        Ok(columns)
    }

    // An EOF packet separates the column definitions from the rows unless
    // DEPRECATE_EOF was negotiated.
    async fn maybe_recv_eof(&mut self) -> Result<()> {
        if !self.capabilities.contains(Capabilities::DEPRECATE_EOF) {
            let payload = self.wire.recv().await?;
            EofPacket::read(&payload, self.capabilities)?;
        }

        Ok(())
    }

    // Consumes row packets up to the terminator and returns the terminator's
    // status flags. Inside a result set only a short 0xFE packet and 0xFF
    // are control packets; a row value may itself begin with 0x00 or 0xFB,
    // so the general classifier is not consulted here.
    async fn recv_rows(
        &mut self,
        columns: usize,
        mut out: Option<&mut Vec<TextRow>>,
    ) -> Result<Status> {
        loop {
            let payload = self.wire.recv().await?;

            match payload.first() {
                Some(0xfe) if payload.len() < 9 => {
                    let status = if self.capabilities.contains(Capabilities::DEPRECATE_EOF) {
                        OkPacket::read(&payload, self.capabilities)?.status
                    } else {
                        EofPacket::read(&payload, self.capabilities)?.status
                    };

                    return Ok(status);
                }

                Some(0xff) => {
                    return Err(ErrPacket::read(&payload, self.capabilities)?.into());
                }

                _ => {}
            }

            if let Some(rows) = out.as_mut() {
                rows.push(TextRow::read(&payload, columns)?);
            }
        }
    }

    // Skips one complete result set (or trailing OK) of a multi-statement
    // response.
    async fn drain_result_set(&mut self) -> Result<Status> {
        match self.recv_response(false).await? {
            Response::Ok(ok) => Ok(ok.status),
            Response::Eof(eof) => Ok(eof.status),
            Response::Err(err) => Err(err.into()),

            Response::Data(header) => {
                let mut header = &header[..];
                let count = header.get_uint_lenenc::<LittleEndian>()? as usize;

                self.recv_columns(count).await?;
                self.recv_rows(0, None).await
            }

            response => Err(Error::UnexpectedPacket(response.header())),
        }
    }
}

fn decode_row(
    row: TextRow,
    columns: &[ColumnDefinition],
    column_names: &Arc<HashMap<Box<str>, usize>>,
) -> MySqlRow {
    let values = row
        .0
        .into_iter()
        .zip(columns)
        .map(|(value, column)| {
            value.map(|bytes| match collation::decode_text(column.charset, &bytes) {
                Some(text) => MySqlValue::Text(text),
                None => MySqlValue::Bytes(bytes),
            })
        })
        .collect();

    MySqlRow {
        values,
        column_names: Arc::clone(column_names),
    }
}
