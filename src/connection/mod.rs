use std::fmt::{self, Debug, Formatter};

use futures_io::{AsyncRead, AsyncWrite};

use crate::collation::ClientCharset;
use crate::protocol::response::Response;
use crate::protocol::text::{InitDb, Ping, Quit, ResetConnection};
use crate::protocol::{Capabilities, Encode, EncodeContext};
use crate::wire::WireFormat;
use crate::{Error, Result};

mod establish;
mod executor;

pub use establish::TlsUpgrade;
pub use executor::QueryResponse;

/// An authenticated session speaking the MySQL text protocol over `S`.
///
/// A session is single-tracked: it issues one command at a time and fully
/// drains the response before the next. It is not safe for concurrent use;
/// hold it in exactly one task. All errors other than [`Error::Server`]
/// poison the session and it should be dropped.
pub struct MySqlConnection<S> {
    wire: WireFormat<S>,

    // frozen at the auth ACK
    capabilities: Capabilities,
    charset: ClientCharset,
}

impl<S> Debug for MySqlConnection<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlConnection")
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

impl<S> MySqlConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// The capability set active for this session: the intersection of what
    /// this client requested and what the server offered.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn encode_context(&self) -> EncodeContext {
        EncodeContext {
            capabilities: self.capabilities,
            charset: self.charset,
        }
    }

    /// Every client-initiated command starts a new sequence: reset both
    /// counters, then send the command body as one message.
    pub(crate) async fn send_command<T>(&mut self, command: T) -> Result<()>
    where
        T: Encode,
    {
        let mut buf = Vec::new();
        command.encode(&mut buf, &self.encode_context());

        self.wire.reset();
        self.wire.send(&buf).await
    }

    pub(crate) async fn recv_response(&mut self, accept_infile: bool) -> Result<Response> {
        let payload = self.wire.recv().await?;

        Response::classify(payload, self.capabilities, accept_infile)
    }

    /// Reads the ACK ending a simple command: OK, or a legacy EOF.
    pub(crate) async fn recv_ack(&mut self) -> Result<()> {
        match self.recv_response(false).await? {
            Response::Ok(_) | Response::Eof(_) => Ok(()),
            Response::Err(err) => Err(err.into()),
            response => Err(Error::UnexpectedPacket(response.header())),
        }
    }

    /// Checks that the server is alive.
    pub async fn ping(&mut self) -> Result<()> {
        tracing::debug!("COM_PING");

        self.send_command(Ping).await?;
        self.recv_ack().await
    }

    /// Resets session state (user variables, temporary tables, ...) without
    /// re-authenticating.
    pub async fn reset(&mut self) -> Result<()> {
        tracing::debug!("COM_RESET_CONNECTION");

        self.send_command(ResetConnection).await?;
        self.recv_ack().await
    }

    /// Changes the default database.
    pub async fn change_database(&mut self, database: &str) -> Result<()> {
        tracing::debug!(database, "COM_INIT_DB");

        self.send_command(InitDb { database }).await?;
        self.recv_ack().await
    }

    /// Sends `COM_QUIT` and hangs up. The server does not reply; dropping
    /// the connection closes the stream.
    pub async fn close(mut self) -> Result<()> {
        tracing::debug!("COM_QUIT");

        self.send_command(Quit).await
    }
}
