use byteorder::{ByteOrder, LittleEndian};
use futures_io::{AsyncRead, AsyncWrite};
use futures_util::io::{AsyncReadExt, AsyncWriteExt};

use super::{fragments, MAX_PACKET};
use crate::io::BufMut;
use crate::{Error, Result};

/// Frames logical messages directly over the byte stream.
///
/// Each fragment is `[u24 length][u8 seq][body]`; the sequence number
/// advances per fragment, modulo 256, and every received fragment must carry
/// the expected next value.
pub(crate) struct PlainFramer<S> {
    stream: S,
    seq: u8,
}

impl<S> PlainFramer<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: S) -> Self {
        Self { stream, seq: 0 }
    }

    #[cfg(test)]
    pub(crate) fn into_stream(self) -> S {
        self.stream
    }

    #[cfg(test)]
    pub(crate) fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub(crate) fn reset(&mut self) {
        self.seq = 0;
    }

    pub(crate) async fn send(&mut self, payload: &[u8]) -> Result<()> {
        let mut wbuf = Vec::with_capacity(payload.len() + 4);

        for chunk in fragments(payload) {
            wbuf.put_u24::<LittleEndian>(chunk.len() as u32);
            wbuf.put_u8(self.seq);
            wbuf.put_bytes(chunk);

            self.seq = self.seq.wrapping_add(1);
        }

        self.stream.write_all(&wbuf).await?;
        self.stream.flush().await?;

        Ok(())
    }

    pub(crate) async fn recv(&mut self) -> Result<Vec<u8>> {
        let mut message = Vec::new();

        loop {
            let mut header = [0_u8; 4];
            self.stream.read_exact(&mut header).await?;

            let len = LittleEndian::read_u24(&header) as usize;
            let received = header[3];

            if received != self.seq {
                return Err(Error::Sequence {
                    expected: self.seq,
                    received,
                });
            }

            self.seq = received.wrapping_add(1);

            let start = message.len();
            message.resize(start + len, 0);
            self.stream.read_exact(&mut message[start..]).await?;

            if len < MAX_PACKET {
                tracing::trace!(len = message.len(), "read message");

                return Ok(message);
            }
        }
    }
}
