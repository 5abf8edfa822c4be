use byteorder::{ByteOrder, LittleEndian};
use futures_io::{AsyncRead, AsyncWrite};
use futures_util::io::{AsyncReadExt, AsyncWriteExt};

use super::{fragments, MAX_PACKET};
use crate::io::BufMut;
use crate::{Error, Result};

/// The framer used during connection establishment.
///
/// The server opens the conversation with a sequence number of its own
/// choosing, so the expected value starts out unknown (`None`) and is adopted
/// from the first inbound fragment; from then on continuity is enforced as
/// usual. After the auth ACK the framer is dismantled and the normal wire
/// layer takes over; the special case does not survive the handshake.
pub(crate) struct HandshakeFramer<S> {
    stream: S,
    seq: Option<u8>,
}

impl<S> HandshakeFramer<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: S) -> Self {
        Self { stream, seq: None }
    }

    /// Tear down into the raw stream, e.g. to hand it to a TLS upgrade.
    pub(crate) fn into_parts(self) -> (S, Option<u8>) {
        (self.stream, self.seq)
    }

    pub(crate) fn from_parts(stream: S, seq: Option<u8>) -> Self {
        Self { stream, seq }
    }

    pub(crate) fn into_stream(self) -> S {
        self.stream
    }

    pub(crate) async fn send(&mut self, payload: &[u8]) -> Result<()> {
        let mut seq = self.seq.unwrap_or(0);
        let mut wbuf = Vec::with_capacity(payload.len() + 4);

        for chunk in fragments(payload) {
            wbuf.put_u24::<LittleEndian>(chunk.len() as u32);
            wbuf.put_u8(seq);
            wbuf.put_bytes(chunk);

            seq = seq.wrapping_add(1);
        }

        self.seq = Some(seq);

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

            if let Some(expected) = self.seq {
                if received != expected {
                    return Err(Error::Sequence { expected, received });
                }
            }

            self.seq = Some(received.wrapping_add(1));

            let start = message.len();
            message.resize(start + len, 0);
            self.stream.read_exact(&mut message[start..]).await?;

            if len < MAX_PACKET {
                return Ok(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HandshakeFramer;
    use crate::io::mock::MockStream;
    use crate::Error;

    #[tokio::test]
    async fn it_adopts_the_server_initial_sequence() {
        // the server is free to start wherever it likes; 3 here
        let stream = MockStream::new().script(&[0x02, 0x00, 0x00, 0x03, 0x0a, 0x00]);
        let mut framer = HandshakeFramer::new(stream);

        assert_eq!(framer.recv().await.unwrap(), [0x0a, 0x00]);
        assert_eq!(framer.seq, Some(4));
    }

    #[tokio::test]
    async fn it_continues_the_adopted_sequence_on_send() {
        let stream = MockStream::new().script(&[0x01, 0x00, 0x00, 0x00, 0x0a]);
        let mut framer = HandshakeFramer::new(stream);

        framer.recv().await.unwrap();
        framer.send(b"response").await.unwrap();

        let written = framer.stream.take_written();
        assert_eq!(written[3], 1);
        assert_eq!(framer.seq, Some(2));
    }

    #[tokio::test]
    async fn it_enforces_continuity_after_adoption() {
        let stream = MockStream::new().script(&[
            // first message adopts sequence 0
            0x01, 0x00, 0x00, 0x00, 0x0a, //
            // second message arrives with sequence 9 instead of 1
            0x01, 0x00, 0x00, 0x09, 0x00,
        ]);
        let mut framer = HandshakeFramer::new(stream);

        framer.recv().await.unwrap();

        assert!(matches!(
            framer.recv().await,
            Err(Error::Sequence {
                expected: 1,
                received: 9
            })
        ));
    }
}
