use std::io::{Read, Write};

use byteorder::{ByteOrder, LittleEndian};
use bytes::BytesMut;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use futures_io::{AsyncRead, AsyncWrite};
use futures_util::io::{AsyncReadExt, AsyncWriteExt};

use super::{fragments, MAX_PACKET};
use crate::io::BufMut;
use crate::{Error, Result};

/// Transparent compression transport.
///
/// Stacks an outer envelope framer over the plain-packet layer: the plain
/// fragments produced for a message are appended to an out-buffer, and on
/// send the buffer is drained as a compressed message of
/// `[u24 compressed_length][u8 seq][u24 uncompressed_length][payload]`
/// envelopes. An envelope body larger than `threshold` is zlib-compressed
/// (`uncompressed_length` records its original size); smaller bodies travel
/// verbatim with `uncompressed_length == 0`.
///
/// The two sequence counters are independent: `seq` numbers the plain
/// fragments inside the byte stream, `compressed_seq` numbers the envelopes.
/// Both reset to 0 at the start of every command. Inner fragments may be
/// split across envelopes and one envelope may carry several inner fragments.
pub(crate) struct CompressedFramer<S> {
    stream: S,

    seq: u8,
    compressed_seq: u8,

    threshold: usize,
    level: Compression,

    // decompressed plain-packet bytes not yet consumed by `recv`
    rbuf: BytesMut,

    // plain-packet bytes not yet wrapped in an envelope
    wbuf: Vec<u8>,
}

impl<S> CompressedFramer<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: S, threshold: usize, level: u32) -> Self {
        Self {
            stream,
            seq: 0,
            compressed_seq: 0,
            threshold,
            level: Compression::new(level),
            rbuf: BytesMut::new(),
            wbuf: Vec::new(),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.seq = 0;
        self.compressed_seq = 0;
    }

    #[cfg(test)]
    pub(crate) fn into_stream(self) -> S {
        self.stream
    }

    #[cfg(test)]
    pub(crate) fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub(crate) async fn send(&mut self, payload: &[u8]) -> Result<()> {
        for chunk in fragments(payload) {
            self.wbuf.put_u24::<LittleEndian>(chunk.len() as u32);
            self.wbuf.put_u8(self.seq);
            self.wbuf.put_bytes(chunk);

            self.seq = self.seq.wrapping_add(1);

            // Bound memory: a full out-buffer is drained one maximal
            // envelope at a time while fragments are still being appended.
            while self.wbuf.len() >= MAX_PACKET {
                let body: Vec<u8> = self.wbuf.drain(..MAX_PACKET).collect();
                self.write_envelope(&body).await?;
            }
        }

        // Drain the remainder; `fragments` keeps the trailing-empty rule so
        // the receiver always ends on a short envelope.
        let rest = std::mem::take(&mut self.wbuf);
        for body in fragments(&rest) {
            self.write_envelope(body).await?;
        }

        self.stream.flush().await?;

        Ok(())
    }

    async fn write_envelope(&mut self, body: &[u8]) -> Result<()> {
        let mut envelope = Vec::with_capacity(7 + body.len());

        if body.len() > self.threshold {
            let mut encoder = ZlibEncoder::new(Vec::new(), self.level);
            encoder.write_all(body)?;
            let compressed = encoder.finish()?;

            envelope.put_u24::<LittleEndian>(compressed.len() as u32);
            envelope.put_u8(self.compressed_seq);
            envelope.put_u24::<LittleEndian>(body.len() as u32);
            envelope.put_bytes(&compressed);
        } else {
            envelope.put_u24::<LittleEndian>(body.len() as u32);
            envelope.put_u8(self.compressed_seq);
            envelope.put_u24::<LittleEndian>(0);
            envelope.put_bytes(body);
        }

        self.compressed_seq = self.compressed_seq.wrapping_add(1);
        self.stream.write_all(&envelope).await?;

        Ok(())
    }

    pub(crate) async fn recv(&mut self) -> Result<Vec<u8>> {
        let mut message = Vec::new();

        loop {
            let header = self.read_inner(4).await?;

            let len = LittleEndian::read_u24(&header) as usize;
            let received = header[3];

            if received != self.seq {
                return Err(Error::Sequence {
                    expected: self.seq,
                    received,
                });
            }

            self.seq = received.wrapping_add(1);

            let body = self.read_inner(len).await?;
            message.extend_from_slice(&body);

            if len < MAX_PACKET {
                return Ok(message);
            }
        }
    }

    // Hand out `n` decompressed bytes, refilling from at most one compressed
    // message off the stream.
    async fn read_inner(&mut self, n: usize) -> Result<BytesMut> {
        if self.rbuf.len() < n {
            self.recv_compressed().await?;
        }

        if self.rbuf.len() < n {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "compressed stream ended inside a packet",
            )
            .into());
        }

        Ok(self.rbuf.split_to(n))
    }

    async fn recv_compressed(&mut self) -> Result<()> {
        loop {
            let mut header = [0_u8; 7];
            self.stream.read_exact(&mut header).await?;

            let compressed_len = LittleEndian::read_u24(&header) as usize;
            let received = header[3];
            let uncompressed_len = LittleEndian::read_u24(&header[4..]) as usize;

            if received != self.compressed_seq {
                return Err(Error::Sequence {
                    expected: self.compressed_seq,
                    received,
                });
            }

            self.compressed_seq = received.wrapping_add(1);

            let mut payload = vec![0_u8; compressed_len];
            self.stream.read_exact(&mut payload).await?;

            if uncompressed_len > 0 {
                let mut decompressed = Vec::with_capacity(uncompressed_len);
                ZlibDecoder::new(&payload[..])
                    .read_to_end(&mut decompressed)
                    .map_err(|err| err_framing!("invalid compressed payload: {}", err))?;

                if decompressed.len() != uncompressed_len {
                    return Err(err_framing!(
                        "compressed envelope declared {} uncompressed byte(s) but inflated to {}",
                        uncompressed_len,
                        decompressed.len()
                    ));
                }

                self.rbuf.extend_from_slice(&decompressed);
            } else {
                self.rbuf.extend_from_slice(&payload);
            }

            if compressed_len < MAX_PACKET {
                return Ok(());
            }
        }
    }
}
