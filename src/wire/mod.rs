//! Packet framing.
//!
//! A logical message is carried as one or more fragments of at most
//! [`MAX_PACKET`] bytes, each prefixed with a 3-byte little-endian length and
//! a 1-byte sequence number. When compression is negotiated an outer envelope
//! layer wraps the plain-packet byte stream with its own, independent
//! sequence domain; see [`CompressedFramer`].

mod compressed;
mod handshake;
mod plain;

pub(crate) use compressed::CompressedFramer;
pub(crate) use handshake::HandshakeFramer;
pub(crate) use plain::PlainFramer;

use futures_io::{AsyncRead, AsyncWrite};

use crate::Result;

/// Largest fragment body: 2^24 - 1.
pub(crate) const MAX_PACKET: usize = 0xff_ff_ff;

/// Fragment bodies for one message.
///
/// Yields chunks of at most [`MAX_PACKET`] bytes and, when the payload length
/// is an exact multiple of it (including the empty payload), one trailing
/// empty chunk so the receiver sees a short fragment and stops reading.
pub(crate) fn fragments(payload: &[u8]) -> impl Iterator<Item = &[u8]> + '_ {
    let trailing = if payload.len() % MAX_PACKET == 0 {
        Some(&payload[..0])
    } else {
        None
    };

    payload.chunks(MAX_PACKET).chain(trailing)
}

/// The wire layer a session speaks after the auth ACK; chosen exactly once,
/// based on whether `COMPRESS` was negotiated.
pub(crate) enum WireFormat<S> {
    Plain(PlainFramer<S>),
    Compressed(CompressedFramer<S>),
}

impl<S> WireFormat<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Reset the sequence counters (both domains, in compressed mode) to 0.
    /// Called at the start of every client-initiated command.
    pub(crate) fn reset(&mut self) {
        match self {
            WireFormat::Plain(framer) => framer.reset(),
            WireFormat::Compressed(framer) => framer.reset(),
        }
    }

    pub(crate) async fn send(&mut self, payload: &[u8]) -> Result<()> {
        match self {
            WireFormat::Plain(framer) => framer.send(payload).await,
            WireFormat::Compressed(framer) => framer.send(payload).await,
        }
    }

    pub(crate) async fn recv(&mut self) -> Result<Vec<u8>> {
        match self {
            WireFormat::Plain(framer) => framer.recv().await,
            WireFormat::Compressed(framer) => framer.recv().await,
        }
    }
}
