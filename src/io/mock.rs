//! A deterministic duplex stream for driving the framers and the connection
//! in tests: reads are served from a pre-loaded script, writes are recorded.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::{AsyncRead, AsyncWrite};

#[derive(Debug, Default)]
pub(crate) struct MockStream {
    rbuf: Vec<u8>,
    pub(crate) wbuf: Vec<u8>,
}

impl MockStream {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append bytes the "server" will send us.
    pub(crate) fn script(mut self, bytes: &[u8]) -> Self {
        self.rbuf.extend_from_slice(bytes);
        self
    }

    /// Everything the client has written so far, clearing the record.
    pub(crate) fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.wbuf)
    }

    /// Scripted bytes the client has not yet read.
    pub(crate) fn unread(&self) -> usize {
        self.rbuf.len()
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        let n = buf.len().min(self.rbuf.len());
        buf[..n].copy_from_slice(&self.rbuf[..n]);
        self.rbuf.drain(..n);

        // n == 0 with a non-empty `buf` reads as EOF to the caller
        Poll::Ready(Ok(n))
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.wbuf.extend_from_slice(buf);

        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
