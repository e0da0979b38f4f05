//! Buffered receive stream over a byte-stream socket.
//!
//! Protocol A is tokenised one character at a time (integers end at the
//! first non-digit, bit strings are read digit by digit), so reading straight
//! from the socket would cost one syscall per byte.  [`ByteCursor`] keeps an
//! accumulator of received-but-unread bytes and only goes back to the socket
//! when a read asks for more than it holds.
//!
//! # Refill strategy
//!
//! On a shortfall the cursor asks the socket for
//! `max(deficit, REFILL_FLOOR)` bytes.  The unread tail of the accumulator is
//! moved to the front, the new bytes are appended after it and the read
//! position goes back to zero.  Small reads therefore hit the socket at most
//! once per [`REFILL_FLOOR`] bytes, while a single large read (a long text
//! body) is satisfied by as many refills as it needs.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};

use tracing::trace;

use crate::protocol::error::ProtocolError;

/// Minimum number of bytes requested from the socket per refill.
pub const REFILL_FLOOR: usize = 128;

/// The socket seam: a bidirectional byte stream that can be shut down.
///
/// `read` returning `Ok(0)` means the peer closed the stream.
pub trait Transport: Read + Write {
    /// Closes both directions of the stream.
    fn shutdown(&mut self) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

/// A buffered reader that hands out exact byte counts.
///
/// Invariant: `pos <= buf.len() <= buf.capacity()`.  `buf.len()` is the
/// logical length; bytes before `pos` have already been consumed.
#[derive(Debug)]
pub struct ByteCursor<R> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
}

impl<R: Read> ByteCursor<R> {
    /// Wraps `inner` with an empty accumulator.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(REFILL_FLOOR),
            pos: 0,
        }
    }

    /// Returns exactly one byte, blocking until it is available.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Closed`] if the peer closed the stream,
    /// [`ProtocolError::Io`] for any other socket error.
    pub fn receive_byte(&mut self) -> Result<u8, ProtocolError> {
        self.ensure_available(1)?;
        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Returns exactly `len` bytes, blocking until they are available.
    ///
    /// # Errors
    ///
    /// Same as [`ByteCursor::receive_byte`].
    pub fn receive_bytes(&mut self, len: usize) -> Result<Vec<u8>, ProtocolError> {
        self.ensure_available(len)?;
        let bytes = self.buf[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(bytes)
    }

    /// Number of received bytes not yet handed out.
    pub fn available(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Borrows the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrows the underlying stream (used for writing requests).
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwraps the cursor, discarding any unread bytes.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn ensure_available(&mut self, size: usize) -> Result<(), ProtocolError> {
        while self.available() < size {
            let wanted = (size - self.available()).max(REFILL_FLOOR);

            // Splice: keep only the unread tail, then append after it.
            self.buf.drain(..self.pos);
            self.pos = 0;

            let start = self.buf.len();
            self.buf.resize(start + wanted, 0);
            let received = match self.inner.read(&mut self.buf[start..]) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    self.buf.truncate(start);
                    continue;
                }
                Err(e) => {
                    self.buf.truncate(start);
                    return Err(ProtocolError::Io(e));
                }
            };
            self.buf.truncate(start + received);

            if received == 0 {
                return Err(ProtocolError::Closed);
            }
            trace!(received, wanted, buffered = self.buf.len(), "receive buffer refilled");
        }
        Ok(())
    }
}

impl<W: Write> ByteCursor<W> {
    /// Writes all of `bytes` to the underlying stream, looping on partial
    /// writes until everything is sent or the stream fails.
    pub fn send_all(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        let mut rest = bytes;
        while !rest.is_empty() {
            match self.inner.write(rest) {
                Ok(0) => return Err(ProtocolError::Closed),
                Ok(n) => rest = &rest[n..],
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(ProtocolError::Io(e)),
            }
        }
        self.inner.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockStream;

    #[test]
    fn test_receive_byte_returns_bytes_in_order() {
        let mut cursor = ByteCursor::new(&b"ab"[..]);

        assert_eq!(cursor.receive_byte().unwrap(), b'a');
        assert_eq!(cursor.receive_byte().unwrap(), b'b');
    }

    #[test]
    fn test_receive_bytes_spanning_many_small_socket_reads() {
        // Arrange – the socket hands out at most 3 bytes per read call
        let payload: Vec<u8> = (0..=255u8).collect();
        let stream = MockStream::with_input(&payload).chunked(3);
        let mut cursor = ByteCursor::new(stream);

        // Act
        let head = cursor.receive_bytes(10).unwrap();
        let tail = cursor.receive_bytes(246).unwrap();

        // Assert
        assert_eq!(head, payload[..10]);
        assert_eq!(tail, payload[10..]);
        assert_eq!(cursor.available(), 0);
    }

    #[test]
    fn test_refill_requests_at_least_the_floor() {
        let stream = MockStream::with_input(&[b'x'; 500]);
        let mut cursor = ByteCursor::new(stream);

        cursor.receive_byte().unwrap();

        // One refill of REFILL_FLOOR bytes, one consumed.
        assert_eq!(cursor.available(), REFILL_FLOOR - 1);
        assert_eq!(cursor.get_ref().read_sizes(), &[REFILL_FLOOR]);
    }

    #[test]
    fn test_large_read_asks_for_the_whole_deficit() {
        let stream = MockStream::with_input(&[b'y'; 1000]);
        let mut cursor = ByteCursor::new(stream);

        let bytes = cursor.receive_bytes(700).unwrap();

        assert_eq!(bytes.len(), 700);
        assert_eq!(cursor.get_ref().read_sizes(), &[700]);
    }

    #[test]
    fn test_unread_tail_survives_a_refill() {
        // Arrange – first read returns "12", second returns "345"
        let stream = MockStream::with_input(b"12345").chunked(2);
        let mut cursor = ByteCursor::new(stream);
        assert_eq!(cursor.receive_byte().unwrap(), b'1');

        // Act – needs the buffered "2" plus two more bytes
        let bytes = cursor.receive_bytes(3).unwrap();

        // Assert
        assert_eq!(bytes, b"234");
    }

    #[test]
    fn test_eof_is_reported_as_closed() {
        let mut cursor = ByteCursor::new(&b"a"[..]);
        cursor.receive_byte().unwrap();

        let result = cursor.receive_byte();

        assert!(matches!(result, Err(ProtocolError::Closed)));
    }

    #[test]
    fn test_short_stream_fails_exact_read() {
        let mut cursor = ByteCursor::new(&b"abc"[..]);

        assert!(matches!(cursor.receive_bytes(4), Err(ProtocolError::Closed)));
    }

    #[test]
    fn test_socket_error_is_reported_as_io() {
        let stream = MockStream::with_input(b"").failing_reads(ErrorKind::ConnectionReset);
        let mut cursor = ByteCursor::new(stream);

        let result = cursor.receive_byte();

        assert!(matches!(result, Err(ProtocolError::Io(e)) if e.kind() == ErrorKind::ConnectionReset));
    }

    #[test]
    fn test_send_all_loops_over_partial_writes() {
        let stream = MockStream::with_input(b"").chunked(2);
        let mut cursor = ByteCursor::new(stream);

        cursor.send_all(b"hello world\n").unwrap();

        assert_eq!(cursor.get_ref().written(), b"hello world\n");
        assert_eq!(cursor.get_ref().write_calls(), 6);
    }
}
