//! In-memory scripted transport for tests.
//!
//! # Why a mock stream?
//!
//! The connection and client logic only needs *some* bidirectional byte
//! stream.  A real `TcpStream` would need a LysKOM server on the other end;
//! [`MockStream`] instead replays a fixed script of server bytes and records
//! everything the client writes, so tests can assert on the exact wire
//! format in both directions.
//!
//! # Usage
//!
//! ```rust
//! use lyskom_core::mock::MockStream;
//! use lyskom_core::Connection;
//!
//! let stream = MockStream::with_input(b"LysKOM\n");
//! let conn = Connection::new(stream, "guest").unwrap();
//! assert_eq!(conn.get_ref().written(), b"A5Hguest\n");
//! ```
//!
//! Knobs:
//!
//! - [`MockStream::chunked`] caps every read *and* write at `n` bytes, to
//!   exercise refill and partial-write loops.
//! - [`MockStream::failing_reads`] makes every read fail with an I/O error.
//! - [`MockStream::failing_shutdown`] makes `shutdown` fail.

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read, Write};

use crate::protocol::cursor::Transport;

/// A scripted, in-memory [`Transport`].
#[derive(Debug, Default)]
pub struct MockStream {
    input: VecDeque<u8>,
    written: Vec<u8>,
    chunk_limit: Option<usize>,
    read_error: Option<ErrorKind>,
    shutdown_error: Option<ErrorKind>,
    read_sizes: Vec<usize>,
    write_calls: usize,
    shutdown_calls: usize,
}

impl MockStream {
    /// Creates a stream whose reads return `input` and then EOF.
    pub fn with_input(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Caps each read and write call at `limit` bytes.
    pub fn chunked(mut self, limit: usize) -> Self {
        self.chunk_limit = Some(limit.max(1));
        self
    }

    /// Makes every read fail with `kind`.
    pub fn failing_reads(mut self, kind: ErrorKind) -> Self {
        self.read_error = Some(kind);
        self
    }

    /// Makes `shutdown` fail with `kind`.
    pub fn failing_shutdown(mut self, kind: ErrorKind) -> Self {
        self.shutdown_error = Some(kind);
        self
    }

    /// Appends more server bytes to the end of the script.
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    /// Everything the client has written so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Forgets what has been written, so a test can look at the next request only.
    pub fn clear_written(&mut self) {
        self.written.clear();
    }

    /// Buffer sizes passed to each `read` call, in order.
    pub fn read_sizes(&self) -> &[usize] {
        &self.read_sizes
    }

    /// Number of `write` calls made.
    pub fn write_calls(&self) -> usize {
        self.write_calls
    }

    /// Number of `shutdown` calls made.
    pub fn shutdown_calls(&self) -> usize {
        self.shutdown_calls
    }

    fn limit(&self, len: usize) -> usize {
        self.chunk_limit.map_or(len, |limit| len.min(limit))
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_sizes.push(buf.len());
        if let Some(kind) = self.read_error {
            return Err(io::Error::new(kind, "mock read failure"));
        }
        let n = self.limit(buf.len()).min(self.input.len());
        for (slot, byte) in buf.iter_mut().zip(self.input.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_calls += 1;
        let n = self.limit(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for MockStream {
    fn shutdown(&mut self) -> io::Result<()> {
        self.shutdown_calls += 1;
        match self.shutdown_error {
            Some(kind) => Err(io::Error::new(kind, "mock shutdown failure")),
            None => Ok(()),
        }
    }
}
