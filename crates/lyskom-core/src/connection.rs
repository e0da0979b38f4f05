//! Connection: one socket, one byte stream, one outstanding-request table.
//!
//! # Lifecycle (for beginners)
//!
//! ```text
//! Handshaking  ──►  Open  ──►  Closed
//!      │                          ▲
//!      └──────────────────────────┘   (bad greeting)
//! ```
//!
//! - `Handshaking`: `A<user>\n` has been sent; waiting for `LysKOM\n`.
//! - `Open`: requests may be sent and frames read.
//! - `Closed`: [`Connection::close`] was called or a fatal
//!   [`ProtocolError`] occurred.  Every later call returns
//!   [`ProtocolError::NotOpen`]; a new connection is needed.
//!
//! # Frames
//!
//! Every server frame starts with one classifying character:
//!
//! | Start | Frame | Layout                        |
//! |-------|-------|-------------------------------|
//! | `=`   | OK    | `=<ref-no> <value>`           |
//! | `%`   | ERROR | `%<ref-no> <code> <status>`   |
//! | `:`   | ASYNC | `:<arg-count> <tag> <fields>` |

use std::io::ErrorKind;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::catalog::asynchronous::AsyncMessage;
use crate::catalog::errors::{ServerError, ServerErrorKind};
use crate::catalog::requests::{CallNo, Request};
use crate::catalog::responses::{Response, ResponseShape};
use crate::protocol::codec::read_uint;
use crate::protocol::cursor::{ByteCursor, Transport};
use crate::protocol::error::ProtocolError;
use crate::protocol::scalar::{read_first_non_ws, read_int, write_hollerith, Hollerith};
use crate::protocol::sequence::{OutstandingRequests, SequenceCounter};

/// The greeting a LysKOM server answers the handshake with.
pub const GREETING: &[u8] = b"LysKOM\n";

/// Current state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Identification sent; greeting not yet verified.
    Handshaking,
    /// Greeting verified; requests may be sent.
    Open,
    /// Closed by the caller or by a fatal error.
    Closed,
}

/// One classified server frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A request succeeded.
    Ok { ref_no: u64, response: Response },
    /// A request failed on the server.  The connection is still usable.
    Error { ref_no: u64, error: ServerError },
    /// An asynchronous message.
    Async(AsyncMessage),
}

impl Reply {
    /// The ref-no an OK or ERROR frame answers; `None` for async messages.
    pub fn ref_no(&self) -> Option<u64> {
        match self {
            Reply::Ok { ref_no, .. } | Reply::Error { ref_no, .. } => Some(*ref_no),
            Reply::Async(_) => None,
        }
    }
}

/// A Protocol A session over one stream.
#[derive(Debug)]
pub struct Connection<S> {
    cursor: ByteCursor<S>,
    state: ConnectionState,
    sequence: SequenceCounter,
    outstanding: OutstandingRequests<CallNo>,
    shut_down: bool,
}

impl Connection<TcpStream> {
    /// Opens a TCP connection and performs the handshake.
    ///
    /// `read_timeout` is applied to the socket; an expired read surfaces as
    /// a [`ProtocolError::Io`] and closes the connection.
    pub fn connect<A: ToSocketAddrs>(
        addr: A,
        user: &str,
        read_timeout: Option<Duration>,
    ) -> Result<Self, ProtocolError> {
        let stream = TcpStream::connect(addr)?;
        stream.set_read_timeout(read_timeout)?;
        stream.set_nodelay(true)?;
        Self::new(stream, user)
    }
}

impl<S: Transport> Connection<S> {
    /// Sends `A<user>\n` over `stream` and waits for the greeting.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::BadInitialResponse`] if the first seven bytes are
    ///   not `LysKOM\n`.
    /// - [`ProtocolError::Closed`] / [`ProtocolError::Io`] if the stream
    ///   fails first.
    pub fn new(stream: S, user: &str) -> Result<Self, ProtocolError> {
        let mut conn = Self {
            cursor: ByteCursor::new(stream),
            state: ConnectionState::Handshaking,
            sequence: SequenceCounter::new(),
            outstanding: OutstandingRequests::new(),
            shut_down: false,
        };
        let result = conn.handshake(user);
        conn.guard(result)?;
        conn.state = ConnectionState::Open;
        info!(user, "LysKOM handshake complete");
        Ok(conn)
    }

    fn handshake(&mut self, user: &str) -> Result<(), ProtocolError> {
        let mut hello = vec![b'A'];
        write_hollerith(&mut hello, Hollerith::from_latin1(user).as_bytes());
        hello.push(b'\n');
        self.cursor.send_all(&hello)?;

        let greeting = self.cursor.receive_bytes(GREETING.len())?;
        if greeting != GREETING {
            return Err(ProtocolError::BadInitialResponse(
                String::from_utf8_lossy(&greeting).into_owned(),
            ));
        }
        Ok(())
    }

    /// Sends `request` under the next ref-no and returns that ref-no.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::NotOpen`] after the connection closed; otherwise any
    /// write failure, which also closes the connection.
    pub fn send_request(&mut self, request: &Request) -> Result<u64, ProtocolError> {
        self.ensure_open()?;
        let ref_no = self.sequence.next();
        let call_no = request.call_no();
        let result = self.send_as(ref_no, call_no, request);
        self.guard(result)?;
        debug!(ref_no, call = %call_no, "request sent");
        Ok(ref_no)
    }

    fn send_as(&mut self, ref_no: u64, call_no: CallNo, request: &Request) -> Result<(), ProtocolError> {
        self.outstanding.register(ref_no, call_no)?;
        let body = request.encode();
        let mut frame = Vec::with_capacity(body.len() + 8);
        frame.extend_from_slice(ref_no.to_string().as_bytes());
        frame.push(b' ');
        frame.extend_from_slice(&body);
        self.cursor.send_all(&frame)
    }

    /// Reads exactly one frame.
    ///
    /// # Errors
    ///
    /// Any [`ProtocolError`]; the connection is closed afterwards.
    pub fn read_response(&mut self) -> Result<Reply, ProtocolError> {
        self.ensure_open()?;
        let result = self.read_frame();
        let reply = self.guard(result)?;
        match &reply {
            Reply::Ok { ref_no, .. } => debug!(ref_no, "ok reply"),
            Reply::Error { ref_no, error } => debug!(ref_no, %error, "error reply"),
            Reply::Async(msg) => debug!(tag = %msg.async_no(), "async message"),
        }
        Ok(reply)
    }

    fn read_frame(&mut self) -> Result<Reply, ProtocolError> {
        let cursor = &mut self.cursor;
        match read_first_non_ws(cursor)? {
            b'=' => {
                let ref_no = read_int(cursor)?;
                let call_no = self.outstanding.take(ref_no)?;
                let response = ResponseShape::for_call(call_no).decode(cursor)?;
                Ok(Reply::Ok { ref_no, response })
            }
            b'%' => {
                let ref_no = read_int(cursor)?;
                let code: u32 = read_uint(cursor, "error code")?;
                let status: u32 = read_uint(cursor, "error status")?;
                self.outstanding.take(ref_no)?;
                let kind = ServerErrorKind::from_code(code)?;
                Ok(Reply::Error {
                    ref_no,
                    error: ServerError { kind, status },
                })
            }
            b':' => {
                let _arg_count = read_int(cursor)?;
                let tag: u32 = read_uint(cursor, "async tag")?;
                Ok(Reply::Async(AsyncMessage::decode_tagged(tag, cursor)?))
            }
            other => Err(ProtocolError::malformed(format!(
                "unexpected frame start {:?}",
                char::from(other)
            ))),
        }
    }

    /// Shuts the socket down.  Calling it again does nothing; a "not
    /// connected" error from the socket is ignored.
    pub fn close(&mut self) -> Result<(), ProtocolError> {
        self.state = ConnectionState::Closed;
        self.outstanding.clear();
        if self.shut_down {
            return Ok(());
        }
        self.shut_down = true;
        match self.cursor.get_mut().shutdown() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(ProtocolError::Io(e)),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Requests sent but not yet answered.
    pub fn outstanding(&self) -> &OutstandingRequests<CallNo> {
        &self.outstanding
    }

    /// The most recently assigned ref-no (0 before the first request).
    pub fn last_ref_no(&self) -> u64 {
        self.sequence.current()
    }

    pub fn get_ref(&self) -> &S {
        self.cursor.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut S {
        self.cursor.get_mut()
    }

    fn ensure_open(&self) -> Result<(), ProtocolError> {
        match self.state {
            ConnectionState::Open => Ok(()),
            ConnectionState::Handshaking | ConnectionState::Closed => Err(ProtocolError::NotOpen),
        }
    }

    /// Moves to `Closed` if `result` is an error.
    fn guard<T>(&mut self, result: Result<T, ProtocolError>) -> Result<T, ProtocolError> {
        if let Err(e) = &result {
            if self.state != ConnectionState::Closed {
                warn!(error = %e, "closing connection after fatal error");
            }
            self.state = ConnectionState::Closed;
            self.outstanding.clear();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockStream;
    use crate::protocol::codec::{ConfNo, TextNo};

    fn open(script: &[u8]) -> Connection<MockStream> {
        let mut input = GREETING.to_vec();
        input.extend_from_slice(script);
        Connection::new(MockStream::with_input(&input), "guest").unwrap()
    }

    fn change_conference() -> Request {
        Request::ChangeConference {
            conf_no: ConfNo(14506),
        }
    }

    // ── Handshake ─────────────────────────────────────────────────────────────

    #[test]
    fn test_handshake_sends_identification_and_opens() {
        let conn = open(b"");

        assert_eq!(conn.get_ref().written(), b"A5Hguest\n");
        assert_eq!(conn.state(), ConnectionState::Open);
    }

    #[test]
    fn test_bad_greeting_is_rejected() {
        let stream = MockStream::with_input(b"%% No connections left.\n");

        let result = Connection::new(stream, "guest");

        assert!(matches!(
            result,
            Err(ProtocolError::BadInitialResponse(ref got)) if got == "%% No c"
        ));
    }

    #[test]
    fn test_short_greeting_is_a_closed_stream() {
        let result = Connection::new(MockStream::with_input(b"Lys"), "guest");
        assert!(matches!(result, Err(ProtocolError::Closed)));
    }

    // ── Requests ──────────────────────────────────────────────────────────────

    #[test]
    fn test_ref_numbers_start_at_one_and_increase() {
        // Arrange
        let mut conn = open(b"");
        conn.get_mut().clear_written();

        // Act
        let refs: Vec<u64> = (0..3)
            .map(|_| conn.send_request(&Request::GetTime).unwrap())
            .collect();

        // Assert
        assert_eq!(refs, vec![1, 2, 3]);
        assert_eq!(conn.get_ref().written(), b"1 35\n2 35\n3 35\n");
        assert_eq!(conn.outstanding().len(), 3);
        assert_eq!(conn.last_ref_no(), 3);
    }

    #[test]
    fn test_partial_writes_are_completed() {
        let stream = MockStream::with_input(GREETING).chunked(3);
        let mut conn = Connection::new(stream, "guest").unwrap();
        conn.get_mut().clear_written();

        conn.send_request(&change_conference()).unwrap();

        assert_eq!(conn.get_ref().written(), b"1 2 14506\n");
        assert!(conn.get_ref().write_calls() > 1);
    }

    // ── Replies ───────────────────────────────────────────────────────────────

    #[test]
    fn test_ok_reply_removes_outstanding_entry() {
        // Arrange
        let mut conn = open(b"=2\n");
        conn.send_request(&Request::GetTime).unwrap();
        conn.send_request(&change_conference()).unwrap();

        // Act
        let reply = conn.read_response().unwrap();

        // Assert
        assert_eq!(
            reply,
            Reply::Ok {
                ref_no: 2,
                response: Response::Empty
            }
        );
        assert!(!conn.outstanding().contains(2));
        assert!(conn.outstanding().contains(1));
    }

    #[test]
    fn test_error_reply_maps_code() {
        let mut conn = open(b"%1 9 14506\n");
        conn.send_request(&change_conference()).unwrap();

        let reply = conn.read_response().unwrap();

        assert_eq!(
            reply,
            Reply::Error {
                ref_no: 1,
                error: ServerError {
                    kind: ServerErrorKind::UndefinedConference,
                    status: 14506,
                },
            }
        );
        assert!(conn.is_open());
        assert!(conn.outstanding().is_empty());
    }

    #[test]
    fn test_typed_reply_uses_the_calls_shape() {
        let mut conn = open(b"=1 4711\n");
        conn.send_request(&Request::FindNextTextNo { start: TextNo(4710) })
            .unwrap();

        let reply = conn.read_response().unwrap();

        assert_eq!(reply.ref_no(), Some(1));
        assert!(matches!(
            reply,
            Reply::Ok { response: Response::TextNo(TextNo(4711)), .. }
        ));
    }

    #[test]
    fn test_async_frame_discards_argument_count() {
        let mut conn = open(b":2 13 6 33\n");

        let reply = conn.read_response().unwrap();

        assert!(matches!(
            reply,
            Reply::Async(AsyncMessage::Logout { .. })
        ));
        assert_eq!(reply.ref_no(), None);
    }

    // ── Fatal errors ──────────────────────────────────────────────────────────

    #[test]
    fn test_unknown_ref_no_closes_connection() {
        let mut conn = open(b"=7\n");

        let first = conn.read_response();
        let second = conn.send_request(&Request::GetTime);

        assert!(matches!(first, Err(ProtocolError::BadRequestId(7))));
        assert_eq!(conn.state(), ConnectionState::Closed);
        assert!(matches!(second, Err(ProtocolError::NotOpen)));
    }

    #[test]
    fn test_unknown_async_tag_is_reported_distinctly() {
        let mut conn = open(b": 0 9999\n");

        let result = conn.read_response();

        assert!(matches!(result, Err(ProtocolError::UnimplementedAsync(9999))));
        assert_eq!(conn.state(), ConnectionState::Closed);
    }

    #[test]
    fn test_unexpected_frame_start_is_malformed() {
        let mut conn = open(b"  ?1\n");
        assert!(matches!(conn.read_response(), Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_unknown_error_code_is_fatal() {
        let mut conn = open(b"%1 999 0\n");
        conn.send_request(&Request::GetTime).unwrap();

        assert!(matches!(
            conn.read_response(),
            Err(ProtocolError::UnknownErrorCode(999))
        ));
        assert!(!conn.is_open());
    }

    #[test]
    fn test_eof_is_closed() {
        let mut conn = open(b"");
        assert!(matches!(conn.read_response(), Err(ProtocolError::Closed)));
    }

    // ── Close ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_close_is_idempotent() {
        let mut conn = open(b"");

        conn.close().unwrap();
        conn.close().unwrap();

        assert_eq!(conn.get_ref().shutdown_calls(), 1);
        assert!(matches!(conn.read_response(), Err(ProtocolError::NotOpen)));
    }

    #[test]
    fn test_close_tolerates_not_connected() {
        let stream = MockStream::with_input(GREETING).failing_shutdown(ErrorKind::NotConnected);
        let mut conn = Connection::new(stream, "guest").unwrap();

        assert!(conn.close().is_ok());
    }

    #[test]
    fn test_close_reports_other_shutdown_errors() {
        let stream = MockStream::with_input(GREETING).failing_shutdown(ErrorKind::PermissionDenied);
        let mut conn = Connection::new(stream, "guest").unwrap();

        assert!(matches!(conn.close(), Err(ProtocolError::Io(_))));
        assert_eq!(conn.state(), ConnectionState::Closed);
    }
}
