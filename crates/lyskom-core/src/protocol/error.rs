//! The fatal failure channel.
//!
//! Every variant of [`ProtocolError`] means the byte stream can no longer be
//! trusted: the peer went away, the framing is broken, or a reply could not
//! be correlated.  A [`crate::Connection`] that returns one of these moves to
//! its `Closed` state and must be replaced.
//!
//! Errors that the *server* reports for a single request are not here; they
//! live in [`crate::catalog::errors`] and only affect the caller that sent
//! the request.

use thiserror::Error;

/// Fatal errors raised while encoding, decoding or moving protocol frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The socket returned zero bytes: the server closed the connection.
    #[error("connection closed by server")]
    Closed,

    /// The socket reported an error while reading or writing.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server did not answer the handshake with `LysKOM\n`.
    #[error("bad initial response from server: {0:?}")]
    BadInitialResponse(String),

    /// The bytes on the wire do not follow Protocol A framing.
    #[error("malformed data: {0}")]
    Malformed(String),

    /// A reply referenced a ref-no that has no outstanding request.
    #[error("reply for unknown ref-no {0}")]
    BadRequestId(u64),

    /// A ref-no was registered while another request still holds it.
    #[error("ref-no {0} is already outstanding")]
    DuplicateRefNo(u64),

    /// The server sent an asynchronous message this client cannot decode.
    #[error("unimplemented asynchronous message {0}")]
    UnimplementedAsync(u32),

    /// An error reply carried a code outside the known error table.
    #[error("unknown server error code {0}")]
    UnknownErrorCode(u32),

    /// The connection is closed (or never finished its handshake).
    #[error("connection is not open")]
    NotOpen,
}

impl ProtocolError {
    /// Shorthand for a [`ProtocolError::Malformed`] with a formatted message.
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        ProtocolError::Malformed(msg.into())
    }
}
