//! # lyskom-core
//!
//! Client-side codec and session runtime for LysKOM Protocol A, the
//! line-oriented text protocol spoken by LysKOM conferencing servers.
//!
//! This crate has no dependency on any particular socket: everything above
//! the byte stream works on any [`Transport`], and [`mock::MockStream`]
//! provides a scripted one for tests.
//!
//! # Architecture overview (for beginners)
//!
//! Data flows strictly upward through five layers:
//!
//! - **`protocol`** – How values look on the wire.  [`ByteCursor`] buffers
//!   the socket, the scalar codec reads integers, floats and Hollerith
//!   strings (`5Hhello`), and the [`Decode`] / [`Encode`] traits build
//!   arrays, bit strings and records on top.
//!
//! - **`catalog`** – The closed tables: which arguments each request takes
//!   ([`Request`]), how each call's reply is decoded ([`ResponseShape`]),
//!   which asynchronous messages exist ([`AsyncMessage`]) and which error
//!   codes the server can send ([`ServerErrorKind`]).
//!
//! - **`connection`** – One socket.  Performs the handshake, numbers
//!   outgoing requests, classifies incoming frames and matches replies to
//!   the requests that caused them.
//!
//! - **`client`** – A blocking `call(request) -> reply` on top of the
//!   connection, with asynchronous messages dispatched to handlers while
//!   waiting.
//!
//! # Two error channels
//!
//! [`ProtocolError`] is fatal: the stream can no longer be trusted and the
//! connection closes.  [`ServerError`] is what the server reports for a
//! single failed request; the connection keeps working.  [`CallError`]
//! carries either one out of [`Client::call`].

pub mod catalog;
pub mod client;
pub mod connection;
pub mod mock;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `lyskom_core::Request` instead of `lyskom_core::catalog::requests::Request`.
pub use catalog::{
    AsyncMessage, AsyncNo, CallError, CallNo, Request, Response, ResponseShape, ServerError,
    ServerErrorKind,
};
pub use client::{AsyncHandler, Client};
pub use connection::{Connection, ConnectionState, Reply};
pub use protocol::{
    ByteCursor, ConfNo, Decode, Encode, Hollerith, LocalTextNo, PersNo, ProtocolError,
    SessionNo, TextNo, Time, Transport,
};
