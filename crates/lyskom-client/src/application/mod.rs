//! Application layer use cases for the command-line client.
//!
//! - **`bootstrap`** – The fixed request sequence run right after the
//!   handshake: report the client version, learn the session number, read
//!   the server clock and version, and choose which asynchronous messages
//!   the server should send.
//!
//! - **`notifications`** – Async handlers that turn incoming asynchronous
//!   messages into log lines.

pub mod bootstrap;
pub mod notifications;
