//! lyskom-client library entry point.
//!
//! Re-exports all public modules so that the binary entry point in `main.rs`
//! and the tests share the same module tree.
//!
//! # What does lyskom-client do? (for beginners)
//!
//! It is the smallest useful consumer of `lyskom-core`:
//!
//! 1. Loads a TOML config (server address, identification, options).
//! 2. Connects over TCP and performs the `A<user>` / `LysKOM` handshake.
//! 3. Runs a bootstrap sequence of requests and prints the result as JSON.
//! 4. Optionally keeps the connection open and logs every asynchronous
//!    message the server pushes (new texts, logins, personal messages).

/// Application layer: use cases built on `lyskom_core::Client`.
pub mod application;

/// Infrastructure layer: configuration storage.
pub mod infrastructure;
