//! Infrastructure layer for the command-line client.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `lyskom_core`, but MUST NOT be imported by `lyskom_core`.
//!
//! # Sub-modules
//!
//! - **`config`** – TOML configuration file: server address, handshake
//!   identification, client name and which asynchronous messages to request.

pub mod config;
