//! lyskom command-line client entry point.
//!
//! # Flow
//!
//! ```text
//! main()
//!  └─ load_config()          -- first argument or platform config path
//!  └─ write_default_config_if_missing()
//!  └─ Connection::connect()  -- TCP + "A<user>" / "LysKOM" handshake
//!  └─ register_logging_handlers()
//!  └─ run_bootstrap()        -- prints the session summary as JSON
//!  └─ pump loop              -- only when [client] listen = true
//! ```
//!
//! `RUST_LOG` overrides the configured log level.

use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lyskom_client::application::bootstrap::{resolve_async_names, run_bootstrap};
use lyskom_client::application::notifications::register_logging_handlers;
use lyskom_client::infrastructure::config::{
    config_file_path, load_config, write_default_config_if_missing,
};
use lyskom_core::{Client, Connection, ProtocolError};

fn main() -> anyhow::Result<()> {
    let config_path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => config_file_path().context("locating configuration")?,
    };
    let config = load_config(Some(&config_path)).context("loading configuration")?;

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.client.log_level)),
        )
        .init();

    match write_default_config_if_missing(&config_path) {
        Ok(true) => info!(path = %config_path.display(), "wrote default configuration"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "could not write default configuration"),
    }

    let server = &config.server;
    info!(host = %server.host, port = server.port, "connecting");
    let conn = Connection::connect(
        (server.host.as_str(), server.port),
        &server.user,
        server.read_timeout(),
    )
    .with_context(|| format!("connecting to {}:{}", server.host, server.port))?;
    let mut client = Client::new(conn);

    let tags = resolve_async_names(&config.client.accept_async);
    register_logging_handlers(&mut client, &tags);

    let summary = run_bootstrap(&mut client, &config.client).context("bootstrapping session")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if config.client.listen {
        info!("listening for asynchronous messages");
        loop {
            match client.pump() {
                Ok(()) => {}
                Err(ProtocolError::Closed) => {
                    warn!("server closed the connection");
                    break;
                }
                Err(e) => return Err(e).context("reading from server"),
            }
        }
    }

    client.close().context("closing connection")?;
    Ok(())
}
