//! Bootstrap: the request sequence run right after the handshake.
//!
//! ```text
//! set-client-version  ->  who-am-i  ->  get-time  ->  get-version-info  ->  accept-async
//! ```

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use lyskom_core::protocol::VersionInfo;
use lyskom_core::{
    AsyncNo, CallError, CallNo, Client, Hollerith, Request, Response, SessionNo, Transport,
};

use crate::infrastructure::config::ClientSettings;

/// Error type for the bootstrap sequence.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Call(#[from] CallError),

    /// A reply decoded to a different shape than the call promises.
    #[error("unexpected reply to {call}: {got:?}")]
    UnexpectedReply { call: CallNo, got: Response },
}

/// What the server told us during the bootstrap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session: SessionNo,
    /// Server clock, ISO 8601.
    pub server_time: String,
    pub server: VersionInfo,
    pub accepted_async: Vec<AsyncNo>,
}

/// Maps configured async message names to tags.  Unknown names are logged
/// and skipped.
pub fn resolve_async_names(names: &[String]) -> Vec<AsyncNo> {
    names
        .iter()
        .filter_map(|name| {
            let found = AsyncNo::ALL.iter().copied().find(|tag| tag.name() == name);
            if found.is_none() {
                warn!(name = name.as_str(), "ignoring unknown asynchronous message name");
            }
            found
        })
        .collect()
}

/// Runs the bootstrap sequence on a freshly opened client.
///
/// # Errors
///
/// [`BootstrapError::Call`] if any request fails.  A server error stops the
/// sequence but leaves the connection usable.
pub fn run_bootstrap<S: Transport>(
    client: &mut Client<S>,
    settings: &ClientSettings,
) -> Result<SessionSummary, BootstrapError> {
    client.call(&Request::SetClientVersion {
        client_name: Hollerith::from_latin1(&settings.name),
        client_version: Hollerith::from_latin1(&settings.version),
    })?;

    let session = match client.call(&Request::WhoAmI)? {
        Response::SessionNo(no) => no,
        got => return Err(unexpected(CallNo::WhoAmI, got)),
    };

    let server_time = match client.call(&Request::GetTime)? {
        Response::Time(time) => time.to_iso_8601(),
        got => return Err(unexpected(CallNo::GetTime, got)),
    };

    let server = match client.call(&Request::GetVersionInfo)? {
        Response::VersionInfo(info) => info,
        got => return Err(unexpected(CallNo::GetVersionInfo, got)),
    };

    let accepted_async = resolve_async_names(&settings.accept_async);
    client.call(&Request::AcceptAsync {
        request_list: accepted_async.clone(),
    })?;

    info!(
        session = session.0,
        server = %server.server_software,
        version = %server.software_version,
        protocol = server.protocol_version,
        "session bootstrapped"
    );

    Ok(SessionSummary {
        session,
        server_time,
        server,
        accepted_async,
    })
}

fn unexpected(call: CallNo, got: Response) -> BootstrapError {
    BootstrapError::UnexpectedReply { call, got }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyskom_core::mock::MockStream;
    use lyskom_core::{Connection, ServerErrorKind};

    fn settings() -> ClientSettings {
        ClientSettings {
            name: "test".to_string(),
            version: "1.0".to_string(),
            accept_async: vec!["send-message".to_string(), "logout".to_string()],
            ..ClientSettings::default()
        }
    }

    fn client(script: &[u8]) -> Client<MockStream> {
        let mut input = b"LysKOM\n".to_vec();
        input.extend_from_slice(script);
        let mut conn = Connection::new(MockStream::with_input(&input), "test").unwrap();
        conn.get_mut().clear_written();
        Client::new(conn)
    }

    #[test]
    fn test_bootstrap_sends_the_fixed_sequence() {
        // Arrange
        let mut client = client(
            b"=1\n=2 33\n=3 15 14 13 29 1 100 2 59 0\n=4 11 7Hlyskomd 5H2.1.2\n=5\n",
        );

        // Act
        let summary = run_bootstrap(&mut client, &settings()).unwrap();

        // Assert
        assert_eq!(
            client.connection().get_ref().written(),
            &b"1 69 4Htest 3H1.0\n2 56\n3 35\n4 75\n5 80 2 { 12 13 }\n"[..]
        );
        assert_eq!(summary.session, SessionNo(33));
        assert_eq!(summary.server_time, "2000-02-29T13:14:15Z");
        assert_eq!(summary.server.protocol_version, 11);
        assert_eq!(summary.accepted_async, vec![AsyncNo::SendMessage, AsyncNo::Logout]);
    }

    #[test]
    fn test_server_error_stops_the_sequence() {
        let mut client = client(b"=1\n%2 6 0\n");

        let err = run_bootstrap(&mut client, &settings()).unwrap_err();

        match err {
            BootstrapError::Call(CallError::Server(e)) => {
                assert_eq!(e.kind, ServerErrorKind::LoginFirst)
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(client.connection().is_open());
    }

    #[test]
    fn test_unknown_async_names_are_skipped() {
        let names = vec!["login".to_string(), "no-such-thing".to_string()];
        assert_eq!(resolve_async_names(&names), vec![AsyncNo::Login]);
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let summary = SessionSummary {
            session: SessionNo(7),
            server_time: "2000-02-29T13:14:15Z".to_string(),
            server: VersionInfo {
                protocol_version: 11,
                server_software: Hollerith::from("lyskomd"),
                software_version: Hollerith::from("2.1.2"),
            },
            accepted_async: vec![AsyncNo::NewText],
        };

        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["session"], 7);
        assert_eq!(json["server"]["server_software"], "lyskomd");
        assert_eq!(json["accepted_async"][0], "new-text");
    }
}
