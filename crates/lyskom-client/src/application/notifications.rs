//! Logs asynchronous messages as they arrive.

use tracing::info;

use lyskom_core::{AsyncMessage, AsyncNo, Client, Transport};

/// A one-line, human-readable description of `msg`.
pub fn describe(msg: &AsyncMessage) -> String {
    match msg {
        AsyncMessage::SendMessage {
            recipient,
            sender,
            message,
        } if recipient.0 == 0 => format!("broadcast from person {sender}: {message}"),
        AsyncMessage::SendMessage {
            recipient,
            sender,
            message,
        } => format!("message from person {sender} to {recipient}: {message}"),
        AsyncMessage::Login { person, session } => {
            format!("person {person} logged in (session {session})")
        }
        AsyncMessage::Logout { person, session } => {
            format!("person {person} logged out (session {session})")
        }
        AsyncMessage::NewText { text_no, text_stat } | AsyncMessage::NewTextOld { text_no, text_stat } => {
            format!("new text {text_no} by person {}", text_stat.author)
        }
        AsyncMessage::DeletedText { text_no, .. } => format!("text {text_no} deleted"),
        AsyncMessage::NewName {
            conf_no,
            old_name,
            new_name,
        } => format!("conference {conf_no} renamed from {old_name:?} to {new_name:?}"),
        AsyncMessage::SyncDb => "server is saving its database".to_string(),
        other => {
            let fields = serde_json::to_string(other).unwrap_or_default();
            format!("{}: {fields}", other.async_no())
        }
    }
}

/// Registers a logging handler for every tag in `tags`.
pub fn register_logging_handlers<S: Transport>(client: &mut Client<S>, tags: &[AsyncNo]) {
    for &tag in tags {
        client.register_async_handler(tag, move |msg, _| {
            info!(tag = %tag, "{}", describe(msg));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyskom_core::mock::MockStream;
    use lyskom_core::{ConfNo, Connection, Hollerith, PersNo, SessionNo};

    #[test]
    fn test_describe_broadcast_and_personal_messages() {
        let broadcast = AsyncMessage::SendMessage {
            recipient: ConfNo(0),
            sender: PersNo(6),
            message: Hollerith::from("server restarts soon"),
        };
        let personal = AsyncMessage::SendMessage {
            recipient: ConfNo(14506),
            sender: PersNo(6),
            message: Hollerith::from("hej"),
        };

        assert_eq!(describe(&broadcast), "broadcast from person 6: server restarts soon");
        assert_eq!(describe(&personal), "message from person 6 to 14506: hej");
    }

    #[test]
    fn test_describe_presence() {
        let login = AsyncMessage::Login {
            person: PersNo(6),
            session: SessionNo(33),
        };
        assert_eq!(describe(&login), "person 6 logged in (session 33)");
    }

    #[test]
    fn test_describe_falls_back_to_json() {
        let msg = AsyncMessage::LeaveConf { conf_no: ConfNo(7) };
        assert_eq!(describe(&msg), r#"leave-conf: {"type":"leave-conf","conf_no":7}"#);
    }

    #[test]
    fn test_register_logging_handlers_adds_one_per_tag() {
        let conn = Connection::new(MockStream::with_input(b"LysKOM\n"), "test").unwrap();
        let mut client = Client::new(conn);

        register_logging_handlers(&mut client, &[AsyncNo::Login, AsyncNo::Logout]);

        assert_eq!(client.handler_count(AsyncNo::Login), 1);
        assert_eq!(client.handler_count(AsyncNo::Logout), 1);
        assert_eq!(client.handler_count(AsyncNo::NewText), 0);
    }
}
