//! Asynchronous messages: events the server pushes without being asked.
//!
//! An asynchronous frame looks like `:<arg-count> <tag> <fields...>`.  The
//! argument count is redundant with the tag and is discarded; the tag picks
//! the decoding rule.  Clients choose which tags they receive with the
//! accept-async request.

use std::io::Read;

use serde::Serialize;

use crate::protocol::codec::{ConfNo, Decode, Encode, PersNo, SessionNo, TextNo};
use crate::protocol::cursor::ByteCursor;
use crate::protocol::datatypes::{AuxItem, TextStat, WhoInfo};
use crate::protocol::error::ProtocolError;
use crate::protocol::misc_info::RecipientKind;
use crate::protocol::scalar::{write_int, Hollerith};

numbered_enum! {
    /// Every asynchronous message tag this client can decode.
    pub enum AsyncNo {
        NewTextOld = 0 => "new-text-old",
        NewName = 5 => "new-name",
        IAmOn = 6 => "i-am-on",
        SyncDb = 7 => "sync-db",
        LeaveConf = 8 => "leave-conf",
        Login = 9 => "login",
        RejectedConnection = 11 => "rejected-connection",
        SendMessage = 12 => "send-message",
        Logout = 13 => "logout",
        DeletedText = 14 => "deleted-text",
        NewText = 15 => "new-text",
        NewRecipient = 16 => "new-recipient",
        SubRecipient = 17 => "sub-recipient",
        NewMembership = 18 => "new-membership",
        NewUserArea = 19 => "new-user-area",
        NewPresentation = 20 => "new-presentation",
        NewMotd = 21 => "new-motd",
        TextAuxChanged = 22 => "text-aux-changed",
    }
}

impl Encode for AsyncNo {
    fn encode(&self, out: &mut Vec<u8>) {
        write_int(out, u64::from(self.number()));
    }
}

/// A decoded asynchronous message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AsyncMessage {
    /// A text was created (old text-stat shape, without aux-items).
    NewTextOld { text_no: TextNo, text_stat: TextStat },
    NewName {
        conf_no: ConfNo,
        old_name: Hollerith,
        new_name: Hollerith,
    },
    IAmOn(WhoInfo),
    /// The server is saving its database and will be slow for a while.
    SyncDb,
    /// The receiving person was removed from a conference.
    LeaveConf { conf_no: ConfNo },
    Login { person: PersNo, session: SessionNo },
    /// A connection attempt was rejected because the server is full.
    RejectedConnection,
    /// A message to the receiver, a conference it is in, or everyone
    /// (recipient 0).
    SendMessage {
        recipient: ConfNo,
        sender: PersNo,
        message: Hollerith,
    },
    Logout { person: PersNo, session: SessionNo },
    DeletedText { text_no: TextNo, text_stat: TextStat },
    NewText { text_no: TextNo, text_stat: TextStat },
    NewRecipient {
        text_no: TextNo,
        conf_no: ConfNo,
        recipient_kind: RecipientKind,
    },
    SubRecipient {
        text_no: TextNo,
        conf_no: ConfNo,
        recipient_kind: RecipientKind,
    },
    NewMembership { person: PersNo, conf_no: ConfNo },
    NewUserArea {
        person: PersNo,
        old_user_area: TextNo,
        new_user_area: TextNo,
    },
    NewPresentation {
        conf_no: ConfNo,
        old_presentation: TextNo,
        new_presentation: TextNo,
    },
    NewMotd {
        conf_no: ConfNo,
        old_motd: TextNo,
        new_motd: TextNo,
    },
    TextAuxChanged {
        text_no: TextNo,
        deleted: Vec<AuxItem>,
        added: Vec<AuxItem>,
    },
}

impl AsyncMessage {
    /// Decodes the fields of a message whose tag has already been read.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::UnimplementedAsync`] if `tag` is not in [`AsyncNo`];
    /// nothing after the tag is consumed in that case.
    pub fn decode_tagged<R: Read>(
        tag: u32,
        cursor: &mut ByteCursor<R>,
    ) -> Result<Self, ProtocolError> {
        let async_no = AsyncNo::try_from(tag).map_err(|()| ProtocolError::UnimplementedAsync(tag))?;
        Self::decode_fields(async_no, cursor)
    }

    /// Decodes the fields of a known message.
    pub fn decode_fields<R: Read>(
        async_no: AsyncNo,
        cursor: &mut ByteCursor<R>,
    ) -> Result<Self, ProtocolError> {
        let c = cursor;
        Ok(match async_no {
            AsyncNo::NewTextOld => AsyncMessage::NewTextOld {
                text_no: TextNo::decode(c)?,
                text_stat: TextStat::decode_old(c)?,
            },
            AsyncNo::NewName => AsyncMessage::NewName {
                conf_no: ConfNo::decode(c)?,
                old_name: Hollerith::decode(c)?,
                new_name: Hollerith::decode(c)?,
            },
            AsyncNo::IAmOn => AsyncMessage::IAmOn(WhoInfo::decode(c)?),
            AsyncNo::SyncDb => AsyncMessage::SyncDb,
            AsyncNo::LeaveConf => AsyncMessage::LeaveConf {
                conf_no: ConfNo::decode(c)?,
            },
            AsyncNo::Login => AsyncMessage::Login {
                person: PersNo::decode(c)?,
                session: SessionNo::decode(c)?,
            },
            AsyncNo::RejectedConnection => AsyncMessage::RejectedConnection,
            AsyncNo::SendMessage => AsyncMessage::SendMessage {
                recipient: ConfNo::decode(c)?,
                sender: PersNo::decode(c)?,
                message: Hollerith::decode(c)?,
            },
            AsyncNo::Logout => AsyncMessage::Logout {
                person: PersNo::decode(c)?,
                session: SessionNo::decode(c)?,
            },
            AsyncNo::DeletedText => AsyncMessage::DeletedText {
                text_no: TextNo::decode(c)?,
                text_stat: TextStat::decode(c)?,
            },
            AsyncNo::NewText => AsyncMessage::NewText {
                text_no: TextNo::decode(c)?,
                text_stat: TextStat::decode(c)?,
            },
            AsyncNo::NewRecipient => AsyncMessage::NewRecipient {
                text_no: TextNo::decode(c)?,
                conf_no: ConfNo::decode(c)?,
                recipient_kind: RecipientKind::decode(c)?,
            },
            AsyncNo::SubRecipient => AsyncMessage::SubRecipient {
                text_no: TextNo::decode(c)?,
                conf_no: ConfNo::decode(c)?,
                recipient_kind: RecipientKind::decode(c)?,
            },
            AsyncNo::NewMembership => AsyncMessage::NewMembership {
                person: PersNo::decode(c)?,
                conf_no: ConfNo::decode(c)?,
            },
            AsyncNo::NewUserArea => AsyncMessage::NewUserArea {
                person: PersNo::decode(c)?,
                old_user_area: TextNo::decode(c)?,
                new_user_area: TextNo::decode(c)?,
            },
            AsyncNo::NewPresentation => AsyncMessage::NewPresentation {
                conf_no: ConfNo::decode(c)?,
                old_presentation: TextNo::decode(c)?,
                new_presentation: TextNo::decode(c)?,
            },
            AsyncNo::NewMotd => AsyncMessage::NewMotd {
                conf_no: ConfNo::decode(c)?,
                old_motd: TextNo::decode(c)?,
                new_motd: TextNo::decode(c)?,
            },
            AsyncNo::TextAuxChanged => AsyncMessage::TextAuxChanged {
                text_no: TextNo::decode(c)?,
                deleted: Vec::decode(c)?,
                added: Vec::decode(c)?,
            },
        })
    }

    /// The tag of this message.
    pub fn async_no(&self) -> AsyncNo {
        match self {
            AsyncMessage::NewTextOld { .. } => AsyncNo::NewTextOld,
            AsyncMessage::NewName { .. } => AsyncNo::NewName,
            AsyncMessage::IAmOn(_) => AsyncNo::IAmOn,
            AsyncMessage::SyncDb => AsyncNo::SyncDb,
            AsyncMessage::LeaveConf { .. } => AsyncNo::LeaveConf,
            AsyncMessage::Login { .. } => AsyncNo::Login,
            AsyncMessage::RejectedConnection => AsyncNo::RejectedConnection,
            AsyncMessage::SendMessage { .. } => AsyncNo::SendMessage,
            AsyncMessage::Logout { .. } => AsyncNo::Logout,
            AsyncMessage::DeletedText { .. } => AsyncNo::DeletedText,
            AsyncMessage::NewText { .. } => AsyncNo::NewText,
            AsyncMessage::NewRecipient { .. } => AsyncNo::NewRecipient,
            AsyncMessage::SubRecipient { .. } => AsyncNo::SubRecipient,
            AsyncMessage::NewMembership { .. } => AsyncNo::NewMembership,
            AsyncMessage::NewUserArea { .. } => AsyncNo::NewUserArea,
            AsyncMessage::NewPresentation { .. } => AsyncNo::NewPresentation,
            AsyncMessage::NewMotd { .. } => AsyncNo::NewMotd,
            AsyncMessage::TextAuxChanged { .. } => AsyncNo::TextAuxChanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codec::encode_to_vec;

    fn decode(tag: u32, wire: &[u8]) -> Result<AsyncMessage, ProtocolError> {
        let mut cursor = ByteCursor::new(wire);
        AsyncMessage::decode_tagged(tag, &mut cursor)
    }

    #[test]
    fn test_send_message_fields() {
        let msg = decode(12, b"0 6 9Hhej bj\xf6rn\n").unwrap();

        assert_eq!(
            msg,
            AsyncMessage::SendMessage {
                recipient: ConfNo(0),
                sender: PersNo(6),
                message: Hollerith(b"hej bj\xf6rn".to_vec()),
            }
        );
        assert_eq!(msg.async_no(), AsyncNo::SendMessage);
    }

    #[test]
    fn test_messages_without_fields() {
        assert_eq!(decode(7, b"\n").unwrap(), AsyncMessage::SyncDb);
        assert_eq!(decode(11, b"").unwrap(), AsyncMessage::RejectedConnection);
    }

    #[test]
    fn test_i_am_on() {
        let msg = decode(6, b"6 14506 33 7Hreading 5Hguest\n").unwrap();

        match msg {
            AsyncMessage::IAmOn(info) => {
                assert_eq!(info.session, SessionNo(33));
                assert_eq!(info.username.to_latin1(), "guest");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_new_recipient_kind() {
        let msg = decode(16, b"100 6 1\n").unwrap();

        assert_eq!(
            msg,
            AsyncMessage::NewRecipient {
                text_no: TextNo(100),
                conf_no: ConfNo(6),
                recipient_kind: RecipientKind::Cc,
            }
        );
    }

    #[test]
    fn test_unknown_tag_is_unimplemented_async() {
        let result = decode(9999, b"1 2 3\n");
        assert!(matches!(result, Err(ProtocolError::UnimplementedAsync(9999))));
    }

    #[test]
    fn test_async_tag_table_round_trips() {
        for &async_no in AsyncNo::ALL {
            assert_eq!(AsyncNo::try_from(async_no.number()), Ok(async_no));
        }
        assert_eq!(encode_to_vec(&vec![AsyncNo::SendMessage, AsyncNo::Logout]), b"2 { 12 13 }");
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let msg = AsyncMessage::Login {
            person: PersNo(6),
            session: SessionNo(2),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "login");
        assert_eq!(json["person"], 6);
    }
}
