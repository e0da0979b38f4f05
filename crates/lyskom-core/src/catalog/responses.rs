//! Reply decoding for `=` frames.
//!
//! The reply to a request carries no type information of its own.  The
//! connection remembers which call each ref-no belongs to and uses
//! [`ResponseShape::for_call`] to pick the decoding rule when the `=` line
//! arrives.

use std::io::Read;

use serde::Serialize;

use crate::protocol::codec::{ConfNo, Decode, PersNo, SessionNo, TextNo};
use crate::protocol::cursor::ByteCursor;
use crate::protocol::datatypes::{
    ConfZInfo, Conference, DynamicSessionInfo, Info, Mark, Member, Membership10, Membership11,
    Person, SchedulingInfo, StaticServerInfo, StaticSessionInfo, Stats, StatsDescription,
    TextList, TextMapping, TextStat, UConference, VersionInfo,
};
use crate::protocol::error::ProtocolError;
use crate::protocol::scalar::Hollerith;
use crate::protocol::time::Time;

use super::requests::CallNo;

/// How the body of an `=` reply is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Nothing follows the ref-no.
    Empty,
    Marks,
    Text,
    TextList,
    Time,
    Person,
    ConfNos,
    SessionNo,
    TextNo,
    ConfNo,
    PersNo,
    ConfZInfos,
    VersionInfo,
    UConference,
    Numbers,
    DynamicSessionInfos,
    StaticSessionInfo,
    TextStat,
    Conference,
    Info,
    Membership10,
    Memberships10,
    Members,
    TextMapping,
    Membership11,
    Memberships11,
    StatsDescription,
    Stats,
    StaticServerInfo,
    SchedulingInfo,
}

impl ResponseShape {
    /// The reply layout of a call.
    pub fn for_call(call: CallNo) -> Self {
        use CallNo as C;
        match call {
            C::GetMarks => Self::Marks,
            C::GetText | C::GetClientName | C::GetClientVersion | C::GetCollateTable => Self::Text,
            C::GetMap => Self::TextList,
            C::GetTime => Self::Time,
            C::GetPersonStat => Self::Person,
            C::GetUnreadConfs => Self::ConfNos,
            C::WhoAmI => Self::SessionNo,
            C::GetLastText
            | C::FindNextTextNo
            | C::FindPreviousTextNo
            | C::CreateText
            | C::CreateAnonymousText
            | C::FirstUnusedTextNo => Self::TextNo,
            C::CreateConf | C::FirstUnusedConfNo | C::FindNextConfNo | C::FindPreviousConfNo => {
                Self::ConfNo
            }
            C::CreatePerson => Self::PersNo,
            C::ReZLookup | C::LookupZName => Self::ConfZInfos,
            C::GetVersionInfo => Self::VersionInfo,
            C::GetUconfStat => Self::UConference,
            C::QueryAsync | C::QueryPredefinedAuxItems => Self::Numbers,
            C::WhoIsOnDynamic => Self::DynamicSessionInfos,
            C::GetStaticSessionInfo => Self::StaticSessionInfo,
            C::GetTextStat => Self::TextStat,
            C::GetConfStat => Self::Conference,
            C::GetInfo => Self::Info,
            C::QueryReadTexts10 => Self::Membership10,
            C::GetMembership10 => Self::Memberships10,
            C::GetMembers => Self::Members,
            C::LocalToGlobal
            | C::MapCreatedTexts
            | C::LocalToGlobalReverse
            | C::MapCreatedTextsReverse => Self::TextMapping,
            C::QueryReadTexts => Self::Membership11,
            C::GetMembership => Self::Memberships11,
            C::GetStatsDescription => Self::StatsDescription,
            C::GetStats => Self::Stats,
            C::GetBoottimeInfo => Self::StaticServerInfo,
            C::GetScheduling => Self::SchedulingInfo,
            C::Logout
            | C::ChangeConference
            | C::ChangeName
            | C::ChangeWhatIAmDoing
            | C::SetPrivBits
            | C::SetPasswd
            | C::DeleteConf
            | C::SubMember
            | C::SetPresentation
            | C::SetEtcMotd
            | C::SetSupervisor
            | C::SetPermittedSubmitters
            | C::SetSuperConf
            | C::SetConfType
            | C::SetGarbNice
            | C::MarkAsRead
            | C::DeleteText
            | C::AddRecipient
            | C::SubRecipient
            | C::AddComment
            | C::SubComment
            | C::AddFootnote
            | C::SubFootnote
            | C::SetUnread
            | C::SetMotdOfLyskom
            | C::Enable
            | C::SyncKom
            | C::ShutdownKom
            | C::SendMessage
            | C::Disconnect
            | C::SetUserArea
            | C::Login
            | C::SetClientVersion
            | C::MarkText
            | C::UnmarkText
            | C::SetLastRead
            | C::SetInfo
            | C::AcceptAsync
            | C::UserActive
            | C::ModifyTextInfo
            | C::ModifyConfInfo
            | C::ModifySystemInfo
            | C::SetExpire
            | C::AddMember
            | C::SetMembershipType
            | C::SetKeepCommented
            | C::SetPersFlags
            | C::MarkAsUnread
            | C::SetReadRanges
            | C::SetScheduling
            | C::SetConnectionTimeFormat => Self::Empty,
        }
    }

    /// Decodes a reply body of this shape.  The ref-no has already been
    /// consumed.
    pub fn decode<R: Read>(self, cursor: &mut ByteCursor<R>) -> Result<Response, ProtocolError> {
        let c = cursor;
        Ok(match self {
            Self::Empty => Response::Empty,
            Self::Marks => Response::Marks(Vec::decode(c)?),
            Self::Text => Response::Text(Hollerith::decode(c)?),
            Self::TextList => Response::TextList(TextList::decode(c)?),
            Self::Time => Response::Time(Time::decode(c)?),
            Self::Person => Response::Person(Person::decode(c)?),
            Self::ConfNos => Response::ConfNos(Vec::decode(c)?),
            Self::SessionNo => Response::SessionNo(SessionNo::decode(c)?),
            Self::TextNo => Response::TextNo(TextNo::decode(c)?),
            Self::ConfNo => Response::ConfNo(ConfNo::decode(c)?),
            Self::PersNo => Response::PersNo(PersNo::decode(c)?),
            Self::ConfZInfos => Response::ConfZInfos(Vec::decode(c)?),
            Self::VersionInfo => Response::VersionInfo(VersionInfo::decode(c)?),
            Self::UConference => Response::UConference(UConference::decode(c)?),
            Self::Numbers => Response::Numbers(Vec::decode(c)?),
            Self::DynamicSessionInfos => Response::DynamicSessionInfos(Vec::decode(c)?),
            Self::StaticSessionInfo => Response::StaticSessionInfo(StaticSessionInfo::decode(c)?),
            Self::TextStat => Response::TextStat(TextStat::decode(c)?),
            Self::Conference => Response::Conference(Conference::decode(c)?),
            Self::Info => Response::Info(Info::decode(c)?),
            Self::Membership10 => Response::Membership10(Membership10::decode(c)?),
            Self::Memberships10 => Response::Memberships10(Vec::decode(c)?),
            Self::Members => Response::Members(Vec::decode(c)?),
            Self::TextMapping => Response::TextMapping(TextMapping::decode(c)?),
            Self::Membership11 => Response::Membership11(Membership11::decode(c)?),
            Self::Memberships11 => Response::Memberships11(Vec::decode(c)?),
            Self::StatsDescription => Response::StatsDescription(StatsDescription::decode(c)?),
            Self::Stats => Response::Stats(Vec::decode(c)?),
            Self::StaticServerInfo => Response::StaticServerInfo(StaticServerInfo::decode(c)?),
            Self::SchedulingInfo => Response::SchedulingInfo(SchedulingInfo::decode(c)?),
        })
    }
}

/// A decoded `=` reply.
///
/// Serializes as the bare value (`null` for [`Response::Empty`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Empty,
    Marks(Vec<Mark>),
    Text(Hollerith),
    TextList(TextList),
    Time(Time),
    Person(Person),
    ConfNos(Vec<ConfNo>),
    SessionNo(SessionNo),
    TextNo(TextNo),
    ConfNo(ConfNo),
    PersNo(PersNo),
    ConfZInfos(Vec<ConfZInfo>),
    VersionInfo(VersionInfo),
    UConference(UConference),
    Numbers(Vec<u32>),
    DynamicSessionInfos(Vec<DynamicSessionInfo>),
    StaticSessionInfo(StaticSessionInfo),
    TextStat(TextStat),
    Conference(Conference),
    Info(Info),
    Membership10(Membership10),
    Memberships10(Vec<Membership10>),
    Members(Vec<Member>),
    TextMapping(TextMapping),
    Membership11(Membership11),
    Memberships11(Vec<Membership11>),
    StatsDescription(StatsDescription),
    Stats(Vec<Stats>),
    StaticServerInfo(StaticServerInfo),
    SchedulingInfo(SchedulingInfo),
}

impl Response {
    pub fn is_empty(&self) -> bool {
        matches!(self, Response::Empty)
    }

    pub fn as_text(&self) -> Option<&Hollerith> {
        match self {
            Response::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_no(&self) -> Option<TextNo> {
        match self {
            Response::TextNo(no) => Some(*no),
            _ => None,
        }
    }

    pub fn as_conf_z_infos(&self) -> Option<&[ConfZInfo]> {
        match self {
            Response::ConfZInfos(infos) => Some(infos),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(call: CallNo, wire: &[u8]) -> Response {
        let mut cursor = ByteCursor::new(wire);
        ResponseShape::for_call(call).decode(&mut cursor).unwrap()
    }

    #[test]
    fn test_every_call_has_a_shape() {
        // for_call is an exhaustive match, so this only checks a sample.
        assert_eq!(ResponseShape::for_call(CallNo::Logout), ResponseShape::Empty);
        assert_eq!(ResponseShape::for_call(CallNo::GetText), ResponseShape::Text);
        assert_eq!(ResponseShape::for_call(CallNo::CreateText), ResponseShape::TextNo);
        assert_eq!(ResponseShape::for_call(CallNo::GetMembership), ResponseShape::Memberships11);
        assert_eq!(ResponseShape::for_call(CallNo::LocalToGlobalReverse), ResponseShape::TextMapping);
    }

    #[test]
    fn test_empty_reply_reads_nothing() {
        let mut cursor = ByteCursor::new(&b"\n=3"[..]);

        let response = ResponseShape::Empty.decode(&mut cursor).unwrap();

        assert!(response.is_empty());
        assert_eq!(cursor.receive_byte().unwrap(), b'\n');
    }

    #[test]
    fn test_text_reply() {
        let response = decode(CallNo::GetText, b" 11HHello\nWorld\n");
        assert_eq!(response.as_text().map(Hollerith::as_bytes), Some(&b"Hello\nWorld"[..]));
    }

    #[test]
    fn test_lookup_z_name_reply() {
        let response = decode(
            CallNo::LookupZName,
            b" 2 { 5Hguest 1001 6 8HOm guest 0000 7 }\n",
        );

        let infos = response.as_conf_z_infos().unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].name.to_latin1(), "guest");
        assert!(infos[0].conf_type.letterbox);
        assert_eq!(infos[1].conf_no, ConfNo(7));
    }

    #[test]
    fn test_numbers_reply() {
        let response = decode(CallNo::QueryAsync, b" 3 { 0 12 15 }\n");
        assert_eq!(response, Response::Numbers(vec![0, 12, 15]));
    }

    #[test]
    fn test_who_am_i_reply() {
        assert_eq!(decode(CallNo::WhoAmI, b" 42\n"), Response::SessionNo(SessionNo(42)));
    }

    #[test]
    fn test_empty_serializes_as_null() {
        let json = serde_json::to_value(Response::Empty).unwrap();
        assert!(json.is_null());

        let json = serde_json::to_value(Response::TextNo(TextNo(4711))).unwrap();
        assert_eq!(json, 4711);
    }
}
