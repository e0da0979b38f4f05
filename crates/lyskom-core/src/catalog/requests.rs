//! Requests: call numbers and argument encodings.
//!
//! A request goes on the wire as `<ref-no> <call-no> <arg> <arg> ...\n`.
//! [`Request::encode`] produces everything after the ref-no; the
//! connection prepends the ref-no when it sends.
//!
//! ```text
//! Request::ChangeConference { conf_no: ConfNo(14506) }   =>  "2 14506\n"
//! Request::get_text(TextNo(100))                          =>  "25 100 0 2147483647\n"
//! ```

use crate::protocol::bitstring::{ExtendedConfType, MembershipType, PersonalFlags, PrivBits};
use crate::protocol::codec::{
    AuxNo, ConfNo, Encode, GarbNice, LocalTextNo, PersNo, SessionNo, TextNo,
};
use crate::protocol::datatypes::{AuxItemInput, InfoOld, ReadRange};
use crate::protocol::misc_info::{CookedMiscInfo, RecipientKind};
use crate::protocol::scalar::{write_int, Hollerith};
use crate::protocol::time::Time;

use super::asynchronous::AsyncNo;

/// Largest character position get-text accepts; asks for "the whole text".
pub const MAX_TEXT_SIZE: u32 = i32::MAX as u32;

numbered_enum! {
    /// Every call this client can make.
    pub enum CallNo {
        Logout = 1 => "logout",
        ChangeConference = 2 => "change-conference",
        ChangeName = 3 => "change-name",
        ChangeWhatIAmDoing = 4 => "change-what-i-am-doing",
        SetPrivBits = 7 => "set-priv-bits",
        SetPasswd = 8 => "set-passwd",
        DeleteConf = 11 => "delete-conf",
        SubMember = 15 => "sub-member",
        SetPresentation = 16 => "set-presentation",
        SetEtcMotd = 17 => "set-etc-motd",
        SetSupervisor = 18 => "set-supervisor",
        SetPermittedSubmitters = 19 => "set-permitted-submitters",
        SetSuperConf = 20 => "set-super-conf",
        SetConfType = 21 => "set-conf-type",
        SetGarbNice = 22 => "set-garb-nice",
        GetMarks = 23 => "get-marks",
        GetText = 25 => "get-text",
        MarkAsRead = 27 => "mark-as-read",
        DeleteText = 29 => "delete-text",
        AddRecipient = 30 => "add-recipient",
        SubRecipient = 31 => "sub-recipient",
        AddComment = 32 => "add-comment",
        SubComment = 33 => "sub-comment",
        GetMap = 34 => "get-map",
        GetTime = 35 => "get-time",
        AddFootnote = 37 => "add-footnote",
        SubFootnote = 38 => "sub-footnote",
        SetUnread = 40 => "set-unread",
        SetMotdOfLyskom = 41 => "set-motd-of-lyskom",
        Enable = 42 => "enable",
        SyncKom = 43 => "sync-kom",
        ShutdownKom = 44 => "shutdown-kom",
        GetPersonStat = 49 => "get-person-stat",
        GetUnreadConfs = 52 => "get-unread-confs",
        SendMessage = 53 => "send-message",
        Disconnect = 55 => "disconnect",
        WhoAmI = 56 => "who-am-i",
        SetUserArea = 57 => "set-user-area",
        GetLastText = 58 => "get-last-text",
        FindNextTextNo = 60 => "find-next-text-no",
        FindPreviousTextNo = 61 => "find-previous-text-no",
        Login = 62 => "login",
        SetClientVersion = 69 => "set-client-version",
        GetClientName = 70 => "get-client-name",
        GetClientVersion = 71 => "get-client-version",
        MarkText = 72 => "mark-text",
        UnmarkText = 73 => "unmark-text",
        ReZLookup = 74 => "re-z-lookup",
        GetVersionInfo = 75 => "get-version-info",
        LookupZName = 76 => "lookup-z-name",
        SetLastRead = 77 => "set-last-read",
        GetUconfStat = 78 => "get-uconf-stat",
        SetInfo = 79 => "set-info",
        AcceptAsync = 80 => "accept-async",
        QueryAsync = 81 => "query-async",
        UserActive = 82 => "user-active",
        WhoIsOnDynamic = 83 => "who-is-on-dynamic",
        GetStaticSessionInfo = 84 => "get-static-session-info",
        GetCollateTable = 85 => "get-collate-table",
        CreateText = 86 => "create-text",
        CreateAnonymousText = 87 => "create-anonymous-text",
        CreateConf = 88 => "create-conf",
        CreatePerson = 89 => "create-person",
        GetTextStat = 90 => "get-text-stat",
        GetConfStat = 91 => "get-conf-stat",
        ModifyTextInfo = 92 => "modify-text-info",
        ModifyConfInfo = 93 => "modify-conf-info",
        GetInfo = 94 => "get-info",
        ModifySystemInfo = 95 => "modify-system-info",
        QueryPredefinedAuxItems = 96 => "query-predefined-aux-items",
        SetExpire = 97 => "set-expire",
        QueryReadTexts10 = 98 => "query-read-texts-10",
        GetMembership10 = 99 => "get-membership-10",
        AddMember = 100 => "add-member",
        GetMembers = 101 => "get-members",
        SetMembershipType = 102 => "set-membership-type",
        LocalToGlobal = 103 => "local-to-global",
        MapCreatedTexts = 104 => "map-created-texts",
        SetKeepCommented = 105 => "set-keep-commented",
        SetPersFlags = 106 => "set-pers-flags",
        QueryReadTexts = 107 => "query-read-texts",
        GetMembership = 108 => "get-membership",
        MarkAsUnread = 109 => "mark-as-unread",
        SetReadRanges = 110 => "set-read-ranges",
        GetStatsDescription = 111 => "get-stats-description",
        GetStats = 112 => "get-stats",
        GetBoottimeInfo = 113 => "get-boottime-info",
        FirstUnusedConfNo = 114 => "first-unused-conf-no",
        FirstUnusedTextNo = 115 => "first-unused-text-no",
        FindNextConfNo = 116 => "find-next-conf-no",
        FindPreviousConfNo = 117 => "find-previous-conf-no",
        GetScheduling = 118 => "get-scheduling",
        SetScheduling = 119 => "set-scheduling",
        SetConnectionTimeFormat = 120 => "set-connection-time-format",
        LocalToGlobalReverse = 121 => "local-to-global-reverse",
        MapCreatedTextsReverse = 122 => "map-created-texts-reverse",
    }
}

/// Collects request arguments as trait objects.
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($arg as &dyn Encode),*]
    };
}

/// A request with its arguments.
///
/// Field order in each variant is the argument order on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Logout,
    ChangeConference { conf_no: ConfNo },
    ChangeName { conf_no: ConfNo, new_name: Hollerith },
    ChangeWhatIAmDoing { what: Hollerith },
    SetPrivBits { person: PersNo, privileges: PrivBits },
    SetPasswd { person: PersNo, old_pwd: Hollerith, new_pwd: Hollerith },
    DeleteConf { conf_no: ConfNo },
    SubMember { conf_no: ConfNo, person: PersNo },
    SetPresentation { conf_no: ConfNo, text_no: TextNo },
    SetEtcMotd { conf_no: ConfNo, text_no: TextNo },
    SetSupervisor { conf_no: ConfNo, admin: ConfNo },
    SetPermittedSubmitters { conf_no: ConfNo, perm_sub: ConfNo },
    SetSuperConf { conf_no: ConfNo, super_conf: ConfNo },
    /// An old four-bit type converts with `ExtendedConfType::from`.
    SetConfType { conf_no: ConfNo, conf_type: ExtendedConfType },
    SetGarbNice { conf_no: ConfNo, nice: GarbNice },
    GetMarks,
    GetText { text_no: TextNo, start_char: u32, end_char: u32 },
    MarkAsRead { conf_no: ConfNo, texts: Vec<LocalTextNo> },
    DeleteText { text_no: TextNo },
    AddRecipient { text_no: TextNo, conf_no: ConfNo, recipient_kind: RecipientKind },
    SubRecipient { text_no: TextNo, conf_no: ConfNo },
    AddComment { text_no: TextNo, comment_to: TextNo },
    SubComment { text_no: TextNo, comment_to: TextNo },
    GetMap { conf_no: ConfNo, first_local_no: LocalTextNo, no_of_texts: u32 },
    GetTime,
    AddFootnote { text_no: TextNo, footnote_to: TextNo },
    SubFootnote { text_no: TextNo, footnote_to: TextNo },
    SetUnread { conf_no: ConfNo, no_of_unread: u32 },
    SetMotdOfLyskom { text_no: TextNo },
    Enable { level: u8 },
    SyncKom,
    ShutdownKom { exit_val: u32 },
    GetPersonStat { person: PersNo },
    GetUnreadConfs { person: PersNo },
    SendMessage { recipient: ConfNo, message: Hollerith },
    Disconnect { session: SessionNo },
    WhoAmI,
    SetUserArea { person: PersNo, user_area: TextNo },
    GetLastText { before: Time },
    FindNextTextNo { start: TextNo },
    FindPreviousTextNo { start: TextNo },
    Login { person: PersNo, password: Hollerith, invisible: bool },
    SetClientVersion { client_name: Hollerith, client_version: Hollerith },
    GetClientName { session: SessionNo },
    GetClientVersion { session: SessionNo },
    MarkText { text_no: TextNo, mark_type: u8 },
    UnmarkText { text_no: TextNo },
    ReZLookup { regexp: Hollerith, want_pers: bool, want_confs: bool },
    GetVersionInfo,
    LookupZName { name: Hollerith, want_pers: bool, want_confs: bool },
    SetLastRead { conf_no: ConfNo, last_read: LocalTextNo },
    GetUconfStat { conf_no: ConfNo },
    SetInfo { info: InfoOld },
    AcceptAsync { request_list: Vec<AsyncNo> },
    QueryAsync,
    UserActive,
    WhoIsOnDynamic { want_visible: bool, want_invisible: bool, active_last: u32 },
    GetStaticSessionInfo { session: SessionNo },
    GetCollateTable,
    CreateText { text: Hollerith, misc_info: CookedMiscInfo, aux_items: Vec<AuxItemInput> },
    CreateAnonymousText { text: Hollerith, misc_info: CookedMiscInfo, aux_items: Vec<AuxItemInput> },
    CreateConf { name: Hollerith, conf_type: ExtendedConfType, aux_items: Vec<AuxItemInput> },
    CreatePerson {
        name: Hollerith,
        passwd: Hollerith,
        flags: PersonalFlags,
        aux_items: Vec<AuxItemInput>,
    },
    GetTextStat { text_no: TextNo },
    GetConfStat { conf_no: ConfNo },
    ModifyTextInfo { text_no: TextNo, delete: Vec<AuxNo>, add: Vec<AuxItemInput> },
    ModifyConfInfo { conf_no: ConfNo, delete: Vec<AuxNo>, add: Vec<AuxItemInput> },
    GetInfo,
    ModifySystemInfo { delete: Vec<AuxNo>, add: Vec<AuxItemInput> },
    QueryPredefinedAuxItems,
    SetExpire { conf_no: ConfNo, expire: GarbNice },
    QueryReadTexts10 { person: PersNo, conf_no: ConfNo },
    GetMembership10 { person: PersNo, first: u32, no_of_confs: u32, want_read_texts: bool },
    AddMember {
        conf_no: ConfNo,
        person: PersNo,
        priority: u8,
        position: u32,
        membership_type: MembershipType,
    },
    GetMembers { conf_no: ConfNo, first: u32, no_of_members: u32 },
    SetMembershipType { person: PersNo, conf_no: ConfNo, membership_type: MembershipType },
    LocalToGlobal { conf_no: ConfNo, first_local_no: LocalTextNo, no_of_existing_texts: u32 },
    MapCreatedTexts { author: PersNo, first_local_no: LocalTextNo, no_of_existing_texts: u32 },
    SetKeepCommented { conf_no: ConfNo, keep_commented: GarbNice },
    SetPersFlags { person: PersNo, flags: PersonalFlags },
    QueryReadTexts { person: PersNo, conf_no: ConfNo, want_read_ranges: bool, max_ranges: u32 },
    GetMembership {
        person: PersNo,
        first: u32,
        no_of_confs: u32,
        want_read_ranges: bool,
        max_ranges: u32,
    },
    MarkAsUnread { conf_no: ConfNo, text_no: LocalTextNo },
    SetReadRanges { conf_no: ConfNo, read_ranges: Vec<ReadRange> },
    GetStatsDescription,
    GetStats { what: Hollerith },
    GetBoottimeInfo,
    FirstUnusedConfNo,
    FirstUnusedTextNo,
    FindNextConfNo { conf_no: ConfNo },
    FindPreviousConfNo { conf_no: ConfNo },
    GetScheduling { session: SessionNo },
    SetScheduling { session: SessionNo, priority: u16, weight: u16 },
    SetConnectionTimeFormat { use_utc: bool },
    LocalToGlobalReverse { conf_no: ConfNo, local_no_ceiling: LocalTextNo, no_of_existing_texts: u32 },
    MapCreatedTextsReverse { author: PersNo, local_no_ceiling: LocalTextNo, no_of_existing_texts: u32 },
}

impl Request {
    /// get-text for the whole text.
    pub fn get_text(text_no: TextNo) -> Self {
        Request::GetText {
            text_no,
            start_char: 0,
            end_char: MAX_TEXT_SIZE,
        }
    }

    /// login as an invisible session, which is what most clients want
    /// until the user is actually active.
    pub fn login(person: PersNo, password: impl Into<Hollerith>) -> Self {
        Request::Login {
            person,
            password: password.into(),
            invisible: true,
        }
    }

    /// who-is-on-dynamic listing visible sessions active at any time.
    pub fn who_is_on_dynamic() -> Self {
        Request::WhoIsOnDynamic {
            want_visible: true,
            want_invisible: false,
            active_last: 0,
        }
    }

    /// The call number this request is sent as.
    pub fn call_no(&self) -> CallNo {
        self.parts().0
    }

    /// The request body: call number, arguments and the terminating
    /// newline.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lyskom_core::{ConfNo, Request};
    ///
    /// let req = Request::ChangeConference { conf_no: ConfNo(14506) };
    /// assert_eq!(req.encode(), b"2 14506\n");
    /// ```
    pub fn encode(&self) -> Vec<u8> {
        let (call_no, args) = self.parts();
        let mut out = Vec::with_capacity(16);
        write_int(&mut out, u64::from(call_no.number()));
        for arg in args {
            out.push(b' ');
            arg.encode(&mut out);
        }
        out.push(b'\n');
        out
    }

    fn parts(&self) -> (CallNo, Vec<&dyn Encode>) {
        use Request as R;
        match self {
            R::Logout => (CallNo::Logout, args![]),
            R::ChangeConference { conf_no } => (CallNo::ChangeConference, args![conf_no]),
            R::ChangeName { conf_no, new_name } => (CallNo::ChangeName, args![conf_no, new_name]),
            R::ChangeWhatIAmDoing { what } => (CallNo::ChangeWhatIAmDoing, args![what]),
            R::SetPrivBits { person, privileges } => (CallNo::SetPrivBits, args![person, privileges]),
            R::SetPasswd { person, old_pwd, new_pwd } => {
                (CallNo::SetPasswd, args![person, old_pwd, new_pwd])
            }
            R::DeleteConf { conf_no } => (CallNo::DeleteConf, args![conf_no]),
            R::SubMember { conf_no, person } => (CallNo::SubMember, args![conf_no, person]),
            R::SetPresentation { conf_no, text_no } => {
                (CallNo::SetPresentation, args![conf_no, text_no])
            }
            R::SetEtcMotd { conf_no, text_no } => (CallNo::SetEtcMotd, args![conf_no, text_no]),
            R::SetSupervisor { conf_no, admin } => (CallNo::SetSupervisor, args![conf_no, admin]),
            R::SetPermittedSubmitters { conf_no, perm_sub } => {
                (CallNo::SetPermittedSubmitters, args![conf_no, perm_sub])
            }
            R::SetSuperConf { conf_no, super_conf } => {
                (CallNo::SetSuperConf, args![conf_no, super_conf])
            }
            R::SetConfType { conf_no, conf_type } => {
                (CallNo::SetConfType, args![conf_no, conf_type])
            }
            R::SetGarbNice { conf_no, nice } => (CallNo::SetGarbNice, args![conf_no, nice]),
            R::GetMarks => (CallNo::GetMarks, args![]),
            R::GetText { text_no, start_char, end_char } => {
                (CallNo::GetText, args![text_no, start_char, end_char])
            }
            R::MarkAsRead { conf_no, texts } => (CallNo::MarkAsRead, args![conf_no, texts]),
            R::DeleteText { text_no } => (CallNo::DeleteText, args![text_no]),
            R::AddRecipient { text_no, conf_no, recipient_kind } => {
                (CallNo::AddRecipient, args![text_no, conf_no, recipient_kind])
            }
            R::SubRecipient { text_no, conf_no } => (CallNo::SubRecipient, args![text_no, conf_no]),
            R::AddComment { text_no, comment_to } => {
                (CallNo::AddComment, args![text_no, comment_to])
            }
            R::SubComment { text_no, comment_to } => {
                (CallNo::SubComment, args![text_no, comment_to])
            }
            R::GetMap { conf_no, first_local_no, no_of_texts } => {
                (CallNo::GetMap, args![conf_no, first_local_no, no_of_texts])
            }
            R::GetTime => (CallNo::GetTime, args![]),
            R::AddFootnote { text_no, footnote_to } => {
                (CallNo::AddFootnote, args![text_no, footnote_to])
            }
            R::SubFootnote { text_no, footnote_to } => {
                (CallNo::SubFootnote, args![text_no, footnote_to])
            }
            R::SetUnread { conf_no, no_of_unread } => {
                (CallNo::SetUnread, args![conf_no, no_of_unread])
            }
            R::SetMotdOfLyskom { text_no } => (CallNo::SetMotdOfLyskom, args![text_no]),
            R::Enable { level } => (CallNo::Enable, args![level]),
            R::SyncKom => (CallNo::SyncKom, args![]),
            R::ShutdownKom { exit_val } => (CallNo::ShutdownKom, args![exit_val]),
            R::GetPersonStat { person } => (CallNo::GetPersonStat, args![person]),
            R::GetUnreadConfs { person } => (CallNo::GetUnreadConfs, args![person]),
            R::SendMessage { recipient, message } => {
                (CallNo::SendMessage, args![recipient, message])
            }
            R::Disconnect { session } => (CallNo::Disconnect, args![session]),
            R::WhoAmI => (CallNo::WhoAmI, args![]),
            R::SetUserArea { person, user_area } => (CallNo::SetUserArea, args![person, user_area]),
            R::GetLastText { before } => (CallNo::GetLastText, args![before]),
            R::FindNextTextNo { start } => (CallNo::FindNextTextNo, args![start]),
            R::FindPreviousTextNo { start } => (CallNo::FindPreviousTextNo, args![start]),
            R::Login { person, password, invisible } => {
                (CallNo::Login, args![person, password, invisible])
            }
            R::SetClientVersion { client_name, client_version } => {
                (CallNo::SetClientVersion, args![client_name, client_version])
            }
            R::GetClientName { session } => (CallNo::GetClientName, args![session]),
            R::GetClientVersion { session } => (CallNo::GetClientVersion, args![session]),
            R::MarkText { text_no, mark_type } => (CallNo::MarkText, args![text_no, mark_type]),
            R::UnmarkText { text_no } => (CallNo::UnmarkText, args![text_no]),
            R::ReZLookup { regexp, want_pers, want_confs } => {
                (CallNo::ReZLookup, args![regexp, want_pers, want_confs])
            }
            R::GetVersionInfo => (CallNo::GetVersionInfo, args![]),
            R::LookupZName { name, want_pers, want_confs } => {
                (CallNo::LookupZName, args![name, want_pers, want_confs])
            }
            R::SetLastRead { conf_no, last_read } => (CallNo::SetLastRead, args![conf_no, last_read]),
            R::GetUconfStat { conf_no } => (CallNo::GetUconfStat, args![conf_no]),
            R::SetInfo { info } => (CallNo::SetInfo, args![info]),
            R::AcceptAsync { request_list } => (CallNo::AcceptAsync, args![request_list]),
            R::QueryAsync => (CallNo::QueryAsync, args![]),
            R::UserActive => (CallNo::UserActive, args![]),
            R::WhoIsOnDynamic { want_visible, want_invisible, active_last } => {
                (CallNo::WhoIsOnDynamic, args![want_visible, want_invisible, active_last])
            }
            R::GetStaticSessionInfo { session } => (CallNo::GetStaticSessionInfo, args![session]),
            R::GetCollateTable => (CallNo::GetCollateTable, args![]),
            R::CreateText { text, misc_info, aux_items } => {
                (CallNo::CreateText, args![text, misc_info, aux_items])
            }
            R::CreateAnonymousText { text, misc_info, aux_items } => {
                (CallNo::CreateAnonymousText, args![text, misc_info, aux_items])
            }
            R::CreateConf { name, conf_type, aux_items } => {
                (CallNo::CreateConf, args![name, conf_type, aux_items])
            }
            R::CreatePerson { name, passwd, flags, aux_items } => {
                (CallNo::CreatePerson, args![name, passwd, flags, aux_items])
            }
            R::GetTextStat { text_no } => (CallNo::GetTextStat, args![text_no]),
            R::GetConfStat { conf_no } => (CallNo::GetConfStat, args![conf_no]),
            R::ModifyTextInfo { text_no, delete, add } => {
                (CallNo::ModifyTextInfo, args![text_no, delete, add])
            }
            R::ModifyConfInfo { conf_no, delete, add } => {
                (CallNo::ModifyConfInfo, args![conf_no, delete, add])
            }
            R::GetInfo => (CallNo::GetInfo, args![]),
            R::ModifySystemInfo { delete, add } => (CallNo::ModifySystemInfo, args![delete, add]),
            R::QueryPredefinedAuxItems => (CallNo::QueryPredefinedAuxItems, args![]),
            R::SetExpire { conf_no, expire } => (CallNo::SetExpire, args![conf_no, expire]),
            R::QueryReadTexts10 { person, conf_no } => {
                (CallNo::QueryReadTexts10, args![person, conf_no])
            }
            R::GetMembership10 { person, first, no_of_confs, want_read_texts } => {
                (CallNo::GetMembership10, args![person, first, no_of_confs, want_read_texts])
            }
            R::AddMember { conf_no, person, priority, position, membership_type } => (
                CallNo::AddMember,
                args![conf_no, person, priority, position, membership_type],
            ),
            R::GetMembers { conf_no, first, no_of_members } => {
                (CallNo::GetMembers, args![conf_no, first, no_of_members])
            }
            R::SetMembershipType { person, conf_no, membership_type } => {
                (CallNo::SetMembershipType, args![person, conf_no, membership_type])
            }
            R::LocalToGlobal { conf_no, first_local_no, no_of_existing_texts } => {
                (CallNo::LocalToGlobal, args![conf_no, first_local_no, no_of_existing_texts])
            }
            R::MapCreatedTexts { author, first_local_no, no_of_existing_texts } => {
                (CallNo::MapCreatedTexts, args![author, first_local_no, no_of_existing_texts])
            }
            R::SetKeepCommented { conf_no, keep_commented } => {
                (CallNo::SetKeepCommented, args![conf_no, keep_commented])
            }
            R::SetPersFlags { person, flags } => (CallNo::SetPersFlags, args![person, flags]),
            R::QueryReadTexts { person, conf_no, want_read_ranges, max_ranges } => {
                (CallNo::QueryReadTexts, args![person, conf_no, want_read_ranges, max_ranges])
            }
            R::GetMembership { person, first, no_of_confs, want_read_ranges, max_ranges } => (
                CallNo::GetMembership,
                args![person, first, no_of_confs, want_read_ranges, max_ranges],
            ),
            R::MarkAsUnread { conf_no, text_no } => (CallNo::MarkAsUnread, args![conf_no, text_no]),
            R::SetReadRanges { conf_no, read_ranges } => {
                (CallNo::SetReadRanges, args![conf_no, read_ranges])
            }
            R::GetStatsDescription => (CallNo::GetStatsDescription, args![]),
            R::GetStats { what } => (CallNo::GetStats, args![what]),
            R::GetBoottimeInfo => (CallNo::GetBoottimeInfo, args![]),
            R::FirstUnusedConfNo => (CallNo::FirstUnusedConfNo, args![]),
            R::FirstUnusedTextNo => (CallNo::FirstUnusedTextNo, args![]),
            R::FindNextConfNo { conf_no } => (CallNo::FindNextConfNo, args![conf_no]),
            R::FindPreviousConfNo { conf_no } => (CallNo::FindPreviousConfNo, args![conf_no]),
            R::GetScheduling { session } => (CallNo::GetScheduling, args![session]),
            R::SetScheduling { session, priority, weight } => {
                (CallNo::SetScheduling, args![session, priority, weight])
            }
            R::SetConnectionTimeFormat { use_utc } => {
                (CallNo::SetConnectionTimeFormat, args![use_utc])
            }
            R::LocalToGlobalReverse { conf_no, local_no_ceiling, no_of_existing_texts } => (
                CallNo::LocalToGlobalReverse,
                args![conf_no, local_no_ceiling, no_of_existing_texts],
            ),
            R::MapCreatedTextsReverse { author, local_no_ceiling, no_of_existing_texts } => (
                CallNo::MapCreatedTextsReverse,
                args![author, local_no_ceiling, no_of_existing_texts],
            ),
        }
    }
}
