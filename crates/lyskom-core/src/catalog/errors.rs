//! The recoverable failure channel: errors the server reports for one
//! request.
//!
//! A `%` reply such as `%2 9 0` means "request 2 failed with error 9
//! (undefined-conference), status 0".  The connection is still healthy and
//! other outstanding requests are unaffected.  The *status* is an extra
//! integer whose meaning depends on the error, typically the offending
//! conference, person or text number.

use serde::Serialize;
use thiserror::Error;

use crate::protocol::error::ProtocolError;

numbered_enum! {
    /// Every error code a `%` reply can carry.
    pub enum ServerErrorKind {
        NotImplemented = 2 => "not-implemented",
        ObsoleteCall = 3 => "obsolete-call",
        InvalidPassword = 4 => "invalid-password",
        StringTooLong = 5 => "string-too-long",
        LoginFirst = 6 => "login-first",
        LoginDisallowed = 7 => "login-disallowed",
        ConferenceZero = 8 => "conference-zero",
        UndefinedConference = 9 => "undefined-conference",
        UndefinedPerson = 10 => "undefined-person",
        AccessDenied = 11 => "access-denied",
        PermissionDenied = 12 => "permission-denied",
        NotMember = 13 => "not-member",
        NoSuchText = 14 => "no-such-text",
        TextZero = 15 => "text-zero",
        NoSuchLocalText = 16 => "no-such-local-text",
        LocalTextZero = 17 => "local-text-zero",
        BadName = 18 => "bad-name",
        IndexOutOfRange = 19 => "index-out-of-range",
        ConferenceExists = 20 => "conference-exists",
        PersonExists = 21 => "person-exists",
        SecretPublic = 22 => "secret-public",
        Letterbox = 23 => "letterbox",
        LdbError = 24 => "ldb-error",
        IllegalMisc = 25 => "illegal-misc",
        IllegalInfoType = 26 => "illegal-info-type",
        AlreadyRecipient = 27 => "already-recipient",
        AlreadyComment = 28 => "already-comment",
        AlreadyFootnote = 29 => "already-footnote",
        NotRecipient = 30 => "not-recipient",
        NotComment = 31 => "not-comment",
        NotFootnote = 32 => "not-footnote",
        RecipientLimit = 33 => "recipient-limit",
        CommentLimit = 34 => "comment-limit",
        FootnoteLimit = 35 => "footnote-limit",
        MarkLimit = 36 => "mark-limit",
        NotAuthor = 37 => "not-author",
        NoConnect = 38 => "no-connect",
        OutOfMemory = 39 => "out-of-memory",
        ServerIsCrazy = 40 => "server-is-crazy",
        ClientIsCrazy = 41 => "client-is-crazy",
        UndefinedSession = 42 => "undefined-session",
        RegexpError = 43 => "regexp-error",
        NotMarked = 44 => "not-marked",
        TemporaryFailure = 45 => "temporary-failure",
        LongArray = 46 => "long-array",
        AnonymousRejected = 47 => "anonymous-rejected",
        IllegalAuxItem = 48 => "illegal-aux-item",
        AuxItemPermission = 49 => "aux-item-permission",
        UnknownAsync = 50 => "unknown-async",
        InternalError = 51 => "internal-error",
        FeatureDisabled = 52 => "feature-disabled",
        MessageNotSent = 53 => "message-not-sent",
        InvalidMembershipType = 54 => "invalid-membership-type",
        InvalidRange = 55 => "invalid-range",
        InvalidRangeList = 56 => "invalid-range-list",
        UndefinedMeasurement = 57 => "undefined-measurement",
        PriorityDenied = 58 => "priority-denied",
        WeightDenied = 59 => "weight-denied",
        WeightZero = 60 => "weight-zero",
        BadBool = 61 => "bad-bool",
    }
}

impl ServerErrorKind {
    /// Maps a wire error code to its kind.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::UnknownErrorCode`] for a code outside the table.
    pub fn from_code(code: u32) -> Result<Self, ProtocolError> {
        Self::try_from(code).map_err(|()| ProtocolError::UnknownErrorCode(code))
    }
}

/// An error reply for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("server error {kind} ({code}), status {status}", code = .kind.number())]
pub struct ServerError {
    pub kind: ServerErrorKind,
    pub status: u32,
}

/// Why a [`crate::Client::call`] did not return a value.
#[derive(Debug, Error)]
pub enum CallError {
    /// The server rejected this request.  The connection is still usable.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// The connection failed.  It is closed and must be replaced.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl CallError {
    /// `true` when the connection can no longer be used.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CallError::Protocol(_))
    }

    /// The server error, if that is what this is.
    pub fn server_error(&self) -> Option<&ServerError> {
        match self {
            CallError::Server(e) => Some(e),
            CallError::Protocol(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_table_covers_codes_two_through_sixty_one() {
        let codes: Vec<u32> = ServerErrorKind::ALL.iter().map(|k| k.number()).collect();
        assert_eq!(codes, (2..=61).collect::<Vec<_>>());
    }

    #[test]
    fn test_error_code_nine_is_undefined_conference() {
        let kind = ServerErrorKind::from_code(9).unwrap();

        assert_eq!(kind, ServerErrorKind::UndefinedConference);
        assert_eq!(kind.to_string(), "undefined-conference");
    }

    #[test]
    fn test_unknown_error_codes_are_protocol_errors() {
        for code in [0, 1, 62, 1000] {
            assert!(matches!(
                ServerErrorKind::from_code(code),
                Err(ProtocolError::UnknownErrorCode(c)) if c == code
            ));
        }
    }

    #[test]
    fn test_server_error_display() {
        let err = ServerError {
            kind: ServerErrorKind::NoSuchText,
            status: 4711,
        };
        assert_eq!(err.to_string(), "server error no-such-text (14), status 4711");
    }

    #[test]
    fn test_call_error_fatality() {
        let server: CallError = ServerError {
            kind: ServerErrorKind::LoginFirst,
            status: 0,
        }
        .into();
        let protocol: CallError = ProtocolError::Closed.into();

        assert!(!server.is_fatal());
        assert_eq!(server.server_error().map(|e| e.kind), Some(ServerErrorKind::LoginFirst));
        assert!(protocol.is_fatal());
        assert!(protocol.server_error().is_none());
    }
}
