//! Misc-info: a text's recipients and comment links.
//!
//! # Raw versus cooked (for beginners)
//!
//! On the wire, misc-info is a flat array of `(tag, value)` pairs:
//!
//! ```text
//! 5 { 0 6  6 3  2 12  8 99  9 <time> }
//!     │     │     │     │     └ sent-at     ┐ belong to the
//!     │     │     │     └ sent-by           ┘ comment-to above
//!     │     │     └ comment-to text 12
//!     │     └ local number 3                ─ belongs to the recipient above
//!     └ recipient conference 6
//! ```
//!
//! A *primary* tag (recipient, cc, bcc, comment-to, footnote-to,
//! comment-in, footnote-in) opens a new logical item.  The *attribute* tags
//! that follow it (loc-no, rec-time, sent-by, sent-at) describe that item
//! until the next primary tag.  [`CookedMiscInfo`] is the regrouped form:
//! three ordered lists of items with their attributes attached.
//!
//! When a cooked value is sent back to the server only the primary pairs of
//! recipients and comment-to links are written.  Attributes are assigned by
//! the server and comment-in links are derived from other texts, so neither
//! is accepted on input.

use std::io::{Read, Write as _};

use serde::Serialize;

use crate::protocol::codec::{read_uint, ConfNo, Decode, Encode, LocalTextNo, PersNo, TextNo};
use crate::protocol::cursor::ByteCursor;
use crate::protocol::error::ProtocolError;
use crate::protocol::time::Time;

// ── Tags ──────────────────────────────────────────────────────────────────────

pub const RECPT: u32 = 0;
pub const CC_RECPT: u32 = 1;
pub const COMM_TO: u32 = 2;
pub const COMM_IN: u32 = 3;
pub const FOOTN_TO: u32 = 4;
pub const FOOTN_IN: u32 = 5;
pub const LOC_NO: u32 = 6;
pub const REC_TIME: u32 = 7;
pub const SENT_BY: u32 = 8;
pub const SENT_AT: u32 = 9;
pub const BCC_RECPT: u32 = 15;

// ── Raw pairs ─────────────────────────────────────────────────────────────────

/// The value half of a raw misc-info pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MiscValue {
    Int(u32),
    Time(Time),
}

/// One `(tag, value)` pair as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RawMiscInfo {
    pub tag: u32,
    pub value: MiscValue,
}

impl RawMiscInfo {
    pub fn int(tag: u32, value: u32) -> Self {
        Self {
            tag,
            value: MiscValue::Int(value),
        }
    }

    pub fn time(tag: u32, value: Time) -> Self {
        Self {
            tag,
            value: MiscValue::Time(value),
        }
    }

    fn int_value(&self) -> Result<u32, ProtocolError> {
        match self.value {
            MiscValue::Int(n) => Ok(n),
            MiscValue::Time(_) => Err(ProtocolError::malformed(format!(
                "misc-info tag {} carries a time, expected an integer",
                self.tag
            ))),
        }
    }

    fn time_value(&self) -> Result<Time, ProtocolError> {
        match self.value {
            MiscValue::Time(t) => Ok(t),
            MiscValue::Int(_) => Err(ProtocolError::malformed(format!(
                "misc-info tag {} carries an integer, expected a time",
                self.tag
            ))),
        }
    }
}

impl Decode for RawMiscInfo {
    fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
        let tag = read_uint(cursor, "misc-info tag")?;
        let value = match tag {
            REC_TIME | SENT_AT => MiscValue::Time(Time::decode(cursor)?),
            _ => MiscValue::Int(read_uint(cursor, "misc-info value")?),
        };
        Ok(Self { tag, value })
    }
}

impl Encode for RawMiscInfo {
    fn encode(&self, out: &mut Vec<u8>) {
        self.tag.encode(out);
        out.push(b' ');
        match &self.value {
            MiscValue::Int(n) => n.encode(out),
            MiscValue::Time(t) => t.encode(out),
        }
    }
}

// ── Cooked items ──────────────────────────────────────────────────────────────

/// How a conference receives a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u32)]
pub enum RecipientKind {
    To = RECPT,
    Cc = CC_RECPT,
    Bcc = BCC_RECPT,
}

impl TryFrom<u32> for RecipientKind {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, ()> {
        match value {
            RECPT => Ok(RecipientKind::To),
            CC_RECPT => Ok(RecipientKind::Cc),
            BCC_RECPT => Ok(RecipientKind::Bcc),
            _ => Err(()),
        }
    }
}

impl Decode for RecipientKind {
    fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
        let value: u32 = read_uint(cursor, "recipient type")?;
        Self::try_from(value)
            .map_err(|()| ProtocolError::malformed(format!("unknown recipient type {value}")))
    }
}

impl Encode for RecipientKind {
    fn encode(&self, out: &mut Vec<u8>) {
        (*self as u32).encode(out);
    }
}

/// Whether a link is a plain comment or a footnote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u32)]
pub enum CommentKind {
    Comment = COMM_TO,
    Footnote = FOOTN_TO,
}

/// A recipient conference and the attributes the server attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub kind: RecipientKind,
    pub recpt: ConfNo,
    pub loc_no: Option<LocalTextNo>,
    pub rec_time: Option<Time>,
    pub sent_by: Option<PersNo>,
    pub sent_at: Option<Time>,
}

impl Recipient {
    pub fn new(kind: RecipientKind, recpt: ConfNo) -> Self {
        Self {
            kind,
            recpt,
            loc_no: None,
            rec_time: None,
            sent_by: None,
            sent_at: None,
        }
    }
}

/// A text this text comments on (or is a footnote to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommentTo {
    pub kind: CommentKind,
    pub text_no: TextNo,
    pub sent_by: Option<PersNo>,
    pub sent_at: Option<Time>,
}

impl CommentTo {
    pub fn new(kind: CommentKind, text_no: TextNo) -> Self {
        Self {
            kind,
            text_no,
            sent_by: None,
            sent_at: None,
        }
    }
}

/// A text that comments on this one (or is a footnote to it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommentIn {
    pub kind: CommentKind,
    pub text_no: TextNo,
}

/// Misc-info regrouped into recipients, comment-to and comment-in links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CookedMiscInfo {
    pub recipients: Vec<Recipient>,
    pub comment_to: Vec<CommentTo>,
    pub comment_in: Vec<CommentIn>,
}

impl CookedMiscInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a recipient (builder style, for create-text).
    pub fn with_recipient(mut self, kind: RecipientKind, recpt: ConfNo) -> Self {
        self.recipients.push(Recipient::new(kind, recpt));
        self
    }

    /// Adds a comment-to link (builder style, for create-text).
    pub fn with_comment_to(mut self, kind: CommentKind, text_no: TextNo) -> Self {
        self.comment_to.push(CommentTo::new(kind, text_no));
        self
    }

    /// Regroups a flat pair list.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::Malformed`] if an item starts with a tag that is not
    /// a primary tag, or if a pair carries the wrong kind of value.
    pub fn from_raw(raw: &[RawMiscInfo]) -> Result<Self, ProtocolError> {
        let mut cooked = Self::default();
        let mut i = 0;
        while i < raw.len() {
            let head = &raw[i];
            i += 1;
            match head.tag {
                RECPT | CC_RECPT | BCC_RECPT => {
                    let kind = RecipientKind::try_from(head.tag)
                        .map_err(|()| ProtocolError::malformed("bad recipient tag"))?;
                    let mut item = Recipient::new(kind, ConfNo(narrow(head)?));
                    while let Some(attr) = raw.get(i) {
                        match attr.tag {
                            LOC_NO => item.loc_no = Some(LocalTextNo(attr.int_value()?)),
                            REC_TIME => item.rec_time = Some(attr.time_value()?),
                            SENT_BY => item.sent_by = Some(PersNo(narrow(attr)?)),
                            SENT_AT => item.sent_at = Some(attr.time_value()?),
                            _ => break,
                        }
                        i += 1;
                    }
                    cooked.recipients.push(item);
                }
                COMM_TO | FOOTN_TO => {
                    let kind = comment_kind(head.tag);
                    let mut item = CommentTo::new(kind, TextNo(head.int_value()?));
                    while let Some(attr) = raw.get(i) {
                        match attr.tag {
                            SENT_BY => item.sent_by = Some(PersNo(narrow(attr)?)),
                            SENT_AT => item.sent_at = Some(attr.time_value()?),
                            _ => break,
                        }
                        i += 1;
                    }
                    cooked.comment_to.push(item);
                }
                COMM_IN | FOOTN_IN => {
                    // comment-in/footnote-in sit one above their -to tags.
                    cooked.comment_in.push(CommentIn {
                        kind: comment_kind(head.tag - 1),
                        text_no: TextNo(head.int_value()?),
                    });
                }
                other => {
                    return Err(ProtocolError::malformed(format!(
                        "misc-info item cannot start with tag {other}"
                    )))
                }
            }
        }
        Ok(cooked)
    }

    /// The `(tag, value)` pairs that may be sent to the server: comment-to
    /// links first, then recipients.
    pub fn to_input_pairs(&self) -> Vec<(u32, u32)> {
        let comments = self
            .comment_to
            .iter()
            .map(|c| (c.kind as u32, c.text_no.0));
        let recipients = self
            .recipients
            .iter()
            .map(|r| (r.kind as u32, u32::from(r.recpt.0)));
        comments.chain(recipients).collect()
    }
}

fn comment_kind(tag: u32) -> CommentKind {
    if tag == FOOTN_TO {
        CommentKind::Footnote
    } else {
        CommentKind::Comment
    }
}

fn narrow(pair: &RawMiscInfo) -> Result<u16, ProtocolError> {
    let value = pair.int_value()?;
    u16::try_from(value).map_err(|_| {
        ProtocolError::malformed(format!("misc-info tag {} value {value} out of range", pair.tag))
    })
}

impl Decode for CookedMiscInfo {
    fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
        let raw = Vec::<RawMiscInfo>::decode(cursor)?;
        Self::from_raw(&raw)
    }
}

/// Encodes as `<n> { <tag> <value> ... }`, every pair followed by a space.
impl Encode for CookedMiscInfo {
    fn encode(&self, out: &mut Vec<u8>) {
        let pairs = self.to_input_pairs();
        let _ = write!(out, "{} {{ ", pairs.len());
        for (tag, value) in pairs {
            let _ = write!(out, "{tag} {value} ");
        }
        out.push(b'}');
    }
}
