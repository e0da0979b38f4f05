//! Protocol A value codec: from raw socket bytes up to typed records.

pub mod bitstring;
pub mod codec;
pub mod cursor;
pub mod datatypes;
pub mod error;
pub mod misc_info;
pub mod scalar;
pub mod sequence;
pub mod time;

pub use bitstring::{
    AuxItemFlags, ConfType, ExtendedConfType, MembershipType, PersonalFlags, PrivBits,
    SessionFlags,
};
pub use codec::{
    AuxNo, ConfNo, Decode, Encode, GarbNice, LocalTextNo, PersNo, SessionNo, TextNo,
};
pub use cursor::{ByteCursor, Transport, REFILL_FLOOR};
pub use datatypes::*;
pub use error::ProtocolError;
pub use misc_info::{CommentIn, CommentKind, CommentTo, CookedMiscInfo, Recipient, RecipientKind};
pub use scalar::Hollerith;
pub use sequence::{OutstandingRequests, SequenceCounter};
pub use time::Time;
