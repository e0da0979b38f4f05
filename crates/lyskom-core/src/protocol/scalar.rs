//! Scalar codec: integers, floats and Hollerith strings.
//!
//! # The read-next-and-discard rule
//!
//! Protocol A has no explicit token separators beyond whitespace.  An integer
//! ends at the first byte that is not a digit, and that byte is *consumed and
//! thrown away* by [`read_int`].  Usually it is a space or newline, but in a
//! Hollerith string it is the `H` marker, which is why [`read_hollerith`]
//! uses [`read_int_and_next`] to look at it.
//!
//! ```text
//! "123 456\n"   read_int -> 123 (eats ' ')   read_int -> 456 (eats '\n')
//! "5Hhello"     read_int_and_next -> (5, 'H')   then 5 raw bytes
//! ```
//!
//! Protocol text is single-byte.  Hollerith payloads are passed through
//! verbatim, so every byte value 0–255 survives a round trip.

use std::fmt;
use std::io::{Read, Write as _};

use serde::{Serialize, Serializer};

use crate::protocol::cursor::ByteCursor;
use crate::protocol::error::ProtocolError;

/// Bytes skipped before a token.
pub const WHITESPACE: &[u8] = b" \t\r\n";

/// Bytes that may appear in a float token.
const FLOAT_CHARS: &[u8] = b"0123456789eE.-+";

/// Returns `true` for the Protocol A whitespace set (space, tab, CR, LF).
pub fn is_whitespace(byte: u8) -> bool {
    WHITESPACE.contains(&byte)
}

/// Skips whitespace and returns the first non-whitespace byte (consumed).
pub fn read_first_non_ws<R: Read>(cursor: &mut ByteCursor<R>) -> Result<u8, ProtocolError> {
    let mut byte = cursor.receive_byte()?;
    while is_whitespace(byte) {
        byte = cursor.receive_byte()?;
    }
    Ok(byte)
}

/// Reads a non-negative decimal integer and returns it together with the
/// byte that terminated it.  Both are consumed.
///
/// A token that starts with a non-digit yields `0` and that byte.
pub fn read_int_and_next<R: Read>(
    cursor: &mut ByteCursor<R>,
) -> Result<(u64, u8), ProtocolError> {
    let mut byte = read_first_non_ws(cursor)?;
    let mut value: u64 = 0;
    while byte.is_ascii_digit() {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(byte - b'0')))
            .ok_or_else(|| ProtocolError::malformed("integer does not fit in 64 bits"))?;
        byte = cursor.receive_byte()?;
    }
    Ok((value, byte))
}

/// Reads a non-negative decimal integer, discarding the delimiter after it.
pub fn read_int<R: Read>(cursor: &mut ByteCursor<R>) -> Result<u64, ProtocolError> {
    read_int_and_next(cursor).map(|(value, _)| value)
}

/// Reads a floating-point token made of digits, `e`, `E`, `.`, `-` and `+`.
///
/// The byte after the token is consumed and discarded.
pub fn read_float<R: Read>(cursor: &mut ByteCursor<R>) -> Result<f64, ProtocolError> {
    let mut byte = read_first_non_ws(cursor)?;
    let mut token = String::new();
    while FLOAT_CHARS.contains(&byte) {
        token.push(char::from(byte));
        byte = cursor.receive_byte()?;
    }
    token
        .parse::<f64>()
        .map_err(|e| ProtocolError::malformed(format!("bad float {token:?}: {e}")))
}

/// Reads a Hollerith string: `<len>H<len raw bytes>`.
///
/// # Errors
///
/// [`ProtocolError::Malformed`] when the length is not followed by `H`.
pub fn read_hollerith<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Vec<u8>, ProtocolError> {
    let (len, marker) = read_int_and_next(cursor)?;
    if marker != b'H' {
        return Err(ProtocolError::malformed(format!(
            "expected 'H' after Hollerith length, got {:?}",
            char::from(marker)
        )));
    }
    let len = usize::try_from(len)
        .map_err(|_| ProtocolError::malformed(format!("Hollerith length {len} too large")))?;
    cursor.receive_bytes(len)
}

/// Appends the decimal form of `value`.
pub fn write_int(out: &mut Vec<u8>, value: u64) {
    // Writing into a Vec cannot fail.
    let _ = write!(out, "{value}");
}

/// Appends `<len>H<bytes>` with no trailing separator.
pub fn write_hollerith(out: &mut Vec<u8>, bytes: &[u8]) {
    write_int(out, bytes.len() as u64);
    out.push(b'H');
    out.extend_from_slice(bytes);
}

// ── Hollerith byte string ─────────────────────────────────────────────────────

/// A Protocol A string: raw single-byte text, usually Latin-1.
///
/// The bytes are kept exactly as received; [`Hollerith::to_latin1`] decodes
/// them for display.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hollerith(pub Vec<u8>);

impl Hollerith {
    /// Encodes `text` as Latin-1.  Characters above U+00FF become `?`.
    pub fn from_latin1(text: &str) -> Self {
        Self(
            text.chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
        )
    }

    /// Decodes the bytes as Latin-1 (every byte maps to one char).
    pub fn to_latin1(&self) -> String {
        self.0.iter().copied().map(char::from).collect()
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Hollerith {
    fn from(text: &str) -> Self {
        Self::from_latin1(text)
    }
}

impl From<Vec<u8>> for Hollerith {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Hollerith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_latin1())
    }
}

impl fmt::Display for Hollerith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_latin1())
    }
}

impl Serialize for Hollerith {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_latin1())
    }
}
