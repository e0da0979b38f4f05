//! Typed value codec: the [`Decode`] / [`Encode`] traits and their
//! implementations for integers, floats, Hollerith strings and arrays.
//!
//! Every protocol value type implements both traits, so composite records
//! are just their fields decoded in order.  Values inside one frame are
//! separated by a single space when encoded; the space is supplied by the
//! container (a record, an array or a request), never by the value itself.
//!
//! # Arrays
//!
//! ```text
//! 3 { 10 20 30 }     three elements
//! 0 {  }             what this crate sends for an empty array
//! 0 { }              empty, as some servers format it
//! 0 *                empty / omitted ("don't bother sending the contents")
//! *                  bare omission marker
//! ```

use std::fmt;
use std::io::Read;

use serde::Serialize;

use crate::protocol::cursor::ByteCursor;
use crate::protocol::error::ProtocolError;
use crate::protocol::scalar::{
    is_whitespace, read_first_non_ws, read_float, read_hollerith, read_int, read_int_and_next,
    write_hollerith, write_int, Hollerith,
};

/// A value that can be parsed from the receive stream.
pub trait Decode: Sized {
    fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError>;
}

/// A value that can be written in its wire form.
pub trait Encode {
    /// Appends the wire form of `self` to `out`, without separators around it.
    fn encode(&self, out: &mut Vec<u8>);
}

/// Encodes `fields` separated by single spaces.
pub fn encode_fields(out: &mut Vec<u8>, fields: &[&dyn Encode]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(b' ');
        }
        field.encode(out);
    }
}

/// Encodes a single value into a fresh buffer.
pub fn encode_to_vec<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut out = Vec::new();
    value.encode(&mut out);
    out
}

/// Decodes a single value from an in-memory byte slice.
///
/// # Examples
///
/// ```rust
/// use lyskom_core::protocol::codec::decode_from_slice;
/// use lyskom_core::protocol::ConfNo;
///
/// let confs: Vec<ConfNo> = decode_from_slice(b"2 { 6 14506 }").unwrap();
/// assert_eq!(confs, vec![ConfNo(6), ConfNo(14506)]);
/// ```
pub fn decode_from_slice<T: Decode>(bytes: &[u8]) -> Result<T, ProtocolError> {
    let mut cursor = ByteCursor::new(bytes);
    T::decode(&mut cursor)
}

/// Reads an integer and narrows it to the target width.
pub(crate) fn read_uint<R: Read, T: TryFrom<u64>>(
    cursor: &mut ByteCursor<R>,
    what: &str,
) -> Result<T, ProtocolError> {
    let value = read_int(cursor)?;
    T::try_from(value).map_err(|_| ProtocolError::malformed(format!("{what} {value} out of range")))
}

// ── Plain integers, booleans and floats ───────────────────────────────────────

macro_rules! impl_uint_codec {
    ($($ty:ty),*) => {$(
        impl Decode for $ty {
            fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
                read_uint(cursor, stringify!($ty))
            }
        }

        impl Encode for $ty {
            fn encode(&self, out: &mut Vec<u8>) {
                write_int(out, u64::from(*self));
            }
        }
    )*};
}

impl_uint_codec!(u8, u16, u32, u64);

/// Protocol booleans are the integers `0` and `1`.  Any non-zero value is
/// read as `true`.
impl Decode for bool {
    fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
        Ok(read_int(cursor)? != 0)
    }
}

impl Encode for bool {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(if *self { b'1' } else { b'0' });
    }
}

impl Decode for f64 {
    fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
        read_float(cursor)
    }
}

impl Encode for f64 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.to_string().as_bytes());
    }
}

impl Decode for Hollerith {
    fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
        read_hollerith(cursor).map(Hollerith)
    }
}

impl Encode for Hollerith {
    fn encode(&self, out: &mut Vec<u8>) {
        write_hollerith(out, &self.0);
    }
}

// ── Named numbers ─────────────────────────────────────────────────────────────

macro_rules! number_type {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl Decode for $name {
            fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
                read_uint(cursor, stringify!($name)).map($name)
            }
        }

        impl Encode for $name {
            fn encode(&self, out: &mut Vec<u8>) {
                write_int(out, u64::from(self.0));
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                $name(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

number_type!(
    /// A conference number.  Letterboxes share the space with persons.
    ConfNo(u16)
);
number_type!(
    /// A person number.
    PersNo(u16)
);
number_type!(
    /// A global text number.
    TextNo(u32)
);
number_type!(
    /// A text number local to one conference.
    LocalTextNo(u32)
);
number_type!(
    /// A session number.
    SessionNo(u32)
);
number_type!(AuxNo(u32));
number_type!(
    /// Days a text is kept before garbage collection.
    GarbNice(u32)
);

/// Every person has a letterbox conference with the same number.
impl From<PersNo> for ConfNo {
    fn from(pers: PersNo) -> Self {
        ConfNo(pers.0)
    }
}

// ── Arrays ────────────────────────────────────────────────────────────────────

impl<T: Decode> Decode for Vec<T> {
    fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
        let (count, next) = read_int_and_next(cursor)?;
        let open = match next {
            b'*' | b'{' => next,
            b if is_whitespace(b) => read_first_non_ws(cursor)?,
            other => {
                return Err(ProtocolError::malformed(format!(
                    "unexpected {:?} after array length",
                    char::from(other)
                )))
            }
        };

        match open {
            b'*' => Ok(Vec::new()),
            b'{' => {
                // Cap the pre-allocation; the count comes off the wire.
                let mut items = Vec::with_capacity(count.min(1024) as usize);
                for _ in 0..count {
                    items.push(T::decode(cursor)?);
                }
                match read_first_non_ws(cursor)? {
                    b'}' => Ok(items),
                    other => Err(ProtocolError::malformed(format!(
                        "expected '}}' after {count} array elements, got {:?}",
                        char::from(other)
                    ))),
                }
            }
            other => Err(ProtocolError::malformed(format!(
                "expected '{{' or '*' to start an array, got {:?}",
                char::from(other)
            ))),
        }
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, out: &mut Vec<u8>) {
        write_int(out, self.len() as u64);
        out.extend_from_slice(b" { ");
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                out.push(b' ');
            }
            item.encode(out);
        }
        out.extend_from_slice(b" }");
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, out: &mut Vec<u8>) {
        self.as_slice().encode(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_decodes_counted_elements() {
        let texts: Vec<TextNo> = decode_from_slice(b"3 { 10 20 30 }\n").unwrap();
        assert_eq!(texts, vec![TextNo(10), TextNo(20), TextNo(30)]);
    }

    #[test]
    fn test_array_empty_forms_all_yield_nothing() {
        for wire in [&b"0 { }"[..], b"0 {  }", b"*", b"0 *", b"5 *"] {
            let decoded: Vec<u32> = decode_from_slice(wire).unwrap();
            assert!(decoded.is_empty(), "{:?}", String::from_utf8_lossy(wire));
        }
    }

    #[test]
    fn test_array_missing_close_brace_is_malformed() {
        let result: Result<Vec<u32>, _> = decode_from_slice(b"2 { 1 2 3 }");
        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_array_bad_open_marker_is_malformed() {
        let result: Result<Vec<u32>, _> = decode_from_slice(b"2 ( 1 2 )");
        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_array_of_hollerith_keeps_separators_in_payload() {
        let names: Vec<Hollerith> = decode_from_slice(b"2 { 3H} { 1Hx }").unwrap();
        assert_eq!(names, vec![Hollerith::from("} {"), Hollerith::from("x")]);
    }

    #[test]
    fn test_nested_arrays() {
        let nested: Vec<Vec<u8>> = decode_from_slice(b"2 { 1 { 7 } 0 * }").unwrap();
        assert_eq!(nested, vec![vec![7], vec![]]);
    }

    #[test]
    fn test_array_encoding() {
        assert_eq!(encode_to_vec(&vec![ConfNo(1), ConfNo(2)]), b"2 { 1 2 }");
        assert_eq!(encode_to_vec(&Vec::<ConfNo>::new()), b"0 {  }");
    }

    #[test]
    fn test_number_out_of_range_is_malformed() {
        let result: Result<ConfNo, _> = decode_from_slice(b"70000 ");
        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_bool_reads_integers() {
        let flags: Vec<bool> = decode_from_slice(b"3 { 0 1 2 }").unwrap();
        assert_eq!(flags, vec![false, true, true]);
        assert_eq!(encode_to_vec(&true), b"1");
    }

    #[test]
    fn test_encode_fields_separates_with_single_spaces() {
        let mut out = Vec::new();
        encode_fields(&mut out, &[&ConfNo(14506), &Hollerith::from("what"), &false]);
        assert_eq!(out, b"14506 4Hwhat 0");
    }

    #[test]
    fn test_number_types_serialize_transparently() {
        assert_eq!(serde_json::to_string(&TextNo(17)).unwrap(), "17");
        assert_eq!(ConfNo::from(PersNo(6)), ConfNo(6));
    }
}
