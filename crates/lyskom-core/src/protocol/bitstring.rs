//! Bit-flag records: fixed-length strings of `0` and `1` digits.
//!
//! A conference type is sent as `1010`, privileges as
//! `0000000000000000`.  Each position is a named boolean flag; the first
//! digit on the wire is the first field of the struct.
//!
//! Parsing skips leading whitespace, takes the first digit, then reads
//! exactly `N - 1` further bytes with no whitespace allowed between them.
//! The byte after the last digit is left in the stream for the next reader.

use std::fmt;
use std::io::Read;

use serde::Serialize;

use crate::protocol::codec::{Decode, Encode};
use crate::protocol::cursor::ByteCursor;
use crate::protocol::error::ProtocolError;
use crate::protocol::scalar::read_first_non_ws;

/// Reads `N` consecutive `0`/`1` digits.
///
/// # Errors
///
/// [`ProtocolError::Malformed`] for any other byte.
pub fn read_bits<R: Read, const N: usize>(
    cursor: &mut ByteCursor<R>,
) -> Result<[bool; N], ProtocolError> {
    let mut bits = [false; N];
    for (i, slot) in bits.iter_mut().enumerate() {
        let byte = if i == 0 {
            read_first_non_ws(cursor)?
        } else {
            cursor.receive_byte()?
        };
        *slot = match byte {
            b'0' => false,
            b'1' => true,
            other => {
                return Err(ProtocolError::malformed(format!(
                    "bit {i} of a {N}-bit string is {:?}, not 0 or 1",
                    char::from(other)
                )))
            }
        };
    }
    Ok(bits)
}

/// Appends the digit form of `bits`.
pub fn write_bits(out: &mut Vec<u8>, bits: &[bool]) {
    out.extend(bits.iter().map(|&bit| if bit { b'1' } else { b'0' }));
}

macro_rules! bitstring {
    (
        $(#[$meta:meta])*
        $name:ident[$len:literal] { $($(#[$fmeta:meta])* $field:ident),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
        pub struct $name {
            $($(#[$fmeta])* pub $field: bool,)*
        }

        impl $name {
            /// Number of digits on the wire.
            pub const LEN: usize = $len;

            /// Builds the record from its bits in wire order.
            pub fn from_bits(bits: [bool; $len]) -> Self {
                let [$($field),*] = bits;
                Self { $($field),* }
            }

            /// The bits in wire order.
            pub fn to_bits(&self) -> [bool; $len] {
                [$(self.$field),*]
            }
        }

        impl Decode for $name {
            fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self, ProtocolError> {
                read_bits::<R, $len>(cursor).map(Self::from_bits)
            }
        }

        impl Encode for $name {
            fn encode(&self, out: &mut Vec<u8>) {
                write_bits(out, &self.to_bits());
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for bit in self.to_bits() {
                    f.write_str(if bit { "1" } else { "0" })?;
                }
                Ok(())
            }
        }
    };
}

bitstring!(
    /// The original four-bit conference type.
    ConfType[4] {
        /// Read-protected: only members can read texts.
        rd_prot,
        /// Comments are redirected to the supervisor.
        original,
        secret,
        letterbox,
    }
);

bitstring!(
    /// The eight-bit conference type used by current protocol versions.
    ExtendedConfType[8] {
        rd_prot,
        original,
        secret,
        letterbox,
        allow_anonymous,
        forbid_secret,
        reserved2,
        reserved3,
    }
);

impl From<ConfType> for ExtendedConfType {
    fn from(old: ConfType) -> Self {
        Self {
            rd_prot: old.rd_prot,
            original: old.original,
            secret: old.secret,
            letterbox: old.letterbox,
            ..Self::default()
        }
    }
}

bitstring!(
    /// A person's privileges.
    PrivBits[16] {
        wheel,
        admin,
        statistic,
        create_pers,
        create_conf,
        change_name,
        flg7,
        flg8,
        flg9,
        flg10,
        flg11,
        flg12,
        flg13,
        flg14,
        flg15,
        flg16,
    }
);

bitstring!(
    PersonalFlags[8] {
        unread_is_secret,
        flg2,
        flg3,
        flg4,
        flg5,
        flg6,
        flg7,
        flg8,
    }
);

bitstring!(
    /// How a person is a member of a conference.
    MembershipType[8] {
        invitation,
        passive,
        secret,
        passive_message_invert,
        reserved2,
        reserved3,
        reserved4,
        reserved5,
    }
);

bitstring!(
    AuxItemFlags[8] {
        deleted,
        inherit,
        secret,
        hide_creator,
        dont_garb,
        reserved2,
        reserved3,
        reserved4,
    }
);

bitstring!(
    /// Flags reported for a session by who-is-on-dynamic.
    SessionFlags[8] {
        invisible,
        user_active_used,
        user_absent,
        reserved3,
        reserved4,
        reserved5,
        reserved6,
        reserved7,
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codec::{decode_from_slice, encode_to_vec};

    #[test]
    fn test_all_zero_eight_bit_record_encodes_as_zeros() {
        assert_eq!(encode_to_vec(&ExtendedConfType::default()), b"00000000");
        assert_eq!(encode_to_vec(&PrivBits::default()), b"0000000000000000");
    }

    #[test]
    fn test_named_bits_follow_wire_positions() {
        // Arrange – bit 0 read-protected, bit 2 secret
        let wire = b" 1010";

        // Act
        let conf_type: ConfType = decode_from_slice(wire).unwrap();

        // Assert
        assert!(conf_type.rd_prot);
        assert!(!conf_type.original);
        assert!(conf_type.secret);
        assert!(!conf_type.letterbox);
    }

    #[test]
    fn test_bit_record_round_trip() {
        let mut flags = AuxItemFlags::default();
        flags.inherit = true;
        flags.dont_garb = true;

        let wire = encode_to_vec(&flags);
        let decoded: AuxItemFlags = decode_from_slice(&wire).unwrap();

        assert_eq!(wire, b"01001000");
        assert_eq!(decoded, flags);
    }

    #[test]
    fn test_bad_digit_is_malformed() {
        let result: Result<PersonalFlags, _> = decode_from_slice(b"00020000");
        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_whitespace_inside_bitstring_is_malformed() {
        let result: Result<ConfType, _> = decode_from_slice(b"10 10");
        assert!(matches!(result, Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_reader_stops_after_exactly_n_digits() {
        // Arrange
        let mut cursor = ByteCursor::new(&b"1111 0000"[..]);

        // Act
        let first = ConfType::decode(&mut cursor).unwrap();

        // Assert – the delimiter is still in the stream
        assert_eq!(first.to_bits(), [true; 4]);
        assert_eq!(cursor.receive_byte().unwrap(), b' ');
    }

    #[test]
    fn test_old_conf_type_extends_with_zeros() {
        let old = ConfType::from_bits([true, true, true, true]);
        assert_eq!(ExtendedConfType::from(old).to_string(), "11110000");
    }
}
