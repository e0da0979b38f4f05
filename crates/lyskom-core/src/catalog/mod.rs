//! The message catalog: every request, reply shape, asynchronous message and
//! server error this client understands.
//!
//! # Closed tables (for beginners)
//!
//! Protocol A identifies calls, asynchronous messages and error codes by
//! small integers.  Each of those number spaces is modelled here as a Rust
//! enum with explicit discriminants, so the set of known numbers is fixed at
//! compile time and a `match` over it is checked for exhaustiveness:
//!
//! - [`CallNo`] – request opcodes; [`ResponseShape::for_call`] maps every
//!   one of them to the rule used to decode its `=` reply.
//! - [`AsyncNo`] – asynchronous message tags.  A tag outside this table is
//!   reported as [`crate::ProtocolError::UnimplementedAsync`].
//! - [`ServerErrorKind`] – the codes a `%` reply can carry.

/// Declares a closed, numbered enum with its protocol names.
///
/// Generates `ALL`, `number()`, `name()`, `TryFrom<u32>`, `Display` and a
/// `Serialize` that writes the protocol name.
macro_rules! numbered_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $num:literal => $proto:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $num,)*
        }

        impl $name {
            /// Every member of the table, in numeric order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// The number used on the wire.
            pub fn number(self) -> u32 {
                self as u32
            }

            /// The protocol name, e.g. `"change-conference"`.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $proto,)*
                }
            }
        }

        impl TryFrom<u32> for $name {
            type Error = ();

            fn try_from(value: u32) -> Result<Self, ()> {
                match value {
                    $($num => Ok($name::$variant),)*
                    _ => Err(()),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }
    };
}

pub mod asynchronous;
pub mod errors;
pub mod requests;
pub mod responses;

pub use asynchronous::{AsyncMessage, AsyncNo};
pub use errors::{CallError, ServerError, ServerErrorKind};
pub use requests::{CallNo, Request};
pub use responses::{Response, ResponseShape};
