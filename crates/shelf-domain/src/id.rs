//! Newtype wrappers for sequence-issued identifiers.
//!
//! Every id is the per-kind counter value at allocation time. On the wire it is
//! the decimal string of that value (`"42"`), in storage a `BIGINT`.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::kind::EntityKind;

/// An identifier issued by the sequence allocator for a specific kind.
pub trait SequenceId: Copy + Eq + Ord + fmt::Display {
    const KIND: EntityKind;

    fn from_seq(seq: u64) -> Self;

    fn seq(self) -> u64;
}

/// Error returned when a string is not a valid decimal identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id: {value:?}")]
pub struct ParseIdError {
    pub kind: EntityKind,
    pub value: String,
}

macro_rules! sequence_id {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u64);

        impl SequenceId for $name {
            const KIND: EntityKind = $kind;

            fn from_seq(seq: u64) -> Self {
                Self(seq)
            }

            fn seq(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Reject signs and padding so every id has exactly one spelling.
                let canonical = !s.is_empty()
                    && s.bytes().all(|b| b.is_ascii_digit())
                    && (s == "0" || !s.starts_with('0'));
                match s.parse::<u64>() {
                    Ok(v) if canonical => Ok(Self(v)),
                    _ => Err(ParseIdError {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }

        impl From<u64> for $name {
            fn from(seq: u64) -> Self {
                Self(seq)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(d)?;
                raw.parse().map_err(de::Error::custom)
            }
        }
    };
}

sequence_id!(
    /// Identifies a user account.
    UserId,
    EntityKind::User
);

sequence_id!(
    /// Identifies a category.
    CategoryId,
    EntityKind::Category
);

sequence_id!(
    /// Identifies a product.
    ProductId,
    EntityKind::Product
);
