//! Record kinds that share the entity store contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three record types managed by the catalog.
///
/// The lowercase name doubles as the counter key used by the sequence allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Category,
    Product,
}

impl EntityKind {
    pub const ALL: [Self; 3] = [Self::User, Self::Category, Self::Product];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Category => "category",
            Self::Product => "product",
        }
    }

    /// Stable index into fixed-size per-kind tables.
    pub fn index(self) -> usize {
        match self {
            Self::User => 0,
            Self::Category => 1,
            Self::Product => 2,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
