//! Visible/Archived lifecycle shared by users, categories and products.
//!
//! ```text
//!   create ──► Visible ──archive──► Archived ──archive──► Archived (no-op)
//! ```
//!
//! `Archived` is terminal: nothing transitions back, and every mutation other
//! than `archive` is refused once a record reaches it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Visible,
    Archived,
}

/// Result of applying the archive transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveTransition {
    /// The record moved from `Visible` to `Archived`; callers must persist it.
    Archived,
    /// The record was already archived; nothing to write.
    AlreadyArchived,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Archived => "archived",
        }
    }

    pub fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }

    pub fn is_archived(self) -> bool {
        matches!(self, Self::Archived)
    }

    /// Whether field edits are still allowed in this state.
    pub fn accepts_updates(self) -> bool {
        self.is_visible()
    }

    /// Apply the archive transition in place.
    pub fn archive(&mut self) -> ArchiveTransition {
        match self {
            Self::Visible => {
                *self = Self::Archived;
                ArchiveTransition::Archived
            }
            Self::Archived => ArchiveTransition::AlreadyArchived,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown visibility: {0:?}")]
pub struct ParseVisibilityError(pub String);

impl FromStr for Visibility {
    type Err = ParseVisibilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visible" => Ok(Self::Visible),
            "archived" => Ok(Self::Archived),
            other => Err(ParseVisibilityError(other.to_owned())),
        }
    }
}
