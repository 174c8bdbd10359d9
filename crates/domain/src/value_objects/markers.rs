//! Marker line vocabulary
//!
//! The model embeds structured metadata in its prose as colon-delimited lines:
//!
//! ```text
//! LOCATION: Silver Gulch Saloon
//! ACQUIRED_ITEMS: ["Rope", "Lantern"]
//! REMOVED_ITEMS: Whiskey
//! SUGGESTED_ACTIONS: [{"text": "Approach the bar", "type": "basic"}]
//! COMBAT: Black Bart
//! ```
//!
//! Keywords are matched case-insensitively. The table is fixed at compile time;
//! anything else before a colon is ordinary prose.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A recognised marker keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkerKind {
    Location,
    AcquiredItems,
    RemovedItems,
    SuggestedActions,
    Combat,
}

impl MarkerKind {
    /// Every marker kind, in wire rendering order.
    pub const ALL: [MarkerKind; 5] = [
        MarkerKind::Location,
        MarkerKind::AcquiredItems,
        MarkerKind::RemovedItems,
        MarkerKind::SuggestedActions,
        MarkerKind::Combat,
    ];

    /// The canonical upper-case keyword written before the colon.
    pub fn keyword(self) -> &'static str {
        match self {
            MarkerKind::Location => "LOCATION",
            MarkerKind::AcquiredItems => "ACQUIRED_ITEMS",
            MarkerKind::RemovedItems => "REMOVED_ITEMS",
            MarkerKind::SuggestedActions => "SUGGESTED_ACTIONS",
            MarkerKind::Combat => "COMBAT",
        }
    }

    /// Case-insensitive keyword lookup.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword().eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for MarkerKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s)
            .ok_or_else(|| DomainError::parse(format!("Unknown marker keyword: {}", s.trim())))
    }
}
