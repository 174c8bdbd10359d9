//! Scene-level state changes reported alongside the narrative

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The scene moved to a new location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationUpdate(String);

impl LocationUpdate {
    /// Returns `None` for blank names.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Items gained and lost during one response.
///
/// Both sides are sets; an item present in both is treated as acquired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDelta {
    #[serde(default)]
    pub acquired: BTreeSet<String>,
    #[serde(default)]
    pub removed: BTreeSet<String>,
}

impl ItemDelta {
    pub fn new(
        acquired: impl IntoIterator<Item = String>,
        removed: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut delta = Self {
            acquired: acquired.into_iter().collect(),
            removed: removed.into_iter().collect(),
        };
        delta.normalize();
        delta
    }

    pub fn acquired(items: impl IntoIterator<Item = String>) -> Self {
        Self::new(items, std::iter::empty())
    }

    pub fn removed(items: impl IntoIterator<Item = String>) -> Self {
        Self::new(std::iter::empty(), items)
    }

    /// Union another partial delta into this one, then re-apply "acquired wins".
    pub fn merge(&mut self, other: ItemDelta) {
        self.acquired.extend(other.acquired);
        self.removed.extend(other.removed);
        self.normalize();
    }

    /// Drop from `removed` anything that was also acquired.
    pub fn normalize(&mut self) {
        let acquired = &self.acquired;
        self.removed.retain(|item| !acquired.contains(item));
    }

    pub fn is_empty(&self) -> bool {
        self.acquired.is_empty() && self.removed.is_empty()
    }
}

/// Combat was started (or explicitly reported) against an opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatInitiation {
    pub opponent: String,
    pub started: bool,
}

impl CombatInitiation {
    pub fn started(opponent: impl Into<String>) -> Self {
        Self {
            opponent: opponent.into(),
            started: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_location_rejects_blank() {
        assert!(LocationUpdate::new("   ").is_none());
        assert_eq!(
            LocationUpdate::new("  Dry Creek ").map(|l| l.as_str().to_string()),
            Some("Dry Creek".to_string())
        );
    }

    #[test]
    fn test_item_delta_acquired_wins() {
        let delta = ItemDelta::new(names(&["Rope", "Lantern"]), names(&["Rope", "Whiskey"]));
        assert!(delta.acquired.contains("Rope"));
        assert!(!delta.removed.contains("Rope"));
        assert!(delta.removed.contains("Whiskey"));
    }

    #[test]
    fn test_item_delta_merge_collapses_duplicates() {
        let mut delta = ItemDelta::removed(names(&["Badge", "Badge"]));
        assert_eq!(delta.removed.len(), 1);

        delta.merge(ItemDelta::acquired(names(&["Badge", "Map"])));
        assert!(delta.removed.is_empty());
        assert_eq!(delta.acquired.len(), 2);
    }
}
