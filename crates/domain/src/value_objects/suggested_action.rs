//! Actions offered to the player after a narrative beat

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// How the game UI should present and resolve a suggested action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    Basic,
    Combat,
    Interaction,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Basic => write!(f, "basic"),
            ActionType::Combat => write!(f, "combat"),
            ActionType::Interaction => write!(f, "interaction"),
        }
    }
}

impl FromStr for ActionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(ActionType::Basic),
            "combat" => Ok(ActionType::Combat),
            "interaction" => Ok(ActionType::Interaction),
            other => Err(DomainError::parse(format!("Unknown action type: {}", other))),
        }
    }
}

/// A single player-facing action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub text: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
}

impl SuggestedAction {
    pub fn new(text: impl Into<String>, action_type: ActionType) -> Result<Self, DomainError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(DomainError::validation("Suggested action text cannot be empty"));
        }
        Ok(Self { text, action_type })
    }
}
