//! Player decision points
//!
//! A decision point pauses the narrative and asks the player to pick one of at
//! least two consequential options.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Minimum number of options a decision must offer.
pub const MIN_DECISION_OPTIONS: usize = 2;

/// How heavily the decision weighs on the story.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionImportance {
    Critical,
    Significant,
    #[default]
    Moderate,
    Minor,
}

impl fmt::Display for DecisionImportance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionImportance::Critical => write!(f, "critical"),
            DecisionImportance::Significant => write!(f, "significant"),
            DecisionImportance::Moderate => write!(f, "moderate"),
            DecisionImportance::Minor => write!(f, "minor"),
        }
    }
}

impl FromStr for DecisionImportance {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(DecisionImportance::Critical),
            "significant" => Ok(DecisionImportance::Significant),
            "moderate" => Ok(DecisionImportance::Moderate),
            "minor" => Ok(DecisionImportance::Minor),
            other => Err(DomainError::parse(format!(
                "Unknown decision importance: {}",
                other
            ))),
        }
    }
}

/// One choice within a decision point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub text: String,
    /// Short description of the consequence
    pub impact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
}

impl DecisionOption {
    pub fn new(
        text: impl Into<String>,
        impact: impl Into<String>,
        tags: Option<BTreeSet<String>>,
    ) -> Result<Self, DomainError> {
        let text = text.into().trim().to_string();
        let impact = impact.into().trim().to_string();
        if text.is_empty() {
            return Err(DomainError::validation("Decision option text cannot be empty"));
        }
        if impact.is_empty() {
            return Err(DomainError::validation(
                "Decision option impact cannot be empty",
            ));
        }
        Ok(Self { text, impact, tags })
    }
}

/// A decision the player must make before the story continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDecision {
    pub prompt: String,
    pub options: Vec<DecisionOption>,
    #[serde(default)]
    pub importance: DecisionImportance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<BTreeSet<String>>,
}

impl PlayerDecision {
    /// Enforces a non-empty prompt and at least [`MIN_DECISION_OPTIONS`] options.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<DecisionOption>,
        importance: DecisionImportance,
        context: Option<String>,
        characters: Option<BTreeSet<String>>,
    ) -> Result<Self, DomainError> {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(DomainError::validation("Decision prompt cannot be empty"));
        }
        if options.len() < MIN_DECISION_OPTIONS {
            return Err(DomainError::validation(format!(
                "Decision needs at least {} options, got {}",
                MIN_DECISION_OPTIONS,
                options.len()
            )));
        }
        Ok(Self {
            prompt,
            options,
            importance,
            context,
            characters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str) -> DecisionOption {
        DecisionOption::new(text, "Something changes", None).unwrap()
    }

    #[test]
    fn test_importance_parse_and_default() {
        assert_eq!(DecisionImportance::default(), DecisionImportance::Moderate);
        assert_eq!(
            "CRITICAL".parse::<DecisionImportance>(),
            Ok(DecisionImportance::Critical)
        );
        assert!("earth-shattering".parse::<DecisionImportance>().is_err());
    }

    #[test]
    fn test_decision_requires_two_options() {
        let result = PlayerDecision::new(
            "Draw or walk away?",
            vec![option("Draw")],
            DecisionImportance::Critical,
            None,
            None,
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let decision = PlayerDecision::new(
            "Draw or walk away?",
            vec![option("Draw"), option("Walk away")],
            DecisionImportance::Critical,
            None,
            None,
        )
        .unwrap();
        assert_eq!(decision.options.len(), 2);
    }

    #[test]
    fn test_option_requires_text_and_impact() {
        assert!(DecisionOption::new("", "impact", None).is_err());
        assert!(DecisionOption::new("text", " ", None).is_err());
    }
}
