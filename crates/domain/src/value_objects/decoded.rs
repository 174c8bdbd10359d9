//! Validation outcome for loosely-typed model payloads

use serde::{Deserialize, Serialize};

/// A field that could not be taken verbatim from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    /// Field path, e.g. `attributes.bravery` or `options[2]`
    pub field: String,
    /// What was wrong with the original value
    pub reason: String,
}

impl Substitution {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result of validating a JSON payload into a typed value.
///
/// `Defaulted` carries a usable value along with every field that was replaced
/// or dropped on the way. `Invalid` means nothing usable could be produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Valid(T),
    Defaulted(T, Vec<Substitution>),
    Invalid(String),
}

impl<T> Decoded<T> {
    /// Build `Valid` or `Defaulted` depending on whether anything was substituted.
    pub fn from_parts(value: T, substitutions: Vec<Substitution>) -> Self {
        if substitutions.is_empty() {
            Decoded::Valid(value)
        } else {
            Decoded::Defaulted(value, substitutions)
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Decoded::Invalid(reason.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Decoded::Valid(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Decoded::Invalid(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Decoded::Valid(value) | Decoded::Defaulted(value, _) => Some(value),
            Decoded::Invalid(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Decoded::Valid(value) | Decoded::Defaulted(value, _) => Some(value),
            Decoded::Invalid(_) => None,
        }
    }

    pub fn substitutions(&self) -> &[Substitution] {
        match self {
            Decoded::Defaulted(_, subs) => subs,
            _ => &[],
        }
    }
}
