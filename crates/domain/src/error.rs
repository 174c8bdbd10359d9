//! Unified error types for the domain layer
//!
//! Domain value objects only fail when a vocabulary string cannot be mapped onto
//! a known variant, or when a constructor's invariant is not met. Decoders in the
//! engine treat these as recoverable and substitute defaults.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., empty required text)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for vocabulary value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for invariant violations.
    ///
    /// Use this when a constructor receives data that would produce an
    /// invalid value object:
    /// - Required text is empty or whitespace
    /// - A collection is below its minimum size
    ///
    /// # Example
    /// ```ignore
    /// if text.trim().is_empty() {
    ///     return Err(DomainError::validation("Action text cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
