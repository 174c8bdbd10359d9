//! Fatal interpretation errors.
//!
//! Anything that reaches the caller as one of these has already been turned into
//! the narrative-only fallback by `ResponseInterpreter::interpret`. Recoverable
//! problems (bad fields, unparseable fragments) never become an error; they are
//! reported through `Decoded` and logged.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpretError {
    /// A `{` opened an object that never closed before end of input.
    #[error("Unterminated JSON object starting at byte {start}")]
    UnterminatedObject { start: usize },

    /// A string literal inside a JSON object never closed.
    #[error("Unterminated string starting at byte {start}")]
    UnterminatedString { start: usize },

    /// A closing delimiter did not match the innermost open one.
    #[error("Mismatched '{found}' at byte {offset}")]
    MismatchedDelimiter { offset: usize, found: char },

    /// A computed span fell outside the text or split a character.
    #[error("Invalid span {start}..{end} over {len} bytes of text")]
    InvalidSpan { start: usize, end: usize, len: usize },

    /// Input larger than the configured cap.
    #[error("Input of {len} bytes exceeds the {max} byte limit")]
    InputTooLarge { len: usize, max: usize },
}

/// Checked slice helper; a bad span is an internal invariant violation.
pub(crate) fn slice(text: &str, start: usize, end: usize) -> Result<&str, InterpretError> {
    text.get(start..end).ok_or(InterpretError::InvalidSpan {
        start,
        end,
        len: text.len(),
    })
}
