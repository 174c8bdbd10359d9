//! Model response interpretation.
//!
//! Turns one raw model response into a [`ParsedResponse`]:
//!
//! 1. **Classify**: a response that is exactly one character payload (optionally
//!    inside a code fence) is NPC generation and returns a character-only result.
//! 2. **Extract**: locate marker lines and JSON objects.
//! 3. **Decode markers**: item deltas merge; for location, combat and actions the
//!    last marker wins.
//! 4. **Decode decision**: the first decision-shaped object is decoded; later
//!    ones are ignored.
//! 5. **Assemble narrative** from the text between consumed fragments.
//!
//! Any [`InterpretError`] raised along the way is caught in
//! [`ResponseInterpreter::interpret`], which then returns the original input
//! verbatim as narrative with nothing else populated.

use std::borrow::Cow;
use std::ops::Range;

use gulch_domain::{Decoded, ItemDelta, NpcCharacter, ParsedResponse};
use serde_json::Value;

use super::character_decoder::{decode_character_value, is_character_shape};
use super::decision_decoder::{decode_decision_value, is_decision_shape};
use super::error::{slice, InterpretError};
use super::fragment_extractor::{extract_fragments, ExtractedFragment, FragmentKind};
use super::marker_decoder::{decode_marker_value, DecodedMarker};
use super::special_tokens::strip_special_tokens;
use crate::infrastructure::InterpreterSettings;

/// Stateless interpreter; one instance can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct ResponseInterpreter {
    settings: InterpreterSettings,
}

impl ResponseInterpreter {
    pub fn new(settings: InterpreterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &InterpreterSettings {
        &self.settings
    }

    /// Interpret a response. Never fails: on any fatal error the whole input
    /// comes back as narrative.
    pub fn interpret(&self, raw: &str) -> ParsedResponse {
        match self.try_interpret(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    input_len = raw.len(),
                    "Falling back to narrative-only response"
                );
                ParsedResponse::narrative_only(raw)
            }
        }
    }

    /// Interpret a response, surfacing fatal errors instead of falling back.
    pub fn try_interpret(&self, raw: &str) -> Result<ParsedResponse, InterpretError> {
        if raw.len() > self.settings.max_input_bytes {
            return Err(InterpretError::InputTooLarge {
                len: raw.len(),
                max: self.settings.max_input_bytes,
            });
        }

        let text: Cow<'_, str> = if self.settings.strip_special_tokens {
            Cow::Owned(strip_special_tokens(raw))
        } else {
            Cow::Borrowed(raw)
        };

        if self.settings.classify_character_payloads {
            if let Some(character) = classify_character(&text) {
                tracing::debug!(name = character.name.as_str(), "Response is a character payload");
                return Ok(ParsedResponse::character_only(character));
            }
        }

        let fragments = extract_fragments(&text)?;
        let mut response = ParsedResponse::default();
        let mut consumed: Vec<Range<usize>> = Vec::with_capacity(fragments.len());
        let mut items = ItemDelta::default();
        let mut decision_seen = false;

        for fragment in &fragments {
            match &fragment.kind {
                FragmentKind::Marker(kind) => {
                    consumed.push(marker_span_with_newline(&text, fragment));
                    match decode_marker_value(*kind, fragment.marker_value().unwrap_or_default()) {
                        DecodedMarker::Location(location) => response.location = Some(location),
                        DecodedMarker::Items(delta) => items.merge(delta),
                        DecodedMarker::Combat(combat) => response.combat = combat,
                        DecodedMarker::SuggestedActions(actions) => {
                            response.suggested_actions = actions
                        }
                        DecodedMarker::Ignored | DecodedMarker::Unknown(_) => {}
                    }
                }
                FragmentKind::JsonObject(value) => {
                    consumed.push(fragment.span.clone());
                    if !is_decision_shape(value) {
                        continue;
                    }
                    if decision_seen {
                        tracing::debug!(
                            start = fragment.span.start,
                            "Ignoring additional decision payload"
                        );
                        continue;
                    }
                    decision_seen = true;
                    response.decision = match decode_decision_value(value) {
                        Decoded::Valid(decision) => Some(decision),
                        Decoded::Defaulted(decision, substitutions) => {
                            for sub in &substitutions {
                                tracing::warn!(
                                    field = sub.field.as_str(),
                                    reason = sub.reason.as_str(),
                                    "Decision field substituted"
                                );
                            }
                            Some(decision)
                        }
                        Decoded::Invalid(reason) => {
                            tracing::warn!(reason = reason.as_str(), "Dropping decision payload");
                            None
                        }
                    };
                }
            }
        }

        response.items = (!items.is_empty()).then_some(items);
        response.narrative = assemble_narrative(&text, &consumed)?;
        Ok(response)
    }
}

/// Interpret with default settings.
pub fn parse_response(raw: &str) -> ParsedResponse {
    ResponseInterpreter::default().interpret(raw)
}

/// Whole-response character payload check.
fn classify_character(text: &str) -> Option<NpcCharacter> {
    let candidate = strip_code_fence(text.trim());
    if !(candidate.starts_with('{') && candidate.ends_with('}')) {
        return None;
    }
    let value: Value = serde_json::from_str(candidate).ok()?;
    if !is_character_shape(&value) {
        return None;
    }

    let decoded = decode_character_value(&value);
    for sub in decoded.substitutions() {
        tracing::warn!(
            field = sub.field.as_str(),
            reason = sub.reason.as_str(),
            "Character attribute substituted"
        );
    }
    decoded.into_value()
}

/// Strip a surrounding ```` ```json ... ``` ```` fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line
    match body.split_once('\n') {
        Some((info, inner)) if !info.trim().contains(char::is_whitespace) => inner.trim(),
        _ => body.trim(),
    }
}

fn is_code_fence_line(line: &str) -> bool {
    line.trim()
        .strip_prefix("```")
        .is_some_and(|info| info.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Marker lines take their trailing newline with them so removing a marker
/// does not open a paragraph break.
fn marker_span_with_newline(text: &str, fragment: &ExtractedFragment<'_>) -> Range<usize> {
    let end = fragment.span.end;
    if text.as_bytes().get(end) == Some(&b'\n') {
        fragment.span.start..end + 1
    } else {
        fragment.span.clone()
    }
}

/// Join the text between consumed spans and normalise whitespace.
fn assemble_narrative(text: &str, consumed: &[Range<usize>]) -> Result<String, InterpretError> {
    let mut residual = String::with_capacity(text.len());
    let mut cursor = 0;

    for span in consumed {
        if span.start < cursor {
            return Err(InterpretError::InvalidSpan {
                start: span.start,
                end: span.end,
                len: text.len(),
            });
        }
        residual.push_str(slice(text, cursor, span.start)?);
        cursor = span.end;
    }
    residual.push_str(slice(text, cursor, text.len())?);

    Ok(normalize_whitespace(&residual))
}

/// Collapse whitespace within lines, keep single blank lines as paragraph
/// breaks, and drop code fence lines left behind by stripped payloads.
fn normalize_whitespace(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in text.lines() {
        if is_code_fence_line(line) {
            continue;
        }
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(collapsed);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs.join("\n\n")
}
