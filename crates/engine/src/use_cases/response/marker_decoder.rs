//! Decodes marker line values into typed scene updates.
//!
//! List markers try JSON first. Item lists fall back to comma splitting; action
//! lists cannot be split safely, so an unparseable action list is dropped.

use std::collections::BTreeSet;

use gulch_domain::{
    ActionType, CombatInitiation, ItemDelta, LocationUpdate, MarkerKind, SuggestedAction,
};
use serde_json::Value;

/// What a single marker line contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedMarker {
    Location(LocationUpdate),
    Items(ItemDelta),
    /// `None` explicitly reports that no combat is under way
    Combat(Option<CombatInitiation>),
    SuggestedActions(Vec<SuggestedAction>),
    /// Recognised keyword whose value carried nothing usable
    Ignored,
    /// Keyword outside the vocabulary
    Unknown(String),
}

/// Values the model uses to mean "nothing".
const EMPTY_WORDS: [&str; 6] = ["", "none", "n/a", "-", "[]", "nothing"];

/// Decode a complete marker line such as `LOCATION: Silver Gulch Saloon`.
pub fn decode_marker(line: &str) -> DecodedMarker {
    let Some((keyword, value)) = line.split_once(':') else {
        return DecodedMarker::Unknown(line.trim().to_string());
    };
    match MarkerKind::from_keyword(keyword) {
        Some(kind) => decode_marker_value(kind, value),
        None => {
            tracing::debug!(keyword = keyword.trim(), "Ignoring unknown marker keyword");
            DecodedMarker::Unknown(keyword.trim().to_string())
        }
    }
}

/// Decode the text after a known marker's colon.
pub fn decode_marker_value(kind: MarkerKind, value: &str) -> DecodedMarker {
    let value = value.trim();
    match kind {
        MarkerKind::Location => match LocationUpdate::new(trim_quotes(value)) {
            Some(location) => DecodedMarker::Location(location),
            None => DecodedMarker::Ignored,
        },
        MarkerKind::AcquiredItems => {
            DecodedMarker::Items(ItemDelta::acquired(decode_item_list(kind, value)))
        }
        MarkerKind::RemovedItems => {
            DecodedMarker::Items(ItemDelta::removed(decode_item_list(kind, value)))
        }
        MarkerKind::SuggestedActions => decode_actions(value),
        MarkerKind::Combat => decode_combat(value),
    }
}

fn is_empty_word(value: &str) -> bool {
    let value = value.trim();
    EMPTY_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(value))
}

/// Strip one pair of quotes that wraps the whole value. A lone apostrophe
/// (`The Miners'`, `'Frisco`) is part of the name.
fn trim_quotes(value: &str) -> &str {
    let value = value.trim();
    ['"', '\'']
        .into_iter()
        .find_map(|quote| value.strip_prefix(quote)?.strip_suffix(quote))
        .map_or(value, str::trim)
}

fn decode_item_list(kind: MarkerKind, value: &str) -> BTreeSet<String> {
    if is_empty_word(value) {
        return BTreeSet::new();
    }

    match serde_json::from_str::<Value>(value) {
        Ok(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(name) => non_empty(&name),
                other => {
                    tracing::debug!(marker = %kind, entry = %other, "Dropping non-string item entry");
                    None
                }
            })
            .collect(),
        Ok(Value::String(joined)) => split_items(&joined),
        _ => {
            tracing::debug!(marker = %kind, value, "Item list is not a JSON array, splitting on commas");
            split_items(value)
        }
    }
}

fn split_items(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(|item| trim_quotes(item.trim().trim_matches(['[', ']', '"'])))
        .filter(|item| !is_empty_word(item))
        .map(str::to_string)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn decode_actions(value: &str) -> DecodedMarker {
    if is_empty_word(value) {
        return DecodedMarker::SuggestedActions(Vec::new());
    }

    let entries = match serde_json::from_str::<Value>(value) {
        Ok(Value::Array(entries)) => entries,
        Ok(single @ Value::Object(_)) => vec![single],
        Ok(other) => {
            tracing::warn!(value = %other, "SUGGESTED_ACTIONS is not a JSON array, dropping it");
            return DecodedMarker::Ignored;
        }
        Err(e) => {
            tracing::warn!(value, error = %e, "Failed to parse SUGGESTED_ACTIONS JSON, dropping it");
            return DecodedMarker::Ignored;
        }
    };

    let actions = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match decode_action(entry) {
            Ok(action) => Some(action),
            Err(reason) => {
                tracing::warn!(index, entry = %entry, reason = %reason, "Dropping suggested action");
                None
            }
        })
        .collect();

    DecodedMarker::SuggestedActions(actions)
}

/// A missing or unrecognised `type` becomes `basic` so the action stays visible.
fn decode_action(entry: &Value) -> Result<SuggestedAction, String> {
    match entry {
        Value::String(text) => {
            SuggestedAction::new(text.as_str(), ActionType::Basic).map_err(|e| e.to_string())
        }
        Value::Object(fields) => {
            let text = fields
                .get("text")
                .and_then(Value::as_str)
                .ok_or_else(|| "missing or non-string `text`".to_string())?;
            let action_type = match fields.get("type") {
                None | Some(Value::Null) => ActionType::Basic,
                Some(Value::String(raw)) => raw.parse().unwrap_or_else(|_| {
                    tracing::debug!(action_type = raw.as_str(), "Coercing unknown action type to basic");
                    ActionType::Basic
                }),
                Some(other) => {
                    tracing::debug!(action_type = %other, "Coercing non-string action type to basic");
                    ActionType::Basic
                }
            };
            SuggestedAction::new(text, action_type).map_err(|e| e.to_string())
        }
        _ => Err("entry is neither an object nor a string".to_string()),
    }
}

fn decode_combat(value: &str) -> DecodedMarker {
    let lowered = value.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "" => return DecodedMarker::Ignored,
        "none" | "false" | "no" | "n/a" | "-" => return DecodedMarker::Combat(None),
        "true" | "yes" => {
            tracing::warn!("COMBAT marker has no opponent name, dropping it");
            return DecodedMarker::Ignored;
        }
        _ => {}
    }

    if value.starts_with('{') {
        return match serde_json::from_str::<Value>(value) {
            Ok(Value::Object(fields)) => {
                let started = fields
                    .get("started")
                    .and_then(Value::as_bool)
                    .unwrap_or(true);
                let opponent = fields
                    .get("opponent")
                    .or_else(|| fields.get("name"))
                    .and_then(Value::as_str)
                    .and_then(non_empty);
                match opponent {
                    Some(opponent) => DecodedMarker::Combat(Some(CombatInitiation {
                        opponent,
                        started,
                    })),
                    None if !started => DecodedMarker::Combat(None),
                    None => {
                        tracing::warn!(value, "COMBAT object has no opponent, dropping it");
                        DecodedMarker::Ignored
                    }
                }
            }
            _ => {
                tracing::warn!(value, "Failed to parse COMBAT object, dropping it");
                DecodedMarker::Ignored
            }
        };
    }

    match non_empty(trim_quotes(value)) {
        Some(opponent) => DecodedMarker::Combat(Some(CombatInitiation::started(opponent))),
        None => DecodedMarker::Ignored,
    }
}
