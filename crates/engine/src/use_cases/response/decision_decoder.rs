//! Player decision payload decoding.
//!
//! Options missing `text` or `impact` are dropped one by one. If fewer than two
//! survive, the whole decision is rejected rather than shown half-formed.

use std::collections::BTreeSet;

use gulch_domain::{
    DecisionImportance, DecisionOption, Decoded, PlayerDecision, Substitution,
    MIN_DECISION_OPTIONS,
};
use serde_json::Value;

/// `prompt` and `options` keys together mark a decision payload.
pub fn is_decision_shape(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|fields| fields.contains_key("prompt") && fields.contains_key("options"))
}

/// Decode a decision payload from JSON text.
pub fn decode_decision(fragment: &str) -> Decoded<PlayerDecision> {
    match serde_json::from_str::<Value>(fragment) {
        Ok(value) => decode_decision_value(&value),
        Err(e) => Decoded::invalid(format!("Invalid decision JSON: {}", e)),
    }
}

/// Decode an already-parsed decision payload.
pub fn decode_decision_value(value: &Value) -> Decoded<PlayerDecision> {
    let Some(fields) = value.as_object() else {
        return Decoded::invalid("Decision payload is not a JSON object");
    };

    let prompt = match fields.get("prompt").and_then(Value::as_str).map(str::trim) {
        Some(prompt) if !prompt.is_empty() => prompt.to_string(),
        _ => return Decoded::invalid("Decision has no usable `prompt`"),
    };

    let Some(raw_options) = fields.get("options").and_then(Value::as_array) else {
        return Decoded::invalid("Decision `options` is not an array");
    };

    let mut substitutions = Vec::new();
    let mut options = Vec::with_capacity(raw_options.len());
    for (index, entry) in raw_options.iter().enumerate() {
        match decode_option(entry) {
            Ok(option) => options.push(option),
            Err(reason) => {
                substitutions.push(Substitution::new(format!("options[{}]", index), reason))
            }
        }
    }

    if options.len() < MIN_DECISION_OPTIONS {
        return Decoded::invalid(format!(
            "Decision has {} usable options, needs at least {}",
            options.len(),
            MIN_DECISION_OPTIONS
        ));
    }

    let importance = match fields.get("importance") {
        None | Some(Value::Null) => DecisionImportance::default(),
        Some(Value::String(raw)) => raw.parse().unwrap_or_else(|_| {
            substitutions.push(Substitution::new(
                "importance",
                format!("unknown value {:?}, using moderate", raw),
            ));
            DecisionImportance::default()
        }),
        Some(other) => {
            substitutions.push(Substitution::new(
                "importance",
                format!("non-string value {}, using moderate", other),
            ));
            DecisionImportance::default()
        }
    };

    let context = match fields.get("context") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
        Some(other) => {
            substitutions.push(Substitution::new(
                "context",
                format!("non-string value {}, dropped", other),
            ));
            None
        }
    };

    let characters = match fields.get("characters") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let names = string_set(value);
            if names.is_none() {
                substitutions.push(Substitution::new(
                    "characters",
                    "not a list of names, dropped",
                ));
            }
            names
        }
    };

    match PlayerDecision::new(prompt, options, importance, context, characters) {
        Ok(decision) => Decoded::from_parts(decision, substitutions),
        Err(e) => Decoded::invalid(e.to_string()),
    }
}

fn decode_option(entry: &Value) -> Result<DecisionOption, String> {
    let Some(fields) = entry.as_object() else {
        return Err("option is not an object".to_string());
    };
    let text = fields
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing or non-string `text`".to_string())?;
    let impact = fields
        .get("impact")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing or non-string `impact`".to_string())?;
    let tags = fields.get("tags").and_then(string_set);

    DecisionOption::new(text, impact, tags).map_err(|e| e.to_string())
}

/// A list of strings (non-strings skipped) or a single string, as a set.
/// Empty results collapse to `None`.
fn string_set(value: &Value) -> Option<BTreeSet<String>> {
    let names: BTreeSet<String> = match value {
        Value::Array(entries) => entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(name) => std::iter::once(name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        _ => return None,
    };
    (!names.is_empty()).then_some(names)
}
