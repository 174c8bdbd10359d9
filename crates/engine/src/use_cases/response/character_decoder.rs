//! NPC character payload decoding.
//!
//! Expected shape:
//!
//! ```json
//! {"name": "Black Bart", "attributes": {"speed": 12, "gunAccuracy": 15, "throwingAccuracy": 8,
//!   "strength": 11, "baseStrength": 11, "bravery": 14, "experience": 9}}
//! ```
//!
//! A bad or missing attribute falls back to [`DEFAULT_ATTRIBUTE_VALUE`]; only a
//! missing name or unparseable JSON rejects the payload.

use gulch_domain::{
    AttributeField, CharacterAttributes, Decoded, NpcCharacter, Substitution,
    DEFAULT_ATTRIBUTE_VALUE, MAX_ATTRIBUTE_VALUE,
};
use serde_json::{Map, Value};

/// True when `value` is an object with a string `name` and an `attributes` object.
pub fn is_character_shape(value: &Value) -> bool {
    value.get("name").is_some_and(Value::is_string)
        && value.get("attributes").is_some_and(Value::is_object)
}

/// Decode a character payload from JSON text.
pub fn decode_character(fragment: &str) -> Decoded<NpcCharacter> {
    match serde_json::from_str::<Value>(fragment) {
        Ok(value) => decode_character_value(&value),
        Err(e) => Decoded::invalid(format!("Invalid character JSON: {}", e)),
    }
}

/// Decode an already-parsed character payload.
pub fn decode_character_value(value: &Value) -> Decoded<NpcCharacter> {
    let Some(fields) = value.as_object() else {
        return Decoded::invalid("Character payload is not a JSON object");
    };

    let name = match fields.get("name").and_then(Value::as_str).map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Decoded::invalid("Character payload has no usable `name`"),
    };

    let mut substitutions = Vec::new();
    let attributes = match fields.get("attributes") {
        Some(Value::Object(raw)) => decode_attributes(raw, &mut substitutions),
        _ => {
            substitutions.push(Substitution::new(
                "attributes",
                "missing or not an object, using neutral sheet",
            ));
            CharacterAttributes::neutral()
        }
    };

    if !attributes.within_bounds() {
        tracing::debug!(
            name = name.as_str(),
            max = MAX_ATTRIBUTE_VALUE,
            "Character attributes outside the usual range, keeping them"
        );
    }

    Decoded::from_parts(NpcCharacter { name, attributes }, substitutions)
}

fn decode_attributes(
    raw: &Map<String, Value>,
    substitutions: &mut Vec<Substitution>,
) -> CharacterAttributes {
    let mut attributes = CharacterAttributes::neutral();

    for field in AttributeField::ALL {
        let path = format!("attributes.{}", field.wire_name());
        match raw.get(field.wire_name()) {
            None => substitutions.push(Substitution::new(
                path,
                format!("missing, defaulted to {}", DEFAULT_ATTRIBUTE_VALUE),
            )),
            Some(value) => match coerce_attribute(value) {
                Some(number) => attributes.set(field, number),
                None => substitutions.push(Substitution::new(
                    path,
                    format!("non-numeric value {}, defaulted to {}", value, DEFAULT_ATTRIBUTE_VALUE),
                )),
            },
        }
    }

    attributes
}

/// Integers pass through; floats and numeric strings are rounded.
fn coerce_attribute(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => match number.as_i64() {
            Some(int) => i32::try_from(int).ok(),
            None => number.as_f64().and_then(round_to_i32),
        },
        Value::String(text) => {
            let text = text.trim();
            match text.parse::<i64>() {
                Ok(int) => i32::try_from(int).ok(),
                Err(_) => text.parse::<f64>().ok().and_then(round_to_i32),
            }
        }
        _ => None,
    }
}

fn round_to_i32(value: f64) -> Option<i32> {
    let rounded = value.round();
    if rounded.is_finite() && rounded >= f64::from(i32::MIN) && rounded <= f64::from(i32::MAX) {
        Some(rounded as i32)
    } else {
        None
    }
}
