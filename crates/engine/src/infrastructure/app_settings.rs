//! Interpreter settings
//!
//! Settings are plain data with serde derives so they can be loaded from a
//! config file or the environment and logged. Defaults suit a local model
//! producing a few kilobytes of narrative per turn.
//!
//! # Environment
//!
//! | Variable                     | Field                         |
//! |------------------------------|-------------------------------|
//! | `GULCH_MAX_INPUT_BYTES`      | `max_input_bytes`             |
//! | `GULCH_STRIP_SPECIAL_TOKENS` | `strip_special_tokens`        |
//! | `GULCH_CLASSIFY_CHARACTERS`  | `classify_character_payloads` |

use serde::{Deserialize, Serialize};

pub const ENV_MAX_INPUT_BYTES: &str = "GULCH_MAX_INPUT_BYTES";
pub const ENV_STRIP_SPECIAL_TOKENS: &str = "GULCH_STRIP_SPECIAL_TOKENS";
pub const ENV_CLASSIFY_CHARACTERS: &str = "GULCH_CLASSIFY_CHARACTERS";

fn default_max_input_bytes() -> usize {
    256 * 1024
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterSettings {
    /// Larger inputs are returned as narrative without being scanned
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,

    /// Remove leaked model control tokens before interpretation
    #[serde(default = "default_true")]
    pub strip_special_tokens: bool,

    /// Treat a response that is exactly one character payload as NPC generation
    #[serde(default = "default_true")]
    pub classify_character_payloads: bool,
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            strip_special_tokens: true,
            classify_character_payloads: true,
        }
    }
}

impl InterpreterSettings {
    /// Load settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup. Missing keys keep their
    /// default; unparseable values keep their default and log a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENV_MAX_INPUT_BYTES) {
            match raw.trim().parse::<usize>() {
                Ok(value) if value > 0 => settings.max_input_bytes = value,
                _ => tracing::warn!(
                    key = ENV_MAX_INPUT_BYTES,
                    value = raw.as_str(),
                    "Ignoring invalid setting"
                ),
            }
        }

        for (key, slot) in [
            (ENV_STRIP_SPECIAL_TOKENS, &mut settings.strip_special_tokens),
            (
                ENV_CLASSIFY_CHARACTERS,
                &mut settings.classify_character_payloads,
            ),
        ] {
            if let Some(raw) = lookup(key) {
                match parse_flag(&raw) {
                    Some(value) => *slot = value,
                    None => tracing::warn!(key, value = raw.as_str(), "Ignoring invalid setting"),
                }
            }
        }

        settings
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
