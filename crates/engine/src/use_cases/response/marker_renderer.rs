//! Renders structured fields back into marker lines.
//!
//! Output uses canonical upper-case keywords and JSON arrays for list values, so
//! interpreting the rendered block yields the same fields again.

use gulch_domain::{MarkerKind, ParsedResponse};
use serde_json::json;

/// Render every populated marker field of `response`, one line per marker.
///
/// Narrative, decision and character fields are not markers and are skipped.
pub fn render_markers(response: &ParsedResponse) -> String {
    let mut lines = Vec::new();

    for kind in MarkerKind::ALL {
        let value = match kind {
            MarkerKind::Location => response
                .location
                .as_ref()
                .map(|location| render_location(location.as_str())),
            MarkerKind::AcquiredItems => response
                .items
                .as_ref()
                .filter(|items| !items.acquired.is_empty())
                .map(|items| json!(items.acquired).to_string()),
            MarkerKind::RemovedItems => response
                .items
                .as_ref()
                .filter(|items| !items.removed.is_empty())
                .map(|items| json!(items.removed).to_string()),
            MarkerKind::SuggestedActions => (!response.suggested_actions.is_empty())
                .then(|| json!(response.suggested_actions).to_string()),
            MarkerKind::Combat => response.combat.as_ref().map(|combat| {
                json!({ "opponent": combat.opponent, "started": combat.started }).to_string()
            }),
        };

        if let Some(value) = value {
            lines.push(format!("{}: {}", kind.keyword(), value));
        }
    }

    lines.join("\n")
}

/// A name that is itself wrapped in quotes gets one more pair, since decoding
/// strips a single surrounding pair.
fn render_location(name: &str) -> String {
    let wrapped = ['"', '\''].into_iter().any(|quote| {
        name.len() >= 2 && name.starts_with(quote) && name.ends_with(quote)
    });
    if wrapped {
        format!("\"{}\"", name)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gulch_domain::{ActionType, CombatInitiation, ItemDelta, LocationUpdate, SuggestedAction};

    #[test]
    fn test_renders_in_vocabulary_order() {
        let response = ParsedResponse {
            narrative: "ignored".into(),
            location: LocationUpdate::new("Boot Hill"),
            items: Some(ItemDelta::new(
                vec!["Rope".to_string()],
                vec!["Whiskey".to_string()],
            )),
            combat: Some(CombatInitiation::started("Black Bart")),
            suggested_actions: vec![SuggestedAction::new("Run", ActionType::Basic).unwrap()],
            ..Default::default()
        };

        let rendered = render_markers(&response);

        assert_eq!(
            rendered,
            "LOCATION: Boot Hill\n\
             ACQUIRED_ITEMS: [\"Rope\"]\n\
             REMOVED_ITEMS: [\"Whiskey\"]\n\
             SUGGESTED_ACTIONS: [{\"text\":\"Run\",\"type\":\"basic\"}]\n\
             COMBAT: {\"opponent\":\"Black Bart\",\"started\":true}"
        );
    }

    #[test]
    fn test_quoted_location_gets_extra_quotes() {
        assert_eq!(render_location("The Miners'"), "The Miners'");
        assert_eq!(render_location("'Frisco'"), "\"'Frisco'\"");
        assert_eq!(render_location("'"), "'");
    }

    #[test]
    fn test_empty_response_renders_nothing() {
        assert!(render_markers(&ParsedResponse::narrative_only("Quiet night.")).is_empty());
    }
}
