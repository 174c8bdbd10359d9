//! The structured result of interpreting one model response

use serde::{Deserialize, Serialize};

use super::{
    CombatInitiation, ItemDelta, LocationUpdate, NpcCharacter, PlayerDecision, SuggestedAction,
};

/// Everything the game layer needs from one model response.
///
/// `narrative` is always present (possibly empty). All other fields are only
/// populated when the response carried them in a recognisable form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResponse {
    pub narrative: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combat: Option<CombatInitiation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_actions: Vec<SuggestedAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<PlayerDecision>,
    /// Only set on the dedicated NPC generation path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<NpcCharacter>,
}

impl ParsedResponse {
    /// Narrative-only result used when nothing structured could be trusted.
    pub fn narrative_only(text: impl Into<String>) -> Self {
        Self {
            narrative: text.into(),
            ..Default::default()
        }
    }

    /// Result of the NPC generation path.
    pub fn character_only(character: NpcCharacter) -> Self {
        Self {
            character: Some(character),
            ..Default::default()
        }
    }

    /// True when only narrative text is present.
    pub fn is_narrative_only(&self) -> bool {
        self.location.is_none()
            && self.items.is_none()
            && self.combat.is_none()
            && self.suggested_actions.is_empty()
            && self.decision.is_none()
            && self.character.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::CharacterAttributes;

    #[test]
    fn test_narrative_only() {
        let response = ParsedResponse::narrative_only("The wind howls.");
        assert_eq!(response.narrative, "The wind howls.");
        assert!(response.is_narrative_only());
    }

    #[test]
    fn test_character_only_has_empty_narrative() {
        let response = ParsedResponse::character_only(NpcCharacter {
            name: "Black Bart".into(),
            attributes: CharacterAttributes::neutral(),
        });
        assert!(response.narrative.is_empty());
        assert!(!response.is_narrative_only());
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let json = serde_json::to_value(ParsedResponse::narrative_only("Quiet.")).unwrap();
        assert_eq!(json, serde_json::json!({ "narrative": "Quiet." }));
    }
}
