//! Value objects - Immutable objects defined by their attributes

mod character;
mod decision;
mod decoded;
mod markers;
mod parsed_response;
mod scene_updates;
mod suggested_action;

// NPC generation
pub use character::{
    AttributeField, CharacterAttributes, NpcCharacter, DEFAULT_ATTRIBUTE_VALUE,
    MAX_ATTRIBUTE_VALUE,
};

// Decision points
pub use decision::{DecisionImportance, DecisionOption, PlayerDecision, MIN_DECISION_OPTIONS};

pub use decoded::{Decoded, Substitution};
pub use markers::MarkerKind;
pub use parsed_response::ParsedResponse;
pub use scene_updates::{CombatInitiation, ItemDelta, LocationUpdate};
pub use suggested_action::{ActionType, SuggestedAction};
