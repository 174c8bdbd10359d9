//! Gulch Domain - narrative-state vocabulary shared by the interpreter and its consumers.
//!
//! Everything here is an immutable value object. The static tables (marker
//! keywords, action types, decision importance, the neutral attribute value) are
//! compile-time constants; nothing in this crate holds runtime state.

pub mod error;
pub mod value_objects;

pub use error::DomainError;

pub use value_objects::{
    ActionType, AttributeField, CharacterAttributes, CombatInitiation, DecisionImportance,
    DecisionOption, Decoded, ItemDelta, LocationUpdate, MarkerKind, NpcCharacter,
    ParsedResponse, PlayerDecision, Substitution, SuggestedAction, DEFAULT_ATTRIBUTE_VALUE,
    MAX_ATTRIBUTE_VALUE, MIN_DECISION_OPTIONS,
};
