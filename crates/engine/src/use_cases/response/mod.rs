//! Response interpretation use case.
//!
//! Converts raw model output (prose mixed with marker lines and JSON payloads)
//! into a validated [`gulch_domain::ParsedResponse`]. Leaves first:
//!
//! - `fragment_extractor` - finds JSON objects and marker lines
//! - `marker_decoder` - location, item, combat and action markers
//! - `character_decoder` - NPC character payloads
//! - `decision_decoder` - player decision payloads
//! - `response_parser` - classification, sequencing and fallback policy
//! - `marker_renderer` - the inverse of marker decoding

#[cfg(test)]
mod fuzz_tests;

pub mod character_decoder;
pub mod decision_decoder;
pub mod error;
pub mod fragment_extractor;
pub mod marker_decoder;
pub mod marker_renderer;
pub mod response_parser;
pub mod special_tokens;

pub use character_decoder::{decode_character, decode_character_value, is_character_shape};
pub use decision_decoder::{decode_decision, decode_decision_value, is_decision_shape};
pub use error::InterpretError;
pub use fragment_extractor::{extract_fragments, ExtractedFragment, FragmentKind};
pub use marker_decoder::{decode_marker, decode_marker_value, DecodedMarker};
pub use marker_renderer::render_markers;
pub use response_parser::{parse_response, ResponseInterpreter};
pub use special_tokens::strip_special_tokens;
