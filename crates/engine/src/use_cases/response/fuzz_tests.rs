//! Property tests for interpretation robustness.
//!
//! The interpreter must return for any input, never leave a marker line in the
//! narrative it produces, and reproduce marker fields exactly after rendering.

#[cfg(test)]
mod tests {
    use gulch_domain::{
        ActionType, CombatInitiation, ItemDelta, LocationUpdate, MarkerKind, ParsedResponse,
        SuggestedAction,
    };
    use proptest::prelude::*;

    use crate::use_cases::response::{parse_response, render_markers, ResponseInterpreter};

    const PIECES: &[&str] = &[
        "LOCATION: ",
        "location:",
        "  COMBAT : ",
        "ACQUIRED_ITEMS: ",
        "REMOVED_ITEMS:",
        "SUGGESTED_ACTIONS: ",
        "WEATHER: ",
        "\n",
        "\r\n",
        "\t",
        " ",
        "{",
        "}",
        "[",
        "]",
        "\"",
        "\\",
        ",",
        ":",
        "```json",
        "Saloon",
        "Black Bart",
        "{\"a\": 1}",
        "{\"prompt\": \"Go?\", \"options\": [{\"text\": \"y\", \"impact\": \"z\"}, {\"text\": \"n\", \"impact\": \"w\"}]}",
        "[{\"text\": \"Run\"}]",
        "<|end|>",
        "é",
        "\u{a0}",
    ];

    /// Strategy for generating completely random strings (potential garbage).
    fn arbitrary_string() -> impl Strategy<Value = String> {
        prop::collection::vec(any::<char>(), 0..600).prop_map(|chars| chars.into_iter().collect())
    }

    /// Strategy for strings built from marker and JSON shaped pieces.
    fn marker_like_string() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(PIECES.to_vec()), 0..80)
            .prop_map(|pieces| pieces.concat())
    }

    /// Names with inner spaces and apostrophes anywhere, including the edges.
    fn name() -> impl Strategy<Value = String> {
        "['A-Za-z][A-Za-z ']{0,16}['A-Za-z]"
    }

    fn action_type() -> impl Strategy<Value = ActionType> {
        prop::sample::select(vec![
            ActionType::Basic,
            ActionType::Combat,
            ActionType::Interaction,
        ])
    }

    /// Strategy for the marker-carried fields of a response.
    fn marker_fields() -> impl Strategy<Value = ParsedResponse> {
        (
            prop::option::of(name()),
            prop::collection::btree_set(name(), 0..4),
            prop::collection::btree_set(name(), 0..4),
            prop::collection::vec((name(), action_type()), 0..4),
            prop::option::of((name(), any::<bool>())),
        )
            .prop_map(|(location, acquired, removed, actions, combat)| {
                let items = ItemDelta::new(acquired, removed);
                ParsedResponse {
                    narrative: String::new(),
                    location: location.and_then(LocationUpdate::new),
                    items: (!items.is_empty()).then_some(items),
                    combat: combat.map(|(opponent, started)| CombatInitiation { opponent, started }),
                    suggested_actions: actions
                        .into_iter()
                        .filter_map(|(text, kind)| SuggestedAction::new(text, kind).ok())
                        .collect(),
                    ..Default::default()
                }
            })
    }

    fn has_marker_line(narrative: &str) -> bool {
        narrative.lines().any(|line| {
            let upper = line.trim_start().to_ascii_uppercase();
            MarkerKind::ALL
                .iter()
                .any(|kind| upper.starts_with(&format!("{}:", kind.keyword())))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Interpretation returns for any input.
        #[test]
        fn interpret_never_panics_on_arbitrary_input(input in arbitrary_string()) {
            let _ = parse_response(&input);
        }

        /// Interpretation returns for marker and JSON shaped garbage.
        #[test]
        fn interpret_never_panics_on_marker_like_input(input in marker_like_string()) {
            let _ = parse_response(&input);
        }

        /// A successful interpretation never leaves a marker line in the narrative.
        #[test]
        fn narrative_never_contains_marker_lines(input in marker_like_string()) {
            let interpreter = ResponseInterpreter::default();
            if let Ok(parsed) = interpreter.try_interpret(&input) {
                prop_assert!(!has_marker_line(&parsed.narrative), "narrative: {:?}", parsed.narrative);
            }
        }

        /// Same as above over arbitrary characters.
        #[test]
        fn narrative_never_contains_marker_lines_arbitrary(input in arbitrary_string()) {
            let interpreter = ResponseInterpreter::default();
            if let Ok(parsed) = interpreter.try_interpret(&input) {
                prop_assert!(!has_marker_line(&parsed.narrative));
            }
        }

        /// The fallback always preserves the input verbatim.
        #[test]
        fn fallback_preserves_input(input in marker_like_string()) {
            let interpreter = ResponseInterpreter::default();
            if interpreter.try_interpret(&input).is_err() {
                let parsed = interpreter.interpret(&input);
                prop_assert_eq!(parsed, ParsedResponse::narrative_only(input));
            }
        }

        /// Rendering marker fields and interpreting them yields the same fields,
        /// and a second round trip is stable.
        #[test]
        fn marker_block_round_trip(expected in marker_fields()) {
            let block = render_markers(&expected);
            let parsed = parse_response(&block);
            prop_assert_eq!(&parsed, &expected);

            let reparsed = parse_response(&render_markers(&parsed));
            prop_assert_eq!(reparsed, parsed);
        }

        /// Prose before a marker block is kept and does not disturb the fields.
        #[test]
        fn marker_block_after_prose(expected in marker_fields()) {
            let raw = format!("The wind picks up over the plains.\n\n{}", render_markers(&expected));
            let parsed = parse_response(&raw);

            prop_assert_eq!(parsed.narrative.as_str(), "The wind picks up over the plains.");
            prop_assert_eq!(parsed.location, expected.location);
            prop_assert_eq!(parsed.items, expected.items);
            prop_assert_eq!(parsed.combat, expected.combat);
            prop_assert_eq!(parsed.suggested_actions, expected.suggested_actions);
        }

        /// Prose without braces or colons comes back whitespace-normalised and alone.
        #[test]
        fn plain_prose_is_narrative_only(input in "[A-Za-z .,!?'\n\t]{0,200}") {
            let parsed = parse_response(&input);
            let expected_words: Vec<&str> = input.split_whitespace().collect();
            let actual_words: Vec<&str> = parsed.narrative.split_whitespace().collect();

            prop_assert!(parsed.is_narrative_only());
            prop_assert_eq!(actual_words, expected_words);
        }
    }
}
