//! Locates structured fragments inside free-form model output.
//!
//! Two kinds of fragment are recognised:
//!
//! - **JSON objects**: a `{ ... }` span whose braces and brackets balance (string
//!   literals and escapes respected) and which parses as a JSON object.
//! - **Marker lines**: a line whose first non-blank text is a known keyword
//!   followed by `:`. A JSON array or object value may continue onto following
//!   lines when it parses as JSON.
//!
//! A marker is only recognised where a line begins, or directly after a
//! fragment that was itself the only thing on its line so far (a JSON object,
//! or a multi-line marker value closing mid-line), so stripping fragments can
//! never leave a marker at the start of a narrative line.
//! Everything inside a JSON object belongs to the object.
//!
//! The scan is a single linear pass with an explicit delimiter stack.

use std::ops::Range;
use std::sync::LazyLock;

use gulch_domain::MarkerKind;
use regex_lite::Regex;
use serde_json::Value;

use super::error::{slice, InterpretError};

/// Bytes a multi-line marker value may span. The value also never runs past
/// the next marker line, so each region is rescanned at most once.
const MAX_MARKER_CONTINUATION: usize = 16 * 1024;

static MARKER_HEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_]+)[ \t]*:").expect("valid regex"));

#[derive(Debug, Clone, PartialEq)]
pub enum FragmentKind {
    JsonObject(Value),
    Marker(MarkerKind),
}

/// A located fragment, borrowed from the text it was found in.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFragment<'a> {
    pub kind: FragmentKind,
    /// Byte range in the scanned text
    pub span: Range<usize>,
    pub text: &'a str,
}

impl<'a> ExtractedFragment<'a> {
    /// Text after the marker's colon, trimmed. `None` for JSON fragments.
    pub fn marker_value(&self) -> Option<&'a str> {
        match self.kind {
            FragmentKind::Marker(_) => self.text.split_once(':').map(|(_, value)| value.trim()),
            FragmentKind::JsonObject(_) => None,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self.kind, FragmentKind::Marker(_))
    }
}

/// Find every JSON object and marker line in `text`, in order.
///
/// Fails only on structurally broken JSON: an object that never closes, a string
/// inside an object that never terminates, or a mismatched closing delimiter.
pub fn extract_fragments(text: &str) -> Result<Vec<ExtractedFragment<'_>>, InterpretError> {
    let mut fragments = Vec::new();
    let mut pos = 0;
    // Only whitespace (or consumed JSON) seen on the current line so far
    let mut line_blank = true;
    let mut check_marker = true;

    while let Some(ch) = text.get(pos..).and_then(|rest| rest.chars().next()) {
        if check_marker {
            check_marker = false;
            if let Some(fragment) = match_marker(text, pos)? {
                pos = fragment.span.end;
                // A multi-line value can close mid-line; the rest of that line
                // is scanned like text after a leading JSON object.
                let mid_line = !matches!(text.as_bytes().get(pos), None | Some(b'\n'));
                line_blank = mid_line;
                check_marker = mid_line;
                fragments.push(fragment);
                continue;
            }
        }

        match ch {
            '{' => {
                let end = scan_balanced(text, pos)?;
                let literal = slice(text, pos, end)?;
                match serde_json::from_str::<Value>(literal) {
                    Ok(value @ Value::Object(_)) => {
                        fragments.push(ExtractedFragment {
                            kind: FragmentKind::JsonObject(value),
                            span: pos..end,
                            text: literal,
                        });
                        check_marker = line_blank;
                    }
                    Ok(_) | Err(_) => {
                        // Quoted keys: a malformed payload, not braces in prose
                        if looks_like_json(literal) {
                            tracing::warn!(
                                start = pos,
                                end,
                                fragment = literal,
                                "Malformed JSON object left in narrative"
                            );
                        } else {
                            tracing::debug!(
                                start = pos,
                                end,
                                "Balanced brace span is not a JSON object, leaving it as prose"
                            );
                        }
                        line_blank = false;
                    }
                }
                pos = end;
            }
            '\n' => {
                line_blank = true;
                check_marker = true;
                pos += 1;
            }
            c if c.is_whitespace() => pos += c.len_utf8(),
            c => {
                line_blank = false;
                pos += c.len_utf8();
            }
        }
    }

    Ok(fragments)
}

/// Try to read a marker line starting at `pos` (leading whitespace allowed).
fn match_marker(text: &str, pos: usize) -> Result<Option<ExtractedFragment<'_>>, InterpretError> {
    let line_end = line_end_from(text, pos);
    let line = slice(text, pos, line_end)?;
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();

    let Some((kind, head_len)) = marker_head(trimmed) else {
        return Ok(None);
    };

    let value_start = pos + indent + head_len;
    let value_start = value_start + leading_inline_space(slice(text, value_start, line_end)?);
    let end = continued_value_end(text, value_start, line_end).unwrap_or(line_end);

    Ok(Some(ExtractedFragment {
        kind: FragmentKind::Marker(kind),
        span: pos..end,
        text: slice(text, pos, end)?,
    }))
}

fn looks_like_json(literal: &str) -> bool {
    literal.contains('"') && literal.contains(':')
}

/// Known marker keyword at the start of `line`, with the length of the
/// `KEYWORD:` head.
fn marker_head(line: &str) -> Option<(MarkerKind, usize)> {
    let caps = MARKER_HEAD_RE.captures(line)?;
    let kind = MarkerKind::from_keyword(caps.get(1)?.as_str())?;
    Some((kind, caps.get(0)?.end()))
}

/// A marker value that opens a JSON array/object and closes on a later line
/// extends the marker to just past the closer (and any inline space after
/// it), if the value parses. Text after that on the closing line is not part
/// of the marker.
fn continued_value_end(text: &str, value_start: usize, line_end: usize) -> Option<usize> {
    match text.as_bytes().get(value_start) {
        Some(b'[') | Some(b'{') => {}
        _ => return None,
    }
    let window_end = continuation_limit(text, value_start, line_end);
    let close = scan_delimited(text.as_bytes().get(..window_end)?, value_start).ok()?;
    if close <= line_end {
        return None;
    }
    let literal = text.get(value_start..close)?;
    serde_json::from_str::<Value>(literal).ok()?;
    Some(close + leading_inline_space(text.get(close..)?))
}

/// Where a multi-line marker value must have closed by: the start of the next
/// marker line, or [`MAX_MARKER_CONTINUATION`] bytes after the value.
///
/// A line of valid JSON never begins with a bare `KEYWORD:`, so stopping there
/// cannot cut off a value that would parse.
fn continuation_limit(text: &str, value_start: usize, line_end: usize) -> usize {
    let cap = text
        .len()
        .min(value_start.saturating_add(MAX_MARKER_CONTINUATION));
    let mut line_start = line_end + 1;
    while line_start < cap {
        let next_end = line_end_from(text, line_start);
        let starts_marker = text
            .get(line_start..next_end)
            .is_some_and(|line| marker_head(line.trim_start()).is_some());
        if starts_marker {
            return line_start;
        }
        line_start = next_end + 1;
    }
    cap
}

/// Byte offset of the next `\n` at or after `pos`, or end of text.
fn line_end_from(text: &str, pos: usize) -> usize {
    text.get(pos..)
        .and_then(|rest| rest.find('\n'))
        .map_or(text.len(), |offset| pos + offset)
}

fn leading_inline_space(s: &str) -> usize {
    s.len() - s.trim_start_matches([' ', '\t']).len()
}

/// Scan from an opening `{` or `[` at `start` to just past its matching closer.
///
/// Tracks nesting of both delimiter kinds on an explicit stack and skips over
/// string literals (with backslash escapes), so braces inside strings do not count.
pub fn scan_balanced(text: &str, start: usize) -> Result<usize, InterpretError> {
    scan_delimited(text.as_bytes(), start)
}

fn scan_delimited(bytes: &[u8], start: usize) -> Result<usize, InterpretError> {
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut string_start = start;

    for (offset, &byte) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => {
                in_string = true;
                string_start = offset;
            }
            b'{' | b'[' => stack.push(byte),
            b'}' | b']' => {
                let expected = if byte == b'}' { b'{' } else { b'[' };
                if stack.pop() != Some(expected) {
                    return Err(InterpretError::MismatchedDelimiter {
                        offset,
                        found: char::from(byte),
                    });
                }
                if stack.is_empty() {
                    return Ok(offset + 1);
                }
            }
            _ => {}
        }
    }

    if in_string {
        Err(InterpretError::UnterminatedString {
            start: string_start,
        })
    } else {
        Err(InterpretError::UnterminatedObject { start })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(fragments: &[ExtractedFragment<'_>]) -> Vec<&'static str> {
        fragments
            .iter()
            .map(|f| match f.kind {
                FragmentKind::JsonObject(_) => "json",
                FragmentKind::Marker(_) => "marker",
            })
            .collect()
    }

    #[test]
    fn test_plain_text_has_no_fragments() {
        let fragments = extract_fragments("The sun sets over the mesa.\nA coyote howls.").unwrap();
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_marker_lines_case_insensitive_with_indent() {
        let text = "Prose.\n  location: Dry Creek\nCombat : Black Bart\nWEATHER: dusty";
        let fragments = extract_fragments(text).unwrap();

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].kind, FragmentKind::Marker(MarkerKind::Location));
        assert_eq!(fragments[0].marker_value(), Some("Dry Creek"));
        assert_eq!(fragments[1].kind, FragmentKind::Marker(MarkerKind::Combat));
        assert_eq!(fragments[1].marker_value(), Some("Black Bart"));
    }

    #[test]
    fn test_marker_must_start_line() {
        let fragments = extract_fragments("He said LOCATION: nowhere").unwrap();
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_nested_json_object() {
        let text = r#"Before {"prompt": "Run?", "options": [{"text": "a", "meta": {"x": 1}}]} after"#;
        let fragments = extract_fragments(text).unwrap();

        assert_eq!(fragments.len(), 1);
        assert_eq!(kinds(&fragments), vec!["json"]);
        assert!(fragments[0].text.starts_with("{\"prompt\""));
        assert!(fragments[0].text.ends_with("}]}"));
        assert_eq!(&text[fragments[0].span.clone()], fragments[0].text);
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let text = r#"{"prompt": "Pick {one} \"}\" please", "n": 1} tail"#;
        let fragments = extract_fragments(text).unwrap();

        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].span.end, text.len() - " tail".len());
    }

    #[test]
    fn test_marker_inside_json_belongs_to_json() {
        let text = "{\"context\": \"x\",\n\"note\":\n\"LOCATION: hidden\"\n}\nLOCATION: Fort Bowie";
        let fragments = extract_fragments(text).unwrap();

        assert_eq!(kinds(&fragments), vec!["json", "marker"]);
        assert_eq!(fragments[1].marker_value(), Some("Fort Bowie"));
    }

    #[test]
    fn test_marker_after_leading_json_on_same_line() {
        let fragments = extract_fragments("{\"a\": 1} LOCATION: Tombstone").unwrap();

        assert_eq!(kinds(&fragments), vec!["json", "marker"]);
        assert_eq!(fragments[1].marker_value(), Some("Tombstone"));
    }

    #[test]
    fn test_multiline_marker_array() {
        let text = "SUGGESTED_ACTIONS: [\n  {\"text\": \"Run\", \"type\": \"basic\"},\n  {\"text\": \"Fight\", \"type\": \"combat\"}\n]\nThe end.";
        let fragments = extract_fragments(text).unwrap();

        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].is_marker());
        assert!(fragments[0].text.ends_with(']'));
        assert!(fragments[0].marker_value().unwrap_or("").starts_with('['));
    }

    #[test]
    fn test_multiline_marker_ends_at_closer() {
        let text = "SUGGESTED_ACTIONS: [\n {\"text\": \"Run\"},\n {\"text\": \"Hide\"}\n]  The fire crackles.\nEnd.";
        let fragments = extract_fragments(text).unwrap();

        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].text.ends_with("]  "));
        assert_eq!(&text[fragments[0].span.end..], "The fire crackles.\nEnd.");
    }

    #[test]
    fn test_marker_after_multiline_value_on_closing_line() {
        let text = "ACQUIRED_ITEMS: [\n\"Rope\"\n] LOCATION: Fort Bowie";
        let fragments = extract_fragments(text).unwrap();

        assert_eq!(kinds(&fragments), vec!["marker", "marker"]);
        assert_eq!(fragments[1].kind, FragmentKind::Marker(MarkerKind::Location));
        assert_eq!(fragments[1].marker_value(), Some("Fort Bowie"));
    }

    #[test]
    fn test_continuation_stops_at_next_marker_line() {
        let text = "ACQUIRED_ITEMS: [\n\"Rope\",\n  LOCATION: Mesa\n]";
        let line_end = text.find('\n').unwrap();

        let limit = continuation_limit(text, "ACQUIRED_ITEMS: ".len(), line_end);

        assert_eq!(limit, text.find("  LOCATION").unwrap());
    }

    #[test]
    fn test_many_unclosed_marker_arrays() {
        let text = "ACQUIRED_ITEMS: [\n".repeat(4_000) + "LOCATION: Tombstone";
        let fragments = extract_fragments(&text).unwrap();

        assert_eq!(fragments.len(), 4_001);
        assert!(fragments.iter().all(|f| !f.text.contains('\n')));
        assert_eq!(fragments[4_000].marker_value(), Some("Tombstone"));
    }

    #[test]
    fn test_non_json_braces_stay_prose() {
        let fragments = extract_fragments("He grinned {wryly} and left.").unwrap();
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_looks_like_json() {
        assert!(looks_like_json(r#"{"prompt": "Run?", options: []}"#));
        assert!(!looks_like_json("{wryly}"));
    }

    #[test]
    fn test_truncated_object_is_fatal() {
        let err = extract_fragments(r#"Intro {"prompt": "Run?", "options": [1, 2"#).unwrap_err();
        assert!(matches!(
            err,
            InterpretError::UnterminatedObject { start: 6 } | InterpretError::UnterminatedString { .. }
        ));
    }

    #[test]
    fn test_mismatched_delimiter_is_fatal() {
        let err = extract_fragments(r#"{"options": [1, 2}"#).unwrap_err();
        assert!(matches!(err, InterpretError::MismatchedDelimiter { found: '}', .. }));
    }

    #[test]
    fn test_unterminated_string_is_fatal() {
        let err = scan_balanced(r#"{"prompt": "Run}"#, 0).unwrap_err();
        assert_eq!(err, InterpretError::UnterminatedString { start: 11 });
    }

    #[test]
    fn test_unicode_text_around_fragments() {
        let text = "Señor Ruiz tips his sombrero ¡olé! {\"a\": \"é\"}\nLOCATION: Cantina Azúl";
        let fragments = extract_fragments(text).unwrap();

        assert_eq!(kinds(&fragments), vec!["json", "marker"]);
        assert_eq!(fragments[1].marker_value(), Some("Cantina Azúl"));
    }
}
