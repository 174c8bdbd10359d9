//! Removal of model control tokens that leak into generated text.

use std::sync::LazyLock;

use regex_lite::Regex;

// Regex to remove model-specific special tokens (e.g., from gpt-oss, llama, etc.)
static SPECIAL_TOKENS_RE: LazyLock<Regex> = LazyLock::new(|| {
    // - <|...|> style tokens (common in many models)
    // - [INST], [/INST] tokens (llama)
    // - <<SYS>>, <</SYS>> tokens (llama)
    Regex::new(r"<\|[^|>]+\|>|\[/?INST\]|<</?SYS>>").expect("valid regex")
});

// gpt-oss style: <|channel|>analysis<|message|>...<|end|><|start|>assistant<|channel|>final<|message|>CONTENT
static FINAL_CONTENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<\|channel\|>final<\|message\|>(.*)$").expect("valid regex"));

/// Remove model-specific special tokens from raw model output.
///
/// When a gpt-oss `final` channel is present only its content is kept; the
/// analysis channel before it is model scratch work, not narrative.
pub fn strip_special_tokens(raw: &str) -> String {
    if let Some(content) = FINAL_CONTENT_RE.captures(raw).and_then(|caps| caps.get(1)) {
        return SPECIAL_TOKENS_RE
            .replace_all(content.as_str(), "")
            .to_string();
    }

    SPECIAL_TOKENS_RE.replace_all(raw, "").to_string()
}
