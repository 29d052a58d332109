//! Turns the model's free-form reply into either structured JSON or plain
//! display text.
//!
//! The prompt asks the model not to fence its JSON, but replies still arrive
//! as ```` ```json ... ``` ```` often enough that the fence is stripped here.
//! Stripping repeats until the text stops changing, which keeps
//! `normalize_text` idempotent even for replies with stacked fences.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static RE_LEADING_JSON_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```json\s*").unwrap());
static RE_TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*$").unwrap());

/// A normalized model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedResult {
    Structured(Value),
    PlainText(String),
}

impl NormalizedResult {
    pub fn is_structured(&self) -> bool {
        matches!(self, NormalizedResult::Structured(_))
    }

    /// Display form: two-space indented JSON, or the cleaned text.
    pub fn to_display_string(&self) -> String {
        match self {
            NormalizedResult::Structured(value) => pretty(value),
            NormalizedResult::PlainText(text) => text.clone(),
        }
    }
}

pub fn normalize(raw: &str) -> NormalizedResult {
    let cleaned = strip_fences(raw);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => NormalizedResult::Structured(value),
        Err(_) => NormalizedResult::PlainText(cleaned),
    }
}

pub fn normalize_text(raw: &str) -> String {
    normalize(raw).to_display_string()
}

/// Parse display text back into a value: JSON when it parses, otherwise a
/// JSON string holding the text.
pub fn to_value(text: &str) -> Value {
    match normalize(text) {
        NormalizedResult::Structured(value) => value,
        NormalizedResult::PlainText(text) => Value::String(text),
    }
}

fn strip_fences(raw: &str) -> String {
    let mut current = raw.trim().to_string();
    loop {
        let without_lead = RE_LEADING_JSON_FENCE.replace(&current, "");
        let stripped = RE_TRAILING_FENCE.replace(&without_lead, "").trim().to_string();
        if stripped == current {
            return stripped;
        }
        current = stripped;
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fenced_json_is_pretty_printed() {
        let out = normalize_text("```json\n{\"a\":1}\n```");
        assert_eq!(out, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn plain_text_is_returned_trimmed() {
        assert_eq!(normalize_text("Hello world"), "Hello world");
        assert_eq!(normalize_text("  \nHello world\n\n"), "Hello world");
        assert_eq!(normalize("Hello world"), NormalizedResult::PlainText("Hello world".into()));
    }

    #[test]
    fn key_order_from_the_model_is_kept() {
        let out = normalize_text(r#"{"zeta":1,"alpha":{"b":2,"a":3}}"#);
        let zeta = out.find("zeta").unwrap();
        let alpha = out.find("alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn only_a_json_labelled_fence_is_stripped_at_the_start() {
        let out = normalize_text("```python\nprint(1)\n```");
        assert_eq!(out, "```python\nprint(1)");
    }

    #[test]
    fn bare_trailing_fence_on_text_is_stripped() {
        assert_eq!(normalize_text("```json\nSome receipt text\n```  "), "Some receipt text");
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "```json\n{\"a\":1,\"b\":[1,2,{\"c\":null}]}\n```",
            "Hello world",
            "   spaced out text   ",
            "```json```json hi",
            "```json\n```",
            "``````",
            "1e2",
            "\"just a string\"",
            "[1, 2, 3]\n```",
            "",
        ];
        for input in inputs {
            let once = normalize_text(input);
            let twice = normalize_text(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn scalars_count_as_structured() {
        assert_eq!(normalize("42"), NormalizedResult::Structured(json!(42)));
        assert!(normalize("true").is_structured());
    }

    #[test]
    fn display_text_round_trips_to_a_value() {
        assert_eq!(to_value("{\n  \"total\": 100\n}"), json!({ "total": 100 }));
        assert_eq!(to_value("free text"), json!("free text"));
    }
}
