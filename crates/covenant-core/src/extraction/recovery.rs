//! Recovery of JSON values from free-form model responses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{CovenantError, CovenantResult};

static THINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think-tag regex"));
static OBJECT_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid object span regex"));
static ARRAY_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("valid array span regex"));

/// First `max_chars` characters of `text`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Recover a JSON value from a model response.
///
/// Tries, in order: the whole response, the widest `{...}` span, the widest
/// `[...]` span. Surrounding prose and code fences are tolerated.
pub fn recover_json(response: &str, excerpt_chars: usize) -> CovenantResult<Value> {
    let cleaned = THINK_RE.replace_all(response, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(CovenantError::model_empty_response());
    }

    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Ok(value);
    }

    for re in [&*OBJECT_SPAN_RE, &*ARRAY_SPAN_RE] {
        if let Some(m) = re.find(cleaned) {
            if let Ok(value) = serde_json::from_str::<Value>(m.as_str()) {
                return Ok(value);
            }
        }
    }

    Err(CovenantError::recovery_failure(excerpt(cleaned, excerpt_chars)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_parse() {
        let value = recover_json(r#"{"title": "Lease"}"#, 200).unwrap();
        assert_eq!(value, json!({"title": "Lease"}));
    }

    #[test]
    fn test_object_inside_prose() {
        let response = "Here is the result:\n{\"title\": \"Lease\", \"n\": {\"a\": 1}}\nHope it helps.";
        let value = recover_json(response, 200).unwrap();
        assert_eq!(value, json!({"title": "Lease", "n": {"a": 1}}));
    }

    #[test]
    fn test_code_fence() {
        let response = "```json\n{\"parties\": []}\n```";
        assert_eq!(recover_json(response, 200).unwrap(), json!({"parties": []}));
    }

    #[test]
    fn test_array_inside_prose() {
        let response = "Risks found: [\"a\", \"b\"] end";
        assert_eq!(recover_json(response, 200).unwrap(), json!(["a", "b"]));
    }

    #[test]
    fn test_array_of_objects_prefers_object_span_when_valid() {
        // The widest object span of a single-element array is the element itself
        let response = "[{\"risk_type\": \"payment\"}]";
        assert_eq!(
            recover_json(response, 200).unwrap(),
            json!([{"risk_type": "payment"}])
        );
        let prose = "result: [{\"a\": 1}] done";
        assert_eq!(recover_json(prose, 200).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_think_tags_removed() {
        let response = "<think>maybe {not this}</think>{\"ok\": true}";
        assert_eq!(recover_json(response, 200).unwrap(), json!({"ok": true}));
    }

    #[test]
    fn test_unrecoverable_keeps_excerpt() {
        let response = "I could not find any contract here. ".repeat(20);
        match recover_json(&response, 10) {
            Err(CovenantError::RecoveryFailure { excerpt, .. }) => {
                assert_eq!(excerpt.chars().count(), 10);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_empty_response() {
        assert!(matches!(
            recover_json("   ", 200),
            Err(CovenantError::ModelEmptyResponse { .. })
        ));
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("合同风险分析", 2), "合同");
    }
}
