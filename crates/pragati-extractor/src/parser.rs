//! Recover a JSON object from noisy model output
//!
//! Model responses are "JSON, possibly wrapped in explanatory prose or
//! fenced code blocks". Recovery order: a ```json fence interior, any
//! fence interior, then the substring from the first `{` to the last `}`
//! of whatever remains, parsed strictly. All failures are values; a chunk
//! whose response cannot be recovered simply produced nothing.

use crate::error::ParseError;
use serde_json::Value;

/// Parse the JSON object embedded in a raw model response
pub fn parse_response(raw: &str) -> Result<Value, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let candidate = fenced_interior(trimmed).unwrap_or(trimmed);

    let start = candidate.find('{').ok_or(ParseError::NoJsonObject)?;
    let end = candidate.rfind('}').ok_or(ParseError::NoJsonObject)?;
    if end < start {
        return Err(ParseError::NoJsonObject);
    }

    serde_json::from_str(&candidate[start..=end]).map_err(|e| ParseError::Json(e.to_string()))
}

/// The interior of the first fenced code block, preferring a fence tagged
/// as JSON. An unterminated fence yields everything after the opener.
fn fenced_interior(text: &str) -> Option<&str> {
    let (open_tag, position) = if let Some(position) = text.find("```json") {
        ("```json", position)
    } else if let Some(position) = text.find("```") {
        ("```", position)
    } else {
        return None;
    };

    let interior = &text[position + open_tag.len()..];
    let interior = match interior.find("```") {
        Some(close) => &interior[..close],
        None => interior,
    };
    Some(interior.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bare_json() {
        let value = parse_response(r#"{"district": "Tawang"}"#).unwrap();
        assert_eq!(value["district"], "Tawang");
    }

    #[test]
    fn test_parses_json_fence() {
        let raw = "Here is the extraction:\n```json\n{\"district\": \"Tawang\"}\n```\nDone.";
        let value = parse_response(raw).unwrap();
        assert_eq!(value["district"], "Tawang");
    }

    #[test]
    fn test_parses_untagged_fence() {
        let raw = "```\n{\"district\": \"Tawang\"}\n```";
        let value = parse_response(raw).unwrap();
        assert_eq!(value["district"], "Tawang");
    }

    #[test]
    fn test_prefers_json_fence_over_earlier_plain_fence() {
        let raw = "```\nnot the payload\n```\n```json\n{\"district\": \"Tawang\"}\n```";
        let value = parse_response(raw).unwrap();
        assert_eq!(value["district"], "Tawang");
    }

    #[test]
    fn test_recovers_object_from_surrounding_prose() {
        let raw = "Sure! The extracted data is {\"sectors\": []} as requested.";
        let value = parse_response(raw).unwrap();
        assert!(value["sectors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_fence_still_parses() {
        let raw = "```json\n{\"district\": \"Tawang\"}";
        let value = parse_response(raw).unwrap();
        assert_eq!(value["district"], "Tawang");
    }

    #[test]
    fn test_empty_input_is_reported() {
        assert!(matches!(parse_response(""), Err(ParseError::Empty)));
        assert!(matches!(parse_response("  \n "), Err(ParseError::Empty)));
    }

    #[test]
    fn test_no_braces_is_reported() {
        assert!(matches!(
            parse_response("the document had no extractable data"),
            Err(ParseError::NoJsonObject)
        ));
    }

    #[test]
    fn test_malformed_json_is_reported() {
        assert!(matches!(
            parse_response(r#"{"district": "Tawang", }"#),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn test_nested_objects_span_first_to_last_brace() {
        let raw = r#"prefix {"a": {"b": 1}, "c": {"d": 2}} suffix"#;
        let value = parse_response(raw).unwrap();
        assert_eq!(value["a"]["b"], 1);
        assert_eq!(value["c"]["d"], 2);
    }
}
