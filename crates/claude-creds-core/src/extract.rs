//! Parsing and key extraction for the OAuth credentials document
//!
//! The credentials service holds a JSON object. Its `mcpOAuth` member carries tokens for
//! plugin integrations, and depending on the writer an API key may sit at the top level
//! or under a provider object. Each known location is a `KeyExtractor`; they are tried
//! in order and the first non-empty string wins.

use serde_json::{Map, Value};
use thiserror::Error;

/// Member holding per-integration OAuth tokens
pub const AUXILIARY_TOKENS_FIELD: &str = "mcpOAuth";

/// Pure function pulling a candidate key out of a credentials document
pub type KeyExtractor = fn(&Map<String, Value>) -> Option<String>;

/// Known key locations, in priority order
pub const DEFAULT_KEY_EXTRACTORS: &[KeyExtractor] = &[top_level_api_key, provider_api_key];

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Credentials document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Credentials document is not a JSON object")]
    NotAnObject,
}

/// Parse a raw credentials payload into its top-level object
pub fn parse_document(raw: &str) -> Result<Map<String, Value>, DocumentError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(DocumentError::NotAnObject),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `{"apiKey": "..."}`
pub fn top_level_api_key(doc: &Map<String, Value>) -> Option<String> {
    non_empty_str(doc.get("apiKey"))
}

/// `{"anthropic": {"apiKey": "..."}}`
pub fn provider_api_key(doc: &Map<String, Value>) -> Option<String> {
    non_empty_str(doc.get("anthropic").and_then(|p| p.get("apiKey")))
}

/// Run the extractors in order, returning the first hit
pub fn extract_api_key(doc: &Map<String, Value>, extractors: &[KeyExtractor]) -> Option<String> {
    extractors.iter().find_map(|extract| extract(doc))
}

/// The `mcpOAuth` object, if the document has one
pub fn extract_auxiliary_tokens(doc: &Map<String, Value>) -> Option<Map<String, Value>> {
    doc.get(AUXILIARY_TOKENS_FIELD)
        .and_then(Value::as_object)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(parse_document("not json"), Err(DocumentError::Json(_))));
        assert!(matches!(parse_document("{\"apiKey\":"), Err(DocumentError::Json(_))));
        assert!(matches!(parse_document("[1, 2]"), Err(DocumentError::NotAnObject)));
        assert!(matches!(parse_document("\"sk-ant-x\""), Err(DocumentError::NotAnObject)));
        assert!(parse_document("{}").unwrap().is_empty());
    }

    #[test]
    fn test_top_level_key() {
        let d = doc(json!({"apiKey": "sk-ant-YYYY"}));
        assert_eq!(extract_api_key(&d, DEFAULT_KEY_EXTRACTORS), Some("sk-ant-YYYY".into()));
    }

    #[test]
    fn test_provider_key() {
        let d = doc(json!({"anthropic": {"apiKey": "sk-ant-nested"}}));
        assert_eq!(extract_api_key(&d, DEFAULT_KEY_EXTRACTORS), Some("sk-ant-nested".into()));
    }

    #[test]
    fn test_top_level_wins_over_provider() {
        let d = doc(json!({"apiKey": "top", "anthropic": {"apiKey": "nested"}}));
        assert_eq!(extract_api_key(&d, DEFAULT_KEY_EXTRACTORS), Some("top".into()));
    }

    #[test]
    fn test_empty_or_non_string_falls_through() {
        let d = doc(json!({"apiKey": "", "anthropic": {"apiKey": "nested"}}));
        assert_eq!(extract_api_key(&d, DEFAULT_KEY_EXTRACTORS), Some("nested".into()));

        let d = doc(json!({"apiKey": 42, "anthropic": "not-an-object"}));
        assert_eq!(extract_api_key(&d, DEFAULT_KEY_EXTRACTORS), None);
    }

    #[test]
    fn test_custom_extractor_order() {
        fn session_key(doc: &Map<String, Value>) -> Option<String> {
            non_empty_str(doc.get("sessionKey"))
        }
        let d = doc(json!({"apiKey": "top", "sessionKey": "sess"}));
        assert_eq!(extract_api_key(&d, &[session_key, top_level_api_key]), Some("sess".into()));
        assert_eq!(extract_api_key(&d, &[]), None);
    }

    #[test]
    fn test_auxiliary_tokens() {
        let d = doc(json!({"mcpOAuth": {"github": {"accessToken": "gho_x"}}}));
        let tokens = extract_auxiliary_tokens(&d).unwrap();
        assert!(tokens.contains_key("github"));
        // auxiliary tokens are never mistaken for a key
        assert_eq!(extract_api_key(&d, DEFAULT_KEY_EXTRACTORS), None);

        assert!(extract_auxiliary_tokens(&doc(json!({}))).is_none());
        assert!(extract_auxiliary_tokens(&doc(json!({"mcpOAuth": ["x"]}))).is_none());
    }
}
