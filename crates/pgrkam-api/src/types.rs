//! Wire types for the chat endpoint

use serde::{Deserialize, Serialize};

/// Opaque key-value bag attached to a reply (intent, sources, timings, ...)
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

impl Role {
    /// Get the role as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Assistant => "assistant",
            Role::User => "user",
        }
    }
}

/// One prior message sent along as conversational context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl HistoryEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Trimmed user text
    pub message: String,
    /// Active language code ("en" or "pa")
    pub language: String,
    /// Omitted until the server has assigned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Most recent messages, oldest first
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Successful reply from `POST /chat`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub response_id: String,
    #[serde(default)]
    pub original_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ChatResponse {
    /// Language the server would like the conversation to continue in
    pub fn preferred_language(&self) -> Option<&str> {
        self.meta
            .as_ref()?
            .get("preferred_language")?
            .as_str()
            .filter(|s| !s.is_empty())
    }
}

/// Error body of a non-2xx reply
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_omits_missing_session_id() {
        let req = ChatRequest {
            message: "Show engineering jobs in Raipur".into(),
            language: "en".into(),
            session_id: None,
            history: vec![HistoryEntry::new(Role::Assistant, "Welcome")],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("session_id").is_none());
        assert_eq!(value["history"][0]["role"], "assistant");
        assert_eq!(value["message"], "Show engineering jobs in Raipur");
    }

    #[test]
    fn test_request_includes_session_id() {
        let req = ChatRequest {
            message: "hi".into(),
            language: "pa".into(),
            session_id: Some("abc123".into()),
            history: vec![],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["session_id"], "abc123");
        assert_eq!(value["language"], "pa");
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let resp: ChatResponse = serde_json::from_value(json!({"session_id": "s1"})).unwrap();
        assert_eq!(resp.text, "");
        assert_eq!(resp.session_id, "s1");
        assert!(resp.meta.is_none());
        assert!(resp.timestamp.is_none());
    }

    #[test]
    fn test_preferred_language_hint() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "text": "ok",
            "meta": {"preferred_language": "pa", "intent": "job_search"}
        }))
        .unwrap();
        assert_eq!(resp.preferred_language(), Some("pa"));
    }

    #[test]
    fn test_preferred_language_ignores_non_strings() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "text": "ok",
            "meta": {"preferred_language": null}
        }))
        .unwrap();
        assert_eq!(resp.preferred_language(), None);
    }
}
