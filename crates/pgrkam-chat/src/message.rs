//! Conversation messages and the transient error banner state

use pgrkam_api::{ChatResponse, Error as ApiError, ErrorKind, HistoryEntry, Meta, Role};
use serde::{Deserialize, Serialize};

use crate::i18n::Language;

/// Shown when a successful reply carries no text
pub const EMPTY_REPLY_TEXT: &str = "No response received";

/// One entry in the conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl Message {
    /// Create a user message stamped with the current time
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Some(now_iso()),
            meta: None,
            response_id: None,
        }
    }

    /// Create an assistant message stamped with the current time
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Some(now_iso()),
            meta: None,
            response_id: None,
        }
    }

    /// Opening message for a fresh conversation
    pub fn greeting(language: Language) -> Self {
        Self::assistant(language.strings().greeting)
    }

    /// Build the assistant message for a successful reply
    pub fn from_response(response: ChatResponse) -> Self {
        let content = if response.text.is_empty() {
            EMPTY_REPLY_TEXT.to_string()
        } else {
            response.text
        };
        Self {
            role: Role::Assistant,
            content,
            timestamp: response.timestamp,
            meta: response.meta,
            response_id: Some(response.response_id).filter(|id| !id.is_empty()),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Role and content only, as sent in request history
    pub fn to_history(&self) -> HistoryEntry {
        HistoryEntry::new(self.role, self.content.clone())
    }
}

/// Transient error shown in a banner; never part of the message log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorState {
    pub has_error: bool,
    pub message: String,
    pub kind: Option<ErrorKind>,
}

impl ErrorState {
    /// Record a failed turn
    pub fn from_error(error: &ApiError) -> Self {
        Self {
            has_error: true,
            message: error.user_message(),
            kind: Some(error.kind()),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
