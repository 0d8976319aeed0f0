//! Conversation event types

use serde::{Deserialize, Serialize};

use crate::i18n::Language;
use crate::message::{ErrorState, Message};

/// Events emitted by the conversation controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A turn was submitted to the endpoint
    TurnStart { message: String },

    /// A message was appended to the log
    MessageAppended { message: Message },

    /// The server assigned or rotated the session id
    SessionChanged { session_id: String },

    /// The active language changed
    LanguageChanged { language: Language },

    /// A turn failed
    Error { state: ErrorState },

    /// A turn finished, successfully or not
    TurnEnd { success: bool },

    /// The conversation was reset to its greeting
    Reset,
}

impl ChatEvent {
    /// Check if this event ends a turn
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChatEvent::TurnEnd { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tags() {
        let json = serde_json::to_value(ChatEvent::SessionChanged {
            session_id: "abc123".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "session_changed");
        assert_eq!(json["session_id"], "abc123");

        let json = serde_json::to_value(ChatEvent::LanguageChanged {
            language: Language::Pa,
        })
        .unwrap();
        assert_eq!(json["language"], "pa");
    }

    #[test]
    fn test_terminal_events() {
        assert!(ChatEvent::TurnEnd { success: false }.is_terminal());
        assert!(!ChatEvent::Reset.is_terminal());
    }
}
