//! pgrkam-chat: conversation controller for the PGRKAM assistant
//!
//! This crate owns everything between the user and the chat endpoint: the
//! message log, the draft, language preference and session persistence,
//! failure apologies, and the speech-input adapter.

pub mod chat;
pub mod error;
pub mod events;
pub mod i18n;
pub mod message;
pub mod speech;
pub mod storage;

pub use chat::{Chat, ChatConfig, PendingTurn, TurnReply};
pub use error::{Error, Result, SpeechError};
pub use events::ChatEvent;
pub use i18n::{EXAMPLE_QUERIES, Language, Translations, apology, chip_label, translations};
pub use message::{EMPTY_REPLY_TEXT, ErrorState, Message};
pub use speech::{
    CommandRecognizer, CommandRecognizerFactory, NoSpeech, RecognitionEvents, Recognizer,
    RecognizerFactory, SpeechCallbacks, SpeechInput,
};
pub use storage::{FileStorage, LANGUAGE_KEY, MemoryStorage, SESSION_KEY, ScopedStorage};
