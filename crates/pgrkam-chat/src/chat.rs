//! Conversation controller
//!
//! [`Chat`] owns the message log, the draft, the ephemeral error banner, the
//! session id and the language preference. A turn is split in three so an
//! event loop can keep mutating the controller while the request is in flight:
//! [`Chat::begin_send`] moves Idle to Sending and returns a [`PendingTurn`],
//! [`PendingTurn::run`] performs the one HTTP call, and [`Chat::finish_send`]
//! moves back to Idle.

use pgrkam_api::{ChatApi, ChatRequest, ChatResponse};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use crate::{
    events::ChatEvent,
    i18n::{EXAMPLE_QUERIES, Language, Translations, apology},
    message::{ErrorState, Message},
    speech::{RecognizerFactory, SpeechCallbacks, SpeechInput},
    storage::{LANGUAGE_KEY, SESSION_KEY, ScopedStorage},
};

/// Controller configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Number of most recent messages sent as context with each turn
    pub history_window: usize,
    /// Language used when nothing has been persisted yet
    pub default_language: Language,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: 4,
            default_language: Language::En,
        }
    }
}

/// A submitted turn waiting for its reply
pub struct PendingTurn {
    api: Arc<dyn ChatApi>,
    request: ChatRequest,
    generation: u64,
    language: Language,
}

impl PendingTurn {
    /// The request that will be sent
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Perform the HTTP call
    pub async fn run(self) -> TurnReply {
        let result = self.api.chat(&self.request).await;
        TurnReply {
            generation: self.generation,
            language: self.language,
            result,
        }
    }
}

/// Outcome of a [`PendingTurn`], applied with [`Chat::finish_send`]
#[derive(Debug)]
pub struct TurnReply {
    generation: u64,
    language: Language,
    pub result: pgrkam_api::Result<ChatResponse>,
}

/// The conversation controller
pub struct Chat {
    config: ChatConfig,
    api: Arc<dyn ChatApi>,
    storage: Arc<dyn ScopedStorage>,
    messages: Vec<Message>,
    draft: String,
    loading: bool,
    error: ErrorState,
    session_id: Option<String>,
    language: Language,
    /// Bumped on reset so replies to abandoned turns are recognized
    generation: u64,
    speech: SpeechInput,
    transcript_tx: mpsc::UnboundedSender<String>,
    transcript_rx: mpsc::UnboundedReceiver<String>,
    event_tx: broadcast::Sender<ChatEvent>,
}

impl Chat {
    /// Create a controller, restoring language and session id from storage
    pub fn new(
        config: ChatConfig,
        api: Arc<dyn ChatApi>,
        storage: Arc<dyn ScopedStorage>,
        speech_factory: Arc<dyn RecognizerFactory>,
    ) -> Self {
        let language = storage
            .get(LANGUAGE_KEY)
            .and_then(|code| Language::from_code(&code))
            .unwrap_or(config.default_language);
        storage.set(LANGUAGE_KEY, language.code());

        let session_id = storage.get(SESSION_KEY).filter(|id| !id.is_empty());
        tracing::debug!(
            language = language.code(),
            has_session = session_id.is_some(),
            "restored chat preferences"
        );

        let (event_tx, _) = broadcast::channel(256);
        let (transcript_tx, transcript_rx) = mpsc::unbounded_channel();

        Self {
            config,
            api,
            storage,
            messages: vec![Message::greeting(language)],
            draft: String::new(),
            loading: false,
            error: ErrorState::default(),
            session_id,
            language,
            generation: 0,
            speech: SpeechInput::new(speech_factory, language),
            transcript_tx,
            transcript_rx,
            event_tx,
        }
    }

    /// Subscribe to controller events
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: ChatEvent) {
        let _ = self.event_tx.send(event);
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// The message log, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether a turn is outstanding
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> &ErrorState {
        &self.error
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Display strings for the active language
    pub fn strings(&self) -> &'static Translations {
        self.language.strings()
    }

    pub fn speech(&self) -> &SpeechInput {
        &self.speech
    }

    /// Whether the send affordance is enabled
    pub fn can_send(&self) -> bool {
        !self.loading && !self.draft.trim().is_empty()
    }

    /// Whether the draft may be edited
    pub fn input_enabled(&self) -> bool {
        !self.loading
    }

    /// Replace the draft
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Copy an example query into the draft
    pub fn use_example(&mut self, index: usize) -> bool {
        match EXAMPLE_QUERIES.get(index) {
            Some(query) => {
                self.draft = (*query).to_string();
                true
            }
            None => false,
        }
    }

    /// Switch language at the user's request
    pub fn set_language(&mut self, language: Language) {
        if language == self.language {
            return;
        }
        self.apply_language(language);

        // Nothing has been said yet; greet in the new language
        if self.messages.len() == 1 && self.messages[0].is_assistant() {
            self.messages[0] = Message::greeting(language);
        }
    }

    /// Flip to the other supported language
    pub fn toggle_language(&mut self) {
        self.set_language(self.language.toggle());
    }

    fn apply_language(&mut self, language: Language) {
        self.language = language;
        self.storage.set(LANGUAGE_KEY, language.code());
        self.speech.set_language(language);
        tracing::debug!(language = language.code(), "language changed");
        self.emit(ChatEvent::LanguageChanged { language });
    }

    /// Start speech capture, or stop it when already listening
    pub fn toggle_listening(&mut self) {
        if self.speech.listening() {
            self.speech.stop();
            return;
        }
        if !self.speech.supported() || self.loading {
            return;
        }

        let tx = self.transcript_tx.clone();
        self.speech
            .start(SpeechCallbacks::new().on_result(move |text, _is_final| {
                let _ = tx.send(text.to_string());
            }));
    }

    /// Apply queued transcripts to the draft. Returns true if the draft changed.
    pub fn pump_speech(&mut self) -> bool {
        let mut latest = None;
        while let Ok(text) = self.transcript_rx.try_recv() {
            latest = Some(text);
        }
        match latest {
            Some(text) if self.input_enabled() => {
                self.draft = text;
                true
            }
            _ => false,
        }
    }

    /// Submit the draft. Returns `None` when there is nothing to send or a
    /// turn is already outstanding.
    pub fn begin_send(&mut self) -> Option<PendingTurn> {
        if self.loading {
            return None;
        }
        let text = self.draft.trim();
        if text.is_empty() {
            return None;
        }
        let text = text.to_string();

        self.error.clear();

        let skip = self.messages.len().saturating_sub(self.config.history_window);
        let history = self.messages[skip..]
            .iter()
            .map(Message::to_history)
            .collect();

        let session_id = self
            .session_id
            .clone()
            .or_else(|| self.storage.get(SESSION_KEY))
            .filter(|id| !id.is_empty());

        let request = ChatRequest {
            message: text.clone(),
            language: self.language.code().to_string(),
            session_id,
            history,
        };

        let message = Message::user(text.clone());
        self.messages.push(message.clone());
        self.draft.clear();
        self.loading = true;

        tracing::debug!(generation = self.generation, "turn started");
        self.emit(ChatEvent::TurnStart { message: text });
        self.emit(ChatEvent::MessageAppended { message });

        Some(PendingTurn {
            api: Arc::clone(&self.api),
            request,
            generation: self.generation,
            language: self.language,
        })
    }

    /// Apply the reply of a turn started with [`Chat::begin_send`].
    ///
    /// Replies to turns abandoned by a reset are discarded.
    pub fn finish_send(&mut self, reply: TurnReply) {
        if reply.generation != self.generation {
            tracing::debug!(
                generation = reply.generation,
                current = self.generation,
                "discarding reply to abandoned turn"
            );
            return;
        }

        self.loading = false;

        let success = match reply.result {
            Ok(response) => {
                self.adopt_session(&response.session_id);

                if let Some(code) = response.preferred_language() {
                    match Language::from_code(code) {
                        Some(preferred) if preferred != self.language => {
                            self.apply_language(preferred);
                        }
                        Some(_) => {}
                        None => tracing::warn!("Ignoring unsupported preferred language '{}'", code),
                    }
                }

                self.append(Message::from_response(response));
                true
            }
            Err(e) => {
                tracing::error!(kind = e.kind().as_str(), "Chat turn failed: {}", e);
                self.error = ErrorState::from_error(&e);
                self.emit(ChatEvent::Error {
                    state: self.error.clone(),
                });
                self.append(Message::assistant(apology(reply.language.code())));
                false
            }
        };

        self.emit(ChatEvent::TurnEnd { success });
    }

    /// Submit the draft and wait for the reply. Returns false when nothing was sent.
    pub async fn send(&mut self) -> bool {
        let Some(turn) = self.begin_send() else {
            return false;
        };
        let reply = turn.run().await;
        self.finish_send(reply);
        true
    }

    /// Start over with a fresh greeting, forgetting the session but keeping the language
    pub fn reset(&mut self) {
        if self.speech.listening() {
            self.speech.stop();
        }
        while self.transcript_rx.try_recv().is_ok() {}

        self.generation += 1;
        self.loading = false;
        self.messages = vec![Message::greeting(self.language)];
        self.draft.clear();
        self.error.clear();
        self.session_id = None;
        self.storage.remove(SESSION_KEY);

        tracing::debug!("conversation reset");
        self.emit(ChatEvent::Reset);
    }

    fn adopt_session(&mut self, session_id: &str) {
        if session_id.is_empty() || self.session_id.as_deref() == Some(session_id) {
            return;
        }
        self.session_id = Some(session_id.to_string());
        self.storage.set(SESSION_KEY, session_id);
        self.emit(ChatEvent::SessionChanged {
            session_id: session_id.to_string(),
        });
    }

    fn append(&mut self, message: Message) {
        self.messages.push(message.clone());
        self.emit(ChatEvent::MessageAppended { message });
    }
}
