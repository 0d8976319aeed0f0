//! Speech-to-text input
//!
//! [`SpeechInput`] hides the host's recognition capability behind a small
//! start/stop/listening/error surface. The capability itself is a
//! [`Recognizer`] built per language by a [`RecognizerFactory`]; a language
//! change rebuilds it because the language is fixed at construction.

use parking_lot::{Mutex, MutexGuard};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::error::SpeechError;
use crate::i18n::Language;

/// Recorded when a start failure carries no text of its own
const START_FAILED: &str = "Unable to start mic";
/// Recorded when capture ends abnormally without a specific code
const GENERIC_SPEECH_ERROR: &str = "speech-error";

type ResultCallback = Box<dyn FnMut(&str, bool) + Send>;
type EndCallback = Box<dyn FnMut() + Send>;

/// Callbacks for one capture
///
/// Callbacks run on whatever task delivers recognizer events and must not call
/// back into the [`SpeechInput`] that owns them.
#[derive(Default)]
pub struct SpeechCallbacks {
    on_result: Option<ResultCallback>,
    on_end: Option<EndCallback>,
}

impl SpeechCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the latest recognized segment and whether it is final
    pub fn on_result(mut self, f: impl FnMut(&str, bool) + Send + 'static) -> Self {
        self.on_result = Some(Box::new(f));
        self
    }

    /// Called once capture terminates, for any reason
    pub fn on_end(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }
}

#[derive(Default)]
struct Shared {
    /// Id of the current capture; events from older captures are dropped
    capture: u64,
    listening: bool,
    error: Option<String>,
    callbacks: SpeechCallbacks,
}

/// Event sink handed to a recognizer when capture starts
///
/// Each sink belongs to one capture. Once a newer capture has started, events
/// from this one are ignored.
#[derive(Clone)]
pub struct RecognitionEvents {
    shared: Arc<Mutex<Shared>>,
    capture: u64,
}

impl RecognitionEvents {
    fn current(&self) -> Option<MutexGuard<'_, Shared>> {
        let shared = self.shared.lock();
        if shared.capture == self.capture {
            Some(shared)
        } else {
            tracing::debug!(capture = self.capture, "dropping event from stale capture");
            None
        }
    }

    /// A segment was recognized
    pub fn result(&self, text: &str, is_final: bool) {
        let Some(mut shared) = self.current() else {
            return;
        };
        if let Some(cb) = shared.callbacks.on_result.as_mut() {
            cb(text, is_final);
        }
    }

    /// Capture failed; an `end` is still expected afterwards
    pub fn error(&self, code: &str) {
        let Some(mut shared) = self.current() else {
            return;
        };
        shared.error = Some(if code.is_empty() {
            GENERIC_SPEECH_ERROR.to_string()
        } else {
            code.to_string()
        });
        shared.listening = false;
    }

    /// Capture terminated
    pub fn end(&self) {
        let Some(mut shared) = self.current() else {
            return;
        };
        shared.listening = false;
        if let Some(cb) = shared.callbacks.on_end.as_mut() {
            cb();
        }
    }
}

/// A host speech-recognition capability, fixed to one language
pub trait Recognizer: Send {
    /// Begin capturing; events are delivered through `events`
    fn start(&mut self, events: RecognitionEvents) -> Result<(), SpeechError>;

    /// Request termination; the recognizer reports `end` when done
    fn stop(&mut self) -> Result<(), SpeechError>;
}

/// Builds recognizers; `None` means the capability is unavailable
pub trait RecognizerFactory: Send + Sync {
    fn create(&self, language_tag: &str) -> Option<Box<dyn Recognizer>>;
}

/// Factory for hosts without speech recognition
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSpeech;

impl RecognizerFactory for NoSpeech {
    fn create(&self, _language_tag: &str) -> Option<Box<dyn Recognizer>> {
        None
    }
}

/// Speech-input adapter used by the conversation controller
pub struct SpeechInput {
    factory: Arc<dyn RecognizerFactory>,
    recognizer: Option<Box<dyn Recognizer>>,
    language: Language,
    shared: Arc<Mutex<Shared>>,
}

impl SpeechInput {
    /// Create an adapter for a language
    pub fn new(factory: Arc<dyn RecognizerFactory>, language: Language) -> Self {
        let recognizer = factory.create(language.speech_tag());
        Self {
            factory,
            recognizer,
            language,
            shared: Arc::new(Mutex::new(Shared::default())),
        }
    }

    /// Adapter that is never supported
    pub fn unsupported() -> Self {
        Self::new(Arc::new(NoSpeech), Language::default())
    }

    /// Rebuild the recognizer for a new language
    pub fn set_language(&mut self, language: Language) {
        if language == self.language {
            return;
        }
        if self.listening() {
            self.stop();
        }
        self.language = language;
        self.recognizer = self.factory.create(language.speech_tag());
        tracing::debug!(
            tag = language.speech_tag(),
            supported = self.recognizer.is_some(),
            "speech recognizer rebuilt"
        );
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Whether a recognizer exists for the current language
    pub fn supported(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Whether capture is running
    pub fn listening(&self) -> bool {
        self.shared.lock().listening
    }

    /// Last recognizer or adapter failure
    pub fn error(&self) -> Option<String> {
        self.shared.lock().error.clone()
    }

    /// Begin capturing. A no-op when unsupported.
    pub fn start(&mut self, callbacks: SpeechCallbacks) {
        let Some(recognizer) = self.recognizer.as_mut() else {
            return;
        };

        let capture = {
            let mut shared = self.shared.lock();
            shared.capture += 1;
            shared.error = None;
            shared.callbacks = callbacks;
            shared.listening = true;
            shared.capture
        };

        let events = RecognitionEvents {
            shared: Arc::clone(&self.shared),
            capture,
        };
        if let Err(e) = recognizer.start(events) {
            let message = e.to_string();
            tracing::warn!("Speech capture failed to start: {}", message);
            let mut shared = self.shared.lock();
            shared.error = Some(if message.is_empty() {
                START_FAILED.to_string()
            } else {
                message
            });
            shared.listening = false;
        }
    }

    /// Request termination. Failures are ignored.
    pub fn stop(&mut self) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            if let Err(e) = recognizer.stop() {
                tracing::debug!("Ignoring speech stop failure: {}", e);
            }
        }
    }
}

/// Split a transcriber output line into text and finality.
///
/// Lines starting with `~` are interim hypotheses; anything else is final.
pub fn parse_transcript_line(line: &str) -> Option<(&str, bool)> {
    let line = line.trim_end();
    let (text, is_final) = match line.strip_prefix('~') {
        Some(rest) => (rest.trim_start(), false),
        None => (line, true),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some((text, is_final))
    }
}

/// Recognizer that runs an external transcriber program
///
/// The program records from the microphone and prints one recognition result
/// per line on stdout until it exits or is killed.
pub struct CommandRecognizer {
    program: PathBuf,
    args: Vec<String>,
    cancel: Option<CancellationToken>,
}

impl CommandRecognizer {
    /// `{lang}` in any argument is replaced by the language tag
    pub fn new(program: impl Into<PathBuf>, args: &[String], language_tag: &str) -> Self {
        Self {
            program: program.into(),
            args: args
                .iter()
                .map(|a| a.replace("{lang}", language_tag))
                .collect(),
            cancel: None,
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn is_running(&self) -> bool {
        self.cancel.as_ref().is_some_and(|c| !c.is_cancelled())
    }
}

impl Recognizer for CommandRecognizer {
    fn start(&mut self, events: RecognitionEvents) -> Result<(), SpeechError> {
        if self.is_running() {
            return Err(SpeechError::AlreadyStarted);
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| SpeechError::Start("no async runtime available".into()))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SpeechError::Start("transcriber has no stdout".into()))?;

        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());

        runtime.spawn(async move {
            let mut lines = BufReader::new(stdout).lines();

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        let _ = child.kill().await;
                        break;
                    }
                    line = lines.next_line() => {
                        match line {
                            Ok(Some(l)) => {
                                if let Some((text, is_final)) = parse_transcript_line(&l) {
                                    events.result(text, is_final);
                                }
                            }
                            Ok(None) => {
                                match child.wait().await {
                                    Ok(status) if !status.success() => {
                                        tracing::debug!("transcriber exited with {}", status);
                                        events.error(GENERIC_SPEECH_ERROR);
                                    }
                                    Err(e) => events.error(&e.to_string()),
                                    _ => {}
                                }
                                break;
                            }
                            Err(e) => {
                                events.error(&e.to_string());
                                let _ = child.kill().await;
                                break;
                            }
                        }
                    }
                }
            }

            cancel.cancel();
            events.end();
        });

        Ok(())
    }

    fn stop(&mut self) -> Result<(), SpeechError> {
        match self.cancel.take() {
            Some(cancel) => {
                cancel.cancel();
                Ok(())
            }
            None => Err(SpeechError::Stop("recognition has not started".into())),
        }
    }
}

impl Drop for CommandRecognizer {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }
}

/// Factory for [`CommandRecognizer`]; unsupported when the program cannot be found
#[derive(Debug, Clone)]
pub struct CommandRecognizerFactory {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizerFactory {
    /// Build from an argv: program first, then arguments
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl RecognizerFactory for CommandRecognizerFactory {
    fn create(&self, language_tag: &str) -> Option<Box<dyn Recognizer>> {
        match which::which(&self.program) {
            Ok(path) => Some(Box::new(CommandRecognizer::new(path, &self.args, language_tag))),
            Err(e) => {
                tracing::debug!("transcriber '{}' unavailable: {}", self.program, e);
                None
            }
        }
    }
}
