//! TUI implementation for pgrkam

use crossterm::event::{Event, EventStream};
use futures::{FutureExt, StreamExt, future::BoxFuture};
use pgrkam_chat::{Chat, EXAMPLE_QUERIES, Message, PendingTurn, TurnReply, chip_label};
use pgrkam_tui::{
    App, Theme,
    input::{Action, event_to_action},
    widgets::{
        Bubble, ChipCursor, ExampleChips, InputBox, MessageList, Notice, Notices, Spinner,
        TitleBar,
    },
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use std::io;
use std::time::Instant;

/// What the event loop should do after an action
pub enum Flow {
    Continue,
    /// A turn was submitted; poll it
    Send(PendingTurn),
    /// The conversation was reset; drop any turn in flight
    Reset,
    Quit,
}

/// TUI application state
pub struct TuiState {
    chat: Chat,
    /// Draft editor, mirrored into the controller after every edit
    input: InputBox,
    chips: ChipCursor,
    chip_labels: Vec<String>,
    /// Scroll position; `usize::MAX` means stick to the bottom
    scroll: usize,
    seen_messages: usize,
    theme: Theme,
    spinner_start: Instant,
}

impl TuiState {
    pub fn new(chat: Chat, theme: Theme) -> Self {
        let mut state = Self {
            seen_messages: chat.messages().len(),
            chat,
            input: InputBox::new(),
            chips: ChipCursor::default(),
            chip_labels: EXAMPLE_QUERIES.iter().map(|q| chip_label(q)).collect(),
            scroll: usize::MAX,
            theme,
            spinner_start: Instant::now(),
        };
        state.sync_from_chat();
        state
    }

    fn scroll_to_bottom(&mut self) {
        // Resolved during render based on content height
        self.scroll = usize::MAX;
    }

    /// Pull controller state into the widgets
    pub fn sync_from_chat(&mut self) {
        let strings = self.chat.strings();
        self.input.set_placeholder(strings.placeholder);
        self.input.set_send_label(strings.send);
        self.input.set_enabled(self.chat.input_enabled());
        if self.input.content() != self.chat.draft() {
            self.input.set_content(self.chat.draft());
        }

        let count = self.chat.messages().len();
        if count != self.seen_messages {
            self.seen_messages = count;
            self.scroll_to_bottom();
        }
    }

    /// Called on every tick
    pub fn tick(&mut self) {
        if self.chat.pump_speech() {
            self.chips.clear();
        }
        self.sync_from_chat();
    }

    /// Apply the reply of the turn in flight
    pub fn finish_turn(&mut self, reply: TurnReply) {
        self.chat.finish_send(reply);
        self.sync_from_chat();
    }

    /// Handle keyboard action
    pub fn handle_action(&mut self, action: Action, width: u16) -> Flow {
        let flow = match action {
            Action::Quit => return Flow::Quit,
            Action::Escape => {
                if self.chat.speech().listening() {
                    self.chat.toggle_listening();
                }
                Flow::Continue
            }
            Action::Submit => match self.chat.begin_send() {
                Some(turn) => {
                    self.spinner_start = Instant::now();
                    self.chips.clear();
                    Flow::Send(turn)
                }
                None => Flow::Continue,
            },
            Action::Reset => {
                self.chat.reset();
                self.chips.clear();
                self.scroll_to_bottom();
                Flow::Reset
            }
            Action::ToggleLanguage => {
                self.chat.toggle_language();
                Flow::Continue
            }
            Action::ToggleSpeech => {
                self.chat.toggle_listening();
                Flow::Continue
            }
            Action::Tab | Action::BackTab if self.chat.input_enabled() => {
                let selected = if action == Action::Tab {
                    self.chips.next(EXAMPLE_QUERIES.len())
                } else {
                    self.chips.prev(EXAMPLE_QUERIES.len())
                };
                if let Some(i) = selected {
                    self.chat.use_example(i);
                }
                Flow::Continue
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                Flow::Continue
            }
            Action::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                Flow::Continue
            }
            other => {
                if self.input.handle_action(&other, width) {
                    self.chat.set_draft(self.input.content());
                    self.chips.clear();
                }
                Flow::Continue
            }
        };
        self.sync_from_chat();
        flow
    }

    fn bubbles(&self) -> Vec<Bubble> {
        self.chat
            .messages()
            .iter()
            .map(|m| {
                let bubble = if m.is_user() {
                    Bubble::user(m.content.as_str())
                } else {
                    Bubble::assistant(m.content.as_str())
                };
                match time_label(m) {
                    Some(label) => bubble.with_label(label),
                    None => bubble,
                }
            })
            .collect()
    }

    fn notices(&self) -> Vec<Notice> {
        let strings = self.chat.strings();
        let mut notices = Vec::new();
        let error = self.chat.error();
        if error.has_error {
            notices.push(Notice::error(format!("⚠ {}", error.message)));
        }
        let speech = self.chat.speech();
        if !speech.supported() {
            notices.push(Notice::warning(voice_unavailable(strings.voice_error)));
        }
        if let Some(e) = speech.error() {
            notices.push(Notice::error(format!("{} {}", strings.mic_error, e)));
        }
        notices
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();
        let strings = self.chat.strings();
        let notices = self.notices();
        let examples = strings.examples();
        let chips_height = ExampleChips::new(strings.tip, &examples, &self.chip_labels, &self.theme)
            .height(size.width);

        // Layout: title (1), messages (flex), status (1), input (3), chips, notices
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(chips_height),
                Constraint::Length(notices.len() as u16),
            ])
            .split(size);

        let toggle = self.chat.language().toggle().native_name();
        frame.render_widget(
            TitleBar::new(strings.title, strings.subtitle, &self.theme)
                .toggle(toggle)
                .reset(strings.reset),
            chunks[0],
        );

        self.render_messages(frame, chunks[1]);
        self.render_status(frame, chunks[2]);
        self.input.render(chunks[3], frame.buffer_mut(), &self.theme);
        frame.render_widget(
            ExampleChips::new(strings.tip, &examples, &self.chip_labels, &self.theme)
                .selected(self.chips.selected()),
            chunks[4],
        );
        frame.render_widget(Notices::new(&notices, &self.theme), chunks[5]);
    }

    fn render_messages(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 || inner.width < 2 {
            return;
        }

        let bubbles = self.bubbles();
        let mut list = MessageList::new(&bubbles, &self.theme);
        if self.chat.is_loading() {
            list = list.thinking(self.chat.strings().thinking, self.spinner_start);
        }

        // Leave a column for the scrollbar
        let text_area = Rect {
            width: inner.width - 1,
            ..inner
        };
        let content_height = list.content_height(text_area.width as usize);
        let max_scroll = content_height.saturating_sub(text_area.height as usize);
        self.scroll = self.scroll.min(max_scroll);

        frame.render_widget(list.scroll(self.scroll), text_area);

        if content_height > text_area.height as usize {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");

            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll);

            frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
        }

        // Keep following new content once the user is back at the bottom
        if self.scroll == max_scroll {
            self.scroll = usize::MAX;
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let strings = self.chat.strings();
        if self.chat.is_loading() {
            let spinner =
                Spinner::new(strings.thinking, &self.theme).with_start_time(self.spinner_start);
            frame.render_widget(spinner, area);
            return;
        }

        let speech = self.chat.speech();
        let mic = if !speech.supported() {
            Span::styled(format!("^S {}", strings.speak), self.theme.dim_style())
        } else if speech.listening() {
            Span::styled(format!("^S ■ {}", strings.stop), self.theme.accent_bold())
        } else {
            Span::styled(format!("^S 🎤 {}", strings.speak), self.theme.accent_style())
        };
        let line = Line::from(vec![
            mic,
            Span::styled("  │  Tab examples  PgUp/PgDn scroll  ^C quit", self.theme.dim_style()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Unsupported-voice banner with a hint on enabling a transcriber
fn voice_unavailable(voice_error: &str) -> String {
    format!(
        "{} · set --speech-command or [speech] command in config",
        voice_error
    )
}

/// Local time of day for a message, when it carries a parseable timestamp
fn time_label(message: &Message) -> Option<String> {
    let ts = message.timestamp.as_deref()?;
    let parsed = chrono::DateTime::parse_from_rfc3339(ts).ok()?;
    Some(
        parsed
            .with_timezone(&chrono::Local)
            .format("%H:%M")
            .to_string(),
    )
}

/// Step of the event loop, produced by one `select!` round
enum Step {
    Reply(TurnReply),
    Terminal(Option<io::Result<Event>>),
    Tick,
}

async fn next_reply(pending: &mut Option<BoxFuture<'static, TurnReply>>) -> TurnReply {
    match pending {
        Some(turn) => turn.await,
        None => std::future::pending().await,
    }
}

/// Run the TUI application
pub async fn run_tui(chat: Chat, theme: Theme) -> anyhow::Result<()> {
    let mut app = App::new()?.with_theme(theme);
    let mut state = TuiState::new(chat, app.theme().clone());

    let mut event_stream = EventStream::new();
    let mut tick_interval = tokio::time::interval(app.tick_rate());

    // At most one turn is in flight; dropping it abandons the request
    let mut pending: Option<BoxFuture<'static, TurnReply>> = None;

    loop {
        app.draw(|frame| state.render(frame))?;
        let width = app.width()?;

        let step = tokio::select! {
            reply = next_reply(&mut pending) => Step::Reply(reply),
            event = event_stream.next() => Step::Terminal(event),
            _ = tick_interval.tick() => Step::Tick,
        };

        match step {
            Step::Reply(reply) => {
                pending = None;
                state.finish_turn(reply);
            }
            Step::Terminal(Some(Ok(event))) => {
                if let Some(action) = event_to_action(event) {
                    match state.handle_action(action, width) {
                        Flow::Continue => {}
                        Flow::Send(turn) => pending = Some(turn.run().boxed()),
                        Flow::Reset => pending = None,
                        Flow::Quit => break,
                    }
                }
            }
            Step::Terminal(Some(Err(e))) => {
                return Err(anyhow::anyhow!("Event error: {}", e));
            }
            Step::Terminal(None) => break,
            Step::Tick => state.tick(),
        }
    }

    Ok(())
}
