//! Message list widget: the conversation as chat bubbles

use crate::theme::Theme;
use crate::widgets::spinner::frame_at;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

const ASSISTANT_MARKER: &str = "◆";
const USER_MARKER: &str = "●";

/// Which side of the screen a bubble sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left-aligned, bot marker
    Assistant,
    /// Right-aligned, user marker
    User,
}

/// A single message in the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub side: Side,
    pub content: String,
    /// Short caption next to the marker, usually the time
    pub label: Option<String>,
}

impl Bubble {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            side: Side::Assistant,
            content: content.into(),
            label: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            side: Side::User,
            content: content.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Widget for displaying a list of chat bubbles
pub struct MessageList<'a> {
    bubbles: &'a [Bubble],
    theme: &'a Theme,
    scroll: usize,
    thinking: Option<(&'a str, Instant)>,
}

impl<'a> MessageList<'a> {
    /// Create a new message list
    pub fn new(bubbles: &'a [Bubble], theme: &'a Theme) -> Self {
        Self {
            bubbles,
            theme,
            scroll: 0,
            thinking: None,
        }
    }

    /// Set scroll offset
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Show a trailing "thinking" bubble with a spinner.
    ///
    /// While thinking, no bubble is highlighted as newest.
    pub fn thinking(mut self, label: &'a str, since: Instant) -> Self {
        self.thinking = Some((label, since));
        self
    }

    /// Total rendered height for a given width
    pub fn content_height(&self, width: usize) -> usize {
        self.lines(width).len()
    }

    fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let newest = if self.thinking.is_none() {
            self.bubbles.len().checked_sub(1)
        } else {
            None
        };

        for (i, bubble) in self.bubbles.iter().enumerate() {
            lines.extend(self.render_bubble(bubble, width, newest == Some(i)));
        }

        if let Some((label, since)) = self.thinking {
            let thinking = Bubble::assistant(format!("{} {}", frame_at(since.elapsed()), label));
            lines.extend(self.render_bubble(&thinking, width, false));
        }

        lines
    }

    fn render_bubble(&self, bubble: &Bubble, width: usize, newest: bool) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if width < 4 {
            return lines;
        }

        let bubble_width = (width * 4 / 5).max(12).min(width);
        let text_width = bubble_width.saturating_sub(2).max(1);

        let side_color = match bubble.side {
            Side::Assistant => self.theme.assistant,
            Side::User => self.theme.user,
        };
        let bar_style = if newest {
            self.theme.accent_bold()
        } else {
            Style::default().fg(side_color)
        };
        let text_style = if newest {
            self.theme.base_style().add_modifier(Modifier::BOLD)
        } else {
            self.theme.base_style()
        };
        let marker_style = Style::default().fg(side_color).add_modifier(Modifier::BOLD);

        let label = bubble.label.clone().unwrap_or_default();
        match bubble.side {
            Side::Assistant => {
                lines.push(Line::from(vec![
                    Span::styled(format!("{} ", ASSISTANT_MARKER), marker_style),
                    Span::styled(label, self.theme.dim_style()),
                ]));
            }
            Side::User => {
                let header_width = label.width() + 1 + USER_MARKER.width();
                lines.push(Line::from(vec![
                    Span::raw(" ".repeat(width.saturating_sub(header_width))),
                    Span::styled(label, self.theme.dim_style()),
                    Span::styled(format!(" {}", USER_MARKER), marker_style),
                ]));
            }
        }

        for segment in textwrap::wrap(&bubble.content, text_width) {
            let segment = segment.into_owned();
            match bubble.side {
                Side::Assistant => lines.push(Line::from(vec![
                    Span::styled("│ ", bar_style),
                    Span::styled(segment, text_style),
                ])),
                Side::User => {
                    let pad = width.saturating_sub(segment.width() + 2);
                    lines.push(Line::from(vec![
                        Span::raw(" ".repeat(pad)),
                        Span::styled(segment, text_style),
                        Span::styled(" │", bar_style),
                    ]));
                }
            }
        }

        lines.push(Line::from(""));
        lines
    }
}

impl Widget for MessageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let visible: Vec<Line> = self
            .lines(area.width as usize)
            .into_iter()
            .skip(self.scroll)
            .take(area.height as usize)
            .collect();

        Paragraph::new(visible).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
    }

    #[test]
    fn test_bubble_sides() {
        let theme = Theme::dark();
        let bubbles = vec![Bubble::assistant("Hello"), Bubble::user("jobs")];
        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        MessageList::new(&bubbles, &theme).render(area, &mut buf);

        assert!(row(&buf, 0).starts_with(ASSISTANT_MARKER));
        assert!(row(&buf, 1).starts_with("│ Hello"));
        assert!(row(&buf, 3).trim_end().ends_with(USER_MARKER));
        assert!(row(&buf, 4).ends_with("jobs │"));
    }

    #[test]
    fn test_height_counts_wrapped_lines() {
        let theme = Theme::dark();
        let bubbles = vec![Bubble::assistant("one two three four five six seven eight")];
        let list = MessageList::new(&bubbles, &theme);
        // header + wrapped body + spacer
        assert!(list.content_height(20) > 3);
        assert_eq!(list.content_height(200), 3);
    }

    #[test]
    fn test_thinking_bubble_is_appended() {
        let theme = Theme::dark();
        let bubbles = vec![Bubble::user("jobs")];
        let list = MessageList::new(&bubbles, &theme).thinking("Searching...", Instant::now());
        let lines = list.lines(40);
        assert_eq!(lines.len(), 6);
        let body: String = lines[4].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(body.contains("Searching..."));
    }

    #[test]
    fn test_newest_is_highlighted_only_when_idle() {
        let theme = Theme::dark();
        let bubbles = vec![Bubble::assistant("a"), Bubble::assistant("b")];

        let idle = MessageList::new(&bubbles, &theme).lines(40);
        assert_eq!(idle[4].spans[0].style, theme.accent_bold());
        assert_ne!(idle[1].spans[0].style, theme.accent_bold());

        let busy = MessageList::new(&bubbles, &theme)
            .thinking("...", Instant::now())
            .lines(40);
        assert_ne!(busy[4].spans[0].style, theme.accent_bold());
    }
}
