//! Title bar: brand, language toggle and reset hints

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

/// Brand title and subtitle with the controls available from the keyboard.
///
/// Purely a function of its inputs; the caller passes the strings of the
/// active language and the native name of the language a toggle switches to.
pub struct TitleBar<'a> {
    title: &'a str,
    subtitle: &'a str,
    toggle_label: &'a str,
    reset_label: &'a str,
    theme: &'a Theme,
}

impl<'a> TitleBar<'a> {
    pub fn new(title: &'a str, subtitle: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            subtitle,
            toggle_label: "",
            reset_label: "",
            theme,
        }
    }

    /// Name shown on the language toggle
    pub fn toggle(mut self, label: &'a str) -> Self {
        self.toggle_label = label;
        self
    }

    /// Text shown on the reset control
    pub fn reset(mut self, label: &'a str) -> Self {
        self.reset_label = label;
        self
    }

    fn controls(&self) -> Vec<Span<'a>> {
        let mut spans = Vec::new();
        if !self.toggle_label.is_empty() {
            spans.push(Span::styled("^T ", self.theme.dim_style()));
            spans.push(Span::styled(self.toggle_label, self.theme.accent_style()));
        }
        if !self.reset_label.is_empty() {
            if !spans.is_empty() {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled("^R ", self.theme.dim_style()));
            spans.push(Span::styled(self.reset_label, self.theme.accent_style()));
        }
        spans
    }
}

impl Widget for TitleBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut left = vec![Span::styled(self.title, self.theme.accent_bold())];
        if !self.subtitle.is_empty() {
            left.push(Span::styled(" · ", self.theme.dim_style()));
            left.push(Span::styled(self.subtitle, self.theme.dim_style()));
        }
        let left_width: usize = left.iter().map(|s| s.content.width()).sum();

        let controls = self.controls();
        let controls_width: usize = controls.iter().map(|s| s.content.width()).sum();

        let available = area.width as usize;
        let mut spans = left;
        if left_width + controls_width + 2 <= available {
            spans.push(Span::raw(" ".repeat(available - left_width - controls_width)));
            spans.extend(controls);
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
