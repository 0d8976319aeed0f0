//! One-line notice banners

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// How loud a notice is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A failed request
    Error,
    /// Voice input problems
    Warning,
}

/// A transient banner above the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    fn style(&self, theme: &Theme) -> Style {
        match self.kind {
            NoticeKind::Error => theme.error_style().add_modifier(Modifier::BOLD),
            NoticeKind::Warning => theme.warning_style(),
        }
    }

    /// Render with the theme colors for its kind
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let line = Line::from(Span::styled(self.text.as_str(), self.style(theme)));
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Stack of notices, one per line
pub struct Notices<'a> {
    notices: &'a [Notice],
    theme: &'a Theme,
}

impl<'a> Notices<'a> {
    pub fn new(notices: &'a [Notice], theme: &'a Theme) -> Self {
        Self { notices, theme }
    }
}

impl Widget for Notices<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (i, notice) in self.notices.iter().enumerate().take(area.height as usize) {
            let row = Rect::new(area.x, area.y + i as u16, area.width, 1);
            notice.render(row, buf, self.theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_stack_with_kind_colors() {
        let theme = Theme::dark();
        let notices = vec![
            Notice::error("Server error: 500"),
            Notice::warning("voice unavailable"),
        ];
        let area = Rect::new(0, 0, 30, 2);
        let mut buf = Buffer::empty(area);
        Notices::new(&notices, &theme).render(area, &mut buf);

        assert_eq!(buf[(0u16, 0u16)].symbol(), "S");
        assert_eq!(buf[(0u16, 0u16)].fg, theme.error);
        assert_eq!(buf[(0u16, 1u16)].symbol(), "v");
        assert_eq!(buf[(0u16, 1u16)].fg, theme.warning);
    }

    #[test]
    fn test_extra_notices_are_clipped() {
        let theme = Theme::dark();
        let notices = vec![Notice::error("a"), Notice::error("b")];
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        Notices::new(&notices, &theme).render(area, &mut buf);
        assert_eq!(buf[(0u16, 0u16)].symbol(), "a");
    }
}
