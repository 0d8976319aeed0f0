//! Example chips: the tip line and one-click canned queries

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

const CHIP_GAP: usize = 1;

/// Which chip, if any, is highlighted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChipCursor {
    selected: Option<usize>,
}

impl ChipCursor {
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Highlight the next chip, wrapping around
    pub fn next(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % len,
            None => 0,
        });
        self.selected
    }

    /// Highlight the previous chip, wrapping around
    pub fn prev(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

/// Tip line plus a row (or rows) of example chips
pub struct ExampleChips<'a> {
    tip: &'a str,
    examples: &'a [&'a str],
    chips: &'a [String],
    selected: Option<usize>,
    theme: &'a Theme,
}

impl<'a> ExampleChips<'a> {
    pub fn new(
        tip: &'a str,
        examples: &'a [&'a str],
        chips: &'a [String],
        theme: &'a Theme,
    ) -> Self {
        Self {
            tip,
            examples,
            chips,
            selected: None,
            theme,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    /// Chip indices per row when laid out greedily in `width` columns
    fn rows(&self, width: usize) -> Vec<Vec<usize>> {
        let mut rows: Vec<Vec<usize>> = Vec::new();
        let mut used = 0;
        for (i, chip) in self.chips.iter().enumerate() {
            let w = chip_width(chip);
            match rows.last_mut() {
                Some(row) if used + CHIP_GAP + w <= width => {
                    row.push(i);
                    used += CHIP_GAP + w;
                }
                _ => {
                    rows.push(vec![i]);
                    used = w;
                }
            }
        }
        rows
    }

    /// Lines needed to render at `width`
    pub fn height(&self, width: u16) -> u16 {
        1 + self.rows(width as usize).len() as u16
    }
}

fn chip_width(label: &str) -> usize {
    label.width() + 4
}

impl Widget for ExampleChips<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut tip = vec![Span::styled(self.tip, self.theme.dim_style())];
        for example in self.examples {
            tip.push(Span::raw(" "));
            tip.push(Span::styled(*example, self.theme.dim_style()));
            tip.push(Span::styled(" ·", self.theme.border_style()));
        }
        if !self.examples.is_empty() {
            tip.pop();
        }
        buf.set_line(area.x, area.y, &Line::from(tip), area.width);

        for (row_index, row) in self.rows(area.width as usize).iter().enumerate() {
            let y = area.y + 1 + row_index as u16;
            if y >= area.y + area.height {
                break;
            }
            let mut spans = Vec::new();
            for (n, &i) in row.iter().enumerate() {
                if n > 0 {
                    spans.push(Span::raw(" ".repeat(CHIP_GAP)));
                }
                let style = if self.selected == Some(i) {
                    self.theme.selected_style()
                } else {
                    self.theme.accent_style()
                };
                spans.push(Span::styled(format!("[ {} ]", self.chips[i]), style));
            }
            buf.set_line(area.x, y, &Line::from(spans), area.width);
        }
    }
}
