//! Color theme support

use ratatui::style::{Color, Modifier, Style};

/// Color theme for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Primary text color
    pub fg: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Brand accent (title, focus, newest bubble)
    pub accent: Color,
    /// Request error banner
    pub error: Color,
    /// Voice and microphone notices
    pub warning: Color,
    /// Border color
    pub border: Color,
    /// Highlighted chip background
    pub selection_bg: Color,
    /// User bubble marker
    pub user: Color,
    /// Assistant bubble marker
    pub assistant: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            dim: Color::DarkGray,
            accent: Color::Rgb(249, 115, 22),
            error: Color::Red,
            warning: Color::Rgb(245, 158, 11),
            border: Color::DarkGray,
            selection_bg: Color::Rgb(124, 45, 18),
            user: Color::Rgb(251, 146, 60),
            assistant: Color::Rgb(253, 186, 116),
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            dim: Color::Gray,
            accent: Color::Rgb(234, 88, 12),
            error: Color::Red,
            warning: Color::Rgb(180, 120, 0),
            border: Color::Gray,
            selection_bg: Color::Rgb(255, 237, 213),
            user: Color::Rgb(194, 65, 12),
            assistant: Color::Rgb(154, 52, 18),
        }
    }

    /// Look up a theme by name ("dark" or "light")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Get base style
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get dimmed style
    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    /// Get accent style
    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Get bold accent style
    pub fn accent_bold(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Get error style
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Get warning style
    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Get border style
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for a highlighted chip
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }
}
