//! pgrkam-tui: Terminal UI components
//!
//! Chat-screen widgets built on ratatui and crossterm. Widgets take plain
//! strings and slices so they stay independent of the conversation controller.

pub mod app;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use theme::Theme;
