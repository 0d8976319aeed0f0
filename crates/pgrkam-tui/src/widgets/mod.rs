//! Custom widgets for the TUI

pub mod chips;
pub mod input_box;
pub mod message_list;
pub mod notice;
pub mod spinner;
pub mod title_bar;

pub use chips::{ChipCursor, ExampleChips};
pub use input_box::InputBox;
pub use message_list::{Bubble, MessageList, Side};
pub use notice::{Notice, NoticeKind, Notices};
pub use spinner::Spinner;
pub use title_bar::TitleBar;
