//! Conversation area of the chat window.
//!
//! Contains:
//! - The message list with avatar gutters and smooth auto-scroll
//! - The composite window that adds the title bar and input bar

mod message_list;
mod scroll;
mod widget;

pub use message_list::{message_lines, MessageList, MessageListState};
pub use scroll::ScrollState;
pub use widget::{ChatWindow, ChatWindowState};
