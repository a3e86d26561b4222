//! Widgets of the input area.

mod input_bar;
mod text_input;

pub use input_bar::{input_bar_layout, InputBar, INPUT_BAR_HEIGHT, PLACEHOLDER, SEND_LABEL};
pub use text_input::TextInputState;
