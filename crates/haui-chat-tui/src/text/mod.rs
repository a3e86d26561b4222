//! Text rendering utilities.
//!
//! - [`render_markdown`] - Render markdown to styled ratatui Lines
//! - [`MarkdownStyles`] - Per-speaker styles for message bodies
//! - [`wrap_lines`] - Wrap styled lines to the pane width
//! - [`visual_width`], [`truncate_to_width`] - Cell width helpers

mod markdown;
mod styles;
mod width;
mod wrap;

pub use markdown::render_markdown;
pub use styles::MarkdownStyles;
pub use width::{char_width, truncate_to_width, visual_width};
pub use wrap::wrap_lines;
