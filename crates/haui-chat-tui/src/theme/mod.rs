//! Theme components for the chat widget.
//!
//! - [`Theme`] - Colour palettes (Catppuccin Mocha/Latte, ANSI high contrast)
//! - [`IconSet`] - Avatar, marker and frame glyphs with Nerd/Unicode/ASCII modes

mod colors;
mod icons;

pub use colors::Theme;
pub use icons::{IconMode, IconSet};
