//! Colour palettes for the chat window.
//!
//! The two Catppuccin flavours pick from the published palette by name; the
//! high-contrast palette sticks to the 16 ANSI colours so it survives
//! terminals without truecolor.

use haui_chat_engine::ThemeChoice;
use ratatui::style::Color;

/// Colours the chat window draws with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Message body text.
    pub text: Color,
    /// Quoted text.
    pub subtext: Color,
    /// Placeholder, list markers, link targets, the more-below glyph.
    pub muted: Color,
    /// Title bar and code background.
    pub surface: Color,
    /// Title, headings and the send button.
    pub primary: Color,
    /// Code foreground.
    pub secondary: Color,
    pub link: Color,
    /// User marker and user text.
    pub user: Color,
    /// Bot avatar.
    pub bot: Color,
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::MOCHA
    }
}

/// `0xRRGGBB` to a truecolor value.
#[allow(clippy::cast_possible_truncation)]
const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

impl Theme {
    /// Catppuccin Mocha, the dark default.
    pub const MOCHA: Self = Self {
        text: hex(0x00cd_d6f4),
        subtext: hex(0x00ba_c2de),
        muted: hex(0x007f_849c),
        surface: hex(0x0031_3244),
        primary: hex(0x00cb_a6f7),
        secondary: hex(0x00f9_e2af),
        link: hex(0x0074_c7ec),
        user: hex(0x0089_b4fa),
        bot: hex(0x00a6_e3a1),
        border: hex(0x0058_5b70),
        border_focused: hex(0x00cb_a6f7),
    };

    /// Catppuccin Latte, for light terminals.
    pub const LATTE: Self = Self {
        text: hex(0x004c_4f69),
        subtext: hex(0x006c_6f85),
        muted: hex(0x008c_8fa1),
        surface: hex(0x00cc_d0da),
        primary: hex(0x0088_39ef),
        secondary: hex(0x00df_8e1d),
        link: hex(0x0020_9fb5),
        user: hex(0x001e_66f5),
        bot: hex(0x0040_a02b),
        border: hex(0x00ac_b0be),
        border_focused: hex(0x0088_39ef),
    };

    /// ANSI-only palette with maximum contrast.
    pub const HIGH_CONTRAST: Self = Self {
        text: Color::White,
        subtext: Color::Gray,
        muted: Color::Gray,
        surface: Color::Black,
        primary: Color::LightMagenta,
        secondary: Color::LightYellow,
        link: Color::LightCyan,
        user: Color::Yellow,
        bot: Color::LightGreen,
        border: Color::White,
        border_focused: Color::LightMagenta,
    };

    /// Palette for a configured theme.
    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Mocha => Self::MOCHA,
            ThemeChoice::Latte => Self::LATTE,
            ThemeChoice::HighContrast => Self::HIGH_CONTRAST,
        }
    }
}
