//! Glyphs for the avatar, markers and frames, per font capability.

use haui_chat_engine::IconChoice;
use ratatui::symbols::border;
use unicode_width::UnicodeWidthStr;

/// What the terminal font can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconMode {
    /// Nerd Font private-use glyphs.
    Nerd,
    #[default]
    Unicode,
    /// Plain ASCII, for bare consoles and tests.
    Ascii,
}

impl From<IconChoice> for IconMode {
    fn from(choice: IconChoice) -> Self {
        match choice {
            IconChoice::Nerd => IconMode::Nerd,
            IconChoice::Unicode => IconMode::Unicode,
            IconChoice::Ascii => IconMode::Ascii,
        }
    }
}

struct Glyphs {
    bot_avatar: &'static str,
    user_marker: &'static str,
    send: &'static str,
    more_below: &'static str,
    frame: border::Set,
    typing_frame: border::Set,
}

const NERD: Glyphs = Glyphs {
    bot_avatar: "󰚩",
    user_marker: "▎",
    send: "󰒊",
    more_below: "󰁅",
    frame: border::ROUNDED,
    typing_frame: border::THICK,
};

const UNICODE: Glyphs = Glyphs {
    bot_avatar: "🤖",
    user_marker: "▎",
    send: "➤",
    more_below: "↓",
    frame: border::ROUNDED,
    typing_frame: border::THICK,
};

const ASCII: Glyphs = Glyphs {
    bot_avatar: "[bot]",
    user_marker: "|",
    send: ">",
    more_below: "v",
    frame: border::PLAIN,
    typing_frame: border::DOUBLE,
};

/// The glyphs of one [`IconMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IconSet {
    mode: IconMode,
}

impl IconSet {
    pub fn new(mode: IconMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> IconMode {
        self.mode
    }

    fn glyphs(&self) -> &'static Glyphs {
        match self.mode {
            IconMode::Nerd => &NERD,
            IconMode::Unicode => &UNICODE,
            IconMode::Ascii => &ASCII,
        }
    }

    /// Drawn in the gutter on the first line of every bot message.
    pub fn bot_avatar(&self) -> &'static str {
        self.glyphs().bot_avatar
    }

    /// Drawn in the gutter on every line of a user message.
    pub fn user_marker(&self) -> &'static str {
        self.glyphs().user_marker
    }

    pub fn send(&self) -> &'static str {
        self.glyphs().send
    }

    /// Shown in the corner when the view is not at the newest message.
    pub fn more_below(&self) -> &'static str {
        self.glyphs().more_below
    }

    /// Frame of the conversation, the idle input field and the send button.
    pub fn frame(&self) -> border::Set {
        self.glyphs().frame
    }

    /// Frame of the input field while it holds text.
    pub fn typing_frame(&self) -> border::Set {
        self.glyphs().typing_frame
    }

    /// Display width of the bot gutter: avatar plus one space.
    pub fn bot_gutter_width(&self) -> usize {
        self.bot_avatar().width() + 1
    }
}
