//! Per-speaker styles for message bodies.

use haui_chat_engine::Role;
use ratatui::style::{Modifier, Style};

use crate::theme::Theme;

/// How each markdown element looks inside one speaker's messages.
#[derive(Debug, Clone)]
pub struct MarkdownStyles {
    /// Plain body text. User messages take the user accent.
    pub text: Style,
    pub heading: Style,
    pub strong: Style,
    pub emphasis: Style,
    pub strikethrough: Style,
    /// Inline code and fenced blocks.
    pub code: Style,
    pub link: Style,
    /// The ` (url)` suffix shown after link text.
    pub link_target: Style,
    pub quote: Style,
    /// Bullets, numbers, checkboxes, rules and table separators.
    pub marker: Style,
}

impl MarkdownStyles {
    pub fn new(theme: &Theme, role: Role) -> Self {
        let text = match role {
            Role::Bot => theme.text,
            Role::User => theme.user,
        };
        let bold = Style::default().add_modifier(Modifier::BOLD);

        Self {
            text: Style::default().fg(text),
            heading: bold.fg(theme.primary),
            strong: bold,
            emphasis: Style::default().add_modifier(Modifier::ITALIC),
            strikethrough: Style::default().add_modifier(Modifier::CROSSED_OUT),
            code: Style::default().fg(theme.secondary).bg(theme.surface),
            link: Style::default()
                .fg(theme.link)
                .add_modifier(Modifier::UNDERLINED),
            link_target: Style::default().fg(theme.muted),
            quote: Style::default()
                .fg(theme.subtext)
                .add_modifier(Modifier::ITALIC),
            marker: Style::default().fg(theme.muted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_colour_follows_speaker() {
        let theme = Theme::default();
        let user = MarkdownStyles::new(&theme, Role::User);
        let bot = MarkdownStyles::new(&theme, Role::Bot);

        assert_eq!(user.text.fg, Some(theme.user));
        assert_eq!(bot.text.fg, Some(theme.text));
    }

    #[test]
    fn test_only_body_colour_differs_between_speakers() {
        let theme = Theme::default();
        let user = MarkdownStyles::new(&theme, Role::User);
        let bot = MarkdownStyles::new(&theme, Role::Bot);

        assert_eq!(user.heading, bot.heading);
        assert_eq!(user.code, bot.code);
        assert_eq!(user.link, bot.link);
    }

    #[test]
    fn test_heading_is_bold_accent() {
        let theme = Theme::default();
        let styles = MarkdownStyles::new(&theme, Role::Bot);

        assert_eq!(styles.heading.fg, Some(theme.primary));
        assert!(styles.heading.add_modifier.contains(Modifier::BOLD));
    }
}
