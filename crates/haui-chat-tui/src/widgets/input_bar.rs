//! Input bar: the text field plus the send button.
//!
//! The field never locks while requests are outstanding; every submit is
//! independent.
//!
//! ```text
//! ╭──────────────────────────────────────╮╭────────╮
//! │ Nhập tin nhắn...                     ││ ➤ Gửi  │
//! ╰──────────────────────────────────────╯╰────────╯
//! ```

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::text::{char_width, visual_width};
use crate::theme::{IconSet, Theme};

use super::TextInputState;

/// Placeholder shown while the field is empty.
pub const PLACEHOLDER: &str = "Nhập tin nhắn...";

/// Label of the send button.
pub const SEND_LABEL: &str = "Gửi";

/// Height of the input bar including borders.
pub const INPUT_BAR_HEIGHT: u16 = 3;

/// Text drawn inside the send button.
fn button_text(icons: &IconSet) -> String {
    format!("{} {SEND_LABEL}", icons.send())
}

/// Split the bar into the text field and the send button.
#[allow(clippy::cast_possible_truncation)]
pub fn input_bar_layout(area: Rect, icons: &IconSet) -> (Rect, Rect) {
    // Label plus one cell of padding each side plus two borders.
    let button_width = (visual_width(&button_text(icons)) + 4) as u16;
    let [field, button] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(button_width)]).areas(area);
    (field, button)
}

/// The input bar widget.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    icons: &'a IconSet,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState, theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            input,
            theme,
            icons,
        }
    }

    /// Build the visible part of the field, scrolled so the cursor stays in
    /// view.
    fn field_line(&self, width: usize) -> Line<'static> {
        let text_style = Style::default().fg(self.theme.text);
        let cursor_style = Style::default()
            .fg(self.theme.text)
            .add_modifier(Modifier::REVERSED);

        if self.input.is_empty() {
            return Line::from(vec![
                Span::styled(" ", cursor_style),
                Span::styled(PLACEHOLDER, Style::default().fg(self.theme.muted)),
            ]);
        }

        let chars: Vec<char> = self.input.content().chars().collect();
        let cursor = self.input.cursor().min(chars.len());

        // Walk back from the cursor until the window is full. One cell is
        // kept for the cursor itself.
        let mut start = cursor;
        let mut used = 1;
        while start > 0 {
            let w = char_width(chars[start - 1]);
            if used + w > width {
                break;
            }
            used += w;
            start -= 1;
        }

        let before: String = chars[start..cursor].iter().collect();
        let mut spans = vec![Span::styled(before, text_style)];

        if let Some(&under) = chars.get(cursor) {
            spans.push(Span::styled(under.to_string(), cursor_style));
            let after: String = chars[cursor + 1..].iter().collect();
            spans.push(Span::styled(after, text_style));
        } else {
            spans.push(Span::styled(" ", cursor_style));
        }

        Line::from(spans)
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (field_area, button_area) = input_bar_layout(area, self.icons);

        let border_set = if self.input.is_empty() {
            self.icons.frame()
        } else {
            self.icons.typing_frame()
        };

        let field_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border_set)
            .border_style(Style::default().fg(self.theme.border_focused));
        let inner = field_block.inner(field_area);
        field_block.render(field_area, buf);
        Paragraph::new(self.field_line(inner.width as usize)).render(inner, buf);

        let button_block = Block::default()
            .borders(Borders::ALL)
            .border_set(self.icons.frame())
            .border_style(Style::default().fg(self.theme.primary));
        Paragraph::new(format!(" {}", button_text(self.icons)))
            .style(
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .block(button_block)
            .render(button_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use crate::theme::IconMode;

    fn render(input: &TextInputState, width: u16) -> String {
        let theme = Theme::default();
        let icons = IconSet::new(IconMode::Ascii);
        let area = Rect::new(0, 0, width, INPUT_BAR_HEIGHT);
        let mut buf = Buffer::empty(area);
        InputBar::new(input, &theme, &icons).render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_layout_reserves_button() {
        let icons = IconSet::new(IconMode::Ascii);
        let area = Rect::new(0, 10, 40, INPUT_BAR_HEIGHT);
        let (field, button) = input_bar_layout(area, &icons);

        // "> Gửi" is 5 cells wide.
        assert_eq!(button.width, 9);
        assert_eq!(field.width, 31);
        assert_eq!(button.x, 31);
        assert_eq!(button.y, 10);
    }

    #[test]
    fn test_empty_shows_placeholder_and_button() {
        let screen = render(&TextInputState::new(), 40);
        assert!(screen.contains(PLACEHOLDER));
        assert!(screen.contains("> Gửi"));
    }

    #[test]
    fn test_typed_text_replaces_placeholder() {
        let mut input = TextInputState::new();
        input.insert_str("Học phí bao nhiêu?");
        let screen = render(&input, 40);
        assert!(screen.contains("Học phí bao nhiêu?"));
        assert!(!screen.contains(PLACEHOLDER));
    }

    #[test]
    fn test_long_text_scrolls_to_cursor() {
        let mut input = TextInputState::new();
        input.insert_str("abcdefghijklmnopqrstuvwxyz0123456789");
        // Field is 20 wide, 18 inside the borders: 17 chars plus the cursor.
        let screen = render(&input, 29);
        assert!(screen.contains("tuvwxyz0123456789"));
        assert!(!screen.contains("abc"));
    }

    #[test]
    fn test_cursor_at_start_shows_head() {
        let mut input = TextInputState::new();
        input.insert_str("abcdefghijklmnopqrstuvwxyz0123456789");
        input.move_home();
        let screen = render(&input, 29);
        assert!(screen.contains("abcdefghijklmnopqr"));
    }
}
