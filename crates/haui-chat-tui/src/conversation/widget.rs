//! Chat window widget.
//!
//! Stacks the title bar, the framed message list and the input bar.

use haui_chat_engine::Conversation;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::text::truncate_to_width;
use crate::theme::{IconSet, Theme};
use crate::widgets::{input_bar_layout, InputBar, TextInputState, INPUT_BAR_HEIGHT};

use super::message_list::{MessageList, MessageListState};

/// Per-frame state of the chat window.
#[derive(Debug, Default)]
pub struct ChatWindowState {
    pub messages: MessageListState,
    send_button: Rect,
}

impl ChatWindowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the send button was drawn last frame, for mouse hit-testing.
    pub fn send_button(&self) -> Rect {
        self.send_button
    }
}

/// The whole chat window.
///
/// ```text
///  Chatbot - Đại Học Công Nghiệp Hà Nội (HaUI)
/// ╭────────────────────────────────────────────────╮
/// │▎ Xin chào                                      │
/// │                                                │
/// │🤖 Chào bạn! Mình có thể giúp gì?               │
/// ╰────────────────────────────────────────────────╯
/// ╭──────────────────────────────────────╮╭────────╮
/// │ Nhập tin nhắn...                     ││ ➤ Gửi  │
/// ╰──────────────────────────────────────╯╰────────╯
/// ```
pub struct ChatWindow<'a> {
    conversation: &'a Conversation,
    input: &'a TextInputState,
    title: &'a str,
    theme: &'a Theme,
    icons: &'a IconSet,
}

impl<'a> ChatWindow<'a> {
    pub fn new(
        conversation: &'a Conversation,
        input: &'a TextInputState,
        title: &'a str,
        theme: &'a Theme,
        icons: &'a IconSet,
    ) -> Self {
        Self {
            conversation,
            input,
            title,
            theme,
            icons,
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let width = (area.width as usize).saturating_sub(1);
        let title = truncate_to_width(self.title, width);
        Paragraph::new(Line::from(Span::styled(
            format!(" {title}"),
            Style::default()
                .fg(self.theme.primary)
                .add_modifier(Modifier::BOLD),
        )))
        .style(Style::default().bg(self.theme.surface))
        .render(area, buf);
    }
}

impl StatefulWidget for ChatWindow<'_> {
    type State = ChatWindowState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [header, body, input] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(INPUT_BAR_HEIGHT),
        ])
        .areas(area);

        self.render_header(header, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(self.icons.frame())
            .border_style(Style::default().fg(self.theme.border));
        let inner = block.inner(body);
        block.render(body, buf);
        MessageList::new(self.conversation, self.theme, self.icons).render(
            inner,
            buf,
            &mut state.messages,
        );

        let (_, button) = input_bar_layout(input, self.icons);
        state.send_button = button;
        InputBar::new(self.input, self.theme, self.icons).render(input, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use crate::theme::IconMode;
    use haui_chat_engine::{Message, DEFAULT_TITLE};

    #[test]
    fn test_layout_and_button_hit_area() {
        let mut conversation = Conversation::new();
        conversation.push(Message::user("Xin chào"));
        conversation.push(Message::bot("Chào bạn!"));
        let input = TextInputState::new();
        let theme = Theme::default();
        let icons = IconSet::new(IconMode::Ascii);

        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        let mut state = ChatWindowState::new();
        ChatWindow::new(&conversation, &input, DEFAULT_TITLE, &theme, &icons)
            .render(area, &mut buf, &mut state);
        let screen = buffer_to_string(&buf);

        assert!(screen.starts_with(&format!(" {DEFAULT_TITLE}")));
        assert!(screen.contains("| Xin chào"));
        assert!(screen.contains("[bot] Chào bạn!"));
        assert!(screen.contains("Nhập tin nhắn..."));

        let button = state.send_button();
        assert_eq!(button.y, 9);
        assert_eq!(button.height, INPUT_BAR_HEIGHT);
        assert_eq!(button.right(), 60);
    }

    #[test]
    fn test_narrow_title_is_truncated() {
        let conversation = Conversation::new();
        let input = TextInputState::new();
        let theme = Theme::default();
        let icons = IconSet::new(IconMode::Ascii);

        let area = Rect::new(0, 0, 20, 8);
        let mut buf = Buffer::empty(area);
        let mut state = ChatWindowState::new();
        ChatWindow::new(&conversation, &input, DEFAULT_TITLE, &theme, &icons)
            .render(area, &mut buf, &mut state);

        let first_row = buffer_to_string(&buf).lines().next().unwrap_or_default().to_string();
        assert!(first_row.starts_with(" Chatbot"));
        assert!(!first_row.contains("(HaUI)"));
    }
}
