//! Scrollable list of rendered messages.
//!
//! ```text
//! ▎ Học phí năm nay là bao nhiêu?
//!
//! 🤖 Học phí năm học 2024-2025:
//!    • Đại trà: ...
//!    • Chất lượng cao: ...
//! ```

use haui_chat_engine::{normalize_newlines, Conversation, Message, Role};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::StatefulWidget,
};

use crate::text::{render_markdown, visual_width, wrap_lines, MarkdownStyles};
use crate::theme::{IconSet, Theme};

use super::scroll::ScrollState;

/// Render one message into gutter-prefixed lines of at most `width` cells.
///
/// Bot messages carry the avatar on their first line; user messages carry the
/// user marker on every line.
pub fn message_lines(
    message: &Message,
    width: usize,
    theme: &Theme,
    icons: &IconSet,
) -> Vec<Line<'static>> {
    let role = message.role();
    let (first_gutter, rest_gutter, gutter_style) = match role {
        Role::Bot => (
            format!("{} ", icons.bot_avatar()),
            " ".repeat(icons.bot_gutter_width()),
            Style::default().fg(theme.bot),
        ),
        Role::User => {
            let marker = format!("{} ", icons.user_marker());
            (marker.clone(), marker, Style::default().fg(theme.user))
        }
    };

    let body_width = width.saturating_sub(visual_width(&first_gutter)).max(1);
    let content = normalize_newlines(message.content());
    let styles = MarkdownStyles::new(theme, role);
    let mut body = wrap_lines(render_markdown(&content, &styles), body_width);
    if body.is_empty() {
        body.push(Line::default());
    }

    body.into_iter()
        .enumerate()
        .map(|(i, line)| {
            let gutter = if i == 0 {
                first_gutter.clone()
            } else {
                rest_gutter.clone()
            };
            let mut spans = Vec::with_capacity(line.spans.len() + 1);
            spans.push(Span::styled(gutter, gutter_style));
            spans.extend(line.spans);
            Line::from(spans)
        })
        .collect()
}

/// Scroll position plus a per-message line cache.
///
/// Messages never change once appended, so each one is rendered once per
/// width.
#[derive(Debug, Default)]
pub struct MessageListState {
    scroll: ScrollState,
    seen_len: usize,
    cache: Vec<Vec<Line<'static>>>,
    cache_width: usize,
}

impl MessageListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub(crate) fn scroll_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll.scroll_up(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll.scroll_down(lines);
    }

    /// Scroll one viewport toward older messages.
    pub fn page_up(&mut self) {
        let page = self.scroll.viewport().saturating_sub(1).max(1);
        self.scroll.scroll_up(page);
    }

    /// Scroll one viewport toward newer messages.
    pub fn page_down(&mut self) {
        let page = self.scroll.viewport().saturating_sub(1).max(1);
        self.scroll.scroll_down(page);
    }

    /// Advance the scroll animation. Returns `true` if a redraw is needed.
    pub fn tick(&mut self) -> bool {
        self.scroll.tick()
    }

    fn refresh_cache(
        &mut self,
        conversation: &Conversation,
        width: usize,
        theme: &Theme,
        icons: &IconSet,
    ) {
        if width != self.cache_width || self.cache.len() > conversation.len() {
            self.cache.clear();
            self.cache_width = width;
        }
        for message in conversation.iter().skip(self.cache.len()) {
            self.cache.push(message_lines(message, width, theme, icons));
        }
    }
}

/// The message list widget.
pub struct MessageList<'a> {
    conversation: &'a Conversation,
    theme: &'a Theme,
    icons: &'a IconSet,
}

impl<'a> MessageList<'a> {
    pub fn new(conversation: &'a Conversation, theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            conversation,
            theme,
            icons,
        }
    }
}

impl StatefulWidget for MessageList<'_> {
    type State = MessageListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;
        let height = area.height as usize;
        state.refresh_cache(self.conversation, width, self.theme, self.icons);

        // One blank line between messages.
        let total: usize =
            state.cache.iter().map(Vec::len).sum::<usize>() + state.cache.len().saturating_sub(1);
        state.scroll.set_layout(total, height);

        if self.conversation.len() != state.seen_len {
            state.seen_len = self.conversation.len();
            state.scroll.scroll_to_bottom();
        }

        let blank = Line::default();
        let visible = state
            .cache
            .iter()
            .enumerate()
            .flat_map(|(i, lines)| {
                let separator = (i > 0).then_some(&blank);
                separator.into_iter().chain(lines.iter())
            })
            .skip(state.scroll.position())
            .take(height);

        for (row, line) in (area.y..area.bottom()).zip(visible) {
            buf.set_line(area.x, row, line, area.width);
        }

        if !state.scroll.is_at_bottom() {
            let indicator = self.icons.more_below();
            let indicator_width = u16::try_from(visual_width(indicator)).unwrap_or(1);
            let x = area.right().saturating_sub(indicator_width);
            buf.set_string(
                x,
                area.bottom() - 1,
                indicator,
                Style::default().fg(self.theme.muted),
            );
        }
    }
}
