//! Markdown to styled lines for message bodies.
//!
//! Bot answers are mostly short paragraphs, bullet lists, the odd table of
//! fees and links to the university site. Top-level blocks are separated by
//! one blank line and nothing trails the last block. Link targets are shown
//! after the link text since the terminal cannot follow them.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use super::styles::MarkdownStyles;

const RULE: &str = "────────";
const QUOTE_BAR: &str = "│ ";
const CELL_SEPARATOR: &str = " │ ";
const CODE_INDENT: &str = "  ";

/// Render markdown into unwrapped lines.
pub fn render_markdown(input: &str, styles: &MarkdownStyles) -> Vec<Line<'static>> {
    let options =
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS | Options::ENABLE_TABLES;
    let mut writer = LineWriter::new(styles);
    for event in Parser::new_ext(input, options) {
        writer.event(event);
    }
    writer.finish()
}

struct PendingLink {
    url: String,
    shown: String,
}

/// Accumulates spans into lines while walking parser events.
struct LineWriter<'s> {
    styles: &'s MarkdownStyles,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    /// Inline styles in nesting order, patched over the body style.
    inline: Vec<Style>,
    /// Open lists; `Some(n)` is the next number of an ordered list.
    lists: Vec<Option<u64>>,
    quotes: usize,
    in_code: bool,
    /// Bullet or number waiting for the first text of an item.
    marker: Option<String>,
    link: Option<PendingLink>,
    cells: usize,
    /// A top-level block ended; the next one starts after a blank line.
    gap: bool,
}

impl<'s> LineWriter<'s> {
    fn new(styles: &'s MarkdownStyles) -> Self {
        Self {
            styles,
            lines: Vec::new(),
            spans: Vec::new(),
            inline: Vec::new(),
            lists: Vec::new(),
            quotes: 0,
            in_code: false,
            marker: None,
            link: None,
            cells: 0,
            gap: false,
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        self.lines
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push(&code, self.styles.code),
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.open_block();
                self.push(RULE, self.styles.marker);
                self.close_block();
            }
            Event::TaskListMarker(done) => {
                if let Some(marker) = &mut self.marker {
                    marker.push_str(if done { "[x] " } else { "[ ] " });
                }
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::Table(_) => self.open_block(),
            Tag::Heading { level, .. } => {
                self.open_block();
                let style = if level == HeadingLevel::H1 {
                    self.styles.heading.add_modifier(Modifier::UNDERLINED)
                } else {
                    self.styles.heading
                };
                self.inline.push(style);
            }
            Tag::CodeBlock(_) => {
                self.open_block();
                self.in_code = true;
            }
            Tag::BlockQuote => {
                self.open_block();
                self.quotes += 1;
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.open_block();
                } else {
                    self.flush();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                self.flush();
                self.marker = Some(self.next_marker());
            }
            Tag::TableHead => {
                self.cells = 0;
                self.inline.push(self.styles.strong);
            }
            Tag::TableRow => self.cells = 0,
            Tag::TableCell => {
                if self.cells > 0 {
                    self.push(CELL_SEPARATOR, self.styles.marker);
                }
                self.cells += 1;
            }
            Tag::Emphasis => self.inline.push(self.styles.emphasis),
            Tag::Strong => self.inline.push(self.styles.strong),
            Tag::Strikethrough => self.inline.push(self.styles.strikethrough),
            Tag::Link { dest_url, .. } => {
                self.inline.push(self.styles.link);
                self.link = Some(PendingLink {
                    url: dest_url.into_string(),
                    shown: String::new(),
                });
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Table => self.close_block(),
            TagEnd::Heading(_) => {
                self.inline.pop();
                self.close_block();
            }
            TagEnd::CodeBlock => {
                self.in_code = false;
                self.close_block();
            }
            TagEnd::BlockQuote => {
                self.flush();
                self.quotes = self.quotes.saturating_sub(1);
                self.close_block();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                self.close_block();
            }
            TagEnd::Item => {
                self.flush();
                self.marker = None;
            }
            TagEnd::TableHead => {
                self.inline.pop();
                self.flush();
            }
            TagEnd::TableRow => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.inline.pop();
            }
            TagEnd::Link => {
                self.inline.pop();
                self.close_link();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code {
            for line in text.lines() {
                self.push(&format!("{CODE_INDENT}{line}"), self.styles.code);
                self.flush();
            }
        } else {
            self.push(text, self.body_style());
        }
    }

    /// Append a span, opening the line with quote bars and any pending
    /// item marker.
    fn push(&mut self, text: &str, style: Style) {
        if self.spans.is_empty() {
            for _ in 0..self.quotes {
                self.spans.push(Span::styled(QUOTE_BAR, self.styles.quote));
            }
            if let Some(marker) = self.marker.take() {
                self.spans.push(Span::styled(marker, self.styles.marker));
            }
        }
        if let Some(link) = &mut self.link {
            link.shown.push_str(text);
        }
        self.spans.push(Span::styled(text.to_string(), style));
    }

    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn open_block(&mut self) {
        self.flush();
        if self.gap {
            self.lines.push(Line::default());
            self.gap = false;
        }
    }

    fn close_block(&mut self) {
        self.flush();
        if self.lists.is_empty() && self.quotes == 0 {
            self.gap = true;
        }
    }

    fn close_link(&mut self) {
        let Some(link) = self.link.take() else {
            return;
        };
        let target = link.url.strip_prefix("mailto:").unwrap_or(&link.url);
        if target.is_empty() || target.starts_with('#') || target == link.shown.trim() {
            return;
        }
        self.spans.push(Span::styled(
            format!(" ({target})"),
            self.styles.link_target,
        ));
    }

    fn body_style(&self) -> Style {
        let base = if self.quotes > 0 {
            self.styles.text.patch(self.styles.quote)
        } else {
            self.styles.text
        };
        self.inline.iter().fold(base, |style, s| style.patch(*s))
    }

    fn next_marker(&mut self) -> String {
        let indent = "  ".repeat(self.lists.len().saturating_sub(1));
        match self.lists.last_mut() {
            Some(Some(number)) => {
                let marker = format!("{indent}{number}. ");
                *number += 1;
                marker
            }
            _ => format!("{indent}• "),
        }
    }
}
