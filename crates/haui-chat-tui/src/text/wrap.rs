//! Wrapping of styled lines to the message pane width.
//!
//! textwrap picks the break points on the flattened text of a line, then the
//! span styles are cut back onto the resulting byte ranges. Words wider than
//! the pane, long URLs mostly, are split between characters.

use std::ops::Range;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use textwrap::core::break_words;
use textwrap::wrap_algorithms::wrap_first_fit;
use textwrap::WordSeparator;

/// Wrap every line to at most `width` cells, keeping span styles.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }
    lines
        .into_iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if line.width() <= width {
        return vec![line];
    }
    let styled = StyledText::from(&line);
    row_ranges(&styled.text, width)
        .into_iter()
        .map(|range| styled.slice(range))
        .collect()
}

/// Byte ranges of `text`, one per row of at most `width` cells. The spaces
/// a row breaks on belong to no row.
fn row_ranges(text: &str, width: usize) -> Vec<Range<usize>> {
    let words = break_words(WordSeparator::AsciiSpace.find_words(text), width);

    // Words tile the text, so each one starts where the previous ended.
    let mut starts = Vec::with_capacity(words.len());
    let mut offset = 0;
    for word in &words {
        starts.push(offset);
        offset += word.word.len() + word.whitespace.len();
    }

    let line_width = f64::from(u32::try_from(width).unwrap_or(u32::MAX));
    let mut ranges = Vec::new();
    let mut next = 0;
    for row in wrap_first_fit(&words, &[line_width]) {
        let Some(last) = row.last() else {
            continue;
        };
        let start = starts[next];
        next += row.len();
        let end = starts[next - 1] + last.word.len();
        if end > start {
            ranges.push(start..end);
        }
    }
    ranges
}

/// A line's text with the style of each byte range.
struct StyledText {
    text: String,
    runs: Vec<(Range<usize>, Style)>,
}

impl From<&Line<'_>> for StyledText {
    fn from(line: &Line<'_>) -> Self {
        let mut text = String::new();
        let mut runs = Vec::with_capacity(line.spans.len());
        for span in &line.spans {
            let start = text.len();
            text.push_str(&span.content);
            runs.push((start..text.len(), line.style.patch(span.style)));
        }
        Self { text, runs }
    }
}

impl StyledText {
    fn slice(&self, range: Range<usize>) -> Line<'static> {
        let spans: Vec<Span<'static>> = self
            .runs
            .iter()
            .filter_map(|(run, style)| {
                let start = run.start.max(range.start);
                let end = run.end.min(range.end);
                (start < end).then(|| Span::styled(self.text[start..end].to_string(), *style))
            })
            .collect();
        Line::from(spans)
    }
}
