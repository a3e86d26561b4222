//! Test utilities for haui-chat-tui rendering tests.
//!
//! Helpers for building an app against a scripted backend, rendering it into
//! an in-memory buffer and converting buffers to strings for assertions.

use std::sync::Arc;

use haui_chat_engine::testing::ScriptedGenerator;
use haui_chat_engine::Config;
use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::App;
use crate::theme::{IconMode, IconSet};

/// Create a test app backed by a [`ScriptedGenerator`].
///
/// Icons are ASCII so rendered widths are predictable.
pub fn create_test_app() -> (App, Arc<ScriptedGenerator>) {
    let generator = Arc::new(ScriptedGenerator::new());
    let mut app = App::new(&Config::default(), generator.clone());
    app.icons = IconSet::new(IconMode::Ascii);
    (app, generator)
}

/// Render the app into a fresh buffer of the given size.
pub fn render_app(app: &mut App, width: u16, height: u16) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    app.render(area, &mut buf);
    buf
}

/// Convert a buffer to a string representation for assertions.
///
/// Trailing whitespace is trimmed from each row.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}
