//! haui-chat-tui: terminal front end for the HaUI chatbot.
//!
//! This crate provides:
//! - The chat window (title bar, message list, input bar)
//! - Markdown rendering of replies with a bot avatar gutter
//! - Smooth auto-scroll to the newest message

mod app;
pub mod conversation;
mod event;
pub mod text;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use app::App;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use haui_chat_engine;

use std::io::{self, stdout};
use std::sync::Arc;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use haui_chat_engine::{Config, MessageGenerator};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the chat window until the user quits.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit. Replies still in flight at exit are dropped.
pub async fn run_tui(
    config: &Config,
    generator: Arc<dyn MessageGenerator>,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, generator);
    let mut events = EventHandler::new(config.tick_rate_ms);
    info!("chat window opened");

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;
    info!(pending = app.in_flight(), "chat window closed");

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            app.render(area, frame.buffer_mut());
        })?;

        let Some(event) = events.next().await else {
            break;
        };

        match event {
            Event::Key(key) => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            Event::Paste(text) => app.handle_paste(&text),
            Event::Tick => {
                app.tick();
            }
            Event::Resize(_, _) => {}
        }

        app.drain_replies();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
