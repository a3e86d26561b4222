//! Application state and input handling.

use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use haui_chat_engine::{
    ChatSession, ClientError, Config, GenerateResponse, MessageGenerator, RequestId,
};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    widgets::StatefulWidget,
};
use tokio::sync::mpsc;
use tracing::debug;

use crate::conversation::{ChatWindow, ChatWindowState};
use crate::event::{key_to_action, Action};
use crate::theme::{IconMode, IconSet, Theme};
use crate::widgets::TextInputState;

/// Lines moved per mouse wheel notch or arrow key.
const SCROLL_STEP: usize = 3;

type Reply = (RequestId, Result<GenerateResponse, ClientError>);

/// Main application state.
pub struct App {
    /// Conversation and backend session.
    pub session: ChatSession,
    /// Input field.
    pub input: TextInputState,
    /// Scroll position and hit areas from the last frame.
    pub window: ChatWindowState,
    /// Title bar text.
    pub title: String,
    /// Color palette.
    pub theme: Theme,
    /// Glyphs for the avatar, markers and borders.
    pub icons: IconSet,
    /// Set once the user asks to leave.
    pub should_quit: bool,
    generator: Arc<dyn MessageGenerator>,
    reply_tx: mpsc::UnboundedSender<Reply>,
    reply_rx: mpsc::UnboundedReceiver<Reply>,
    in_flight: usize,
}

impl App {
    /// Create the app from configuration and a reply generator.
    pub fn new(config: &Config, generator: Arc<dyn MessageGenerator>) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        Self {
            session: ChatSession::new(),
            input: TextInputState::new(),
            window: ChatWindowState::new(),
            title: config.title.clone(),
            theme: Theme::from_choice(config.theme),
            icons: IconSet::new(IconMode::from(config.icons)),
            should_quit: false,
            generator,
            reply_tx,
            reply_rx,
            in_flight: 0,
        }
    }

    /// Number of requests dispatched but not yet answered.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.handle_action(key_to_action(key));
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Submit => {
                self.submit();
            }
            Action::Insert(ch) => self.input.insert(ch),
            Action::Backspace => self.input.backspace(),
            Action::Delete => self.input.delete(),
            Action::Left => self.input.move_left(),
            Action::Right => self.input.move_right(),
            Action::Home => self.input.move_home(),
            Action::End => self.input.move_end(),
            Action::ScrollUp => self.window.messages.scroll_up(SCROLL_STEP),
            Action::ScrollDown => self.window.messages.scroll_down(SCROLL_STEP),
            Action::PageUp => self.window.messages.page_up(),
            Action::PageDown => self.window.messages.page_down(),
            Action::None => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.window.messages.scroll_up(SCROLL_STEP),
            MouseEventKind::ScrollDown => self.window.messages.scroll_down(SCROLL_STEP),
            MouseEventKind::Down(MouseButton::Left) => {
                let position = Position::new(mouse.column, mouse.row);
                if self.window.send_button().contains(position) {
                    self.submit();
                }
            }
            _ => {}
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        self.input.insert_str(text);
    }

    /// Send the current input.
    ///
    /// Blank input is left in the field untouched. Otherwise the field is
    /// emptied and the request runs on its own task; its reply comes back
    /// through [`App::drain_replies`] or [`App::wait_reply`].
    pub fn submit(&mut self) -> Option<RequestId> {
        let request = self.session.begin_send(self.input.content())?;
        self.input.take();
        let id = request.id;

        let generator = Arc::clone(&self.generator);
        let tx = self.reply_tx.clone();
        tokio::spawn(async move {
            let result = generator.generate(&request.body).await;
            let _ = tx.send((request.id, result));
        });

        self.in_flight += 1;
        debug!(request = %id, in_flight = self.in_flight, "request dispatched");
        Some(id)
    }

    /// Apply every reply that has already arrived. Returns how many were
    /// applied.
    pub fn drain_replies(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((id, result)) = self.reply_rx.try_recv() {
            self.apply(id, result);
            applied += 1;
        }
        applied
    }

    /// Wait for the next reply and apply it.
    pub async fn wait_reply(&mut self) {
        if let Some((id, result)) = self.reply_rx.recv().await {
            self.apply(id, result);
        }
    }

    fn apply(&mut self, id: RequestId, result: Result<GenerateResponse, ClientError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.session.apply_reply(id, result);
    }

    /// Advance animations. Returns `true` if a redraw is needed.
    pub fn tick(&mut self) -> bool {
        self.window.messages.tick()
    }

    /// Draw the whole window.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        ChatWindow::new(
            self.session.conversation(),
            &self.input,
            &self.title,
            &self.theme,
            &self.icons,
        )
        .render(area, buf, &mut self.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, create_test_app, render_app};
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyModifiers};
    use haui_chat_engine::{GenerateRequest, Role, FALLBACK_REPLY};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    fn press_enter(app: &mut App) {
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    }

    fn transcript(app: &App) -> Vec<(Role, String)> {
        app.session
            .conversation()
            .iter()
            .map(|m| (m.role(), m.content().to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_successful_exchange() {
        let (mut app, generator) = create_test_app();
        generator.push_answer("Hi there", "abc");

        type_text(&mut app, "Hello");
        press_enter(&mut app);

        assert!(app.input.is_empty());
        assert_eq!(app.in_flight(), 1);
        assert_eq!(transcript(&app), vec![(Role::User, "Hello".to_string())]);

        app.wait_reply().await;

        assert_eq!(app.in_flight(), 0);
        assert_eq!(app.session.session_id(), Some("abc"));
        assert_eq!(
            transcript(&app),
            vec![
                (Role::User, "Hello".to_string()),
                (Role::Bot, "Hi there".to_string()),
            ]
        );

        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].session_id, None);
    }

    #[tokio::test]
    async fn test_second_send_reuses_session() {
        let (mut app, generator) = create_test_app();
        generator.push_answer("one", "abc");
        generator.push_answer("two", "xyz");

        type_text(&mut app, "first");
        press_enter(&mut app);
        app.wait_reply().await;

        type_text(&mut app, "second");
        press_enter(&mut app);
        app.wait_reply().await;

        let requests = generator.requests();
        assert_eq!(requests[1].session_id.as_deref(), Some("abc"));
        assert_eq!(app.session.session_id(), Some("abc"));
        assert_eq!(app.session.conversation().len(), 4);
    }

    #[tokio::test]
    async fn test_failure_appends_fallback() {
        let (mut app, generator) = create_test_app();
        generator.push_error(ClientError::Status(500));

        type_text(&mut app, "Hello");
        press_enter(&mut app);
        app.wait_reply().await;

        assert!(app.input.is_empty());
        assert_eq!(app.session.session_id(), None);
        assert_eq!(
            transcript(&app),
            vec![
                (Role::User, "Hello".to_string()),
                (Role::Bot, FALLBACK_REPLY.to_string()),
            ]
        );
        assert_eq!(generator.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let (mut app, generator) = create_test_app();

        type_text(&mut app, "   ");
        assert_eq!(app.submit(), None);

        assert_eq!(app.input.content(), "   ");
        assert!(app.session.conversation().is_empty());
        assert_eq!(app.in_flight(), 0);
        assert!(generator.requests().is_empty());
    }

    /// Holds each reply until the test releases it.
    struct GatedGenerator {
        gates: Mutex<HashMap<String, oneshot::Receiver<GenerateResponse>>>,
    }

    #[async_trait]
    impl MessageGenerator for GatedGenerator {
        async fn generate(
            &self,
            request: &GenerateRequest,
        ) -> Result<GenerateResponse, ClientError> {
            let gate = self
                .gates
                .lock()
                .unwrap()
                .remove(&request.question)
                .expect("unexpected question");
            gate.await.map_err(|_| ClientError::Status(503))
        }
    }

    fn response(answer: &str, session_id: &str) -> GenerateResponse {
        GenerateResponse {
            answer: answer.to_string(),
            session_id: session_id.to_string(),
            context: None,
        }
    }

    #[tokio::test]
    async fn test_overlapping_sends_apply_in_arrival_order() {
        let (release_a, gate_a) = oneshot::channel();
        let (release_b, gate_b) = oneshot::channel();
        let generator = GatedGenerator {
            gates: Mutex::new(HashMap::from([
                ("A".to_string(), gate_a),
                ("B".to_string(), gate_b),
            ])),
        };
        let mut app = App::new(&Config::default(), Arc::new(generator));

        type_text(&mut app, "A");
        press_enter(&mut app);
        type_text(&mut app, "B");
        press_enter(&mut app);
        assert_eq!(app.in_flight(), 2);

        release_b.send(response("reply B", "s-b")).unwrap();
        app.wait_reply().await;
        release_a.send(response("reply A", "s-a")).unwrap();
        app.wait_reply().await;

        assert_eq!(
            transcript(&app),
            vec![
                (Role::User, "A".to_string()),
                (Role::User, "B".to_string()),
                (Role::Bot, "reply B".to_string()),
                (Role::Bot, "reply A".to_string()),
            ]
        );
        assert_eq!(app.session.session_id(), Some("s-b"));
    }

    #[tokio::test]
    async fn test_input_stays_usable_while_waiting() {
        let (mut app, generator) = create_test_app();
        generator.push_answer("ok", "abc");

        type_text(&mut app, "first");
        press_enter(&mut app);
        type_text(&mut app, "draft");

        assert_eq!(app.input.content(), "draft");
        app.wait_reply().await;
        assert_eq!(app.input.content(), "draft");
    }

    #[tokio::test]
    async fn test_send_button_click_submits() {
        let (mut app, generator) = create_test_app();
        generator.push_answer("Hi there", "abc");
        render_app(&mut app, 60, 16);

        type_text(&mut app, "Hello");
        let button = app.window.send_button();
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: button.x + 1,
            row: button.y + 1,
            modifiers: KeyModifiers::NONE,
        });
        app.wait_reply().await;

        assert_eq!(app.session.conversation().len(), 2);
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn test_click_outside_button_does_nothing() {
        let (mut app, generator) = create_test_app();
        render_app(&mut app, 60, 16);

        type_text(&mut app, "Hello");
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });

        assert_eq!(app.input.content(), "Hello");
        assert!(generator.requests().is_empty());
    }

    #[tokio::test]
    async fn test_render_shows_avatar_and_collapses_newlines() {
        let (mut app, generator) = create_test_app();
        generator.push_answer("```\nline one\n\n\n\nline two\n```", "abc");

        type_text(&mut app, "Hello");
        press_enter(&mut app);
        app.wait_reply().await;

        let screen = buffer_to_string(&render_app(&mut app, 60, 16));
        let rows: Vec<&str> = screen.lines().collect();
        let first = rows
            .iter()
            .position(|row| row.contains("line one"))
            .expect("first line rendered");

        assert!(rows[first].contains("[bot]"));
        assert!(!rows[first + 1].contains("line"));
        assert!(rows[first + 2].contains("line two"));
        assert!(screen.contains("| Hello"));
    }

    #[test]
    fn test_quit_and_paste() {
        let (mut app, _generator) = create_test_app();
        app.handle_paste("Xin\nchào");
        assert_eq!(app.input.content(), "Xin chào");

        app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.should_quit);
    }
}
