//! Conversation session and the send action.
//!
//! [`ChatSession`] owns the conversation and the service-assigned session
//! identifier. Sending is split in two halves so a UI can keep its event
//! loop running while the request is in flight:
//!
//! 1. [`ChatSession::begin_send`] validates the input, appends the user
//!    message immediately and hands back the request to issue.
//! 2. [`ChatSession::apply_reply`] appends the bot message (or the fallback
//!    reply) once the request resolves.
//!
//! Several requests may be outstanding at once. Their replies are applied in
//! whatever order they arrive; nothing reorders them by request id.

use std::fmt;

use tracing::{debug, info, warn};

use crate::client::{ClientError, GenerateRequest, GenerateResponse, MessageGenerator};
use crate::message::{Conversation, Message};

/// Bot reply shown for any failed request.
pub const FALLBACK_REPLY: &str = "⚠️ Lỗi khi gửi yêu cầu. Vui lòng thử lại.";

/// Monotonic identifier of a send, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request produced by [`ChatSession::begin_send`], ready to be issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    pub id: RequestId,
    pub body: GenerateRequest,
}

/// State of one chat widget instance.
#[derive(Debug, Default)]
pub struct ChatSession {
    conversation: Conversation,
    session_id: Option<String>,
    next_request_id: u64,
}

impl ChatSession {
    /// Create an empty session with no service session id.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Session identifier assigned by the service, once known.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Validate `input` and, if it has visible content, append it as a user
    /// message and return the request to send.
    ///
    /// Whitespace-only input is ignored: nothing is appended and `None` is
    /// returned. The message keeps the raw input, surrounding whitespace
    /// included.
    pub fn begin_send(&mut self, input: &str) -> Option<OutgoingRequest> {
        if input.trim().is_empty() {
            debug!("Ignoring blank input");
            return None;
        }

        self.next_request_id += 1;
        let id = RequestId(self.next_request_id);

        self.conversation.push(Message::user(input));

        info!(request_id = %id, has_session = self.session_id.is_some(), "Sending question");

        Some(OutgoingRequest {
            id,
            body: GenerateRequest {
                question: input.to_string(),
                session_id: self.session_id.clone(),
            },
        })
    }

    /// Record the outcome of a request started with [`Self::begin_send`].
    ///
    /// On success the answer is appended and the returned session id is
    /// stored if none was known yet; an existing id is never replaced. A
    /// blank id counts as no id. On failure [`FALLBACK_REPLY`] is appended
    /// instead.
    pub fn apply_reply(&mut self, id: RequestId, result: Result<GenerateResponse, ClientError>) {
        match result {
            Ok(response) => {
                let blank_id = response.session_id.trim().is_empty();
                match &self.session_id {
                    _ if blank_id => {
                        debug!(request_id = %id, "Response carried no session id");
                    }
                    None => {
                        info!(request_id = %id, session_id = %response.session_id, "Session established");
                        self.session_id = Some(response.session_id);
                    }
                    Some(current) if *current != response.session_id => {
                        debug!(
                            request_id = %id,
                            kept = %current,
                            discarded = %response.session_id,
                            "Ignoring session id from later response"
                        );
                    }
                    Some(_) => {}
                }
                self.conversation.push(Message::bot(response.answer));
            }
            Err(error) => {
                warn!(request_id = %id, error = %error, "Message generation failed");
                self.conversation.push(Message::bot(FALLBACK_REPLY));
            }
        }
    }

    /// Run a whole send cycle: validate, request, apply.
    ///
    /// Returns `true` if a request was issued.
    pub async fn send(&mut self, generator: &dyn MessageGenerator, input: &str) -> bool {
        let Some(request) = self.begin_send(input) else {
            return false;
        };
        let result = generator.generate(&request.body).await;
        self.apply_reply(request.id, result);
        true
    }
}
