//! Test doubles for the message-generation service.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{ClientError, GenerateRequest, GenerateResponse, MessageGenerator};

/// Generator that replays queued results and records every request.
///
/// When the queue runs dry it answers with `ClientError::Status(503)`.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<GenerateResponse, ClientError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful answer.
    pub fn push_answer(&self, answer: &str, session_id: &str) {
        self.push(Ok(GenerateResponse {
            answer: answer.into(),
            session_id: session_id.into(),
            context: None,
        }));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: ClientError) {
        self.push(Err(error));
    }

    fn push(&self, reply: Result<GenerateResponse, ClientError>) {
        self.replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(reply);
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl MessageGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request.clone());
        self.replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Err(ClientError::Status(503)))
    }
}
