//! Client for the remote message-generation service.
//!
//! The service is an external collaborator: one JSON `POST` per question,
//! one JSON answer back. [`MessageGenerator`] is the seam the session talks
//! to; [`HttpGenerator`] is the real implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;

/// Path of the generation endpoint, relative to the configured base URL.
pub const GENERATE_PATH: &str = "/api/v1/message-generator";

/// Request body sent for every question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Raw text the user typed (not trimmed).
    pub question: String,
    /// Session assigned by the service, `null` until the first answer.
    pub session_id: Option<String>,
}

/// Response body returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Markdown answer to display.
    pub answer: String,
    /// Session identifier assigned by the service.
    pub session_id: String,
    /// Retrieved passages the answer was grounded on, when the service
    /// includes them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Anything that can turn a question into an answer.
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError>;
}

/// [`MessageGenerator`] backed by the HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    url: String,
    collection_name: Option<String>,
    max_tokens: Option<u32>,
}

impl HttpGenerator {
    /// Build a generator from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ClientError::Transport)?;

        Ok(Self {
            client,
            url: endpoint_url(&config.endpoint),
            collection_name: config.collection_name.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Full URL requests are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(collection) = &self.collection_name {
            query.push(("collection_name", collection.clone()));
        }
        if let Some(max_tokens) = self.max_tokens {
            query.push(("max_tokens", max_tokens.to_string()));
        }
        query
    }
}

#[async_trait]
impl MessageGenerator for HttpGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError> {
        let response = self
            .client
            .post(&self.url)
            .query(&self.query())
            .json(request)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(ClientError::Transport)?;
        let parsed: GenerateResponse = serde_json::from_slice(&body).map_err(ClientError::Decode)?;

        if let Some(context) = &parsed.context {
            debug!(context_len = context.len(), "Answer included retrieval context");
        }

        Ok(parsed)
    }
}

/// Join a base URL and [`GENERATE_PATH`] without doubling slashes.
pub fn endpoint_url(base: &str) -> String {
    format!("{}{GENERATE_PATH}", base.trim_end_matches('/'))
}

/// Ways a generation request can fail.
///
/// The send action treats all of them the same way; the variants exist for
/// logging.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection, TLS, timeout or body read failure.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("Service returned status {0}")]
    Status(u16),

    /// The body was not JSON or lacked `answer` / `session_id`.
    #[error("Malformed response: {0}")]
    Decode(#[source] serde_json::Error),
}
