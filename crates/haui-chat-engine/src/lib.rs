//! haui-chat-engine: Headless conversation engine for the HaUI chatbot
//!
//! This crate holds everything the chat widget does that is not drawing:
//! - The append-only conversation model
//! - The send action and session-id bookkeeping
//! - The HTTP client for the message-generation service
//! - Text normalisation applied before markdown rendering
//! - Configuration

pub mod client;
pub mod config;
pub mod message;
pub mod render;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-export commonly used types
pub use client::{
    endpoint_url, ClientError, GenerateRequest, GenerateResponse, HttpGenerator,
    MessageGenerator, GENERATE_PATH,
};
pub use config::{Config, ConfigError, IconChoice, ThemeChoice, DEFAULT_ENDPOINT, DEFAULT_TITLE};
pub use message::{Conversation, Message, Role};
pub use render::normalize_newlines;
pub use session::{ChatSession, OutgoingRequest, RequestId, FALLBACK_REPLY};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
