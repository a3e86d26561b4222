//! Configuration for the chat widget.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default base URL of the message-generation service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Default header title.
pub const DEFAULT_TITLE: &str = "Chatbot - Đại Học Công Nghiệp Hà Nội (HaUI)";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the message-generation service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds. `None` keeps the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Vector store collection the service should answer from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,

    /// Output token cap forwarded to the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Header title shown above the conversation.
    #[serde(default = "default_title")]
    pub title: String,

    /// Color theme.
    #[serde(default)]
    pub theme: ThemeChoice,

    /// Icon set used for the bot avatar and markers.
    #[serde(default)]
    pub icons: IconChoice,

    /// UI tick interval in milliseconds (drives scroll easing).
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_title() -> String {
    DEFAULT_TITLE.into()
}

fn default_tick_rate_ms() -> u64 {
    50
}

/// Color theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemeChoice {
    /// Dark theme.
    #[default]
    Mocha,
    /// Light theme.
    Latte,
    /// High contrast theme.
    HighContrast,
}

/// Icon set selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IconChoice {
    /// Nerd Font glyphs.
    Nerd,
    /// Plain Unicode symbols.
    #[default]
    Unicode,
    /// ASCII only.
    Ascii,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration from a file, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: None,
            collection_name: None,
            max_tokens: None,
            title: default_title(),
            theme: ThemeChoice::default(),
            icons: IconChoice::default(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.theme, ThemeChoice::Mocha);
        assert_eq!(config.icons, IconChoice::Unicode);
    }

    #[test]
    fn test_empty_object_is_default() {
        let parsed: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let parsed: Config =
            serde_json::from_str(r#"{"endpoint":"http://chat.local","theme":"high_contrast"}"#)
                .unwrap();
        assert_eq!(parsed.endpoint, "http://chat.local");
        assert_eq!(parsed.theme, ThemeChoice::HighContrast);
        assert_eq!(parsed.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            endpoint: "http://example.test:9000".into(),
            request_timeout_secs: Some(30),
            max_tokens: Some(256),
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }
}
