//! Layered configuration: defaults, JSON file, environment.
//!
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use murmur_chat::{API_KEY_ENV, ChatClient, StreamTerminator};
use murmur_dialogue::{DialogueSource, JoinStyle};
use murmur_tts::{TtsClient, TtsConfig};
use murmur_types::ServiceError;
use serde::{Deserialize, Serialize};

/// File read when no `--config` path is given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "murmur.json";

/// Chat model override.
pub const CHAT_MODEL_ENV: &str = "MURMUR_CHAT_MODEL";
/// Chat base URL override.
pub const CHAT_BASE_URL_ENV: &str = "MURMUR_CHAT_BASE_URL";

/// Errors from reading a configuration file or a missing section.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path of the config file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Path of the config file.
        path: String,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A required section is absent.
    #[error("missing configuration: {0}")]
    Missing(String),
}

/// End-of-stream convention, as written in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminatorKind {
    /// `data: [DONE]`.
    #[default]
    Done,
    /// A JSON frame with `"completed": true`.
    CompletedFlag,
    /// Whichever comes first.
    Either,
}

impl From<TerminatorKind> for StreamTerminator {
    fn from(kind: TerminatorKind) -> Self {
        match kind {
            TerminatorKind::Done => StreamTerminator::Done,
            TerminatorKind::CompletedFlag => StreamTerminator::CompletedFlag,
            TerminatorKind::Either => StreamTerminator::Either,
        }
    }
}

/// `chat` section.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Model identifier.
    pub model: String,
    /// API base URL.
    pub base_url: String,
    /// End-of-stream convention of the API.
    pub terminator: TerminatorKind,
    /// Bearer token. Usually supplied through `OPENAI_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Whole-request deadline in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: murmur_chat::client::DEFAULT_MODEL.into(),
            base_url: murmur_chat::client::DEFAULT_BASE_URL.into(),
            terminator: TerminatorKind::default(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

impl std::fmt::Debug for ChatSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSettings")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("terminator", &self.terminator)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// `dialogue` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueSettings {
    /// Example dialogue to prepend to every chat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DialogueSource>,
    /// How continuation lines are joined.
    pub join: JoinStyle,
}

/// Complete configuration of the `murmur` tools.
///
/// ```
/// let config: murmur::MurmurConfig = serde_json::from_str(
///     r#"{"chat": {"model": "deepseek-reasoner", "terminator": "either"}}"#,
/// ).unwrap();
/// assert_eq!(config.chat.model, "deepseek-reasoner");
/// assert!(config.tts.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MurmurConfig {
    /// Chat completion settings.
    pub chat: ChatSettings,
    /// Speech synthesis settings, if speech is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts: Option<TtsConfig>,
    /// Example dialogue settings.
    pub dialogue: DialogueSettings,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl MurmurConfig {
    /// Read a JSON config file.
    pub async fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Defaults, then `explicit` (or `./murmur.json` when present), then the
    /// process environment.
    pub async fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_path(path).await?,
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                let present = tokio::fs::metadata(&fallback)
                    .await
                    .is_ok_and(|meta| meta.is_file());
                if present {
                    Self::from_path(&fallback).await?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|name| std::env::var(name).ok());
        tracing::debug!(config = ?config, "configuration loaded");
        Ok(config)
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Blank values are ignored. A `tts` section is created from the
    /// environment only when app id, token and voice are all present.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = non_blank(lookup(API_KEY_ENV)) {
            self.chat.api_key = Some(key.trim().to_string());
        }
        if let Some(model) = non_blank(lookup(CHAT_MODEL_ENV)) {
            self.chat.model = model;
        }
        if let Some(url) = non_blank(lookup(CHAT_BASE_URL_ENV)) {
            self.chat.base_url = url;
        }

        match self.tts.as_mut() {
            Some(tts) => {
                let fields = [
                    (murmur_tts::config::APP_ID_ENV, &mut tts.app_id),
                    (murmur_tts::config::TOKEN_ENV, &mut tts.access_token),
                    (murmur_tts::config::VOICE_ENV, &mut tts.voice_type),
                    (murmur_tts::config::BASE_URL_ENV, &mut tts.base_url),
                ];
                for (name, field) in fields {
                    if let Some(value) = non_blank(lookup(name)) {
                        *field = value;
                    }
                }
            }
            None => self.tts = TtsConfig::from_lookup(&lookup).ok(),
        }
    }

    /// Build a chat client.
    ///
    /// Fails with [`ServiceError::Config`] when no API key is configured.
    pub fn chat_client(&self) -> Result<ChatClient, ServiceError> {
        let key = non_blank(self.chat.api_key.clone()).ok_or_else(|| {
            ServiceError::Config(format!(
                "chat API key is not configured; set {API_KEY_ENV} or chat.api_key"
            ))
        })?;
        let mut client = ChatClient::new(key)
            .model(&self.chat.model)
            .base_url(&self.chat.base_url)
            .terminator(self.chat.terminator.into());
        if let Some(secs) = self.chat.timeout_secs {
            client = client.timeout(Duration::from_secs(secs));
        }
        Ok(client)
    }

    /// Build a speech client.
    ///
    /// The deadline comes from `tts.timeout_secs` only.
    pub fn tts_client(&self) -> Result<TtsClient, ConfigError> {
        let tts = self.tts.clone().ok_or_else(|| {
            ConfigError::Missing(format!(
                "tts section; set {}, {} and {}",
                murmur_tts::config::APP_ID_ENV,
                murmur_tts::config::TOKEN_ENV,
                murmur_tts::config::VOICE_ENV
            ))
        })?;
        Ok(TtsClient::new(tts))
    }
}
