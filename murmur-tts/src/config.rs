//! Credentials and voice settings for the speech service.

use murmur_types::ServiceError;
use serde::{Deserialize, Serialize};

/// Default speech API base URL.
pub const DEFAULT_BASE_URL: &str = "https://openspeech.bytedance.com";

/// Environment variables read by [`TtsConfig::from_env`].
pub const APP_ID_ENV: &str = "MURMUR_TTS_APP_ID";
/// Access token variable.
pub const TOKEN_ENV: &str = "MURMUR_TTS_TOKEN";
/// Voice (speaker id) variable.
pub const VOICE_ENV: &str = "MURMUR_TTS_VOICE";
/// Base URL override variable.
pub const BASE_URL_ENV: &str = "MURMUR_TTS_BASE_URL";

fn default_cluster() -> String {
    "volcano_icl".into()
}

fn default_encoding() -> String {
    "mp3".into()
}

fn default_speed_ratio() -> f32 {
    1.0
}

fn default_uid() -> String {
    "murmur".into()
}

fn default_resource_id() -> String {
    "volc.megatts.voiceclone".into()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

/// Everything a synthesis request needs besides the text.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Application id issued by the console.
    pub app_id: String,
    /// Access token; sent in the body and the `Authorization` header.
    pub access_token: String,
    /// Voice / cloned speaker id, e.g. `S_xxxxxxxx`.
    pub voice_type: String,
    /// Service cluster.
    #[serde(default = "default_cluster")]
    pub cluster: String,
    /// Audio container of the answer.
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Playback speed multiplier.
    #[serde(default = "default_speed_ratio")]
    pub speed_ratio: f32,
    /// Caller identity; any non-empty string.
    #[serde(default = "default_uid")]
    pub uid: String,
    /// Value of the `Resource-Id` header.
    #[serde(default = "default_resource_id")]
    pub resource_id: String,
    /// API base URL (override for testing or proxies).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request deadline in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl TtsConfig {
    /// Config with the given credentials and voice, defaults elsewhere.
    #[must_use]
    pub fn new(
        app_id: impl Into<String>,
        access_token: impl Into<String>,
        voice_type: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            access_token: access_token.into(),
            voice_type: voice_type.into(),
            cluster: default_cluster(),
            encoding: default_encoding(),
            speed_ratio: default_speed_ratio(),
            uid: default_uid(),
            resource_id: default_resource_id(),
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }

    /// Read credentials from `MURMUR_TTS_APP_ID`, `MURMUR_TTS_TOKEN` and
    /// `MURMUR_TTS_VOICE`; `MURMUR_TTS_BASE_URL` optionally overrides the
    /// endpoint.
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`TtsConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServiceError> {
        let require = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ServiceError::Config(format!("{name} is not set")))
        };
        let mut config = Self::new(require(APP_ID_ENV)?, require(TOKEN_ENV)?, require(VOICE_ENV)?);
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = url;
        }
        Ok(config)
    }

    /// Check that no credential is blank.
    pub fn validate(&self) -> Result<(), ServiceError> {
        for (field, value) in [
            ("app_id", &self.app_id),
            ("access_token", &self.access_token),
            ("voice_type", &self.voice_type),
        ] {
            if value.trim().is_empty() {
                return Err(ServiceError::Config(format!("tts {field} is empty")));
            }
        }
        Ok(())
    }

    /// Build the synthesis endpoint URL.
    #[must_use]
    pub fn tts_url(&self) -> String {
        format!("{}/api/v1/tts", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for TtsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtsConfig")
            .field("app_id", &self.app_id)
            .field("access_token", &"[REDACTED]")
            .field("voice_type", &self.voice_type)
            .field("cluster", &self.cluster)
            .field("encoding", &self.encoding)
            .field("speed_ratio", &self.speed_ratio)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}
