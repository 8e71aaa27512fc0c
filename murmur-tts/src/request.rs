//! Wire types for `POST /api/v1/tts`.

use serde::{Deserialize, Serialize};

use crate::config::TtsConfig;

/// Status code the service uses for a successful synthesis.
pub const SUCCESS_CODE: i64 = 3000;

/// Synthesis request body.
#[derive(Debug, Clone, Serialize)]
pub struct TtsRequest {
    /// Application credentials.
    pub app: AppSection,
    /// Caller identity.
    pub user: UserSection,
    /// Voice and output format.
    pub audio: AudioSection,
    /// The text and its request id.
    pub request: RequestSection,
}

/// `app` object.
#[derive(Debug, Clone, Serialize)]
pub struct AppSection {
    /// Application id.
    pub appid: String,
    /// Access token.
    pub token: String,
    /// Service cluster.
    pub cluster: String,
}

/// `user` object.
#[derive(Debug, Clone, Serialize)]
pub struct UserSection {
    /// Caller identity.
    pub uid: String,
}

/// `audio` object.
#[derive(Debug, Clone, Serialize)]
pub struct AudioSection {
    /// Voice / speaker id.
    pub voice_type: String,
    /// Output container.
    pub encoding: String,
    /// Playback speed multiplier.
    pub speed_ratio: f32,
}

/// `request` object.
#[derive(Debug, Clone, Serialize)]
pub struct RequestSection {
    /// Unique id of this request.
    pub reqid: String,
    /// Text to synthesize.
    pub text: String,
    /// Always `query` (non-streaming synthesis).
    pub operation: String,
}

impl TtsRequest {
    /// Build a request for `text` with a caller-supplied request id.
    #[must_use]
    pub fn new(config: &TtsConfig, text: impl Into<String>, reqid: impl Into<String>) -> Self {
        Self {
            app: AppSection {
                appid: config.app_id.clone(),
                token: config.access_token.clone(),
                cluster: config.cluster.clone(),
            },
            user: UserSection {
                uid: config.uid.clone(),
            },
            audio: AudioSection {
                voice_type: config.voice_type.clone(),
                encoding: config.encoding.clone(),
                speed_ratio: config.speed_ratio,
            },
            request: RequestSection {
                reqid: reqid.into(),
                text: text.into(),
                operation: "query".into(),
            },
        }
    }
}

/// Synthesis response body. Only the fields we read.
#[derive(Debug, Clone, Deserialize)]
pub struct TtsResponse {
    /// Echo of the request id.
    #[serde(default)]
    pub reqid: Option<String>,
    /// Service status code; [`SUCCESS_CODE`] on success.
    #[serde(default)]
    pub code: Option<i64>,
    /// Human-readable status.
    #[serde(default)]
    pub message: Option<String>,
    /// Base64-encoded audio.
    #[serde(default)]
    pub data: Option<String>,
}
