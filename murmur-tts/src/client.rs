//! Speech synthesis client.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use murmur_types::ServiceError;

use crate::config::TtsConfig;
use crate::error::{map_api_code, map_http_status, map_reqwest_error};
use crate::request::{SUCCESS_CODE, TtsRequest, TtsResponse};
use crate::text::filter_bracket_content;

/// Client for the `openspeech` synthesis endpoint.
///
/// # Example
///
/// ```no_run
/// use murmur_tts::{TtsClient, TtsConfig};
///
/// # async fn run() -> Result<(), murmur_tts::ServiceError> {
/// let client = TtsClient::new(TtsConfig::new("app-id", "token", "S_voice"));
/// if let Some(mp3) = client.synthesize_audio("(smiles) Hello there").await? {
///     println!("{} bytes of audio", mp3.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TtsClient {
    config: TtsConfig,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl TtsClient {
    /// Create a client for the given credentials and voice.
    ///
    /// `config.timeout_secs`, when set, becomes the request deadline.
    #[must_use]
    pub fn new(config: TtsConfig) -> Self {
        Self {
            timeout: config.timeout_secs.map(Duration::from_secs),
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from `MURMUR_TTS_*` environment variables.
    pub fn from_env() -> Result<Self, ServiceError> {
        TtsConfig::from_env().map(Self::new)
    }

    /// Abort any request that has not completed within `timeout`.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured HTTP client.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The request deadline, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &TtsConfig {
        &self.config
    }

    /// Build the request body for `text`, or `None` if nothing is left to
    /// speak once asides are filtered out.
    #[must_use]
    pub fn build_request(&self, text: &str) -> Option<TtsRequest> {
        let filtered = filter_bracket_content(text);
        if filtered.is_empty() {
            return None;
        }
        Some(TtsRequest::new(
            &self.config,
            filtered,
            uuid::Uuid::new_v4().to_string(),
        ))
    }

    /// Synthesize `text` and return the base64 audio payload.
    ///
    /// Returns `Ok(None)` without any network call when the filtered text is
    /// empty.
    pub async fn synthesize(&self, text: &str) -> Result<Option<String>, ServiceError> {
        let Some(body) = self.build_request(text) else {
            tracing::debug!("nothing left to synthesize after filtering");
            return Ok(None);
        };
        self.config.validate()?;

        let url = self.config.tts_url();
        tracing::debug!(
            url = %url,
            reqid = %body.request.reqid,
            voice = %self.config.voice_type,
            chars = body.request.text.chars().count(),
            "sending synthesis request"
        );

        let mut request = self
            .client
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer;{}", self.config.access_token),
            )
            .header("Resource-Id", &self.config.resource_id)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/json; charset=UTF-8",
            )
            .body(serde_json::to_vec(&body).map_err(|e| {
                ServiceError::InvalidRequest(format!("failed to encode request: {e}"))
            })?);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;
        if !status.is_success() {
            return Err(map_http_status(status, &body_text));
        }

        let parsed: TtsResponse = serde_json::from_str(&body_text).map_err(|e| {
            ServiceError::InvalidResponse(format!("synthesis response is not JSON: {e}"))
        })?;

        if let Some(code) = parsed.code.filter(|c| *c != SUCCESS_CODE) {
            let message = parsed.message.unwrap_or_default();
            tracing::warn!(code, message = %message, "synthesis rejected");
            return Err(map_api_code(code, &message));
        }

        match parsed.data {
            Some(data) if !data.is_empty() => Ok(Some(data)),
            _ => Err(ServiceError::InvalidResponse(
                "synthesis response has no audio data".into(),
            )),
        }
    }

    /// Like [`TtsClient::synthesize`], with the audio base64-decoded.
    pub async fn synthesize_audio(&self, text: &str) -> Result<Option<Vec<u8>>, ServiceError> {
        let Some(encoded) = self.synthesize(text).await? else {
            return Ok(None);
        };
        STANDARD
            .decode(encoded.as_bytes())
            .map(Some)
            .map_err(|e| ServiceError::InvalidResponse(format!("audio is not valid base64: {e}")))
    }
}

impl std::fmt::Debug for TtsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtsClient")
            .field("config", &self.config)
            .field("timeout", &self.timeout)
            .finish()
    }
}
