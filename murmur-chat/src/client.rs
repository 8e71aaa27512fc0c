//! Chat completion client struct and builder.

use std::pin::Pin;
use std::time::Duration;

use futures::{Stream, StreamExt};
use murmur_sse::{DecodeSummary, StreamTerminator, decode_stream, delta_stream};
use murmur_types::{ChatMessage, ServiceError};

use crate::error::{map_http_status, map_reqwest_error, map_stream_error};
use crate::request::ChatCompletionRequest;

/// Environment variable [`ChatClient::from_env`] reads the API key from.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// A boxed stream of text deltas.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, ServiceError>> + Send>>;

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use murmur_chat::{ChatClient, StreamTerminator};
///
/// let client = ChatClient::new("sk-...")
///     .model("deepseek-chat")
///     .base_url("https://api.deepseek.com")
///     .terminator(StreamTerminator::Either);
/// ```
#[derive(Clone)]
pub struct ChatClient {
    /// Bearer token sent with every request.
    pub(crate) api_key: String,
    /// Model identifier.
    pub(crate) model: String,
    /// API base URL (override for testing or proxies).
    pub(crate) base_url: String,
    /// Which frame ends the response stream.
    pub(crate) terminator: StreamTerminator,
    /// Whole-request deadline, body included.
    pub(crate) timeout: Option<Duration>,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl ChatClient {
    /// Create a new client with the given API key and default settings.
    ///
    /// Default model: `deepseek-chat`.
    /// Default base URL: `https://api.deepseek.com`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            terminator: StreamTerminator::default(),
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from the `OPENAI_API_KEY` environment variable.
    ///
    /// Fails with [`ServiceError::Config`] when the variable is unset or empty.
    pub fn from_env() -> Result<Self, ServiceError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(ServiceError::Config(format!(
                "chat API key is not configured; set {API_KEY_ENV}"
            ))),
        }
    }

    /// Override the model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing with a local mock server or an API proxy.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Choose the end-of-stream convention of the upstream API.
    #[must_use]
    pub fn terminator(mut self, terminator: StreamTerminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Abort any request that has not fully completed within `timeout`.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots, pooling).
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The configured model identifier.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Build the chat completions endpoint URL.
    pub(crate) fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Send the request and return the response once its status is known good.
    async fn send(&self, messages: &[ChatMessage]) -> Result<reqwest::Response, ServiceError> {
        if self.api_key.trim().is_empty() {
            return Err(ServiceError::Config(format!(
                "chat API key is empty; set {API_KEY_ENV}"
            )));
        }

        let url = self.completions_url();
        let body = ChatCompletionRequest::streaming(&self.model, messages);

        tracing::debug!(
            url = %url,
            model = %self.model,
            messages = messages.len(),
            "sending streaming chat request"
        );

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .map_err(|e| map_reqwest_error(e, self.timeout))?;
            return Err(map_http_status(status, &body_text));
        }

        Ok(response)
    }

    /// Start a streaming completion and return its text deltas.
    ///
    /// Configuration and HTTP status errors are returned before any delta is
    /// produced. A body read failure is yielded once and ends the stream.
    pub async fn stream(&self, messages: &[ChatMessage]) -> Result<DeltaStream, ServiceError> {
        let response = self.send(messages).await?;
        let timeout = self.timeout;
        let bytes = response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| map_stream_error(e, timeout)));
        Ok(Box::pin(delta_stream(bytes, self.terminator.clone())))
    }

    /// Stream a completion, calling `on_progress` once per delta in order.
    pub async fn stream_to<F>(
        &self,
        messages: &[ChatMessage],
        on_progress: F,
    ) -> Result<DecodeSummary, ServiceError>
    where
        F: FnMut(&str),
    {
        let response = self.send(messages).await?;
        let timeout = self.timeout;
        let bytes = response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| map_stream_error(e, timeout)));
        decode_stream(bytes, self.terminator.clone(), on_progress).await
    }

    /// Callback flavour of [`ChatClient::stream_to`].
    ///
    /// Every failure (missing key, transport, HTTP status, broken body) is
    /// logged and handed to `on_error` exactly once; nothing is retried.
    pub async fn chat<P, E>(&self, messages: &[ChatMessage], on_progress: P, on_error: E)
    where
        P: FnMut(&str),
        E: FnOnce(ServiceError),
    {
        if let Err(err) = self.stream_to(messages, on_progress).await {
            tracing::error!(error = %err, "chat request failed");
            on_error(err);
        }
    }

    /// Stream a completion and return the concatenated reply.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ServiceError> {
        let mut reply = String::new();
        self.stream_to(messages, |delta| reply.push_str(delta))
            .await?;
        Ok(reply)
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("terminator", &self.terminator)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_set() {
        let client = ChatClient::new("test-key");
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[test]
    fn default_base_url_is_set() {
        let client = ChatClient::new("test-key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn builder_overrides_model() {
        let client = ChatClient::new("test-key").model("deepseek-reasoner");
        assert_eq!(client.model_name(), "deepseek-reasoner");
    }

    #[test]
    fn completions_url_includes_path() {
        let client = ChatClient::new("test-key").base_url("http://localhost:9999/");
        assert_eq!(
            client.completions_url(),
            "http://localhost:9999/v1/chat/completions"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = ChatClient::new("sk-very-secret");
        let text = format!("{client:?}");
        assert!(!text.contains("sk-very-secret"));
        assert!(text.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn empty_key_fails_before_sending() {
        // Port 9 is discard; reaching the network would surface as a Network error.
        let client = ChatClient::new("  ").base_url("http://127.0.0.1:9");
        let err = client
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Config(_)), "got {err:?}");
    }
}
