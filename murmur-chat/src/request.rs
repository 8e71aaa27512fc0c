//! Request body for the chat completions endpoint.

use murmur_types::ChatMessage;
use serde::Serialize;

/// `POST /v1/chat/completions` body.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    /// Model identifier.
    pub model: &'a str,
    /// Conversation so far, oldest first.
    pub messages: &'a [ChatMessage],
    /// Always `true`; this client only speaks the streaming protocol.
    pub stream: bool,
    /// Requested output format.
    pub response_format: ResponseFormat,
}

impl<'a> ChatCompletionRequest<'a> {
    /// A streaming plain-text request.
    #[must_use]
    pub fn streaming(model: &'a str, messages: &'a [ChatMessage]) -> Self {
        Self {
            model,
            messages,
            stream: true,
            response_format: ResponseFormat::text(),
        }
    }
}

/// The `response_format` object.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    /// Format name, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    /// Plain text output.
    #[must_use]
    pub fn text() -> Self {
        Self {
            kind: "text".into(),
        }
    }
}
