#![deny(missing_docs)]
//! Streaming chat completions from OpenAI-compatible HTTP endpoints.
//!
//! [`ChatClient`] posts the conversation with `stream: true` and decodes the
//! server-sent-event body into text deltas with [`murmur_sse`].
//!
//! ```no_run
//! use murmur_chat::ChatClient;
//! use murmur_types::ChatMessage;
//!
//! # async fn run() -> Result<(), murmur_types::ServiceError> {
//! let client = ChatClient::from_env()?;
//! let summary = client
//!     .stream_to(&[ChatMessage::user("Hello")], |delta| print!("{delta}"))
//!     .await?;
//! println!("\n{} deltas", summary.deltas);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub(crate) mod error;
pub mod request;

pub use client::{API_KEY_ENV, ChatClient, DeltaStream};
pub use request::{ChatCompletionRequest, ResponseFormat};

// Re-exported for convenience
pub use murmur_sse::{DecodeSummary, StreamTerminator};
pub use murmur_types::{ChatMessage, Role, ServiceError};
