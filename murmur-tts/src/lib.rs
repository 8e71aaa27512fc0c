#![deny(missing_docs)]
//! Text-to-speech over the Volcano Engine (`openspeech`) HTTP API.
//!
//! [`TtsClient::synthesize`] strips parenthesized stage directions from the
//! text, posts a synthesis request, and returns the base64 audio the service
//! answers with. Credentials and the voice live in [`TtsConfig`].

pub mod client;
pub mod config;
pub(crate) mod error;
pub mod request;
pub mod text;

pub use client::TtsClient;
pub use config::TtsConfig;
pub use request::{TtsRequest, TtsResponse};
pub use text::filter_bracket_content;

pub use murmur_types::ServiceError;
