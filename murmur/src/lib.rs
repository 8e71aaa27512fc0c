#![deny(missing_docs)]
//! # murmur umbrella crate
//!
//! One import surface for the murmur crates: the streaming SSE decoder, the
//! chat completion client, the speech client and the example-dialogue
//! loader, plus layered configuration. With the `cli` feature (default) it
//! also provides the `murmur` binary and its subscriber setup.

pub mod config;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod logging;

pub use murmur_chat;
pub use murmur_dialogue;
pub use murmur_sse;
pub use murmur_tts;
pub use murmur_types;

pub use config::{ConfigError, MurmurConfig, TerminatorKind};

/// Happy-path imports.
pub mod prelude {
    pub use murmur_chat::{ChatClient, DecodeSummary, StreamTerminator};
    pub use murmur_dialogue::{DialogueSource, JoinStyle, load_dialogue, parse_dialogue};
    pub use murmur_sse::{SseDecoder, SseEvent, decode_stream, delta_stream};
    pub use murmur_tts::{TtsClient, TtsConfig, filter_bracket_content};
    pub use murmur_types::{ChatMessage, DialogueError, Role, ServiceError};

    pub use crate::config::{ConfigError, MurmurConfig};
}
