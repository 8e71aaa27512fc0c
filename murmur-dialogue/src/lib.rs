#![deny(missing_docs)]
//! Example dialogues for priming a chat model.
//!
//! A dialogue is plain text where each turn starts with `user: ` or
//! `assistant: `. Lines without a prefix continue the current turn and are
//! joined according to a [`JoinStyle`]:
//!
//! ```text
//! user: Hi there
//! assistant: Hello!
//! How can I help?
//! ```
//!
//! [`parse_dialogue`] works on a string; [`load_dialogue`] reads a file or
//! fetches a URL first.

pub mod parse;
pub mod source;

pub use parse::{JoinStyle, parse_dialogue};
pub use source::{DialogueSource, load_dialogue};

pub use murmur_types::{ChatMessage, DialogueError, Role};
