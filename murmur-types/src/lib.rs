#![deny(missing_docs)]
//! Shared types for the murmur crates.
//!
//! [`ChatMessage`] is the wire shape every chat request carries, and
//! [`ServiceError`] is what every network-facing client returns.

pub mod error;
pub mod message;

pub use error::*;
pub use message::*;
