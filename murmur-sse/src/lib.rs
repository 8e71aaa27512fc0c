#![deny(missing_docs)]
//! Incremental decoder for streamed chat completion responses.
//!
//! Chat completion endpoints answer a streaming request with a body of
//! server-sent events:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Hi"}}]}
//!
//! data: {"choices":[{"delta":{"content":" there"}}]}
//!
//! data: [DONE]
//! ```
//!
//! The network delivers that body in arbitrary chunks. [`SseDecoder`] turns
//! the chunks back into `data:` frames and yields the text delta of each one;
//! [`delta_stream`] and [`decode_stream`] drive it over an async byte stream.
//!
//! Which frame ends the stream depends on the upstream API, so it is a
//! configurable [`StreamTerminator`].

pub mod decoder;
pub mod stream;
pub mod terminator;
pub mod utf8;

pub use decoder::{DATA_PREFIX, SseDecoder, SseEvent, delta_at_path};
pub use stream::{DecodeSummary, decode_stream, delta_stream};
pub use terminator::{DONE_SENTINEL, Frame, StreamTerminator};
pub use utf8::Utf8ChunkDecoder;
