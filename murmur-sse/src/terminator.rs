//! End-of-stream detection.

use std::sync::Arc;

use serde_json::Value;

/// The literal payload OpenAI-style APIs send as their last frame.
pub const DONE_SENTINEL: &str = "[DONE]";

/// A view of one `data:` frame, handed to a [`StreamTerminator`].
///
/// Every frame is first offered as [`Frame::Raw`]; frames that parse as JSON
/// are then offered again as [`Frame::Json`].
#[derive(Debug, Clone, Copy)]
pub enum Frame<'a> {
    /// The trimmed payload text after the `data: ` prefix.
    Raw(&'a str),
    /// The parsed JSON payload.
    Json(&'a Value),
}

type TerminatorFn = dyn Fn(Frame<'_>) -> bool + Send + Sync;

/// Decides which frame ends the stream.
///
/// Upstream APIs disagree: some send a literal `data: [DONE]`, others a JSON
/// object carrying `"completed": true`.
#[derive(Clone, Default)]
pub enum StreamTerminator {
    /// Stop at the literal `[DONE]` payload.
    #[default]
    Done,
    /// Stop at a JSON payload whose `completed` field is `true`.
    CompletedFlag,
    /// Stop at whichever of the two conventions shows up first.
    Either,
    /// Stop when the predicate returns `true`.
    Custom(Arc<TerminatorFn>),
}

impl StreamTerminator {
    /// Build a terminator from an arbitrary predicate.
    pub fn custom(predicate: impl Fn(Frame<'_>) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(predicate))
    }

    /// Whether `frame` signals the end of the stream.
    #[must_use]
    pub fn is_terminal(&self, frame: Frame<'_>) -> bool {
        match (self, frame) {
            (Self::Custom(predicate), frame) => predicate(frame),
            (Self::Done | Self::Either, Frame::Raw(raw)) => raw == DONE_SENTINEL,
            (Self::CompletedFlag | Self::Either, Frame::Json(json)) => {
                json.get("completed").and_then(Value::as_bool) == Some(true)
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for StreamTerminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Done => f.write_str("Done"),
            Self::CompletedFlag => f.write_str("CompletedFlag"),
            Self::Either => f.write_str("Either"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
