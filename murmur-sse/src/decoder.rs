//! Synchronous SSE frame decoder.
//!
//! [`SseDecoder`] owns the per-response buffer. Feed it raw chunks with
//! [`SseDecoder::push`] and, once the body is exhausted, call
//! [`SseDecoder::finish`] to handle a trailing frame that never got its
//! newline.

use serde_json::Value;

use crate::terminator::{Frame, StreamTerminator};
use crate::utf8::Utf8ChunkDecoder;

/// Prefix of every event line that carries a payload.
pub const DATA_PREFIX: &str = "data: ";

/// Something the decoder extracted from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// An incremental fragment of generated text.
    Delta(String),
    /// The terminator frame was seen; nothing after it is decoded.
    Terminated,
}

/// Look up the text delta at `choices[0].delta.content`.
///
/// Any missing key along the path yields `None`, as does a non-string value.
#[must_use]
pub fn delta_at_path(value: &Value) -> Option<&str> {
    value
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
}

/// Reassembles `data:` frames from arbitrarily split chunks.
#[derive(Debug)]
pub struct SseDecoder {
    terminator: StreamTerminator,
    utf8: Utf8ChunkDecoder,
    line_buf: String,
    terminated: bool,
    malformed: usize,
}

impl SseDecoder {
    /// Create a decoder that stops at frames accepted by `terminator`.
    #[must_use]
    pub fn new(terminator: StreamTerminator) -> Self {
        Self {
            terminator,
            utf8: Utf8ChunkDecoder::new(),
            line_buf: String::new(),
            terminated: false,
            malformed: 0,
        }
    }

    /// Whether the terminator frame has been seen.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Number of `data:` frames skipped because their payload was not JSON.
    #[must_use]
    pub fn malformed_frames(&self) -> usize {
        self.malformed
    }

    /// Decode one chunk and return the events of every line it completes.
    ///
    /// Once [`SseEvent::Terminated`] has been returned, the remaining buffer is
    /// discarded and further chunks are ignored.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        if self.terminated {
            return Vec::new();
        }

        let text = self.utf8.decode(chunk);
        self.line_buf.push_str(&text);

        let mut events = Vec::new();
        while let Some(newline_pos) = self.line_buf.find('\n') {
            let line = self.line_buf[..newline_pos].to_string();
            self.line_buf.drain(..=newline_pos);

            match self.process_line(&line) {
                Some(SseEvent::Terminated) => {
                    self.line_buf.clear();
                    events.push(SseEvent::Terminated);
                    break;
                }
                Some(event) => events.push(event),
                None => {}
            }
        }
        events
    }

    /// Handle whatever is left once the byte stream is exhausted.
    ///
    /// The remainder is trimmed and, if it is a `data:` frame, processed like
    /// any other line. The buffer is emptied, so a second call returns `None`.
    pub fn finish(&mut self) -> Option<SseEvent> {
        if self.terminated {
            return None;
        }

        let tail = self.utf8.finish();
        self.line_buf.push_str(&tail);
        let rest = std::mem::take(&mut self.line_buf);
        let line = rest.trim();
        if line.is_empty() {
            return None;
        }

        tracing::trace!(len = line.len(), "processing unterminated trailing frame");
        self.process_line(line)
    }

    /// Process one complete line.
    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        // event:, id:, retry: and comment lines carry nothing we use
        let payload = line.strip_prefix(DATA_PREFIX)?.trim();

        if self.terminator.is_terminal(Frame::Raw(payload)) {
            self.terminated = true;
            return Some(SseEvent::Terminated);
        }
        if payload.is_empty() {
            return None;
        }

        let json: Value = match serde_json::from_str(payload) {
            Ok(v) => v,
            Err(e) => {
                self.malformed += 1;
                tracing::warn!(error = %e, frame = %line, "skipping malformed SSE frame");
                return None;
            }
        };

        if self.terminator.is_terminal(Frame::Json(&json)) {
            self.terminated = true;
            return Some(SseEvent::Terminated);
        }

        delta_at_path(&json)
            .filter(|delta| !delta.is_empty())
            .map(|delta| SseEvent::Delta(delta.to_string()))
    }
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new(StreamTerminator::default())
    }
}
