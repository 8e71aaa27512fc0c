//! Async drivers that run an [`SseDecoder`] over a byte stream.

use futures::{Stream, StreamExt};

use crate::decoder::{SseDecoder, SseEvent};
use crate::terminator::StreamTerminator;

/// What a completed [`decode_stream`] call observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Number of deltas handed to the callback.
    pub deltas: usize,
    /// Number of `data:` frames skipped as malformed JSON.
    pub malformed_frames: usize,
    /// Whether the stream ended on a terminator frame rather than exhaustion.
    pub terminated: bool,
}

/// Turn a raw byte stream into a stream of text deltas.
///
/// The returned stream ends after the terminator frame, or after the trailing
/// buffer has been flushed once the byte stream is exhausted. A transport
/// error is yielded once and ends the stream.
pub fn delta_stream<S, B, E>(
    byte_stream: S,
    terminator: StreamTerminator,
) -> impl Stream<Item = Result<String, E>> + Send + 'static
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Send + 'static,
{
    async_stream::stream! {
        let mut decoder = SseDecoder::new(terminator);
        let mut bytes_stream = std::pin::pin!(byte_stream);

        while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            for event in decoder.push(chunk.as_ref()) {
                match event {
                    SseEvent::Delta(delta) => yield Ok(delta),
                    SseEvent::Terminated => return,
                }
            }
        }

        if let Some(SseEvent::Delta(delta)) = decoder.finish() {
            yield Ok(delta);
        }
    }
}

/// Consume a byte stream, calling `on_delta` once per text delta in arrival
/// order.
///
/// Returns when the terminator frame is seen or the stream is exhausted. The
/// first transport error aborts decoding and is returned as-is; deltas already
/// delivered are not repeated.
pub async fn decode_stream<S, B, E, F>(
    byte_stream: S,
    terminator: StreamTerminator,
    mut on_delta: F,
) -> Result<DecodeSummary, E>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    F: FnMut(&str),
{
    let mut decoder = SseDecoder::new(terminator);
    let mut summary = DecodeSummary::default();
    let mut bytes_stream = std::pin::pin!(byte_stream);

    'read: while let Some(chunk_result) = bytes_stream.next().await {
        let chunk = chunk_result?;
        for event in decoder.push(chunk.as_ref()) {
            match event {
                SseEvent::Delta(delta) => {
                    summary.deltas += 1;
                    on_delta(&delta);
                }
                SseEvent::Terminated => break 'read,
            }
        }
    }

    if let Some(SseEvent::Delta(delta)) = decoder.finish() {
        summary.deltas += 1;
        on_delta(&delta);
    }

    summary.terminated = decoder.is_terminated();
    summary.malformed_frames = decoder.malformed_frames();
    tracing::debug!(
        deltas = summary.deltas,
        malformed = summary.malformed_frames,
        terminated = summary.terminated,
        "stream decoded"
    );
    Ok(summary)
}
