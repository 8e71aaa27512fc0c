//! Property-based tests: decoded deltas do not depend on how the body is chunked.

use murmur_sse::{SseDecoder, SseEvent, StreamTerminator, Utf8ChunkDecoder};
use proptest::prelude::*;

fn body_for(deltas: &[String], done: bool) -> String {
    let mut body = String::new();
    for d in deltas {
        let frame = serde_json::json!({"choices": [{"delta": {"content": d}}]});
        body.push_str(&format!("data: {frame}\n\n"));
    }
    if done {
        body.push_str("data: [DONE]\n");
    }
    body
}

/// Split `bytes` at the given (unsorted, possibly repeated) cut points.
fn split_at_points(bytes: &[u8], mut cuts: Vec<usize>) -> Vec<&[u8]> {
    cuts.iter_mut().for_each(|c| *c %= bytes.len() + 1);
    cuts.sort_unstable();
    cuts.dedup();
    let mut pieces = Vec::new();
    let mut start = 0;
    for cut in cuts {
        pieces.push(&bytes[start..cut]);
        start = cut;
    }
    pieces.push(&bytes[start..]);
    pieces
}

fn decode_all(pieces: &[&[u8]]) -> String {
    let mut decoder = SseDecoder::new(StreamTerminator::Done);
    let mut out = String::new();
    for piece in pieces {
        for event in decoder.push(piece) {
            if let SseEvent::Delta(d) = event {
                out.push_str(&d);
            }
        }
    }
    if let Some(SseEvent::Delta(d)) = decoder.finish() {
        out.push_str(&d);
    }
    out
}

proptest! {
    #[test]
    fn utf8_decoding_is_chunking_invariant(
        text in "\\PC{0,64}",
        cuts in proptest::collection::vec(any::<usize>(), 0..8),
    ) {
        let bytes = text.as_bytes();
        let mut decoder = Utf8ChunkDecoder::new();
        let mut out = String::new();
        for piece in split_at_points(bytes, cuts) {
            out.push_str(&decoder.decode(piece));
        }
        out.push_str(&decoder.finish());
        prop_assert_eq!(out, text);
    }

    #[test]
    fn deltas_are_chunking_invariant(
        deltas in proptest::collection::vec("\\PC{1,12}", 0..8),
        done in any::<bool>(),
        cuts in proptest::collection::vec(any::<usize>(), 0..12),
    ) {
        let body = body_for(&deltas, done);
        let whole = decode_all(&[body.as_bytes()]);
        let chunked = decode_all(&split_at_points(body.as_bytes(), cuts));
        prop_assert_eq!(&chunked, &whole);
        prop_assert_eq!(whole, deltas.concat());
    }
}
