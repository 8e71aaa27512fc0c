//! Stateful UTF-8 decoding across chunk boundaries.

/// Decodes a sequence of byte chunks into text without corrupting
/// multi-byte characters that straddle two chunks.
///
/// An incomplete sequence at the end of a chunk is held back until the next
/// chunk arrives. Invalid sequences decode to U+FFFD, so decoding never fails.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    /// Create a decoder with no pending bytes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, returning all text that is complete so far.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let complete = complete_prefix_len(&bytes);
        self.pending = bytes.split_off(complete);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Flush any held-back bytes. A dangling partial sequence becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        let pending = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&pending).into_owned()
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Length of the longest prefix that does not end inside a truncated
/// multi-byte sequence. Invalid bytes in the middle count as complete.
fn complete_prefix_len(bytes: &[u8]) -> usize {
    let mut offset = 0;
    loop {
        match std::str::from_utf8(&bytes[offset..]) {
            Ok(_) => return bytes.len(),
            Err(e) => match e.error_len() {
                Some(len) => offset += e.valid_up_to() + len,
                None => return offset + e.valid_up_to(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.decode(b"hello"), "hello");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn split_multibyte_char_is_reassembled() {
        // "你" is E4 BD A0
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.decode(&[b'a', 0xE4]), "a");
        assert_eq!(decoder.pending_len(), 1);
        assert_eq!(decoder.decode(&[0xBD]), "");
        assert_eq!(decoder.decode(&[0xA0, b'b']), "你b");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn every_split_point_round_trips() {
        let source = "héllo 世界 🎉 done";
        let bytes = source.as_bytes();
        for split in 0..=bytes.len() {
            let mut decoder = Utf8ChunkDecoder::new();
            let mut out = decoder.decode(&bytes[..split]);
            out.push_str(&decoder.decode(&bytes[split..]));
            out.push_str(&decoder.finish());
            assert_eq!(out, source, "split at {split}");
        }
    }

    #[test]
    fn invalid_byte_becomes_replacement_char() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.decode(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
    }

    #[test]
    fn finish_flushes_dangling_sequence() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.decode(&[0xF0, 0x9F]), "");
        assert_eq!(decoder.finish(), "\u{FFFD}");
        assert_eq!(decoder.finish(), "");
    }
}
