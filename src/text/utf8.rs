//! Incremental UTF-8 decoding for byte streams.
//!
//! Network chunks can split a multi-byte code point (`0xC3` then `0xA9` for
//! `é`). [`Utf8Decoder`] buffers the incomplete tail until the next chunk
//! arrives. Invalid sequences are replaced with U+FFFD instead of failing,
//! so a corrupt byte never stalls the reveal.

/// Stateful decoder that turns byte chunks into text chunks.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a decoder with nothing buffered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes held back waiting for the rest of a code point.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Decode a chunk, returning every complete character it finishes.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::with_capacity(self.pending.len());

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(std::str::from_utf8(&self.pending[..valid]).unwrap_or_default());
                    match err.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + bad);
                        }
                        None => {
                            // Incomplete sequence at the end; wait for more.
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush at end of stream.
    ///
    /// A truncated trailing code point becomes a single U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        self.pending.clear();
        char::REPLACEMENT_CHARACTER.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ascii_passthrough() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.push(b"hello "), "hello ");
        assert_eq!(decoder.push(b"world"), "world");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn test_split_code_point() {
        let bytes = "café".as_bytes();
        let (head, tail) = bytes.split_at(bytes.len() - 1);

        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.push(head), "caf");
        assert_eq!(decoder.pending_len(), 1);
        assert_eq!(decoder.push(tail), "é");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_four_byte_split_across_three_chunks() {
        let bytes = "🔒".as_bytes();
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.push(&bytes[..1]), "");
        assert_eq!(decoder.push(&bytes[1..3]), "");
        assert_eq!(decoder.push(&bytes[3..]), "🔒");
    }

    #[test]
    fn test_invalid_bytes_replaced() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.push(b"ok\xFFok"), "ok\u{FFFD}ok");
    }

    #[test]
    fn test_truncated_tail_at_finish() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.push(&[b'a', 0xE6, 0xBC]), "a");
        assert_eq!(decoder.finish(), "\u{FFFD}");
        assert_eq!(decoder.finish(), "");
    }
}
