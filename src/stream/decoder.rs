//! Incremental UTF-8 decoding across chunk boundaries.

/// Decodes a byte stream chunk by chunk.
///
/// A multi-byte character split across two chunks is held back until the
/// rest of it arrives. Invalid sequences are replaced with U+FFFD and
/// counted in [`Utf8Decoder::anomalies`].
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
    anomalies: usize,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `chunk` (plus any held-back bytes) as possible.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let owned;
        let mut bytes: &[u8] = if self.pending.is_empty() {
            chunk
        } else {
            self.pending.extend_from_slice(chunk);
            owned = std::mem::take(&mut self.pending);
            &owned
        };

        let mut out = String::with_capacity(bytes.len());
        loop {
            match std::str::from_utf8(bytes) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, rest) = bytes.split_at(err.valid_up_to());
                    // valid_up_to guarantees this prefix is UTF-8
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(bad) => {
                            self.anomalies += 1;
                            tracing::warn!(
                                invalid_bytes = bad,
                                "stream: invalid UTF-8 sequence replaced"
                            );
                            out.push(char::REPLACEMENT_CHARACTER);
                            bytes = &rest[bad..];
                        }
                        None => {
                            self.pending.extend_from_slice(rest);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush bytes still held back at end of stream.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        self.anomalies += 1;
        tracing::warn!(
            pending_bytes = self.pending.len(),
            "stream: truncated UTF-8 sequence at end of stream"
        );
        let pending = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&pending).into_owned()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of malformed sequences seen so far.
    pub fn anomalies(&self) -> usize {
        self.anomalies
    }
}
