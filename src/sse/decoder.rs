//! Incremental line framing for the response body
//!
//! Turns byte chunks of arbitrary size into complete `\n`-terminated lines.
//! Bytes are buffered raw and only decoded once a full line is available, so a
//! multi-byte UTF-8 character split across chunks is reassembled before
//! decoding (a `\n` byte never occurs inside a multi-byte sequence).

/// Stateful line decoder for one ordered byte stream
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes of the current, not yet terminated line
    buffer: Vec<u8>,
}

impl FrameDecoder {
    /// Create a new decoder with an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning every line completed by it in arrival order.
    ///
    /// Lines are returned without the terminating `\n` (and without a
    /// trailing `\r`). The unterminated tail stays buffered for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let Some(last_newline) = chunk.iter().rposition(|&b| b == b'\n') else {
            self.buffer.extend_from_slice(chunk);
            return Vec::new();
        };

        self.buffer.extend_from_slice(&chunk[..last_newline]);
        let complete = std::mem::replace(&mut self.buffer, chunk[last_newline + 1..].to_vec());

        complete.split(|&b| b == b'\n').map(decode_line).collect()
    }

    /// Number of buffered bytes not yet terminated by a newline
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// End of stream: drop any unterminated residue.
    ///
    /// Returns the number of bytes discarded. A final line without `\n` is
    /// never emitted.
    pub fn finish(&mut self) -> usize {
        let dropped = self.buffer.len();
        self.buffer.clear();
        dropped
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
