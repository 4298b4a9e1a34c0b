//! Line assembly for the byte-oriented serial stream
//!
//! A protocol line is actionable only once its `\n` delimiter has
//! arrived and it is non-empty after trimming. Input that grows past
//! the maximum line length without a delimiter is discarded wholesale
//! rather than buffered indefinitely.

use tracing::warn;

/// Buffers raw chunks and emits complete, trimmed lines.
pub struct LineAssembler {
    buf: Vec<u8>,
    max_len: usize,
    /// Set after an oversized discard; bytes are skipped until the next delimiter
    overflowed: bool,
}

impl LineAssembler {
    pub fn new(max_len: usize) -> Self {
        Self {
            buf: Vec::with_capacity(max_len),
            max_len,
            overflowed: false,
        }
    }

    /// Feed a chunk of raw bytes, returning every line completed by it.
    ///
    /// Decoding is permissive: invalid UTF-8 sequences are replaced,
    /// never fatal. Empty and whitespace-only lines are not emitted.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &b in bytes {
            if b == b'\n' {
                if self.overflowed {
                    // Tail of a discarded oversized line
                    self.overflowed = false;
                    continue;
                }
                let text = String::from_utf8_lossy(&self.buf);
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    lines.push(trimmed.to_string());
                }
                self.buf.clear();
            } else if self.overflowed {
                // Skip until the delimiter resynchronizes the stream
            } else {
                self.buf.push(b);
                if self.buf.len() > self.max_len {
                    warn!(
                        "Discarding oversized line ({} bytes without delimiter)",
                        self.buf.len()
                    );
                    self.buf.clear();
                    self.overflowed = true;
                }
            }
        }

        lines
    }

    /// Drop any partially assembled input.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflowed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let mut assembler = LineAssembler::new(128);
        assert_eq!(assembler.push(b"MIC:TOGGLE\n"), vec!["MIC:TOGGLE"]);
    }

    #[test]
    fn test_split_across_chunks() {
        let mut assembler = LineAssembler::new(128);
        assert!(assembler.push(b"MIC:ST").is_empty());
        assert_eq!(assembler.push(b"ATE?\n"), vec!["MIC:STATE?"]);
    }

    #[test]
    fn test_multiple_lines_in_order() {
        let mut assembler = LineAssembler::new(128);
        let lines = assembler.push(b"MIC:STATE?\nMIC:TOGGLE\nBTN:GP0\n");
        assert_eq!(lines, vec!["MIC:STATE?", "MIC:TOGGLE", "BTN:GP0"]);
    }

    #[test]
    fn test_crlf_trimmed() {
        let mut assembler = LineAssembler::new(128);
        assert_eq!(assembler.push(b"MIC:TOGGLE\r\n"), vec!["MIC:TOGGLE"]);
    }

    #[test]
    fn test_empty_lines_not_emitted() {
        let mut assembler = LineAssembler::new(128);
        assert!(assembler.push(b"\n  \n\r\n").is_empty());
    }

    #[test]
    fn test_oversized_line_discarded() {
        let mut assembler = LineAssembler::new(8);
        assert!(assembler.push(b"AAAAAAAAAAAAAAAA").is_empty());
        // The delimiter ends the discarded line; the next line survives
        let lines = assembler.push(b"AAAA\nBTN:GP0\n");
        assert_eq!(lines, vec!["BTN:GP0"]);
    }

    #[test]
    fn test_exact_max_length_accepted() {
        let mut assembler = LineAssembler::new(8);
        assert_eq!(assembler.push(b"12345678\n"), vec!["12345678"]);
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let mut assembler = LineAssembler::new(128);
        let lines = assembler.push(b"MIC:\xFF\n");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("MIC:"));
    }

    #[test]
    fn test_reset_drops_partial_input() {
        let mut assembler = LineAssembler::new(128);
        assert!(assembler.push(b"MIC:TOG").is_empty());
        assembler.reset();
        assert_eq!(assembler.push(b"BTN:GP0\n"), vec!["BTN:GP0"]);
    }
}
