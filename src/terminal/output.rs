//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use std::io::Write;

/// Pre-allocated buffer for building terminal output.
///
/// Text and escape sequences for one frame are accumulated here, then
/// flushed in a single `write()` syscall so a caret never shows up half
/// erased.
#[derive(Debug)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical frame (1KB).
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Write a single character.
    #[inline]
    pub fn write_char(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.write_str(c.encode_utf8(&mut utf8));
    }

    /// Remember the current cursor position (DECSC).
    #[inline]
    pub fn save_cursor(&mut self) {
        self.data.extend_from_slice(b"\x1b7");
    }

    /// Return to the remembered cursor position (DECRC).
    #[inline]
    pub fn restore_cursor(&mut self) {
        self.data.extend_from_slice(b"\x1b8");
    }

    /// Erase from the cursor to the end of the screen.
    #[inline]
    pub fn clear_below(&mut self) {
        self.data.extend_from_slice(b"\x1b[J");
    }

    /// Erase the single-column character left of the cursor.
    #[inline]
    pub fn erase_previous(&mut self) {
        self.data.extend_from_slice(b"\x08 \x08");
    }

    /// Dim the following text.
    #[inline]
    pub fn set_dim(&mut self) {
        self.data.extend_from_slice(b"\x1b[2m");
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_sequences() {
        let mut out = OutputBuffer::new();
        out.save_cursor();
        out.write_str("hi");
        out.restore_cursor();
        out.clear_below();
        assert_eq!(out.as_bytes(), b"\x1b7hi\x1b8\x1b[J");
    }

    #[test]
    fn test_write_char_multibyte() {
        let mut out = OutputBuffer::new();
        out.write_char('▍');
        assert_eq!(out.as_bytes(), "▍".as_bytes());
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_flush_and_reuse() {
        let mut out = OutputBuffer::new();
        out.write_str("abc");
        out.erase_previous();

        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"abc\x08 \x08");

        out.clear();
        assert!(out.is_empty());
    }
}
