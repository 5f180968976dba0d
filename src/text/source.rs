//! Source text: the growing string a reveal session reads from.

/// Message appended when the upstream stream fails mid-flight.
pub const FALLBACK_ERROR_MESSAGE: &str = "Sorry, an error occurred.";

/// Stream status flags supplied by the upstream consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamState {
    /// The text is delivered incrementally.
    pub is_streaming: bool,
    /// The final chunk has been appended and the stream is closed.
    pub stream_ended: bool,
}

impl StreamState {
    /// Text delivered once, in full.
    pub const STATIC: Self = Self {
        is_streaming: false,
        stream_ended: true,
    };

    /// A stream that has just been opened.
    pub const OPEN: Self = Self {
        is_streaming: true,
        stream_ended: false,
    };

    /// Whether more text may still arrive.
    #[inline]
    pub const fn is_open(&self) -> bool {
        self.is_streaming && !self.stream_ended
    }
}

/// The full text received so far, plus its stream status.
///
/// `revision` changes whenever the content changes; `generation` only
/// changes when the content is replaced wholesale. Readers compare these
/// counters instead of diffing strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    stream: StreamState,
    revision: u64,
    generation: u64,
}

impl SourceText {
    /// Text that is complete from the start.
    pub fn complete(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stream: StreamState::STATIC,
            revision: 0,
            generation: 0,
        }
    }

    /// An empty text that will be filled by a stream.
    pub fn streaming() -> Self {
        Self {
            text: String::new(),
            stream: StreamState::OPEN,
            revision: 0,
            generation: 0,
        }
    }

    /// Current text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Current stream status.
    #[inline]
    pub const fn stream(&self) -> StreamState {
        self.stream
    }

    /// Whether more text may still arrive.
    #[inline]
    pub const fn is_open(&self) -> bool {
        self.stream.is_open()
    }

    /// Content revision counter.
    #[inline]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Wholesale-replacement counter.
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Append a decoded chunk.
    ///
    /// Returns `false` (and leaves the text untouched) once the stream has
    /// ended; the text is append-only while open.
    pub fn append(&mut self, chunk: &str) -> bool {
        if self.stream.stream_ended && self.stream.is_streaming {
            tracing::warn!(len = chunk.len(), "dropping chunk received after stream end");
            return false;
        }
        if chunk.is_empty() {
            return true;
        }
        self.text.push_str(chunk);
        self.revision += 1;
        true
    }

    /// Replace the whole text.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.revision += 1;
        self.generation += 1;
    }

    /// Mark the stream as closed. Idempotent.
    pub const fn end_stream(&mut self) {
        self.stream.stream_ended = true;
    }

    /// Record a transport failure.
    ///
    /// The fallback message is appended (separated from any partial text by
    /// a blank line) and the stream is closed, so the reveal can finish.
    pub fn fail(&mut self, message: &str) {
        append_failure(&mut self.text, message);
        self.revision += 1;
        self.stream.stream_ended = true;
    }
}

/// Append a failure message to partially received text.
///
/// Whitespace-only text is replaced; otherwise the message goes after a
/// blank line (or directly, if the text already ends a line).
pub fn append_failure(text: &mut String, message: &str) {
    if text.trim().is_empty() {
        text.clear();
    } else if !text.ends_with('\n') {
        text.push_str("\n\n");
    }
    text.push_str(message);
}

impl Default for SourceText {
    fn default() -> Self {
        Self::complete(String::new())
    }
}
