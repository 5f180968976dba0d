//! Message types for actor communication.
//!
//! These enums define the protocol between the stream consumer, the
//! driver loop and whoever controls the driver.

/// Events from the stream consumer thread.
///
/// A well-behaved stream sends any number of `Chunk`s followed by exactly
/// one `Ended` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Decoded text, in arrival order.
    Chunk(String),
    /// The stream closed normally after the last chunk.
    Ended,
    /// The transport failed; no more chunks will follow.
    Failed(String),
}

impl StreamEvent {
    /// Whether this event closes the stream.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended | Self::Failed(_))
    }
}

/// Commands sent to the driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Begin pacing (for sessions created with `auto_start` off).
    Start,
    /// Rewind to the first token.
    Restart,
    /// Tear the session down.
    Cancel,
}
