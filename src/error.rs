//! Error type shared by the fallible parts of the crate.
//!
//! The reveal engine itself never fails; errors only come from loading
//! configuration, persisting transcripts and spawning actor threads.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the typewriter crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A reveal option is out of range.
    #[error("invalid reveal configuration: {0}")]
    InvalidConfig(String),

    /// The preferences file exists but could not be read.
    #[error("failed to read preferences from {path}: {source}")]
    ReadPreferences {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The preferences file is not valid JSON for [`crate::Preferences`].
    #[error("failed to parse preferences {path}: {source}")]
    ParsePreferences {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// A transcript could not be read from or written to disk.
    #[error("transcript I/O failed for {path}: {source}")]
    TranscriptIo {
        /// Transcript path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A transcript could not be serialized or deserialized.
    #[error("transcript {path} is malformed: {source}")]
    TranscriptFormat {
        /// Transcript path.
        path: PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },

    /// Generic I/O failure (thread spawn, terminal output).
    #[error(transparent)]
    Io(#[from] io::Error),
}
