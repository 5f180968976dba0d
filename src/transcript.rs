//! Chat transcript: the message list a reveal session animates into.
//!
//! Assistant replies are created incomplete and marked complete once their
//! reveal finishes. Anything loaded from disk is treated as already shown,
//! so a reload never re-animates old replies.

use crate::config::AnswerStyle;
use crate::error::{Error, Result};
use crate::text::{append_failure, SourceText, StreamState};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking.
    User,
    /// The assistant answering.
    Assistant,
}

/// One entry of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Author.
    pub role: Role,
    /// Message body.
    pub text: String,
    /// Name of an attached file, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    /// Whether the reveal has finished (or never needs to run).
    #[serde(default = "default_true")]
    pub complete: bool,
    /// Whether the body arrives from a stream.
    #[serde(default)]
    pub stream: bool,
    /// Whether that stream has closed.
    #[serde(default)]
    pub stream_ended: bool,
    /// Answer style the reply was requested with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<AnswerStyle>,
}

const fn default_true() -> bool {
    true
}

impl ChatMessage {
    /// Whether this message still has to be revealed.
    pub const fn needs_reveal(&self) -> bool {
        !self.complete
    }

    /// Stream flags of this message.
    pub const fn stream_state(&self) -> StreamState {
        StreamState {
            is_streaming: self.stream,
            stream_ended: self.stream_ended,
        }
    }

    /// A source text holding the current body, for feeding a reveal.
    pub fn source(&self) -> SourceText {
        if self.stream_state().is_open() {
            let mut source = SourceText::streaming();
            source.append(&self.text);
            source
        } else {
            SourceText::complete(self.text.clone())
        }
    }
}

/// Ordered list of chat messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    /// Backend session this conversation belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<u64>,
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a user message. An empty prompt with an attachment is shown
    /// as an upload notice.
    pub fn push_user(&mut self, text: impl Into<String>, attachment: Option<String>) -> usize {
        let mut text = text.into();
        if text.is_empty() {
            if let Some(name) = &attachment {
                text = format!("[Uploaded file: {name}]");
            }
        }
        self.push(ChatMessage {
            role: Role::User,
            text,
            attachment,
            complete: true,
            stream: false,
            stream_ended: false,
            style: None,
        })
    }

    /// Open an empty assistant reply that will be filled from a stream.
    pub fn begin_streaming_reply(&mut self, style: AnswerStyle) -> usize {
        self.push(ChatMessage {
            role: Role::Assistant,
            text: String::new(),
            attachment: None,
            complete: false,
            stream: true,
            stream_ended: false,
            style: Some(style),
        })
    }

    /// Add a reply that arrived in one piece. It is still animated once.
    pub fn push_static_reply(&mut self, text: impl Into<String>, style: AnswerStyle) -> usize {
        self.push(ChatMessage {
            role: Role::Assistant,
            text: text.into(),
            attachment: None,
            complete: false,
            stream: false,
            stream_ended: true,
            style: Some(style),
        })
    }

    /// Append a chunk to the open streaming reply.
    ///
    /// Returns `false` if there is no open reply to append to.
    pub fn append_to_reply(&mut self, chunk: &str) -> bool {
        match self.open_reply_mut() {
            Some(reply) => {
                reply.text.push_str(chunk);
                true
            }
            None => {
                tracing::warn!(len = chunk.len(), "chunk for a reply that is not open");
                false
            }
        }
    }

    /// Close the open streaming reply.
    pub fn end_reply(&mut self) -> bool {
        match self.open_reply_mut() {
            Some(reply) => {
                reply.stream_ended = true;
                true
            }
            None => false,
        }
    }

    /// Close the open streaming reply with a failure message.
    pub fn fail_reply(&mut self, message: &str) -> bool {
        match self.open_reply_mut() {
            Some(reply) => {
                append_failure(&mut reply.text, message);
                reply.stream_ended = true;
                true
            }
            None => false,
        }
    }

    /// Mark a reply as fully revealed.
    ///
    /// Refused while the message's stream is still open, so a reveal that
    /// caught up with a slow stream cannot complete it early.
    pub fn mark_complete(&mut self, index: usize) -> bool {
        let Some(message) = self.messages.get_mut(index) else {
            return false;
        };
        if message.stream_state().is_open() {
            tracing::debug!(index, "not marking an open stream complete");
            return false;
        }
        message.complete = true;
        true
    }

    /// Remove all messages and forget the session.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.session_id = None;
    }

    /// Write the transcript as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::TranscriptFormat {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| Error::TranscriptIo {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a transcript written by [`Transcript::save`].
    ///
    /// Every loaded message is marked complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::TranscriptIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut transcript: Self =
            serde_json::from_str(&raw).map_err(|source| Error::TranscriptFormat {
                path: path.to_path_buf(),
                source,
            })?;
        for message in &mut transcript.messages {
            message.complete = true;
        }
        tracing::debug!(messages = transcript.len(), "transcript loaded");
        Ok(transcript)
    }

    fn push(&mut self, message: ChatMessage) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    fn open_reply_mut(&mut self) -> Option<&mut ChatMessage> {
        self.messages
            .last_mut()
            .filter(|m| m.role == Role::Assistant && m.stream_state().is_open())
    }
}
