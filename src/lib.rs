//! # Typewriter
//!
//! Human-paced reveal of streamed text for chat front ends.
//!
//! Replies from a language model arrive in bursts. Typewriter decouples
//! arrival from presentation: text is split into committed tokens, and a
//! deterministic state machine reveals them one at a time with natural
//! pauses, whether the text is complete up front or still streaming in.
//!
//! ## Core Concepts
//!
//! - **Commit boundary**: a trailing word is only revealed once it can no longer grow
//! - **Progressive reveal**: new chunks extend the token list without rewinding
//! - **Completion gating**: "done" fires once, and never while the stream is open
//! - **Actor model**: the stream is read on its own thread; one loop owns the text
//!
//! ## Example
//!
//! ```rust
//! use std::time::Instant;
//! use typewriter::{RevealConfig, RevealEvent, RevealSession};
//!
//! let mut session = RevealSession::complete("Hi there", RevealConfig::default());
//! let mut now = Instant::now();
//! let mut completed = 0;
//! loop {
//!     let step = session.tick(now);
//!     completed += step.events.iter().filter(|e| **e == RevealEvent::Completed).count();
//!     match step.next_deadline {
//!         Some(due) => now = due,
//!         None => break,
//!     }
//! }
//! assert_eq!(session.view().visible, "Hi there");
//! assert_eq!(completed, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod config;
pub mod error;
pub mod pacing;
pub mod session;
pub mod terminal;
pub mod text;
pub mod transcript;
pub mod widget;

// Re-exports for convenience
pub use actor::{Control, DriverConfig, DriverHandle, DriverOutcome, Frame, RevealDriver, StreamEvent};
pub use config::{AnswerStyle, Language, Preferences, RevealConfig, RevealMode};
pub use error::{Error, Result};
pub use pacing::{RevealEngine, RevealEvent, RevealState, RevealView, Step};
pub use session::RevealSession;
pub use text::{SourceText, StreamState, TokenPolicy, FALLBACK_ERROR_MESSAGE};
pub use transcript::{ChatMessage, Role, Transcript};
pub use widget::{TypewriterConfig, TypewriterWidget};
