//! Widgets: terminal presentation of a reveal.
//!
//! - [`TypewriterWidget`]: incremental text with a blinking caret

mod typewriter;

pub use typewriter::{TypewriterConfig, TypewriterWidget};
