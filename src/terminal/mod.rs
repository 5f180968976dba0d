//! Terminal output primitives.
//!
//! Frames are assembled in an [`OutputBuffer`] and written in one go. The
//! [`CursorGuard`] keeps the hardware cursor out of the way of the drawn
//! caret.

mod guard;
mod output;

pub use guard::CursorGuard;
pub use output::OutputBuffer;
