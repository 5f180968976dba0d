//! Pacing: delay computation, clocks and the reveal state machine.
//!
//! The engine is a plain value driven by explicit `tick(now, source)` calls,
//! so it can be stepped with a [`ManualClock`] in tests and with a
//! [`SystemClock`] by the driver actor.
//!
//! # Example
//!
//! ```rust
//! use typewriter::pacing::{Clock, ManualClock, RevealEngine, RevealEvent};
//! use typewriter::text::SourceText;
//! use typewriter::RevealConfig;
//!
//! let clock = ManualClock::new();
//! let source = SourceText::complete("Stay safe online.");
//! let mut engine = RevealEngine::new(RevealConfig::default());
//!
//! let mut completed = false;
//! loop {
//!     let step = engine.tick(clock.now(), &source);
//!     completed |= step.events.contains(&RevealEvent::Completed);
//!     match step.next_deadline {
//!         Some(due) => clock.advance_to(due),
//!         None => break,
//!     }
//! }
//! assert!(completed);
//! assert_eq!(engine.view(&source).visible, "Stay safe online.");
//! ```

mod clock;
mod delay;
mod engine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use delay::{
    base_delay, sample_jitter, token_delay, INSTANT_DELAY, LONG_WORD_GRAPHEMES, LONG_WORD_PAUSE,
    LOOP_PAUSE, MIN_DELAY,
};
pub use engine::{RevealEngine, RevealEvent, RevealState, RevealView, Step};
