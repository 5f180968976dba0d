//! Actor Model: Message-passing concurrency for streamed replies.
//!
//! This module implements the two moving parts around a reveal session:
//! - **Stream Consumer**: Reads the reply byte stream, forwards decoded text
//! - **Driver**: Applies stream events, ticks the engine, hands out frames
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    StreamEvent     ┌──────────────┐
//! │   Consumer   │ ─────────────────▶ │              │   Frame
//! │    Thread    │                    │    Driver    │ ─────────▶ widget
//! └──────────────┘                    │     Loop     │
//!                                     │              │
//! ┌──────────────┐      Control       │ (owns text + │
//! │ DriverHandle │ ─────────────────▶ │   engine)    │
//! └──────────────┘                    └──────────────┘
//! ```

mod consumer;
mod driver;
mod messages;

pub use consumer::{StreamConsumer, READ_CHUNK_SIZE};
pub use driver::{DriverConfig, DriverHandle, DriverOutcome, Frame, RevealDriver};
pub use messages::{Control, StreamEvent};
