//! Reveal session: one source text bound to one reveal engine.
//!
//! The session is the single owner of the [`SourceText`]. Stream events are
//! applied here, on the same thread that ticks the engine, so no locking is
//! involved.

use crate::actor::StreamEvent;
use crate::config::RevealConfig;
use crate::pacing::{RevealEngine, RevealState, RevealView, Step};
use crate::text::{SourceText, FALLBACK_ERROR_MESSAGE};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Instant;

/// A source text and the engine revealing it.
#[derive(Debug)]
pub struct RevealSession<R = StdRng> {
    source: SourceText,
    engine: RevealEngine<R>,
}

impl RevealSession<StdRng> {
    /// Session for text that is already complete.
    pub fn complete(text: impl Into<String>, config: RevealConfig) -> Self {
        Self::new(SourceText::complete(text), RevealEngine::new(config))
    }

    /// Session for text that will arrive from a stream.
    pub fn streaming(config: RevealConfig) -> Self {
        Self::new(SourceText::streaming(), RevealEngine::new(config))
    }
}

impl<R: Rng> RevealSession<R> {
    /// Bind an existing source and engine.
    pub const fn new(source: SourceText, engine: RevealEngine<R>) -> Self {
        Self { source, engine }
    }

    /// The text received so far.
    pub const fn source(&self) -> &SourceText {
        &self.source
    }

    /// The engine.
    pub const fn engine(&self) -> &RevealEngine<R> {
        &self.engine
    }

    /// Mutable access to the engine (start, restart, cancel).
    pub const fn engine_mut(&mut self) -> &mut RevealEngine<R> {
        &mut self.engine
    }

    /// State after the last tick.
    pub const fn state(&self) -> RevealState {
        self.engine.state()
    }

    /// Apply an event from the stream consumer.
    ///
    /// A failure appends [`FALLBACK_ERROR_MESSAGE`] and closes the stream
    /// so the reveal can still finish.
    pub fn apply(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Chunk(chunk) => {
                self.source.append(&chunk);
            }
            StreamEvent::Ended => {
                tracing::debug!(len = self.source.as_str().len(), "reply stream ended");
                self.source.end_stream();
            }
            StreamEvent::Failed(reason) => {
                tracing::warn!(%reason, "reply stream failed");
                self.source.fail(FALLBACK_ERROR_MESSAGE);
            }
        }
    }

    /// Handle the stream vanishing without a terminal event.
    pub fn disconnect(&mut self) {
        if self.source.is_open() {
            self.apply(StreamEvent::Failed("stream disconnected".to_string()));
        }
    }

    /// Advance the engine to `now` against the current source.
    pub fn tick(&mut self, now: Instant) -> Step {
        self.engine.tick(now, &self.source)
    }

    /// What should be on screen.
    pub fn view(&self) -> RevealView<'_> {
        self.engine.view(&self.source)
    }

    /// Tear the session down.
    pub fn cancel(&mut self) {
        self.engine.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::{Clock, ManualClock, RevealEvent};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;

    fn session() -> RevealSession<StdRng> {
        let config = RevealConfig {
            jitter_ratio: 0.0,
            ..RevealConfig::chat_reply()
        };
        RevealSession::new(
            SourceText::streaming(),
            RevealEngine::with_rng(config, StdRng::seed_from_u64(3)),
        )
    }

    fn settle(session: &mut RevealSession<StdRng>, clock: &ManualClock) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        loop {
            let step = session.tick(clock.now());
            events.extend(step.events);
            match step.next_deadline {
                Some(due) => clock.advance_to(due),
                None => return events,
            }
        }
    }

    #[test]
    fn test_chunks_then_end() {
        let clock = ManualClock::new();
        let mut session = session();

        session.apply(StreamEvent::Chunk("Use strong ".to_string()));
        session.apply(StreamEvent::Chunk("passwords.".to_string()));
        let events = settle(&mut session, &clock);
        assert!(!events.contains(&RevealEvent::Completed));
        assert_eq!(session.state(), RevealState::AwaitingMore);

        session.apply(StreamEvent::Ended);
        let events = settle(&mut session, &clock);
        assert_eq!(events, vec![RevealEvent::Completed]);
        assert_eq!(session.view().visible, "Use strong passwords.");
    }

    #[test]
    fn test_failure_reaches_done() {
        let clock = ManualClock::new();
        let mut session = session();

        session.apply(StreamEvent::Chunk("Partial".to_string()));
        settle(&mut session, &clock);
        session.apply(StreamEvent::Failed("reset".to_string()));

        let events = settle(&mut session, &clock);
        assert_eq!(session.state(), RevealState::Done);
        assert_eq!(events.last(), Some(&RevealEvent::Completed));
        assert_eq!(session.view().visible, "Partial\n\nSorry, an error occurred.");
    }

    #[test]
    fn test_disconnect_without_end() {
        let clock = ManualClock::new();
        let mut session = session();
        session.disconnect();
        settle(&mut session, &clock);
        assert_eq!(session.state(), RevealState::Done);
        assert_eq!(session.view().visible, FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn test_cancel_mid_reveal() {
        let clock = ManualClock::new();
        let mut session = session();
        session.apply(StreamEvent::Chunk("one two three ".to_string()));
        session.apply(StreamEvent::Ended);

        let step = session.tick(clock.now());
        clock.advance_to(step.next_deadline.unwrap());
        session.tick(clock.now());
        let cursor = session.engine().cursor();

        session.cancel();
        clock.advance(std::time::Duration::from_secs(10));
        let step = session.tick(clock.now());
        assert!(step.events.is_empty());
        assert_eq!(session.engine().cursor(), cursor);
    }
}
