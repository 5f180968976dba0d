//! Reveal engine: the pacing state machine.
//!
//! The engine owns only the reveal cursor and one pending timer. Every call
//! to [`RevealEngine::tick`] re-reads the current [`SourceText`], so text
//! that arrives between ticks is picked up without the engine ever holding
//! a stale copy.
//!
//! # States
//!
//! ```text
//!            start()              cursor < len
//!   Idle ───────────────▶ Advancing ◀──────────────┐
//!                            │                      │ new tokens
//!                            │ cursor == len        │
//!                            ▼                      │
//!               stream open? ──yes──▶ AwaitingMore ─┘
//!                            │
//!                            no
//!                            ▼
//!                          Done ──(loop, 600ms)──▶ Advancing
//! ```
//!
//! `Completed` is emitted once per fully revealed state and is re-armed only
//! when more tokens appear or the reveal restarts.

use super::delay::{sample_jitter, token_delay, INSTANT_DELAY, LOOP_PAUSE};
use crate::config::{RevealConfig, RevealMode};
use crate::text::{tokenize, tokenize_final, SourceText, TokenPolicy, TokenSequence};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Where the reveal currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// Not started yet, or torn down.
    Idle,
    /// Tokens remain to be revealed.
    Advancing,
    /// Everything known is visible but the stream is still open.
    AwaitingMore,
    /// Everything is visible and no more text will arrive.
    Done,
}

/// Observable outcome of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// One more token became visible.
    Revealed {
        /// Tokens visible after this reveal.
        cursor: usize,
        /// Tokens currently committed.
        total: usize,
    },
    /// All tokens are visible and the stream has ended.
    Completed,
    /// Loop mode rewound the cursor to the start.
    Restarted,
}

/// Result of one [`RevealEngine::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// State after the tick.
    pub state: RevealState,
    /// Events produced by the tick, in order.
    pub events: Vec<RevealEvent>,
    /// When the engine next needs to be ticked, if a timer is pending.
    pub next_deadline: Option<Instant>,
}

impl Step {
    const fn quiet(state: RevealState) -> Self {
        Self {
            state,
            events: Vec::new(),
            next_deadline: None,
        }
    }

    /// Whether the tick produced a completion event.
    pub fn completed(&self) -> bool {
        self.events.contains(&RevealEvent::Completed)
    }
}

/// Snapshot of what should be on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealView<'a> {
    /// Visible prefix of the source text (inline rendering).
    pub visible: &'a str,
    /// Visible tokens, one per rendered line in word-per-line mode.
    pub tokens: Vec<&'a str>,
    /// Number of visible tokens.
    pub cursor: usize,
    /// Number of committed tokens.
    pub total: usize,
    /// Engine state.
    pub state: RevealState,
    /// Whether a caret should be drawn after the text.
    pub caret: bool,
    /// Tokenization policy the view was produced with.
    pub policy: TokenPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerAction {
    Reveal,
    Restart,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    due: Instant,
    action: TimerAction,
}

/// Identifies the source contents the current tokens were built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SyncKey {
    revision: u64,
    generation: u64,
    open: bool,
}

/// Paced token-by-token reveal of a [`SourceText`].
///
/// The random generator only feeds jitter; tests pass a seeded one.
#[derive(Debug)]
pub struct RevealEngine<R = StdRng> {
    config: RevealConfig,
    rng: R,
    tokens: TokenSequence,
    synced: Option<SyncKey>,
    cursor: usize,
    timer: Option<Timer>,
    started: bool,
    torn_down: bool,
    completion_fired: bool,
    state: RevealState,
}

impl RevealEngine<StdRng> {
    /// Create an engine with a randomly seeded jitter source.
    pub fn new(config: RevealConfig) -> Self {
        Self::with_rng(config, StdRng::from_rng(&mut rand::rng()))
    }
}

impl<R: Rng> RevealEngine<R> {
    /// Create an engine with an explicit jitter source.
    pub fn with_rng(config: RevealConfig, rng: R) -> Self {
        let started = config.auto_start;
        let policy = config.token_policy();
        Self {
            config,
            rng,
            tokens: TokenSequence::empty(policy),
            synced: None,
            cursor: 0,
            timer: None,
            started,
            torn_down: false,
            completion_fired: false,
            state: RevealState::Idle,
        }
    }

    /// The options this engine was built with.
    pub const fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Number of visible tokens.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// State after the last tick.
    pub const fn state(&self) -> RevealState {
        self.state
    }

    /// Tokens committed at the last tick.
    pub const fn tokens(&self) -> &TokenSequence {
        &self.tokens
    }

    /// Deadline of the pending timer, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.map(|t| t.due)
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub const fn is_cancelled(&self) -> bool {
        self.torn_down
    }

    /// Begin pacing (only needed when `auto_start` is off).
    pub fn start(&mut self) {
        if !self.torn_down && !self.started {
            tracing::debug!("reveal started");
            self.started = true;
        }
    }

    /// Rewind to the first token and start over.
    pub fn restart(&mut self) {
        if self.torn_down {
            return;
        }
        self.rewind();
        self.started = true;
    }

    /// Tear the session down: drop the pending timer and ignore all later
    /// ticks.
    pub fn cancel(&mut self) {
        if self.torn_down {
            return;
        }
        tracing::debug!(cursor = self.cursor, "reveal cancelled");
        self.torn_down = true;
        self.timer = None;
        self.state = RevealState::Idle;
    }

    /// Advance the state machine to `now`.
    pub fn tick(&mut self, now: Instant, source: &SourceText) -> Step {
        if self.torn_down {
            return Step::quiet(RevealState::Idle);
        }
        self.sync(source);
        if !self.started {
            self.state = RevealState::Idle;
            return Step::quiet(RevealState::Idle);
        }

        let mut events = Vec::new();
        if let Some(timer) = self.timer.filter(|t| now >= t.due) {
            self.timer = None;
            self.fire(timer.action, &mut events);
        }
        self.settle(now, source, &mut events);

        Step {
            state: self.state,
            events,
            next_deadline: self.next_deadline(),
        }
    }

    /// What should be on screen for `source`.
    ///
    /// Pass the same source the engine was last ticked with.
    pub fn view<'a>(&self, source: &'a SourceText) -> RevealView<'a> {
        let text = source.as_str();
        let caret = self.config.caret_enabled()
            && !self.torn_down
            && (self.state != RevealState::Done || self.config.loop_reveal);
        RevealView {
            visible: text.get(..self.tokens.end_of(self.cursor)).unwrap_or_default(),
            tokens: self.tokens.take(text, self.cursor),
            cursor: self.cursor,
            total: self.tokens.len(),
            state: self.state,
            caret,
            policy: self.tokens.policy(),
        }
    }

    /// Re-tokenize if the source changed since the last tick.
    fn sync(&mut self, source: &SourceText) {
        let key = SyncKey {
            revision: source.revision(),
            generation: source.generation(),
            open: source.is_open(),
        };
        let previous = self.synced.replace(key);
        if previous == Some(key) {
            return;
        }

        let text = source.as_str();
        let policy = self.config.token_policy();
        let rewound = previous.is_some_and(|previous| {
            let replaced = previous.generation != key.generation;
            let grew = previous.revision != key.revision;
            replaced || (grew && !self.config.progressive)
        });
        if rewound {
            tracing::trace!("source changed, rewinding reveal");
            self.rewind();
        }

        match self.config.mode {
            RevealMode::Instant => self.tokens = TokenSequence::whole(text, policy),
            // Committed tokens are never withdrawn while the text only grows.
            RevealMode::Word if previous.is_some() && !rewound => self.tokens.extend(text, key.open),
            RevealMode::Word if key.open => self.tokens = tokenize(text, policy),
            RevealMode::Word => self.tokens = tokenize_final(text, policy),
        }
        self.cursor = self.cursor.min(self.tokens.len());

        if self.cursor < self.tokens.len() {
            self.completion_fired = false;
            if matches!(self.timer, Some(Timer { action: TimerAction::Restart, .. })) {
                self.timer = None;
            }
        }
    }

    fn rewind(&mut self) {
        self.cursor = 0;
        self.timer = None;
        self.completion_fired = false;
    }

    fn fire(&mut self, action: TimerAction, events: &mut Vec<RevealEvent>) {
        match action {
            TimerAction::Reveal => {
                if self.cursor < self.tokens.len() {
                    self.cursor += 1;
                    tracing::trace!(cursor = self.cursor, total = self.tokens.len(), "token revealed");
                    events.push(RevealEvent::Revealed {
                        cursor: self.cursor,
                        total: self.tokens.len(),
                    });
                }
            }
            TimerAction::Restart => {
                tracing::debug!("loop restart");
                self.rewind();
                events.push(RevealEvent::Restarted);
            }
        }
    }

    fn settle(&mut self, now: Instant, source: &SourceText, events: &mut Vec<RevealEvent>) {
        let total = self.tokens.len();

        if self.cursor < total {
            self.state = RevealState::Advancing;
            if self.timer.is_none() {
                let delay = self.next_delay(source.as_str());
                self.timer = Some(Timer {
                    due: now + delay,
                    action: TimerAction::Reveal,
                });
            }
            return;
        }

        if source.is_open() {
            self.state = RevealState::AwaitingMore;
            return;
        }

        if self.state != RevealState::Done {
            tracing::debug!(total, "reveal done");
        }
        self.state = RevealState::Done;
        if !self.completion_fired {
            self.completion_fired = true;
            if self.config.call_on_done {
                events.push(RevealEvent::Completed);
            }
        }

        let loops = self.config.loop_reveal && !source.stream().is_streaming && total > 0;
        if loops && self.timer.is_none() {
            self.timer = Some(Timer {
                due: now + LOOP_PAUSE,
                action: TimerAction::Restart,
            });
        }
    }

    fn next_delay(&mut self, text: &str) -> Duration {
        if self.config.mode == RevealMode::Instant {
            return INSTANT_DELAY;
        }
        let token = self.tokens.get(text, self.cursor).unwrap_or_default();
        let jitter = sample_jitter(&mut self.rng, self.config.jitter_ratio);
        token_delay(token, self.cursor == 0, &self.config, jitter)
    }
}
