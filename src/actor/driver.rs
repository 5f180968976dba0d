//! Driver: main loop that ties the stream consumer to a reveal session.
//!
//! The driver is the only place where the source text is mutated and the
//! engine ticked. It waits on three things at once: the next stream event,
//! the next control command and the engine's pending timer. Whichever comes
//! first wakes the loop; the engine then re-reads the current source.

use super::consumer::StreamConsumer;
use super::messages::{Control, StreamEvent};
use crate::error::Result;
use crate::pacing::{Clock, RevealEvent, RevealState, RevealView, Step, SystemClock};
use crate::session::RevealSession;
use crossbeam_channel::{bounded, never, select, unbounded, Receiver, Sender};
use rand::rngs::StdRng;
use rand::Rng;
use std::io::{self, Read};
use std::time::{Duration, Instant};

/// Capacity of the consumer → driver channel.
const STREAM_CHANNEL_CAPACITY: usize = 64;

/// Configuration for the driver loop.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// How often to redraw while a caret is blinking.
    pub blink_interval: Duration,
    /// Longest wait when nothing is scheduled.
    pub idle_wait: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            blink_interval: Duration::from_millis(500),
            idle_wait: Duration::from_secs(1),
        }
    }
}

/// Why [`RevealDriver::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverOutcome {
    /// Everything was revealed and the stream has ended.
    Completed,
    /// The session was cancelled.
    Cancelled,
}

/// One redraw opportunity handed to the frame callback.
#[derive(Debug)]
pub struct Frame<'a> {
    /// What should be on screen.
    pub view: RevealView<'a>,
    /// Events produced since the previous frame.
    pub events: &'a [RevealEvent],
    /// Time of the tick that produced this frame.
    pub now: Instant,
}

/// Cloneable handle for controlling a running driver from elsewhere.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    control: Sender<Control>,
}

impl DriverHandle {
    /// Begin pacing.
    pub fn start(&self) {
        let _ = self.control.send(Control::Start);
    }

    /// Rewind to the first token.
    pub fn restart(&self) {
        let _ = self.control.send(Control::Restart);
    }

    /// Tear the session down.
    pub fn cancel(&self) {
        let _ = self.control.send(Control::Cancel);
    }
}

/// Runs a [`RevealSession`] against real time.
pub struct RevealDriver<C = SystemClock, R = StdRng> {
    config: DriverConfig,
    session: RevealSession<R>,
    clock: C,
    stream_rx: Option<Receiver<StreamEvent>>,
    control_tx: Sender<Control>,
    control_rx: Receiver<Control>,
    consumer: Option<StreamConsumer>,
}

impl<R: Rng> RevealDriver<SystemClock, R> {
    /// Create a driver on the system clock.
    pub fn new(session: RevealSession<R>) -> Self {
        Self::with_clock(session, SystemClock, DriverConfig::default())
    }
}

impl<C: Clock, R: Rng> RevealDriver<C, R> {
    /// Create a driver with a custom clock and configuration.
    pub fn with_clock(session: RevealSession<R>, clock: C, config: DriverConfig) -> Self {
        let (control_tx, control_rx) = unbounded();
        Self {
            config,
            session,
            clock,
            stream_rx: None,
            control_tx,
            control_rx,
            consumer: None,
        }
    }

    /// Spawn a [`StreamConsumer`] on `reader` and feed its output to the
    /// session.
    pub fn attach_stream<S>(&mut self, reader: S) -> Result<()>
    where
        S: Read + Send + 'static,
    {
        let (tx, rx) = bounded(STREAM_CHANNEL_CAPACITY);
        self.consumer = Some(StreamConsumer::spawn(reader, tx)?);
        self.stream_rx = Some(rx);
        Ok(())
    }

    /// Feed stream events produced elsewhere.
    pub fn attach_receiver(&mut self, rx: Receiver<StreamEvent>) {
        self.stream_rx = Some(rx);
    }

    /// A handle for sending control commands.
    pub fn handle(&self) -> DriverHandle {
        DriverHandle {
            control: self.control_tx.clone(),
        }
    }

    /// The session being driven.
    pub const fn session(&self) -> &RevealSession<R> {
        &self.session
    }

    /// Run until the reveal completes or is cancelled.
    ///
    /// `on_frame` is called after every tick. With an open stream that never
    /// ends this only returns on cancel.
    pub fn run<F>(&mut self, mut on_frame: F) -> Result<DriverOutcome>
    where
        F: FnMut(Frame<'_>) -> io::Result<()>,
    {
        loop {
            let now = self.clock.now();
            let step = self.session.tick(now);
            let view = self.session.view();
            let caret = view.caret;
            on_frame(Frame {
                view,
                events: &step.events,
                now,
            })?;

            if self.session.engine().is_cancelled() {
                self.shutdown_consumer();
                return Ok(DriverOutcome::Cancelled);
            }
            if step.state == RevealState::Done && step.next_deadline.is_none() {
                return Ok(DriverOutcome::Completed);
            }

            let wait = self.wait_for(&step, now, caret);
            self.wait(wait);
        }
    }

    /// How long to sleep before the next tick.
    fn wait_for(&self, step: &Step, now: Instant, caret: bool) -> Duration {
        let mut wait = self.config.idle_wait;
        if let Some(due) = step.next_deadline {
            wait = wait.min(due.saturating_duration_since(now));
        }
        if caret {
            wait = wait.min(self.config.blink_interval);
        }
        wait
    }

    /// Block until a stream event, a control command or the timeout.
    fn wait(&mut self, timeout: Duration) {
        let stream_rx = self.stream_rx.clone().unwrap_or_else(never);
        let control_rx = self.control_rx.clone();

        select! {
            recv(stream_rx) -> msg => match msg {
                Ok(event) => {
                    let terminal = event.is_terminal();
                    self.session.apply(event);
                    if terminal {
                        self.stream_rx = None;
                    }
                }
                Err(_) => {
                    tracing::warn!("stream channel closed without end marker");
                    self.stream_rx = None;
                    self.session.disconnect();
                }
            },
            recv(control_rx) -> msg => {
                if let Ok(control) = msg {
                    self.apply_control(control);
                }
            },
            default(timeout) => {}
        }
    }

    fn apply_control(&mut self, control: Control) {
        tracing::debug!(?control, "driver control");
        let engine = self.session.engine_mut();
        match control {
            Control::Start => engine.start(),
            Control::Restart => engine.restart(),
            Control::Cancel => engine.cancel(),
        }
    }

    fn shutdown_consumer(&mut self) {
        self.stream_rx = None;
        if let Some(consumer) = self.consumer.take() {
            consumer.shutdown();
        }
    }
}
