//! Typewriter Widget: incremental terminal rendering of a reveal.
//!
//! The widget never redraws what is already on screen. Each frame it emits
//! only the newly revealed text, toggling the caret in place. A rewind
//! (loop restart or replaced source) jumps back to the anchor saved before
//! the first frame and clears below it. Without escape sequences a rewind
//! starts the next pass on a new line.

use crate::pacing::RevealView;
use crate::terminal::OutputBuffer;
use crate::text::TokenPolicy;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Configuration for the typewriter widget.
#[derive(Debug, Clone)]
pub struct TypewriterConfig {
    /// Character drawn after the revealed text.
    pub caret: char,
    /// Caret on/off period.
    pub blink_interval: Duration,
    /// Draw the caret dimmed.
    pub dim_caret: bool,
    /// Emit escape sequences. Off when writing to a pipe: only text is
    /// written and no caret is drawn.
    pub ansi: bool,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            caret: '|',
            blink_interval: Duration::from_millis(500),
            dim_caret: true,
            ansi: true,
        }
    }
}

/// Renders successive [`RevealView`]s as a growing block of text.
#[derive(Debug)]
pub struct TypewriterWidget {
    config: TypewriterConfig,
    output: OutputBuffer,
    /// Bytes of `visible` already on screen (inline policy).
    printed_bytes: usize,
    /// Tokens already on screen.
    printed_tokens: usize,
    caret_drawn: bool,
    anchored: bool,
    blink_epoch: Option<Instant>,
}

impl TypewriterWidget {
    /// Create a widget with default configuration.
    pub fn new() -> Self {
        Self::with_config(TypewriterConfig::default())
    }

    /// Create a widget with the given configuration.
    pub fn with_config(config: TypewriterConfig) -> Self {
        Self {
            config,
            output: OutputBuffer::new(),
            printed_bytes: 0,
            printed_tokens: 0,
            caret_drawn: false,
            anchored: false,
            blink_epoch: None,
        }
    }

    /// Number of tokens currently on screen.
    pub const fn printed_tokens(&self) -> usize {
        self.printed_tokens
    }

    /// Build the bytes that bring the screen up to date with `view`.
    pub fn render(&mut self, view: &RevealView<'_>, now: Instant) -> &[u8] {
        self.output.clear();

        if !self.anchored && self.config.ansi {
            self.output.save_cursor();
            self.anchored = true;
        }

        if view.cursor < self.printed_tokens {
            if self.config.ansi {
                self.output.restore_cursor();
                self.output.clear_below();
            } else {
                self.output.write_char('\n');
            }
            self.printed_bytes = 0;
            self.printed_tokens = 0;
            self.caret_drawn = false;
        }

        if self.caret_drawn {
            self.output.erase_previous();
            self.caret_drawn = false;
        }

        match view.policy {
            TokenPolicy::Inline => {
                let fresh = view.visible.get(self.printed_bytes..).unwrap_or_default();
                self.output.write_str(fresh);
                self.printed_bytes = view.visible.len();
            }
            TokenPolicy::Line => {
                for token in view.tokens.iter().skip(self.printed_tokens) {
                    self.output.write_str(token);
                    self.output.write_char('\n');
                }
            }
        }
        self.printed_tokens = view.cursor;

        if self.config.ansi && view.caret && self.blink_on(now) {
            if self.config.dim_caret {
                self.output.set_dim();
                self.output.write_char(self.config.caret);
                self.output.reset_attrs();
            } else {
                self.output.write_char(self.config.caret);
            }
            self.caret_drawn = true;
        }

        self.output.as_bytes()
    }

    /// Render `view` and write it to `writer` in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn render_to<W: Write>(
        &mut self,
        view: &RevealView<'_>,
        now: Instant,
        writer: &mut W,
    ) -> io::Result<()> {
        self.render(view, now);
        if self.output.is_empty() {
            return Ok(());
        }
        self.output.flush_to(writer)
    }

    /// Remove the caret, leaving only the revealed text.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn finish<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.output.clear();
        if self.caret_drawn {
            self.output.erase_previous();
            self.caret_drawn = false;
        }
        self.output.flush_to(writer)
    }

    fn blink_on(&mut self, now: Instant) -> bool {
        let epoch = *self.blink_epoch.get_or_insert(now);
        let period = self.config.blink_interval.as_millis().max(1);
        (now.saturating_duration_since(epoch).as_millis() / period) % 2 == 0
    }
}

impl Default for TypewriterWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RevealConfig;
    use crate::pacing::{Clock, ManualClock, RevealEngine, RevealEvent, RevealState};
    use crate::text::SourceText;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn inline(visible: &str, cursor: usize, caret: bool) -> RevealView<'_> {
        RevealView {
            visible,
            tokens: Vec::new(),
            cursor,
            total: cursor,
            state: RevealState::Advancing,
            caret,
            policy: TokenPolicy::Inline,
        }
    }

    fn undimmed() -> TypewriterWidget {
        TypewriterWidget::with_config(TypewriterConfig {
            dim_caret: false,
            ..TypewriterConfig::default()
        })
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_only_new_text_is_written() {
        let mut widget = undimmed();
        let now = Instant::now();

        let first = text(widget.render(&inline("Hello ", 1, false), now));
        assert_eq!(first, "\x1b7Hello ");

        let second = text(widget.render(&inline("Hello world", 2, false), now));
        assert_eq!(second, "world");

        let idle = text(widget.render(&inline("Hello world", 2, false), now));
        assert_eq!(idle, "");
    }

    #[test]
    fn test_caret_erased_before_text() {
        let mut widget = undimmed();
        let now = Instant::now();

        let first = text(widget.render(&inline("Hi ", 1, true), now));
        assert_eq!(first, "\x1b7Hi |");

        let second = text(widget.render(&inline("Hi there", 2, true), now));
        assert_eq!(second, "\x08 \x08there|");
    }

    #[test]
    fn test_caret_blinks() {
        let mut widget = undimmed();
        let start = Instant::now();
        let view = inline("a ", 1, true);

        assert!(text(widget.render(&view, start)).ends_with('|'));
        let off = text(widget.render(&view, start + Duration::from_millis(600)));
        assert_eq!(off, "\x08 \x08");
        let on = text(widget.render(&view, start + Duration::from_millis(1100)));
        assert_eq!(on, "|");
    }

    #[test]
    fn test_rewind_clears_from_anchor() {
        let mut widget = undimmed();
        let now = Instant::now();
        widget.render(&inline("one two ", 2, false), now);

        let rewound = text(widget.render(&inline("", 0, false), now));
        assert_eq!(rewound, "\x1b8\x1b[J");
        assert_eq!(widget.printed_tokens(), 0);
    }

    #[test]
    fn test_word_per_line() {
        let mut widget = undimmed();
        let now = Instant::now();
        let mut view = RevealView {
            visible: "alpha beta",
            tokens: vec!["alpha"],
            cursor: 1,
            total: 2,
            state: RevealState::Advancing,
            caret: false,
            policy: TokenPolicy::Line,
        };
        assert_eq!(text(widget.render(&view, now)), "\x1b7alpha\n");

        view.tokens = vec!["alpha", "beta"];
        view.cursor = 2;
        assert_eq!(text(widget.render(&view, now)), "beta\n");
    }

    #[test]
    fn test_plain_loop_restart_starts_new_line() {
        let clock = ManualClock::new();
        let source = SourceText::complete("a b");
        let mut engine = RevealEngine::with_rng(
            RevealConfig {
                loop_reveal: true,
                jitter_ratio: 0.0,
                ..RevealConfig::default()
            },
            StdRng::seed_from_u64(1),
        );
        let mut widget = TypewriterWidget::with_config(TypewriterConfig {
            ansi: false,
            ..TypewriterConfig::default()
        });

        let mut out = Vec::new();
        let mut restarted = false;
        for _ in 0..20 {
            let step = engine.tick(clock.now(), &source);
            widget.render_to(&engine.view(&source), clock.now(), &mut out).unwrap();
            restarted |= step.events.contains(&RevealEvent::Restarted);
            if restarted && engine.cursor() == 1 {
                break;
            }
            clock.advance_to(step.next_deadline.unwrap());
        }

        assert!(restarted);
        assert_eq!(text(&out), "a b\na ");
    }

    #[test]
    fn test_finish_removes_caret() {
        let mut widget = undimmed();
        let now = Instant::now();
        widget.render(&inline("done", 1, true), now);

        let mut sink = Vec::new();
        widget.finish(&mut sink).unwrap();
        assert_eq!(sink, b"\x08 \x08");
    }
}
