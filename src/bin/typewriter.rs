//! `typewriter`: reveal a file or stdin in the terminal at a human pace.
//!
//! By default the input is consumed as a stream, so piping a slow producer
//! (`curl -N ... | typewriter`) reveals text while it arrives.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use typewriter::terminal::CursorGuard;
use typewriter::{
    Preferences, RevealConfig, RevealDriver, RevealEvent, RevealMode, RevealSession,
    TypewriterConfig, TypewriterWidget,
};

/// Reveal text one word at a time.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// File to reveal. Reads stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Read the whole input before revealing it.
    #[arg(long = "static", default_value_t = false)]
    static_input: bool,

    /// Start from the chat reply pacing preset.
    #[arg(long, default_value_t = false)]
    chat: bool,

    /// Load reveal options from a preferences JSON file.
    #[arg(long, value_name = "FILE", conflicts_with = "chat")]
    preferences: Option<PathBuf>,

    /// Base delay between words.
    #[arg(long, value_name = "MS")]
    speed_ms: Option<u64>,

    /// Extra delay before the first word.
    #[arg(long, value_name = "MS")]
    first_delay_ms: Option<u64>,

    /// Extra delay after sentence punctuation.
    #[arg(long, value_name = "MS")]
    pause_on_punct_ms: Option<u64>,

    /// Extra delay after line breaks.
    #[arg(long, value_name = "MS")]
    pause_on_newline_ms: Option<u64>,

    /// Random variation of the base delay, between 0 and 1.
    #[arg(long, value_name = "RATIO")]
    jitter: Option<f64>,

    /// Pacing mode.
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Print one word per line.
    #[arg(long, default_value_t = false)]
    word_per_line: bool,

    /// Start over after finishing (static input only).
    #[arg(long = "loop", default_value_t = false)]
    loop_reveal: bool,

    /// Do not draw a caret.
    #[arg(long, default_value_t = false)]
    no_cursor: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Word,
    Instant,
}

impl From<Mode> for RevealMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Word => Self::Word,
            Mode::Instant => Self::Instant,
        }
    }
}

impl Cli {
    fn reveal_config(&self) -> anyhow::Result<RevealConfig> {
        let mut config = if self.chat {
            RevealConfig::chat_reply()
        } else if let Some(path) = &self.preferences {
            Preferences::load(path)?.reveal
        } else {
            RevealConfig::default()
        };

        if let Some(ms) = self.speed_ms {
            config.speed_ms = ms;
        }
        if let Some(ms) = self.first_delay_ms {
            config.first_delay_ms = ms;
        }
        if let Some(ms) = self.pause_on_punct_ms {
            config.pause_on_punct_ms = ms;
        }
        if let Some(ms) = self.pause_on_newline_ms {
            config.pause_on_newline_ms = ms;
        }
        if let Some(ratio) = self.jitter {
            config.jitter_ratio = ratio;
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        config.word_per_line |= self.word_per_line;
        config.loop_reveal |= self.loop_reveal;
        if self.no_cursor {
            config.show_cursor = false;
        }

        config.validate()?;
        Ok(config)
    }

    fn open_input(&self) -> anyhow::Result<Box<dyn Read + Send>> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                let file = File::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                Ok(Box::new(file))
            }
            _ => Ok(Box::new(io::stdin())),
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.reveal_config()?;
    tracing::debug!(?config, "reveal options");

    let mut input = cli.open_input()?;
    let session = if cli.static_input {
        let mut text = String::new();
        input
            .read_to_string(&mut text)
            .context("failed to read input")?;
        RevealSession::complete(text, config)
    } else {
        RevealSession::streaming(config.for_stream())
    };

    let mut driver = RevealDriver::new(session);
    if !cli.static_input {
        driver.attach_stream(input)?;
    }

    let mut stdout = io::stdout();
    let terminal = stdout.is_terminal();
    let _cursor = if terminal {
        CursorGuard::hide()?
    } else {
        CursorGuard::inactive()
    };
    let mut widget = TypewriterWidget::with_config(TypewriterConfig {
        ansi: terminal,
        ..TypewriterConfig::default()
    });

    let outcome = driver.run(|frame| {
        if frame.events.contains(&RevealEvent::Completed) {
            tracing::info!(tokens = frame.view.total, "reveal completed");
        }
        widget.render_to(&frame.view, frame.now, &mut stdout)
    })?;

    widget.finish(&mut stdout)?;
    writeln!(stdout)?;
    tracing::debug!(?outcome, "exiting");
    Ok(())
}
