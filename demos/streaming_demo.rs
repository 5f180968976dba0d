//! Streaming Demo: Reveals a bursty chat reply at a human pace.
//!
//! A producer thread plays the part of a model backend, sending the reply in
//! uneven bursts with random stalls. The driver reveals it word by word with
//! the chat preset, and the transcript marks the reply complete only after
//! both the stream has ended and the reveal has caught up.
//!
//! Run with `RUST_LOG=typewriter=debug` to watch the state transitions.

use crossbeam_channel::{bounded, Sender};
use rand::Rng;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use typewriter::terminal::CursorGuard;
use typewriter::{
    AnswerStyle, RevealConfig, RevealDriver, RevealEvent, RevealSession, StreamEvent, Transcript,
    TypewriterWidget,
};

/// Sample reply to stream.
const SAMPLE_REPLY: &str = "Looking at the log you uploaded, three things stand out.

First, there are 412 failed SSH logins from a single address between 02:10 and 02:14. That pattern is a password-spraying attempt, not a user mistyping.

Second, one of those attempts succeeded for the account `deploy`. Rotate its key now and check `~/.ssh/authorized_keys` for entries you did not add.

Third, the firewall never rate-limited the source. Enabling fail2ban (or an equivalent) would have cut this off after a handful of tries.

Want me to draft the incident summary?";

/// Sends the reply in random bursts, like a model server flushing tokens.
fn produce(tx: &Sender<StreamEvent>) {
    let mut rng = rand::rng();
    let mut rest = SAMPLE_REPLY;

    while !rest.is_empty() {
        let mut take = rng.random_range(1..=24).min(rest.len());
        while !rest.is_char_boundary(take) {
            take += 1;
        }
        let (chunk, tail) = rest.split_at(take);
        if tx.send(StreamEvent::Chunk(chunk.to_string())).is_err() {
            return;
        }
        rest = tail;

        // Occasional long stall, otherwise a short gap
        let pause = if rng.random_bool(0.05) {
            rng.random_range(400..900)
        } else {
            rng.random_range(5..60)
        };
        thread::sleep(Duration::from_millis(pause));
    }
    let _ = tx.send(StreamEvent::Ended);
}

fn main() -> typewriter::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut transcript = Transcript::new();
    transcript.push_user("", Some("auth.log".to_string()));
    let reply = transcript.begin_streaming_reply(AnswerStyle::Long);

    println!("you> {}", transcript.messages()[0].text);
    print!("bot> ");
    io::stdout().flush()?;

    let (tx, rx) = bounded(64);
    let producer = thread::Builder::new()
        .name("demo-backend".to_string())
        .spawn(move || produce(&tx))?;

    let mut driver = RevealDriver::new(RevealSession::streaming(RevealConfig::chat_reply()));
    driver.attach_receiver(rx);

    let _cursor = CursorGuard::hide()?;
    let mut widget = TypewriterWidget::new();
    let mut stdout = io::stdout();

    driver.run(|frame| {
        if frame.events.contains(&RevealEvent::Completed) {
            tracing::info!("reply fully revealed");
        }
        widget.render_to(&frame.view, frame.now, &mut stdout)
    })?;
    widget.finish(&mut stdout)?;
    writeln!(stdout)?;

    let _ = producer.join();

    // The session holds the full reply once the driver returns
    let source = driver.session().source();
    transcript.append_to_reply(source.as_str());
    transcript.end_reply();
    let marked = transcript.mark_complete(reply);
    println!("\n[{} messages, reply complete: {marked}]", transcript.len());
    Ok(())
}
