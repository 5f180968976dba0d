//! Per-token delay computation.
//!
//! The delay before a token appears is the base speed scaled by a random
//! jitter factor, floored at [`MIN_DELAY`], plus additive pauses:
//!
//! | Condition                                  | Extra                 |
//! |--------------------------------------------|-----------------------|
//! | first token of the session                 | `first_delay_ms`      |
//! | trimmed token ends with `. ! ? ; : ,`      | `pause_on_punct_ms`   |
//! | token contains a newline                   | `pause_on_newline_ms` |
//! | trimmed token longer than 12 graphemes     | [`LONG_WORD_PAUSE`]   |
//!
//! All pauses stack.

use crate::config::RevealConfig;
use rand::Rng;
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;

/// Lower bound on the jittered base delay.
pub const MIN_DELAY: Duration = Duration::from_millis(30);

/// Extra pause for long words.
pub const LONG_WORD_PAUSE: Duration = Duration::from_millis(60);

/// Words longer than this many graphemes get [`LONG_WORD_PAUSE`].
pub const LONG_WORD_GRAPHEMES: usize = 12;

/// Delay before the single token of an instant reveal.
pub const INSTANT_DELAY: Duration = Duration::from_millis(60);

/// Pause between completion and restart in loop mode.
pub const LOOP_PAUSE: Duration = Duration::from_millis(600);

const SENTENCE_PUNCT: &[char] = &['.', '!', '?', ';', ':', ','];

/// Draw a jitter factor from `[1 - ratio, 1 + ratio]`.
///
/// `ratio` is clamped to `[0, 1]`; a zero ratio always yields `1.0`.
pub fn sample_jitter<R: Rng + ?Sized>(rng: &mut R, ratio: f64) -> f64 {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    if ratio <= 0.0 {
        return 1.0;
    }
    rng.random_range((1.0 - ratio)..=(1.0 + ratio))
}

/// Jittered base delay, floored at [`MIN_DELAY`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn base_delay(speed_ms: u64, jitter: f64) -> Duration {
    let scaled = (speed_ms as f64 * jitter).round().max(0.0) as u64;
    Duration::from_millis(scaled).max(MIN_DELAY)
}

/// Full delay before `token` is revealed.
pub fn token_delay(token: &str, is_first: bool, config: &RevealConfig, jitter: f64) -> Duration {
    let mut delay = base_delay(config.speed_ms, jitter);
    let trimmed = token.trim();

    if is_first {
        delay += Duration::from_millis(config.first_delay_ms);
    }
    if trimmed.ends_with(SENTENCE_PUNCT) {
        delay += Duration::from_millis(config.pause_on_punct_ms);
    }
    if token.contains('\n') {
        delay += Duration::from_millis(config.pause_on_newline_ms);
    }
    if trimmed.graphemes(true).count() > LONG_WORD_GRAPHEMES {
        delay += LONG_WORD_PAUSE;
    }

    delay
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flat() -> RevealConfig {
        RevealConfig {
            speed_ms: 200,
            first_delay_ms: 1000,
            pause_on_punct_ms: 100,
            pause_on_newline_ms: 10,
            jitter_ratio: 0.0,
            ..RevealConfig::default()
        }
    }

    #[test]
    fn test_jitter_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let jitter = sample_jitter(&mut rng, 0.3);
            let delay = base_delay(200, jitter);
            assert!(delay >= Duration::from_millis(140), "{delay:?}");
            assert!(delay <= Duration::from_millis(260), "{delay:?}");
        }
    }

    #[test]
    fn test_zero_ratio_is_exact() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!((sample_jitter(&mut rng, 0.0) - 1.0).abs() < f64::EPSILON);
        assert!((sample_jitter(&mut rng, f64::NAN) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_floor() {
        assert_eq!(base_delay(0, 1.0), MIN_DELAY);
        assert_eq!(base_delay(10, 0.5), MIN_DELAY);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..1000 {
            let jitter = sample_jitter(&mut rng, 1.0);
            assert!(base_delay(40, jitter) >= MIN_DELAY);
        }
    }

    #[test]
    fn test_plain_token() {
        assert_eq!(token_delay("word ", false, &flat(), 1.0), Duration::from_millis(200));
    }

    #[test]
    fn test_first_token_pause() {
        assert_eq!(token_delay("word ", true, &flat(), 1.0), Duration::from_millis(1200));
    }

    #[test]
    fn test_punctuation_pause() {
        assert_eq!(token_delay("end. ", false, &flat(), 1.0), Duration::from_millis(300));
        assert_eq!(token_delay("wait, ", false, &flat(), 1.0), Duration::from_millis(300));
        // Closing quote is a commit boundary but not a pause.
        assert_eq!(token_delay("\"quoted\" ", false, &flat(), 1.0), Duration::from_millis(200));
    }

    #[test]
    fn test_newline_pause() {
        assert_eq!(token_delay("para\n\n", false, &flat(), 1.0), Duration::from_millis(210));
    }

    #[test]
    fn test_long_word_pause() {
        assert_eq!(
            token_delay("authentication ", false, &flat(), 1.0),
            Duration::from_millis(260)
        );
        // Exactly twelve graphemes is not long.
        assert_eq!(token_delay("abcdefghijkl", false, &flat(), 1.0), Duration::from_millis(200));
    }

    #[test]
    fn test_pauses_stack() {
        // first + punct + newline + long word
        let delay = token_delay("cybersecurity.\n", true, &flat(), 1.0);
        assert_eq!(delay, Duration::from_millis(200 + 1000 + 100 + 10 + 60));
    }
}
