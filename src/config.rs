//! Reveal options and stored user preferences.
//!
//! [`RevealConfig`] holds every pacing and display option of a reveal
//! session. [`Preferences`] is the on-disk collaborator that supplies a
//! config (and the chat answer style) when a session starts; the engine
//! never reads preferences on its own.

use crate::error::{Error, Result};
use crate::text::TokenPolicy;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// How the text is paced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealMode {
    /// Reveal one token at a time with human-like delays.
    #[default]
    Word,
    /// Reveal everything at once after a short delay, like a paste.
    Instant,
}

/// Options for a reveal session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    /// Base delay between tokens.
    pub speed_ms: u64,
    /// Extra delay before the first token.
    pub first_delay_ms: u64,
    /// Extra delay for tokens ending in sentence punctuation.
    pub pause_on_punct_ms: u64,
    /// Extra delay for tokens containing a newline.
    pub pause_on_newline_ms: u64,
    /// Fraction of `speed_ms` randomly added or removed, in `[0, 1]`.
    pub jitter_ratio: f64,
    /// Pacing mode.
    pub mode: RevealMode,
    /// Keep revealed tokens when the text grows.
    pub progressive: bool,
    /// Render one word per line.
    pub word_per_line: bool,
    /// Restart after completion (non-streaming text only).
    #[serde(rename = "loop")]
    pub loop_reveal: bool,
    /// Emit a completion event when everything is visible.
    pub call_on_done: bool,
    /// Start pacing without an explicit start call.
    pub auto_start: bool,
    /// Show a blinking caret while revealing (never in instant mode).
    pub show_cursor: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            speed_ms: 220,
            first_delay_ms: 220,
            pause_on_punct_ms: 160,
            pause_on_newline_ms: 260,
            jitter_ratio: 0.3,
            mode: RevealMode::Word,
            progressive: false,
            word_per_line: false,
            loop_reveal: false,
            call_on_done: true,
            auto_start: true,
            show_cursor: true,
        }
    }
}

impl RevealConfig {
    /// Pacing used for assistant replies in the chat view.
    pub fn chat_reply() -> Self {
        Self {
            speed_ms: 210,
            first_delay_ms: 260,
            pause_on_punct_ms: 200,
            pause_on_newline_ms: 320,
            jitter_ratio: 0.35,
            progressive: true,
            ..Self::default()
        }
    }

    /// Tokenization policy implied by `word_per_line`.
    pub const fn token_policy(&self) -> TokenPolicy {
        if self.word_per_line {
            TokenPolicy::Line
        } else {
            TokenPolicy::Inline
        }
    }

    /// Whether a caret should be drawn at all.
    pub fn caret_enabled(&self) -> bool {
        self.show_cursor && self.mode != RevealMode::Instant
    }

    /// Options for text that arrives from a stream.
    ///
    /// Every chunk grows the text, so the reveal is made progressive;
    /// otherwise each chunk would rewind it to the first word.
    #[must_use]
    pub const fn for_stream(mut self) -> Self {
        self.progressive = true;
        self
    }

    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.jitter_ratio.is_finite() || !(0.0..=1.0).contains(&self.jitter_ratio) {
            return Err(Error::InvalidConfig(format!(
                "jitterRatio must be within [0, 1], got {}",
                self.jitter_ratio
            )));
        }
        Ok(())
    }
}

/// Length preference for assistant answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStyle {
    /// A short summary.
    Summary,
    /// A full answer.
    #[default]
    Long,
    /// A brief answer.
    Short,
    /// Only the main points.
    Main,
}

/// Interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Malay.
    My,
}

/// Stored user preferences.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    /// Requested answer length.
    pub answer_style: AnswerStyle,
    /// Interface language.
    pub language: Language,
    /// Reveal options.
    pub reveal: RevealConfig,
}

impl Preferences {
    /// Load preferences from a JSON file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no preferences file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::ReadPreferences {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let prefs: Self = serde_json::from_str(&raw).map_err(|source| Error::ParsePreferences {
            path: path.to_path_buf(),
            source,
        })?;
        prefs.reveal.validate()?;
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RevealConfig::default();
        assert_eq!(config.speed_ms, 220);
        assert_eq!(config.mode, RevealMode::Word);
        assert!(config.auto_start);
        assert!(config.call_on_done);
        assert_eq!(config.token_policy(), TokenPolicy::Inline);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chat_reply_preset() {
        let config = RevealConfig::chat_reply();
        assert_eq!(config.speed_ms, 210);
        assert_eq!(config.pause_on_newline_ms, 320);
        assert!(config.progressive);
    }

    #[test]
    fn test_for_stream_is_progressive() {
        let config = RevealConfig::default().for_stream();
        assert!(config.progressive);
        assert_eq!(config.speed_ms, RevealConfig::default().speed_ms);
    }

    #[test]
    fn test_caret_disabled_in_instant_mode() {
        let config = RevealConfig {
            mode: RevealMode::Instant,
            ..RevealConfig::default()
        };
        assert!(!config.caret_enabled());
    }

    #[test]
    fn test_jitter_out_of_range() {
        let config = RevealConfig {
            jitter_ratio: 1.5,
            ..RevealConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_camel_case_options() {
        let config: RevealConfig =
            serde_json::from_str(r#"{"speedMs": 100, "wordPerLine": true, "loop": true, "mode": "instant"}"#)
                .unwrap();
        assert_eq!(config.speed_ms, 100);
        assert!(config.word_per_line);
        assert!(config.loop_reveal);
        assert_eq!(config.mode, RevealMode::Instant);
        assert_eq!(config.first_delay_ms, 220);
    }

    #[test]
    fn test_missing_preferences_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_load_preferences() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"answerStyle": "short", "reveal": {{"jitterRatio": 0.1}}}}"#).unwrap();

        let prefs = Preferences::load(file.path()).unwrap();
        assert_eq!(prefs.answer_style, AnswerStyle::Short);
        assert_eq!(prefs.language, Language::En);
        assert!((prefs.reveal.jitter_ratio - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_preferences() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            Preferences::load(file.path()),
            Err(Error::ParsePreferences { .. })
        ));
    }
}
