//! Tokenizer: splits source text into revealable tokens.
//!
//! Two policies are supported:
//!
//! - [`TokenPolicy::Inline`]: each token is a word plus the whitespace that
//!   follows it, so revealing tokens in order reproduces the source
//!   spacing and paragraph breaks.
//! - [`TokenPolicy::Line`]: each token is a bare word, meant to be rendered
//!   one word per line.
//!
//! While text is still streaming the last word may be incomplete, so the
//! tokenizer withholds it unless it is terminated by whitespace or by a
//! closing punctuation mark (see [`is_boundary_char`]).

use std::ops::Range;

/// Characters that terminate a token even without trailing whitespace.
pub const BOUNDARY_CHARS: &[char] = &['.', '!', '?', ',', ';', ':', ')', ']', '}', '>', '"', '\'', '`'];

/// How source text is split into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenPolicy {
    /// Word plus trailing whitespace per token.
    #[default]
    Inline,
    /// Bare word per token, one per rendered line.
    Line,
}

/// Check whether `ch` closes a token without trailing whitespace.
#[inline]
pub fn is_boundary_char(ch: char) -> bool {
    BOUNDARY_CHARS.contains(&ch)
}

/// An ordered list of token spans into a source string.
///
/// The sequence stores byte ranges rather than owned strings; resolve them
/// against the same text that was tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenSequence {
    spans: Vec<Range<usize>>,
    policy: TokenPolicy,
}

impl TokenSequence {
    /// An empty sequence for the given policy.
    pub const fn empty(policy: TokenPolicy) -> Self {
        Self {
            spans: Vec::new(),
            policy,
        }
    }

    /// A sequence holding all of `text` as one token (instant mode).
    pub fn whole(text: &str, policy: TokenPolicy) -> Self {
        if text.trim().is_empty() {
            return Self::empty(policy);
        }
        Self {
            spans: vec![0..text.len()],
            policy,
        }
    }

    /// Number of committed tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether no token is committed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The policy this sequence was produced with.
    #[inline]
    pub const fn policy(&self) -> TokenPolicy {
        self.policy
    }

    /// Resolve token `index` against `text`.
    pub fn get<'a>(&self, text: &'a str, index: usize) -> Option<&'a str> {
        self.spans.get(index).and_then(|span| text.get(span.clone()))
    }

    /// Iterate over all tokens resolved against `text`.
    pub fn iter<'a, 't: 'a>(&'a self, text: &'t str) -> impl Iterator<Item = &'t str> + 'a {
        self.spans.iter().filter_map(move |span| text.get(span.clone()))
    }

    /// The first `count` tokens resolved against `text`.
    pub fn take<'t>(&self, text: &'t str, count: usize) -> Vec<&'t str> {
        self.iter(text).take(count).collect()
    }

    /// Byte offset where the first `count` tokens end.
    ///
    /// For inline sequences `&text[..end]` is exactly the concatenation of
    /// those tokens.
    pub fn end_of(&self, count: usize) -> usize {
        match count.min(self.spans.len()) {
            0 => 0,
            n => self.spans[n - 1].end,
        }
    }

    /// Commit tokens from the part of `text` after the last committed one.
    ///
    /// `text` must extend the text this sequence was built from. Spans
    /// already committed are kept as they are, even when new text continues
    /// a token that ended on a boundary character ("example." followed by
    /// "com"); the continuation becomes a token of its own.
    pub fn extend(&mut self, text: &str, open: bool) {
        let from = self.end_of(self.spans.len());
        let Some(tail) = text.get(from..) else {
            return;
        };
        let more = if open {
            tokenize(tail, self.policy)
        } else {
            tokenize_final(tail, self.policy)
        };
        self.spans
            .extend(more.spans.into_iter().map(|span| span.start + from..span.end + from));

        if !open && self.policy == TokenPolicy::Inline {
            if let Some(last) = self.spans.last_mut() {
                last.end = text.len();
            }
        }
    }
}

/// Tokenize `text`, withholding a trailing token that may still grow.
pub fn tokenize(text: &str, policy: TokenPolicy) -> TokenSequence {
    let mut tokens = tokenize_final(text, policy);
    if !is_committed_tail(text, &tokens) {
        tokens.spans.pop();
    }
    tokens
}

/// Tokenize text that will not grow any further.
///
/// Identical to [`tokenize`] except that the trailing token is always
/// committed.
pub fn tokenize_final(text: &str, policy: TokenPolicy) -> TokenSequence {
    let spans = match policy {
        TokenPolicy::Inline => inline_spans(text),
        TokenPolicy::Line => word_spans(text).collect(),
    };
    TokenSequence { spans, policy }
}

/// Whether the last token of `tokens` may be shown.
fn is_committed_tail(text: &str, tokens: &TokenSequence) -> bool {
    let Some(last) = tokens.spans.last() else {
        return true;
    };
    if text.ends_with(char::is_whitespace) {
        return true;
    }
    text[last.clone()]
        .chars()
        .next_back()
        .is_some_and(is_boundary_char)
}

/// Byte spans of each whitespace-delimited word.
fn word_spans(text: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    let mut pos = 0;
    std::iter::from_fn(move || {
        let start = pos + text[pos..].find(|c: char| !c.is_whitespace())?;
        let end = text[start..]
            .find(char::is_whitespace)
            .map_or(text.len(), |i| start + i);
        pos = end;
        Some(start..end)
    })
}

/// Word-plus-trailing-whitespace groups.
///
/// Leading whitespace is folded into the first group so the groups tile
/// the text from offset 0.
fn inline_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut group_start = 0;
    for word in word_spans(text) {
        let group_end = text[word.end..]
            .find(|c: char| !c.is_whitespace())
            .map_or(text.len(), |i| word.end + i);
        spans.push(group_start..group_end);
        group_start = group_end;
    }
    spans
}
