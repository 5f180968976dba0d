//! Text handling: the source buffer, UTF-8 stream decoding and tokenization.
//!
//! # Example
//!
//! ```rust
//! use typewriter::text::{tokenize, TokenPolicy};
//!
//! let text = "hello wor";
//! let tokens = tokenize(text, TokenPolicy::Inline);
//! // "wor" may still be growing, so only "hello " is committed.
//! assert_eq!(tokens.iter(text).collect::<Vec<_>>(), vec!["hello "]);
//! ```

mod source;
mod tokenizer;
mod utf8;

pub use source::{append_failure, SourceText, StreamState, FALLBACK_ERROR_MESSAGE};
pub use tokenizer::{
    is_boundary_char, tokenize, tokenize_final, TokenPolicy, TokenSequence, BOUNDARY_CHARS,
};
pub use utf8::Utf8Decoder;
