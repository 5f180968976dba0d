//! Tokenizer benchmark: Measure re-tokenization cost per stream chunk.
//!
//! The engine re-tokenizes the whole source on every chunk, so this is the
//! hot path for long replies.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Instant;
use typewriter::text::{tokenize, tokenize_final, TokenPolicy};
use typewriter::{RevealConfig, RevealSession, StreamEvent};

fn sample(words: usize) -> String {
    let mut text = String::with_capacity(words * 7);
    for i in 0..words {
        text.push_str(["token", "stream,", "reveal.", "word\n"][i % 4]);
        text.push(' ');
    }
    text
}

fn tokenize_inline(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize_inline");
    for words in [100, 1_000, 10_000] {
        let text = sample(words);
        group.bench_with_input(BenchmarkId::from_parameter(words), &text, |b, text| {
            b.iter(|| tokenize(black_box(text), TokenPolicy::Inline));
        });
    }
    group.finish();
}

fn tokenize_lines(c: &mut Criterion) {
    let text = sample(1_000);
    c.bench_function("tokenize_final_line_1000", |b| {
        b.iter(|| tokenize_final(black_box(&text), TokenPolicy::Line));
    });
}

fn session_chunk_tick(c: &mut Criterion) {
    let text = sample(2_000);
    let chunks: Vec<&str> = text.as_bytes().chunks(16).filter_map(|c| std::str::from_utf8(c).ok()).collect();

    c.bench_function("session_append_and_tick_2000_words", |b| {
        b.iter(|| {
            let mut session = RevealSession::streaming(RevealConfig::chat_reply());
            let now = Instant::now();
            for chunk in &chunks {
                session.apply(StreamEvent::Chunk((*chunk).to_string()));
                black_box(session.tick(now));
            }
        });
    });
}

criterion_group!(benches, tokenize_inline, tokenize_lines, session_chunk_tick);
criterion_main!(benches);
