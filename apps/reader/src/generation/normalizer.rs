//! Turns raw generator output into an `Article`.
//!
//! # Steps (in order)
//! 1. Strip markup noise: `*`, `#`, ASCII and CJK square brackets, line breaks, tabs.
//! 2. Trim surrounding whitespace.
//! 3. Punctuation repair: only when no terminal mark is present, insert `。`
//!    after every run of 10 glyphs (never within the final glyph) and close
//!    the text with `。`.
//! 4. Hard cut at the bucket ceiling (250, or 450 for `Extended`).
//!
//! The cut can drop every terminal mark when the only one sat past the
//! ceiling; in that case the last kept glyph is replaced with `。` so the
//! result still ends a sentence without growing.

use chrono::Utc;
use tracing::debug;

use crate::errors::AppError;
use crate::generation::prompt_builder::GenerationRequest;
use crate::models::{Article, LengthBucket};

const NOISE_CHARS: &[char] = &['*', '#', '[', ']', '【', '】', '\n', '\r', '\t'];
/// Full-width only: ASCII `.` also shows up in decimals and URLs.
const TERMINAL_MARKS: &[char] = &['。', '！', '？'];
const SYNTHETIC_BREAK: char = '。';
/// Glyphs per synthesized sentence. The break lands as soon as a run reaches the minimum.
const SENTENCE_RUN_MIN: usize = 10;
const SENTENCE_RUN_MAX: usize = 15;

pub fn is_terminal_mark(c: char) -> bool {
    TERMINAL_MARKS.contains(&c)
}

/// Runs the full normalization pipeline and wraps the result as an `Article`.
pub fn normalize(raw: &str, request: &GenerationRequest) -> Result<Article, AppError> {
    let text = normalize_text(raw, request.bucket());

    if text.is_empty() {
        return Err(AppError::Invariant(
            "normalization produced an empty article".to_string(),
        ));
    }

    debug!(
        glyphs = text.chars().count(),
        ceiling = request.bucket().ceiling(),
        "normalized generated article"
    );

    Ok(Article {
        text,
        level: request.level(),
        required_vocabulary: request.required_vocabulary().to_vec(),
        generated_at: Utc::now(),
    })
}

/// Pure text pipeline behind `normalize`.
pub fn normalize_text(raw: &str, bucket: LengthBucket) -> String {
    let stripped = strip_noise(raw);
    let trimmed = stripped.trim();
    let repaired = repair_punctuation(trimmed);
    truncate_to_ceiling(&repaired, bucket.ceiling())
}

fn strip_noise(raw: &str) -> String {
    raw.chars().filter(|c| !NOISE_CHARS.contains(c)).collect()
}

/// Leaves text containing any terminal mark untouched.
pub fn repair_punctuation(text: &str) -> String {
    if text.chars().any(is_terminal_mark) {
        return text.to_string();
    }

    let glyphs: Vec<char> = text.chars().collect();
    let mut repaired = String::with_capacity(text.len() + glyphs.len() / SENTENCE_RUN_MIN * 3 + 3);
    let mut run = 0usize;

    for (idx, &glyph) in glyphs.iter().enumerate() {
        repaired.push(glyph);
        run += 1;
        let is_last = idx + 1 == glyphs.len();
        if (SENTENCE_RUN_MIN..=SENTENCE_RUN_MAX).contains(&run) && !is_last {
            repaired.push(SYNTHETIC_BREAK);
            run = 0;
        }
    }

    match repaired.chars().last() {
        Some(last) if !is_terminal_mark(last) => repaired.push(SYNTHETIC_BREAK),
        _ => {}
    }
    repaired
}

fn truncate_to_ceiling(text: &str, ceiling: usize) -> String {
    let mut cut: String = text.chars().take(ceiling).collect();
    if cut.chars().count() < text.chars().count() && !cut.chars().any(is_terminal_mark) {
        cut.pop();
        cut.push(SYNTHETIC_BREAK);
    }
    cut
}
