//! Vocabulary input parsing and the word-frequency summary.
//!
//! The summary is display-only: it segments an article, keeps multi-glyph
//! segments and reports the ten most frequent.

use std::collections::HashMap;

use jieba_rs::Jieba;

use crate::errors::AppError;

const TOP_SEGMENTS: usize = 10;

/// Splits free-form learner input on any whitespace, dropping duplicates
/// while keeping first-occurrence order.
pub fn parse_vocabulary(input: &str) -> Result<Vec<String>, AppError> {
    let mut terms: Vec<String> = Vec::new();
    for term in input.split_whitespace() {
        if !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    }
    if terms.is_empty() {
        return Err(AppError::Input(
            "required vocabulary is empty; enter at least one word".to_string(),
        ));
    }
    Ok(terms)
}

/// Word-segmentation collaborator.
pub trait Segmenter: Send + Sync {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Dictionary-based segmenter backed by jieba.
pub struct JiebaSegmenter {
    jieba: Jieba,
}

impl JiebaSegmenter {
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }
}

impl Default for JiebaSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for JiebaSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.jieba.cut(text, false)
    }
}

/// Top ten multi-glyph segments by count. Ties keep first-occurrence order.
pub fn frequency_summary(text: &str, segmenter: &dyn Segmenter) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, segment) in segmenter.segment(text).into_iter().enumerate() {
        if segment.chars().count() <= 1 {
            continue;
        }
        counts.entry(segment).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked
        .into_iter()
        .take(TOP_SEGMENTS)
        .map(|(word, (count, _))| (word.to_string(), count))
        .collect()
}
