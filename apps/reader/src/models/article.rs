use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::level::Level;

/// A normalized generated text, owned by the session's article list.
///
/// Only the normalizer constructs articles, so `text` is always non-empty,
/// carries terminal punctuation and respects the bucket ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub text: String,
    pub level: Level,
    pub required_vocabulary: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl Article {
    /// Length in glyphs (code points), not bytes.
    pub fn glyph_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Kind of cached rendering output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Document,
    Audio,
}
