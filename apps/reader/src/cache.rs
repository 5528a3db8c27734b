//! At-most-once computation of expensive artifacts per session.
//!
//! Keyed by (level, item index, artifact kind). First writer wins; entries
//! live until `clear`, which a new generation run performs because item
//! indices are reused for different content. No eviction otherwise.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::models::{ArtifactKind, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub level: Level,
    pub item_index: usize,
    pub kind: ArtifactKind,
}

impl ArtifactKey {
    pub fn new(level: Level, item_index: usize, kind: ArtifactKind) -> Self {
        Self {
            level,
            item_index,
            kind,
        }
    }
}

#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<ArtifactKey, Bytes>,
}

impl ResultCache {
    pub fn get(&self, key: &ArtifactKey) -> Option<Bytes> {
        self.entries.get(key).cloned()
    }

    /// Stores `payload` unless the key is already present; returns the stored value.
    pub fn put(&mut self, key: ArtifactKey, payload: Bytes) -> Bytes {
        self.entries.entry(key).or_insert(payload).clone()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
