//! Splits article text into fixed 10-glyph rows of annotated cells.
//!
//! # Rules
//! - Strict left-to-right consumption of every glyph, punctuation included.
//! - Row boundaries fall every 10 glyphs regardless of word boundaries;
//!   only the last row may be shorter.
//! - Only CJK unified ideographs (U+4E00..=U+9FFF) are annotable.
//!   Everything else carries an empty reading and is never highlighted.
//! - An annotable glyph is highlighted iff it occurs inside any vocabulary term.
//!
//! Output depends only on (text, vocabulary) and the transcriber, which must
//! itself be deterministic.

use serde::{Deserialize, Serialize};

use crate::layout::phonetics::Transcriber;

pub const ROW_WIDTH: usize = 10;

/// One glyph position in the presentation grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub glyph: char,
    /// Tone-marked reading; empty for non-annotable glyphs.
    pub pronunciation: String,
    pub is_highlighted: bool,
}

/// Up to `ROW_WIDTH` consecutive cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

pub fn is_annotable(glyph: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&glyph)
}

/// Per-glyph vocabulary membership: the glyph appears in at least one term.
pub fn is_vocabulary_glyph(glyph: char, vocabulary: &[String]) -> bool {
    vocabulary.iter().any(|term| term.contains(glyph))
}

fn annotate(glyph: char, vocabulary: &[String], transcriber: &dyn Transcriber) -> Cell {
    if !is_annotable(glyph) {
        return Cell {
            glyph,
            pronunciation: String::new(),
            is_highlighted: false,
        };
    }
    Cell {
        glyph,
        pronunciation: transcriber.transcribe(glyph),
        is_highlighted: is_vocabulary_glyph(glyph, vocabulary),
    }
}

/// Lays out `text` into rows. Empty text yields no rows.
pub fn layout_rows(text: &str, vocabulary: &[String], transcriber: &dyn Transcriber) -> Vec<Row> {
    let glyphs: Vec<char> = text.chars().collect();
    glyphs
        .chunks(ROW_WIDTH)
        .map(|chunk| Row {
            cells: chunk
                .iter()
                .map(|&g| annotate(g, vocabulary, transcriber))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reading is the glyph's code point, so every annotable glyph is distinguishable.
    struct CodepointTranscriber;

    impl Transcriber for CodepointTranscriber {
        fn transcribe(&self, glyph: char) -> String {
            format!("u{:x}", glyph as u32)
        }
    }

    fn vocab(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_row_count_and_sizes() {
        for len in [0usize, 1, 9, 10, 11, 20, 25, 250] {
            let text: String = std::iter::repeat('字').take(len).collect();
            let rows = layout_rows(&text, &[], &CodepointTranscriber);
            assert_eq!(rows.len(), len.div_ceil(ROW_WIDTH), "len={len}");
            let total: usize = rows.iter().map(|r| r.cells.len()).sum();
            assert_eq!(total, len);
            if let Some((last, full)) = rows.split_last() {
                assert!(full.iter().all(|r| r.cells.len() == ROW_WIDTH));
                assert!(!last.cells.is_empty() && last.cells.len() <= ROW_WIDTH);
            }
        }
    }

    #[test]
    fn test_rows_preserve_order_including_punctuation() {
        let text = "你好，世界！Hello 123。";
        let rows = layout_rows(text, &[], &CodepointTranscriber);
        let rebuilt: String = rows
            .iter()
            .flat_map(|r| r.cells.iter().map(|c| c.glyph))
            .collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_scenario_friend_highlighting() {
        let text = "今天天气很好我和朋友。一起去公园玩。";
        let rows = layout_rows(text, &vocab(&["朋友"]), &CodepointTranscriber);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells.len(), 10);
        assert_eq!(rows[1].cells.len(), 8);

        let highlighted: Vec<char> = rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .filter(|c| c.is_highlighted)
            .map(|c| c.glyph)
            .collect();
        assert_eq!(highlighted, vec!['朋', '友']);
    }

    #[test]
    fn test_unpunctuated_scenario_row_split() {
        let text = "今天天气很好我和朋友一起去公园玩";
        let rows = layout_rows(text, &vocab(&["朋友"]), &CodepointTranscriber);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].cells.len(), 6);
        assert!(rows[0].cells[8].is_highlighted && rows[0].cells[9].is_highlighted);
        assert_eq!(
            rows.iter()
                .flat_map(|r| r.cells.iter())
                .filter(|c| c.is_highlighted)
                .count(),
            2
        );
    }

    #[test]
    fn test_highlight_is_per_glyph_membership() {
        // 友 in 友好 is highlighted because 朋友 contains 友, even though 友好 is not a term.
        let rows = layout_rows("友好", &vocab(&["朋友"]), &CodepointTranscriber);
        assert!(rows[0].cells[0].is_highlighted);
        assert!(!rows[0].cells[1].is_highlighted);
    }

    #[test]
    fn test_non_cjk_never_highlighted_or_annotated() {
        let rows = layout_rows("abc，OK。", &vocab(&["abc", "，", "OK"]), &CodepointTranscriber);
        for cell in &rows[0].cells {
            assert!(!cell.is_highlighted, "{:?} must not be highlighted", cell.glyph);
            assert!(cell.pronunciation.is_empty());
        }
    }

    #[test]
    fn test_annotable_glyphs_get_reading() {
        let rows = layout_rows("中a", &[], &CodepointTranscriber);
        assert_eq!(rows[0].cells[0].pronunciation, "u4e2d");
        assert_eq!(rows[0].cells[1].pronunciation, "");
    }

    #[test]
    fn test_layout_is_deterministic() {
        let text = "我和朋友一起去公园玩，公园里有很多人。";
        let v = vocab(&["公园", "朋友"]);
        let first = layout_rows(text, &v, &CodepointTranscriber);
        let second = layout_rows(text, &v, &CodepointTranscriber);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_annotable_range_bounds() {
        assert!(is_annotable('\u{4e00}'));
        assert!(is_annotable('\u{9fff}'));
        assert!(!is_annotable('\u{3400}'));
        assert!(!is_annotable('。'));
    }
}
