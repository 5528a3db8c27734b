//! Phonetic transcription for annotable glyphs.

use pinyin::ToPinyin;

/// Phonetic-transcription collaborator: one glyph in, tone-marked reading out.
///
/// Implementations must be deterministic; the layout engine relies on it.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, glyph: char) -> String;
}

/// Tone-marked Hanyu Pinyin from the bundled dictionary. Polyphonic glyphs
/// get their most common reading; glyphs without an entry get an empty string.
#[derive(Debug, Default, Clone, Copy)]
pub struct PinyinTranscriber;

impl Transcriber for PinyinTranscriber {
    fn transcribe(&self, glyph: char) -> String {
        glyph
            .to_pinyin()
            .map(|p| p.with_tone().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_marks() {
        let t = PinyinTranscriber;
        assert_eq!(t.transcribe('好'), "hǎo");
        assert_eq!(t.transcribe('朋'), "péng");
        assert_eq!(t.transcribe('天'), "tiān");
    }

    #[test]
    fn test_non_hanzi_has_no_reading() {
        let t = PinyinTranscriber;
        assert_eq!(t.transcribe('A'), "");
        assert_eq!(t.transcribe('。'), "");
    }
}
