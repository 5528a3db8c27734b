// Renderers: pure functions from layout rows to payloads, plus artifact naming
// and atomic export to disk.

pub mod document;
pub mod markup;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::errors::AppError;
use crate::models::{ArtifactKind, Level};

pub use document::render_document;
pub use markup::render_markup;

pub const DOCUMENT_EXT: &str = "docx";
pub const AUDIO_EXT: &str = "mp3";

/// `<level>_article<index>_annotated.<ext>`
pub fn document_file_name(level: Level, item_index: usize, ext: &str) -> String {
    format!("{level}_article{item_index}_annotated.{ext}")
}

/// `<level>_item<index>_reading.<ext>`
pub fn audio_file_name(level: Level, item_index: usize, ext: &str) -> String {
    format!("{level}_item{item_index}_reading.{ext}")
}

/// `<level>_article<index>.txt`
pub fn text_file_name(level: Level, item_index: usize) -> String {
    format!("{level}_article{item_index}.txt")
}

/// File name for a cached artifact kind with its default extension.
pub fn artifact_file_name(level: Level, item_index: usize, kind: ArtifactKind) -> String {
    match kind {
        ArtifactKind::Document => document_file_name(level, item_index, DOCUMENT_EXT),
        ArtifactKind::Audio => audio_file_name(level, item_index, AUDIO_EXT),
    }
}

/// Writes `payload` to `dir/file_name` through a temp file in the same directory,
/// so readers never observe a partial file. Creates `dir` if missing.
pub fn export_artifact(dir: &Path, file_name: &str, payload: &[u8]) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(payload)?;
    tmp.flush()?;

    let target = dir.join(file_name);
    tmp.persist(&target).map_err(|e| AppError::Io(e.error))?;
    info!("Wrote {} ({} bytes)", target.display(), payload.len());
    Ok(target)
}
