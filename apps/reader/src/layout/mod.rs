// Layout Engine: fixed-width annotated rows shared by every renderer.
// Pure and synchronous; the transcriber is the only collaborator.

pub mod grid;
pub mod phonetics;

// Re-export the public API consumed by renderers and the session.
pub use grid::{layout_rows, Cell, Row};
pub use phonetics::{PinyinTranscriber, Transcriber};
