//! Printable-document renderer: a DOCX with a heading and one two-row grid per layout row.
//!
//! Colour and weight follow the markup renderer: vocabulary readings and
//! glyphs are red, vocabulary glyphs are bold.

use std::io::Cursor;

use bytes::Bytes;
use docx_rs::{AlignmentType, Docx, Paragraph, Run, RunFonts, Table, TableCell, TableRow};

use crate::errors::AppError;
use crate::layout::{Cell, Row};
use crate::models::Level;

const HIGHLIGHT_HEX: &str = "FF0000";
const READING_HEX: &str = "0000FF";
const GLYPH_HEX: &str = "000000";
/// Half-point sizes.
const HEADING_SIZE: usize = 32;
const READING_SIZE: usize = 18;
const GLYPH_SIZE: usize = 28;
const GLYPH_FONT: &str = "SimSun";

pub fn document_heading(level: Level, item_index: usize) -> String {
    format!("{level} 第{item_index}篇")
}

/// Builds the DOCX payload. CPU-bound; callers on the runtime use `spawn_blocking`.
pub fn render_document(rows: &[Row], level: Level, item_index: usize) -> Result<Bytes, AppError> {
    let heading = Paragraph::new().align(AlignmentType::Center).add_run(
        Run::new()
            .add_text(document_heading(level, item_index))
            .bold()
            .size(HEADING_SIZE),
    );

    let mut docx = Docx::new().add_paragraph(heading);
    for row in rows {
        docx = docx.add_table(grid_for_row(row)).add_paragraph(Paragraph::new());
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| AppError::Render(format!("failed to pack document: {e}")))?;
    Ok(Bytes::from(buffer.into_inner()))
}

fn grid_for_row(row: &Row) -> Table {
    let readings = row.cells.iter().map(reading_cell).collect();
    let glyphs = row.cells.iter().map(glyph_cell).collect();
    Table::new(vec![TableRow::new(readings), TableRow::new(glyphs)])
}

fn reading_cell(cell: &Cell) -> TableCell {
    let color = if cell.is_highlighted {
        HIGHLIGHT_HEX
    } else {
        READING_HEX
    };
    let run = Run::new()
        .add_text(cell.pronunciation.as_str())
        .size(READING_SIZE)
        .color(color);
    TableCell::new().add_paragraph(Paragraph::new().align(AlignmentType::Center).add_run(run))
}

fn glyph_cell(cell: &Cell) -> TableCell {
    let mut run = Run::new()
        .add_text(cell.glyph.to_string())
        .size(GLYPH_SIZE)
        .fonts(RunFonts::new().east_asia(GLYPH_FONT));
    run = if cell.is_highlighted {
        run.color(HIGHLIGHT_HEX).bold()
    } else {
        run.color(GLYPH_HEX)
    };
    TableCell::new().add_paragraph(Paragraph::new().align(AlignmentType::Center).add_run(run))
}
