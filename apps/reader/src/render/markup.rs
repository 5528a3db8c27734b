//! Inline-markup renderer: one two-row HTML table per layout row.
//!
//! Top row holds readings, bottom row holds glyphs. Vocabulary glyphs are red
//! (reading and glyph) and bold (glyph); other readings are blue.

use maud::{html, Markup};

use crate::layout::{Cell, Row};

pub const HIGHLIGHT_COLOR: &str = "red";
const READING_COLOR: &str = "blue";
const GLYPH_COLOR: &str = "black";

const TABLE_STYLE: &str = "border-collapse: collapse; margin: 10px 0;";
const CELL_STYLE: &str =
    "border: 1px solid #ddd; padding: 4px 8px; text-align: center; width: 50px;";

/// Renders rows into a self-contained HTML fragment.
pub fn render_markup(rows: &[Row]) -> String {
    html! {
        div class="annotated-article" {
            @for row in rows {
                table style=(TABLE_STYLE) {
                    tr {
                        @for cell in &row.cells {
                            (reading_cell(cell))
                        }
                    }
                    tr {
                        @for cell in &row.cells {
                            (glyph_cell(cell))
                        }
                    }
                }
            }
        }
    }
    .into_string()
}

fn reading_cell(cell: &Cell) -> Markup {
    let color = if cell.is_highlighted {
        HIGHLIGHT_COLOR
    } else {
        READING_COLOR
    };
    html! {
        td style=(format!("{CELL_STYLE} color: {color}; font-size: 12px;")) {
            (cell.pronunciation)
        }
    }
}

fn glyph_cell(cell: &Cell) -> Markup {
    let (color, weight) = if cell.is_highlighted {
        (HIGHLIGHT_COLOR, "bold")
    } else {
        (GLYPH_COLOR, "normal")
    };
    html! {
        td style=(format!("{CELL_STYLE} color: {color}; font-size: 16px; font-weight: {weight};")) {
            (cell.glyph)
        }
    }
}
