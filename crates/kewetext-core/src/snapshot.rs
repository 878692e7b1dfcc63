//! Headless render snapshot.
//!
//! Provides what a renderer needs for each visible row: the render text, one classification
//! per cell, the continuation flag and per-cell selection membership. The core stops here;
//! mapping classifications to colors and emitting output is the renderer's job.

use crate::document::Document;
use crate::highlight::Highlight;
use crate::layout::CoordinateMapper;
use crate::position::Position;
use crate::selection::{SelectionModel, SelectionRange};

/// The visible window over the document, in rows and render columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// First visible row.
    pub row_offset: usize,
    /// First visible render column.
    pub col_offset: usize,
    /// Number of visible rows.
    pub rows: usize,
    /// Number of visible columns.
    pub cols: usize,
}

/// Render data for one visible row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Document row index.
    pub index: usize,
    /// Render text clipped to the viewport columns.
    pub text: String,
    /// Classification of each cell in `text`.
    pub highlight: Vec<Highlight>,
    /// Whether a multi-line comment is still open at the end of the row.
    pub open_comment: bool,
    /// Selection membership of each cell in `text`. The cursor cell is never marked.
    pub selected: Vec<bool>,
}

impl RowView {
    /// Iterate `(char, highlight, selected)` per visible cell.
    pub fn cells(&self) -> impl Iterator<Item = (char, Highlight, bool)> + '_ {
        self.text
            .chars()
            .zip(self.highlight.iter().copied())
            .zip(self.selected.iter().copied())
            .map(|((ch, hl), sel)| (ch, hl, sel))
    }
}

/// Selection range converted to render columns.
///
/// The start maps to the first cell of its character and the end to the last one, so a tab at
/// either end is selected across its whole expansion.
fn visual_range(doc: &Document, range: SelectionRange) -> SelectionRange {
    let mapper = CoordinateMapper::new(doc.tab_stop());
    let start = doc
        .row(range.start.line)
        .map_or(0, |row| mapper.to_visual(row, range.start.column));
    let end = doc.row(range.end.line).map_or(0, |row| {
        let first_cell = mapper.to_visual(row, range.end.column);
        let next = mapper.to_visual(row, range.end.column + 1);
        next.saturating_sub(1).max(first_cell)
    });
    SelectionRange {
        start: Position::new(range.start.line, start),
        end: Position::new(range.end.line, end),
    }
}

/// Build [`RowView`]s for the rows inside `viewport`.
///
/// `cursor` is given in visual coordinates (row, render column); its cell is left unselected.
pub fn visible_rows(
    doc: &Document,
    viewport: Viewport,
    selection: &SelectionModel,
    cursor: Position,
) -> Vec<RowView> {
    let range = selection
        .is_active()
        .then(|| visual_range(doc, selection.range()));

    doc.rows()
        .iter()
        .skip(viewport.row_offset)
        .take(viewport.rows)
        .map(|row| {
            let first = viewport.col_offset.min(row.render_len());
            let last = (first + viewport.cols).min(row.render_len());
            let text: String = row.render().chars().skip(first).take(last - first).collect();
            let selected = (first..last)
                .map(|x| {
                    let at_cursor = row.index() == cursor.line && x == cursor.column;
                    !at_cursor && range.is_some_and(|r| r.contains(row.index(), x))
                })
                .collect();
            RowView {
                index: row.index(),
                text,
                highlight: row.highlight()[first..last].to_vec(),
                open_comment: row.open_comment(),
                selected,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionDirection;

    fn viewport(rows: usize, cols: usize) -> Viewport {
        Viewport {
            row_offset: 0,
            col_offset: 0,
            rows,
            cols,
        }
    }

    #[test]
    fn test_rows_are_clipped_to_viewport() {
        let doc = Document::from_text("0123456789\nab\nc\nd\n", 8);
        let view = Viewport {
            row_offset: 1,
            col_offset: 1,
            rows: 2,
            cols: 4,
        };
        let rows = visible_rows(&doc, view, &SelectionModel::new(), Position::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].text, "b");
        assert_eq!(rows[1].text, "");
        assert!(rows.iter().all(|r| r.highlight.len() == r.text.chars().count()));
    }

    #[test]
    fn test_selection_uses_visual_columns_and_skips_cursor() {
        let doc = Document::from_text("\tab\n", 4);
        let mut sel = SelectionModel::new();
        // Document columns 0..=2 are visual columns 0..=5.
        sel.extend(
            Position::new(0, 0),
            Position::new(0, 2),
            SelectionDirection::Forward,
        );
        let rows = visible_rows(&doc, viewport(5, 10), &sel, Position::new(0, 5));
        assert_eq!(rows[0].selected, vec![true, true, true, true, true, false]);
    }

    #[test]
    fn test_selection_ending_on_tab_covers_its_expansion() {
        let doc = Document::from_text("a\tb\n", 4);
        let mut sel = SelectionModel::new();
        sel.extend(
            Position::new(0, 0),
            Position::new(0, 1),
            SelectionDirection::Forward,
        );
        let rows = visible_rows(&doc, viewport(5, 10), &sel, Position::new(1, 0));
        assert_eq!(rows[0].text, "a   b");
        assert_eq!(rows[0].selected, vec![true, true, true, true, false]);
    }

    #[test]
    fn test_idle_selection_marks_nothing() {
        let doc = Document::from_text("abc\n", 8);
        let rows = visible_rows(&doc, viewport(5, 10), &SelectionModel::new(), Position::default());
        assert!(rows[0].selected.iter().all(|s| !s));
        let cells: Vec<_> = rows[0].cells().map(|(ch, _, _)| ch).collect();
        assert_eq!(cells, vec!['a', 'b', 'c']);
    }
}
