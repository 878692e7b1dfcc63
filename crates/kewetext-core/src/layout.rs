//! Tab expansion and document/visual column mapping.
//!
//! Every character occupies exactly one cell, except `'\t'`, which advances to the next multiple
//! of the tab stop. All functions here are pure: they look at a row's content and a tab width and
//! keep no state between calls.

use crate::row::Row;

/// Width (in cells) of `ch` when it starts at visual column `x`.
pub fn cell_width_at(ch: char, x: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab_width = tab_width.max(1);
        tab_width - x % tab_width
    } else {
        1
    }
}

/// Visual column of document column `column` in `line`.
///
/// Columns past the end of the line are measured as if the line ended there.
pub fn visual_x_for_column(line: &str, column: usize, tab_width: usize) -> usize {
    let mut x = 0usize;
    for ch in line.chars().take(column) {
        x = x.saturating_add(cell_width_at(ch, x, tab_width));
    }
    x
}

/// Document column of the character covering visual column `visual_x` in `line`.
///
/// A visual column inside a tab's expansion maps to the tab itself. Visual columns at or past
/// the end of the line map to the line length.
pub fn column_for_visual_x(line: &str, visual_x: usize, tab_width: usize) -> usize {
    let mut x = 0usize;
    let mut column = 0usize;
    for ch in line.chars() {
        x = x.saturating_add(cell_width_at(ch, x, tab_width));
        if x > visual_x {
            return column;
        }
        column += 1;
    }
    column
}

/// Render form of `line`: every tab replaced by spaces up to the next tab stop.
pub fn expand_tabs(line: &str, tab_width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut x = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            let width = cell_width_at(ch, x, tab_width);
            out.extend(std::iter::repeat_n(' ', width));
            x += width;
        } else {
            out.push(ch);
            x += 1;
        }
    }
    out
}

/// Number of leading indentation characters (spaces and tabs) in `line`.
pub fn leading_indent(line: &str) -> usize {
    line.chars().take_while(|c| matches!(c, ' ' | '\t')).count()
}

/// Converts between document and visual columns of a [`Row`] for a fixed tab width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMapper {
    tab_width: usize,
}

impl CoordinateMapper {
    /// Create a mapper. A zero tab width is treated as 1.
    pub fn new(tab_width: usize) -> Self {
        Self {
            tab_width: tab_width.max(1),
        }
    }

    /// The tab width this mapper expands with.
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Visual column of document column `column` in `row`.
    pub fn to_visual(&self, row: &Row, column: usize) -> usize {
        visual_x_for_column(row.chars(), column, self.tab_width)
    }

    /// Document column shown at visual column `visual_x` in `row`.
    pub fn to_document(&self, row: &Row, visual_x: usize) -> usize {
        column_for_visual_x(row.chars(), visual_x, self.tab_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_width_expansion() {
        assert_eq!(cell_width_at('\t', 0, 4), 4);
        assert_eq!(cell_width_at('\t', 1, 4), 3);
        assert_eq!(cell_width_at('\t', 4, 4), 4);
        assert_eq!(cell_width_at('x', 3, 4), 1);
        assert_eq!(cell_width_at('\t', 5, 0), 1);
    }

    #[test]
    fn test_visual_and_document_columns_round_trip_on_tab() {
        let line = "a\tb";
        assert_eq!(visual_x_for_column(line, 1, 8), 1);
        assert_eq!(visual_x_for_column(line, 2, 8), 8);
        assert_eq!(visual_x_for_column(line, 3, 8), 9);
        assert_eq!(column_for_visual_x(line, 0, 8), 0);
        assert_eq!(column_for_visual_x(line, 1, 8), 1);
        // Cells 1..8 are all covered by the tab.
        assert_eq!(column_for_visual_x(line, 5, 8), 1);
        assert_eq!(column_for_visual_x(line, 8, 8), 2);
        assert_eq!(column_for_visual_x(line, 40, 8), 3);
    }

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs("\tx", 4), "    x");
        assert_eq!(expand_tabs("ab\tc\t", 4), "ab  c   ");
        assert_eq!(expand_tabs("plain", 4), "plain");
    }

    #[test]
    fn test_leading_indent_counts_units() {
        assert_eq!(leading_indent("\t  x"), 3);
        assert_eq!(leading_indent("x  "), 0);
        assert_eq!(leading_indent("    "), 4);
    }
}
