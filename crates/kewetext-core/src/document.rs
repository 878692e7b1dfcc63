//! The document: an ordered store of [`Row`]s and the unit of mutation.
//!
//! # Overview
//!
//! Every public mutation keeps three things true before it returns:
//!
//! - each row's `index` equals its position in the document
//! - each touched row's render form and highlighting are recomputed from its content
//!   (`highlight().len() == render_len()`)
//! - continuation flags are consistent: if a change opens or closes a multi-line comment, the
//!   following rows are re-highlighted until the flag stops changing
//!
//! Out-of-range rows and columns are clamped, never rejected. The only exception is
//! [`Document::delete_row`], which ignores indices past the last row.
//!
//! # Example
//!
//! ```rust
//! use kewetext_core::Document;
//!
//! let mut doc = Document::from_text("hello\nworld\n", 8);
//! doc.insert_char(0, 5, '!');
//! let tail = doc.split_row_at(1, 3);
//! assert_eq!(tail, 2);
//! assert_eq!(doc.to_text(), "hello!\nwor\nld\n");
//! assert!(doc.is_dirty());
//! ```

use crate::config::DEFAULT_TAB_STOP;
use crate::highlight::{Highlight, SyntaxHighlighter};
use crate::line_ending::LineEnding;
use crate::position::Position;
use crate::row::Row;
use crate::text::{split_inserted, split_lines};
use kewetext_lang::SyntaxDescriptor;

/// Ordered owner of all rows of the open file.
#[derive(Debug, Clone)]
pub struct Document {
    rows: Vec<Row>,
    dirty: usize,
    syntax: Option<SyntaxDescriptor>,
    highlighter: SyntaxHighlighter,
    tab_stop: usize,
    line_ending: LineEnding,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_STOP)
    }
}

impl Document {
    /// Create an empty document.
    pub fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            dirty: 0,
            syntax: None,
            highlighter: SyntaxHighlighter::new(None),
            tab_stop: tab_stop.max(1),
            line_ending: LineEnding::Lf,
        }
    }

    /// Build a document from file text, remembering its line ending.
    pub fn from_text(text: &str, tab_stop: usize) -> Self {
        let mut doc = Self::new(tab_stop);
        doc.load(split_lines(text));
        doc.line_ending = LineEnding::detect(text);
        doc
    }

    /// Replace the whole content with `lines`. The dirty counter is reset.
    ///
    /// A line that still contains `'\n'` becomes several rows, and a `'\r'` before each break is
    /// dropped.
    pub fn load<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tab_stop = self.tab_stop;
        self.rows = lines
            .into_iter()
            .flat_map(|line| {
                line.as_ref()
                    .split('\n')
                    .map(|piece| piece.strip_suffix('\r').unwrap_or(piece).to_string())
                    .collect::<Vec<_>>()
            })
            .enumerate()
            .map(|(index, line)| Row::new(index, &line, tab_stop))
            .collect();
        self.line_ending = LineEnding::Lf;
        self.rehighlight_all();
        self.dirty = 0;
        log::debug!("loaded {} rows", self.rows.len());
    }

    /// Each row's content followed by the line terminator, in row order.
    pub fn serialize(&self) -> Vec<u8> {
        self.to_text().into_bytes()
    }

    /// Same as [`Document::serialize`], as a `String`.
    pub fn to_text(&self) -> String {
        let terminator = self.line_ending.as_str();
        let capacity = self
            .rows
            .iter()
            .map(|r| r.chars().len() + terminator.len())
            .sum();
        let mut out = String::with_capacity(capacity);
        for row in &self.rows {
            out.push_str(row.chars());
            out.push_str(terminator);
        }
        out
    }

    /// All rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row at `index`, if it exists.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the document has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mutations since load or the last [`Document::mark_saved`].
    pub fn dirty(&self) -> usize {
        self.dirty
    }

    /// Returns `true` if there are unsaved mutations.
    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Reset the dirty counter after the content was written out.
    pub fn mark_saved(&mut self) {
        self.dirty = 0;
    }

    /// Line ending used by [`Document::serialize`].
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Active language descriptor.
    pub fn syntax(&self) -> Option<&SyntaxDescriptor> {
        self.syntax.as_ref()
    }

    /// Switch the language descriptor and re-highlight every row.
    pub fn set_syntax(&mut self, syntax: Option<SyntaxDescriptor>) {
        self.highlighter = SyntaxHighlighter::new(syntax.as_ref());
        self.syntax = syntax;
        self.rehighlight_all();
    }

    /// Tab stop used to build render forms.
    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// Change the tab stop and rebuild every row's render form.
    pub fn set_tab_stop(&mut self, tab_stop: usize) {
        let tab_stop = tab_stop.max(1);
        if tab_stop == self.tab_stop {
            return;
        }
        self.tab_stop = tab_stop;
        for row in &mut self.rows {
            row.update_render(tab_stop);
        }
        self.rehighlight_all();
    }

    /// Insert a new row holding `text` before row `at` (clamped to the row count).
    ///
    /// Line breaks in `text` start further rows. Returns the index of the first inserted row.
    pub fn insert_row(&mut self, at: usize, text: &str) -> usize {
        let at = at.min(self.rows.len());
        let pieces = split_inserted(text);
        let last = at + pieces.len() - 1;
        let tab_stop = self.tab_stop;
        self.rows.splice(
            at..at,
            pieces
                .iter()
                .enumerate()
                .map(|(i, piece)| Row::new(at + i, piece, tab_stop)),
        );
        self.renumber_from(last + 1);
        self.highlighter.rehighlight(&mut self.rows, at, last);
        self.dirty += 1;
        at
    }

    /// Remove row `at` and return its content. Indices past the last row are ignored.
    pub fn delete_row(&mut self, at: usize) -> Option<String> {
        if at >= self.rows.len() {
            return None;
        }
        let row = self.rows.remove(at);
        self.renumber_from(at);
        self.highlighter.repair_from(&mut self.rows, at);
        self.dirty += 1;
        Some(row.into_chars())
    }

    /// Insert `ch` before column `col` of row `row`.
    ///
    /// Both coordinates are clamped; an empty document first gets an empty row. `'\n'` splits
    /// the row there and `'\r'` is not stored. Returns the position the character ended up at.
    pub fn insert_char(&mut self, row: usize, col: usize, ch: char) -> Position {
        match ch {
            '\n' | '\r' => self.insert_str(row, col, ch.encode_utf8(&mut [0; 4])),
            _ => {
                let row = self.ensure_row(row);
                let col = col.min(self.rows[row].size());
                self.rows[row].insert_char(col, ch);
                self.refresh_rows(row, row);
                self.dirty += 1;
                Position::new(row, col)
            }
        }
    }

    /// Insert `text` before column `col` of row `row` (both clamped).
    ///
    /// Every `'\n'` in `text` ends the current row and the rest of the original row follows
    /// the last inserted piece. Carriage returns are dropped. Returns the insertion point.
    pub fn insert_str(&mut self, row: usize, col: usize, text: &str) -> Position {
        let row = self.ensure_row(row);
        let col = col.min(self.rows[row].size());
        let pos = Position::new(row, col);

        let pieces = split_inserted(text);
        let [first, rest @ ..] = pieces.as_slice() else {
            return pos;
        };
        if rest.is_empty() {
            if !first.is_empty() {
                self.rows[row].insert_str(col, first);
                self.refresh_rows(row, row);
                self.dirty += 1;
            }
            return pos;
        }

        let tail = self.rows[row].split_off(col);
        self.rows[row].append_str(first);
        let last = row + rest.len();
        let tab_stop = self.tab_stop;
        self.rows.splice(
            row + 1..row + 1,
            rest.iter().enumerate().map(|(i, piece)| {
                let mut content = piece.clone();
                if row + 1 + i == last {
                    content.push_str(&tail);
                }
                Row::new(row + 1 + i, &content, tab_stop)
            }),
        );
        self.renumber_from(last + 1);
        self.refresh_rows(row, last);
        self.dirty += 1;
        pos
    }

    /// Delete the character at column `col` of row `row` (both clamped).
    ///
    /// Returns the removed character, or `None` if the row is empty or there are no rows.
    pub fn delete_char(&mut self, row: usize, col: usize) -> Option<char> {
        let row = self.clamp_row(row)?;
        let removed = self.rows[row].delete_char(col)?;
        self.refresh_rows(row, row);
        self.dirty += 1;
        Some(removed)
    }

    /// Append `text` to the end of row `row` (clamped). Line breaks start new rows.
    pub fn append_text(&mut self, row: usize, text: &str) {
        let row = self.ensure_row(row);
        let end = self.rows[row].size();
        self.insert_str(row, end, text);
    }

    /// Split row `row` at column `col`; the tail becomes a new row right after it.
    ///
    /// Returns the index of the new row.
    pub fn split_row_at(&mut self, row: usize, col: usize) -> usize {
        let row = self.ensure_row(row);
        let tail = self.rows[row].split_off(col);
        self.rows[row].update_render(self.tab_stop);
        self.rows.insert(row + 1, Row::new(row + 1, &tail, self.tab_stop));
        self.renumber_from(row + 2);
        self.highlighter.rehighlight(&mut self.rows, row, row + 1);
        self.dirty += 1;
        row + 1
    }

    /// Append row `row + 1` to row `row` and remove it.
    ///
    /// Returns the column where the two rows were joined, or `None` if `row` is the last row.
    pub fn join_row_with_next(&mut self, row: usize) -> Option<usize> {
        if row + 1 >= self.rows.len() {
            return None;
        }
        let next = self.rows.remove(row + 1);
        let join_col = self.rows[row].size();
        self.rows[row].append_str(next.chars());
        self.renumber_from(row + 1);
        self.refresh_rows(row, row);
        self.dirty += 1;
        Some(join_col)
    }

    pub(crate) fn highlight_snapshot(&self, row: usize) -> Option<Vec<Highlight>> {
        self.rows.get(row).map(|r| r.highlight().to_vec())
    }

    pub(crate) fn overlay_highlight(
        &mut self,
        row: usize,
        start: usize,
        end: usize,
        class: Highlight,
    ) {
        if let Some(r) = self.rows.get_mut(row) {
            r.overlay(start, end, class);
        }
    }

    /// Put back a saved highlight array; if the row changed shape meanwhile it is re-scanned.
    pub(crate) fn restore_highlight(&mut self, row: usize, saved: Vec<Highlight>) {
        let Some(r) = self.rows.get_mut(row) else {
            return;
        };
        if !r.restore_highlight(saved) {
            self.highlighter.rehighlight(&mut self.rows, row, row);
        }
    }

    fn clamp_row(&self, row: usize) -> Option<usize> {
        (!self.rows.is_empty()).then(|| row.min(self.rows.len() - 1))
    }

    fn ensure_row(&mut self, row: usize) -> usize {
        if self.rows.is_empty() {
            self.rows.push(Row::new(0, "", self.tab_stop));
        }
        row.min(self.rows.len() - 1)
    }

    fn renumber_from(&mut self, from: usize) {
        for (index, row) in self.rows.iter_mut().enumerate().skip(from) {
            row.set_index(index);
        }
    }

    fn refresh_rows(&mut self, from: usize, through: usize) {
        let tab_stop = self.tab_stop;
        for row in &mut self.rows[from..=through] {
            row.update_render(tab_stop);
        }
        self.highlighter.rehighlight(&mut self.rows, from, through);
    }

    fn rehighlight_all(&mut self) {
        if let Some(last) = self.rows.len().checked_sub(1) {
            self.highlighter.rehighlight(&mut self.rows, 0, last);
        }
    }
}
