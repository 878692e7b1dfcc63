//! Incremental substring search over a [`Document`].
//!
//! The engine walks rows as a ring starting next to the previous match, so repeated
//! `find` calls step through every occurrence row by row and wrap around at either end. A hit
//! is shown by overlaying [`Highlight::Match`] on the row; the row's own classification is
//! saved first and put back when the overlay moves or the search ends.
//!
//! Queries are literal and case-sensitive. They are escaped and compiled with `regex`, and
//! matched against each row's render form, so a hit is reported in render cells and then
//! mapped back to a document column.

use crate::document::Document;
use crate::highlight::Highlight;
use crate::layout::CoordinateMapper;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Search errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query could not be compiled.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Direction the ring walk advances in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    /// Towards higher row indices, wrapping to row 0.
    #[default]
    Forward,
    /// Towards lower row indices, wrapping to the last row.
    Backward,
}

impl SearchDirection {
    /// Row visited after `row` in a document of `len` rows.
    pub fn step(self, row: usize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self {
            Self::Forward => (row + 1) % len,
            Self::Backward => row.checked_sub(1).unwrap_or(len - 1).min(len - 1),
        }
    }
}

/// A match found by [`SearchEngine::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    /// Row containing the match.
    pub row: usize,
    /// Document column of the first matched character.
    pub column: usize,
    /// Render cell of the first matched character.
    pub render_column: usize,
    /// Match length in render cells.
    pub len: usize,
}

#[derive(Debug, Clone)]
struct SavedHighlight {
    row: usize,
    highlight: Vec<Highlight>,
}

/// Search state: last matched row, direction and the row classification hidden under the
/// current overlay.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    last_match: Option<usize>,
    direction: SearchDirection,
    saved: Option<SavedHighlight>,
}

fn compile_query(query: &str) -> Result<Regex, SearchError> {
    Ok(RegexBuilder::new(&regex::escape(query))
        .case_insensitive(false)
        .build()?)
}

impl SearchEngine {
    /// Create an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Row of the last match, if any.
    pub fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// Direction used by the last [`SearchEngine::find`].
    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// Returns `true` while a match overlay is installed.
    pub fn has_overlay(&self) -> bool {
        self.saved.is_some()
    }

    /// Forget the last match so the next search starts over from row 0.
    pub fn reset_match(&mut self) {
        self.last_match = None;
        self.direction = SearchDirection::Forward;
    }

    /// Find the next row containing `query`, starting next to the last match (or at row 0).
    ///
    /// At most one full lap of the document is made. An empty query never matches. When nothing
    /// is found the overlay and the last match are left as they were.
    pub fn find(
        &mut self,
        doc: &mut Document,
        query: &str,
        direction: SearchDirection,
    ) -> Result<Option<SearchHit>, SearchError> {
        self.direction = direction;
        let start = match self.last_match {
            Some(row) => direction.step(row, doc.len()),
            None => 0,
        };
        self.find_from(doc, query, direction, start)
    }

    /// Like [`SearchEngine::find`], but the first row examined is `start_row` (clamped).
    pub fn find_from(
        &mut self,
        doc: &mut Document,
        query: &str,
        direction: SearchDirection,
        start_row: usize,
    ) -> Result<Option<SearchHit>, SearchError> {
        self.direction = direction;
        if query.is_empty() || doc.is_empty() {
            return Ok(None);
        }

        let re = compile_query(query)?;
        let len = doc.len();
        let mut row = start_row.min(len - 1);

        for _ in 0..len {
            if let Some(hit) = Self::match_in_row(doc, &re, row) {
                self.last_match = Some(row);
                self.install_overlay(doc, hit);
                log::debug!("search {query:?} matched row {row} at column {}", hit.column);
                return Ok(Some(hit));
            }
            row = direction.step(row, len);
        }

        log::debug!("search {query:?} found nothing in {len} rows");
        Ok(None)
    }

    /// End the search: put back any overlaid row and reset last match and direction.
    pub fn finish(&mut self, doc: &mut Document) {
        self.clear_overlay(doc);
        self.reset_match();
    }

    /// Put back the row classification hidden under the overlay, if any.
    pub fn clear_overlay(&mut self, doc: &mut Document) {
        if let Some(saved) = self.saved.take() {
            doc.restore_highlight(saved.row, saved.highlight);
        }
    }

    fn match_in_row(doc: &Document, re: &Regex, row: usize) -> Option<SearchHit> {
        let r = doc.row(row)?;
        let m = re.find(r.render())?;
        let render_column = r.render()[..m.start()].chars().count();
        let len = m.as_str().chars().count();
        let column = CoordinateMapper::new(doc.tab_stop()).to_document(r, render_column);
        Some(SearchHit {
            row,
            column,
            render_column,
            len,
        })
    }

    fn install_overlay(&mut self, doc: &mut Document, hit: SearchHit) {
        self.clear_overlay(doc);
        if let Some(highlight) = doc.highlight_snapshot(hit.row) {
            self.saved = Some(SavedHighlight {
                row: hit.row,
                highlight,
            });
        }
        doc.overlay_highlight(
            hit.row,
            hit.render_column,
            hit.render_column + hit.len,
            Highlight::Match,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kewetext_lang::{CommentConfig, HighlightFlags, SyntaxDescriptor};
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> Document {
        Document::from_text(text, 8)
    }

    #[test]
    fn test_direction_step_wraps() {
        assert_eq!(SearchDirection::Forward.step(2, 3), 0);
        assert_eq!(SearchDirection::Forward.step(0, 3), 1);
        assert_eq!(SearchDirection::Backward.step(0, 3), 2);
        assert_eq!(SearchDirection::Backward.step(2, 3), 1);
        assert_eq!(SearchDirection::Backward.step(0, 0), 0);
    }

    #[test]
    fn test_forward_search_wraps_past_last_row() {
        let mut doc = doc("needle\nhay\nhay\n");
        let mut search = SearchEngine::new();
        let hit = search
            .find_from(&mut doc, "needle", SearchDirection::Forward, 2)
            .unwrap()
            .unwrap();
        assert_eq!(hit.row, 0);
        assert_eq!(search.last_match(), Some(0));
    }

    #[test]
    fn test_repeated_find_steps_through_rows() {
        let mut doc = doc("ab\nxx\nab\nab\n");
        let mut search = SearchEngine::new();
        let rows: Vec<usize> = (0..4)
            .map(|_| {
                search
                    .find(&mut doc, "ab", SearchDirection::Forward)
                    .unwrap()
                    .unwrap()
                    .row
            })
            .collect();
        assert_eq!(rows, vec![0, 2, 3, 0]);

        let hit = search
            .find(&mut doc, "ab", SearchDirection::Backward)
            .unwrap()
            .unwrap();
        assert_eq!(hit.row, 3);
        assert_eq!(search.direction(), SearchDirection::Backward);
    }

    #[test]
    fn test_no_match_keeps_state() {
        let mut doc = doc("one\ntwo\n");
        let mut search = SearchEngine::new();
        search.find(&mut doc, "two", SearchDirection::Forward).unwrap();
        let before = doc.row(1).unwrap().highlight().to_vec();

        assert_eq!(
            search
                .find(&mut doc, "three", SearchDirection::Forward)
                .unwrap(),
            None
        );
        assert_eq!(search.last_match(), Some(1));
        assert_eq!(doc.row(1).unwrap().highlight(), before.as_slice());
        assert!(search.has_overlay());
    }

    #[test]
    fn test_empty_query_and_empty_document() {
        let mut search = SearchEngine::new();
        let mut empty = Document::default();
        assert_eq!(
            search.find(&mut empty, "x", SearchDirection::Forward).unwrap(),
            None
        );
        let mut doc = doc("x\n");
        assert_eq!(
            search.find(&mut doc, "", SearchDirection::Forward).unwrap(),
            None
        );
    }

    #[test]
    fn test_match_after_tab_maps_to_document_column() {
        let mut doc = doc("\tfoo\n");
        let mut search = SearchEngine::new();
        let hit = search
            .find(&mut doc, "foo", SearchDirection::Forward)
            .unwrap()
            .unwrap();
        assert_eq!(hit.render_column, 8);
        assert_eq!(hit.column, 1);
        assert_eq!(hit.len, 3);
    }

    #[test]
    fn test_query_is_literal() {
        let mut doc = doc("a.b\naxb\n");
        let mut search = SearchEngine::new();
        let hit = search
            .find_from(&mut doc, "x.b", SearchDirection::Forward, 0)
            .unwrap();
        assert_eq!(hit, None);
        let hit = search
            .find_from(&mut doc, "a.b", SearchDirection::Forward, 1)
            .unwrap()
            .unwrap();
        assert_eq!(hit.row, 0);
    }

    #[test]
    fn test_overlay_moves_and_restores() {
        let syntax = SyntaxDescriptor::new("t")
            .with_keywords(["if"])
            .with_comments(CommentConfig::line("//"))
            .with_flags(HighlightFlags::ALL);
        let mut doc = doc("if x\n// x\n");
        doc.set_syntax(Some(syntax));
        let row0 = doc.row(0).unwrap().highlight().to_vec();
        let row1 = doc.row(1).unwrap().highlight().to_vec();

        let mut search = SearchEngine::new();
        search.find(&mut doc, "x", SearchDirection::Forward).unwrap();
        assert_eq!(doc.row(0).unwrap().highlight()[3], Highlight::Match);

        search.find(&mut doc, "x", SearchDirection::Forward).unwrap();
        assert_eq!(doc.row(0).unwrap().highlight(), row0.as_slice());
        assert_eq!(doc.row(1).unwrap().highlight()[3], Highlight::Match);

        search.finish(&mut doc);
        assert_eq!(doc.row(1).unwrap().highlight(), row1.as_slice());
        assert_eq!(search.last_match(), None);
        assert_eq!(search.direction(), SearchDirection::Forward);
        assert!(!search.has_overlay());
    }
}
