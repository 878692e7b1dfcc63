//! Event dispatch layer.
//!
//! The [`Editor`] is the explicit state object a front-end drives: it owns the document, the
//! cursor and scroll offsets, the search and selection state and the quit confirmation
//! counter. A front-end decodes its input into [`EditorEvent`]s and feeds them one at a time to
//! [`Editor::handle`]; each call runs a complete mutation cycle before returning.
//!
//! # Example
//!
//! ```rust
//! use kewetext_core::{Editor, EditorConfig, EditorEvent, Motion, Outcome};
//!
//! let mut editor = Editor::new(EditorConfig::default());
//! for ch in "hi".chars() {
//!     editor.handle(EditorEvent::Insert(ch)).unwrap();
//! }
//! editor.handle(EditorEvent::Move(Motion::Home)).unwrap();
//! editor.handle(EditorEvent::Newline).unwrap();
//! assert_eq!(editor.document().to_text(), "\nhi\n");
//!
//! // Unsaved changes need extra confirmation.
//! assert_eq!(
//!     editor.handle(EditorEvent::Quit).unwrap(),
//!     Outcome::QuitPending { remaining: 2 }
//! );
//! ```

use crate::config::EditorConfig;
use crate::document::Document;
use crate::layout::CoordinateMapper;
use crate::position::Position;
use crate::search::{SearchDirection, SearchEngine, SearchError, SearchHit};
use crate::selection::{SelectionDirection, SelectionModel};
use crate::snapshot::{RowView, Viewport, visible_rows};
use thiserror::Error;

/// Cursor motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    /// One column left, wrapping to the end of the previous row.
    Left,
    /// One column right, wrapping to the start of the next row.
    Right,
    /// One row up.
    Up,
    /// One row down (the row after the last one is reachable).
    Down,
    /// Start of the row.
    Home,
    /// End of the row.
    End,
    /// One screen up.
    PageUp,
    /// One screen down.
    PageDown,
}

impl Motion {
    /// Which way this motion grows a selection.
    pub fn selection_direction(self) -> SelectionDirection {
        match self {
            Self::Right | Self::Down | Self::End | Self::PageDown => SelectionDirection::Forward,
            Self::Left | Self::Up | Self::Home | Self::PageUp => SelectionDirection::Backward,
        }
    }
}

/// One decoded input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Insert a character before the cursor.
    Insert(char),
    /// Split the row at the cursor.
    Newline,
    /// Delete the character before the cursor.
    Backspace,
    /// Delete the character under the cursor.
    Delete,
    /// Move the cursor and drop any selection.
    Move(Motion),
    /// Move the cursor and extend the selection.
    Extend(Motion),
    /// Enter incremental search.
    StartSearch,
    /// The search query changed; search again from the top.
    SearchQuery(String),
    /// Jump to the next match.
    SearchNext,
    /// Jump to the previous match.
    SearchPrev,
    /// Accept the current search position.
    Confirm,
    /// Leave search (restoring the cursor) or drop the selection.
    Cancel,
    /// Request to quit.
    Quit,
}

/// What a handled event resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The event was applied.
    Handled,
    /// A search step found a match and moved the cursor to it.
    Found(SearchHit),
    /// A search step found nothing.
    NotFound,
    /// The document is dirty; `remaining` more quit requests are needed.
    QuitPending {
        /// Quit requests still required, counting the one that will succeed.
        remaining: usize,
    },
    /// The front-end should exit.
    Quit,
}

/// Command error type
#[derive(Debug, Error)]
pub enum CommandError {
    /// A search query could not be compiled.
    #[error(transparent)]
    Search(#[from] SearchError),
}

#[derive(Debug, Clone)]
struct SearchSession {
    query: String,
    cursor: Position,
    row_offset: usize,
    col_offset: usize,
}

/// Editor state: document, cursor, viewport, search and selection.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    cursor: Position,
    render_x: usize,
    row_offset: usize,
    col_offset: usize,
    screen_rows: usize,
    screen_cols: usize,
    config: EditorConfig,
    search: SearchEngine,
    selection: SelectionModel,
    session: Option<SearchSession>,
    quit_remaining: usize,
}

impl Editor {
    /// Create an editor over an empty document.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(Document::new(config.tab_stop), config)
    }

    /// Create an editor over `document`. The document's tab stop follows `config`.
    pub fn with_document(mut document: Document, config: EditorConfig) -> Self {
        document.set_tab_stop(config.tab_stop);
        Self {
            document,
            cursor: Position::default(),
            render_x: 0,
            row_offset: 0,
            col_offset: 0,
            screen_rows: 24,
            screen_cols: 80,
            config,
            search: SearchEngine::new(),
            selection: SelectionModel::new(),
            session: None,
            quit_remaining: config.quit_times,
        }
    }

    /// Swap in a freshly loaded document and reset cursor, viewport, search and selection.
    pub fn replace_document(&mut self, mut document: Document) {
        document.set_tab_stop(self.config.tab_stop);
        self.document = document;
        self.cursor = Position::default();
        self.render_x = 0;
        self.row_offset = 0;
        self.col_offset = 0;
        self.search = SearchEngine::new();
        self.selection.reset(self.cursor);
        self.session = None;
        self.quit_remaining = self.config.quit_times;
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for front-end duties such as [`Document::mark_saved`] and
    /// [`Document::set_syntax`].
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Cursor in document coordinates. `line` may equal the row count.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Visual column of the cursor, as of the last [`Editor::scroll`].
    pub fn render_x(&self) -> usize {
        self.render_x
    }

    /// First visible row.
    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// First visible render column.
    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// Size of the text area as `(rows, cols)`.
    pub fn screen_size(&self) -> (usize, usize) {
        (self.screen_rows, self.screen_cols)
    }

    /// Resize the text area and keep the cursor visible.
    pub fn set_screen_size(&mut self, rows: usize, cols: usize) {
        self.screen_rows = rows;
        self.screen_cols = cols;
        self.scroll();
    }

    /// Settings in effect.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Selection state.
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Search state.
    pub fn search(&self) -> &SearchEngine {
        &self.search
    }

    /// Returns `true` between [`EditorEvent::StartSearch`] and the confirm/cancel that ends it.
    pub fn is_searching(&self) -> bool {
        self.session.is_some()
    }

    /// Current query while searching.
    pub fn search_query(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.query.as_str())
    }

    /// Per-row render data for the visible part of the document.
    pub fn visible_rows(&self) -> Vec<RowView> {
        let viewport = Viewport {
            row_offset: self.row_offset,
            col_offset: self.col_offset,
            rows: self.screen_rows,
            cols: self.screen_cols,
        };
        let cursor = Position::new(self.cursor.line, self.render_x);
        visible_rows(&self.document, viewport, &self.selection, cursor)
    }

    /// Apply one event.
    pub fn handle(&mut self, event: EditorEvent) -> Result<Outcome, CommandError> {
        if event != EditorEvent::Quit {
            self.quit_remaining = self.config.quit_times;
        }

        if self.session.is_some() {
            match event {
                EditorEvent::SearchQuery(query) => return self.search_query_changed(query),
                EditorEvent::SearchNext => return self.search_step(SearchDirection::Forward),
                EditorEvent::SearchPrev => return self.search_step(SearchDirection::Backward),
                EditorEvent::Confirm => {
                    self.end_search(false);
                    return Ok(Outcome::Handled);
                }
                EditorEvent::Cancel => {
                    self.end_search(true);
                    return Ok(Outcome::Handled);
                }
                EditorEvent::StartSearch => return Ok(Outcome::Handled),
                // Anything else accepts the search position first.
                other => {
                    self.end_search(false);
                    return self.handle(other);
                }
            }
        }

        let outcome = match event {
            EditorEvent::Insert('\n') => {
                self.insert_newline();
                Outcome::Handled
            }
            EditorEvent::Insert('\r') => Outcome::Handled,
            EditorEvent::Insert(ch) => {
                self.insert_char(ch);
                Outcome::Handled
            }
            EditorEvent::Newline => {
                self.insert_newline();
                Outcome::Handled
            }
            EditorEvent::Backspace => {
                self.delete_before_cursor();
                Outcome::Handled
            }
            EditorEvent::Delete => {
                self.move_cursor(Motion::Right);
                self.delete_before_cursor();
                Outcome::Handled
            }
            EditorEvent::Move(motion) => {
                self.apply_motion(motion);
                self.selection.reset(self.cursor);
                Outcome::Handled
            }
            EditorEvent::Extend(motion) => {
                let before = self.cursor;
                self.apply_motion(motion);
                self.selection.extend(before, self.cursor, motion.selection_direction());
                Outcome::Handled
            }
            EditorEvent::StartSearch => {
                self.start_search();
                Outcome::Handled
            }
            EditorEvent::Cancel => {
                self.selection.reset(self.cursor);
                Outcome::Handled
            }
            EditorEvent::SearchQuery(_)
            | EditorEvent::SearchNext
            | EditorEvent::SearchPrev
            | EditorEvent::Confirm => Outcome::Handled,
            EditorEvent::Quit => self.request_quit(),
        };

        self.scroll();
        Ok(outcome)
    }

    /// Recompute the cursor's visual column and adjust the offsets so it is on screen.
    pub fn scroll(&mut self) {
        self.render_x = match self.document.row(self.cursor.line) {
            Some(row) => {
                CoordinateMapper::new(self.document.tab_stop()).to_visual(row, self.cursor.column)
            }
            None => 0,
        };

        if self.cursor.line < self.row_offset {
            self.row_offset = self.cursor.line;
        }
        if self.screen_rows > 0 && self.cursor.line >= self.row_offset + self.screen_rows {
            self.row_offset = self.cursor.line + 1 - self.screen_rows;
        }
        if self.render_x < self.col_offset {
            self.col_offset = self.render_x;
        }
        if self.screen_cols > 0 && self.render_x >= self.col_offset + self.screen_cols {
            self.col_offset = self.render_x + 1 - self.screen_cols;
        }
    }

    fn row_size(&self, line: usize) -> usize {
        self.document.row(line).map_or(0, |r| r.size())
    }

    fn clamp_column(&mut self) {
        self.cursor.column = self.cursor.column.min(self.row_size(self.cursor.line));
    }

    fn move_cursor(&mut self, motion: Motion) {
        let rows = self.document.len();
        let on_row = self.cursor.line < rows;
        match motion {
            Motion::Left => {
                if self.cursor.column > 0 {
                    self.cursor.column -= 1;
                } else if self.cursor.line > 0 {
                    self.cursor.line -= 1;
                    self.cursor.column = self.row_size(self.cursor.line);
                }
            }
            Motion::Right => {
                if on_row {
                    if self.cursor.column < self.row_size(self.cursor.line) {
                        self.cursor.column += 1;
                    } else {
                        self.cursor.line += 1;
                        self.cursor.column = 0;
                    }
                }
            }
            Motion::Up => {
                self.cursor.line = self.cursor.line.saturating_sub(1);
            }
            Motion::Down => {
                if self.cursor.line < rows {
                    self.cursor.line += 1;
                }
            }
            Motion::Home => self.cursor.column = 0,
            Motion::End => {
                if on_row {
                    self.cursor.column = self.row_size(self.cursor.line);
                }
            }
            Motion::PageUp | Motion::PageDown => {
                let step = if motion == Motion::PageUp {
                    self.cursor.line = self.row_offset;
                    Motion::Up
                } else {
                    let bottom = (self.row_offset + self.screen_rows).saturating_sub(1);
                    self.cursor.line = bottom.min(rows);
                    Motion::Down
                };
                for _ in 0..self.screen_rows {
                    self.move_cursor(step);
                }
            }
        }
        self.clamp_column();
    }

    fn apply_motion(&mut self, motion: Motion) {
        self.move_cursor(motion);
        self.scroll();
    }

    fn insert_char(&mut self, ch: char) {
        if self.cursor.line == self.document.len() {
            self.document.insert_row(self.cursor.line, "");
        }
        let at = self.document.insert_char(self.cursor.line, self.cursor.column, ch);
        self.cursor = Position::new(at.line, at.column + 1);
        self.selection.reset(self.cursor);
    }

    fn insert_newline(&mut self) {
        let Position { line, column } = self.cursor;
        if column == 0 {
            self.document.insert_row(line, "");
            self.cursor = Position::new(line + 1, 0);
        } else {
            let indent: String = match self.document.row(line) {
                Some(row) if self.config.auto_indent => {
                    row.indent_prefix().chars().take(column).collect()
                }
                _ => String::new(),
            };
            let next = self.document.split_row_at(line, column);
            let pos = self.document.insert_str(next, 0, &indent);
            self.cursor = Position::new(next, pos.column + indent.chars().count());
        }
        self.selection.reset(self.cursor);
    }

    fn delete_before_cursor(&mut self) {
        let Position { line, column } = self.cursor;
        if line >= self.document.len() || (line == 0 && column == 0) {
            self.selection.reset(self.cursor);
            return;
        }
        if column > 0 {
            self.document.delete_char(line, column - 1);
            self.cursor.column -= 1;
        } else if let Some(join) = self.document.join_row_with_next(line - 1) {
            self.cursor = Position::new(line - 1, join);
        }
        self.selection.reset(self.cursor);
    }

    fn request_quit(&mut self) -> Outcome {
        if self.document.is_dirty() && self.quit_remaining > 0 {
            let remaining = self.quit_remaining;
            self.quit_remaining -= 1;
            log::debug!("quit requested with unsaved changes, {remaining} more needed");
            Outcome::QuitPending { remaining }
        } else {
            Outcome::Quit
        }
    }

    fn start_search(&mut self) {
        self.search.reset_match();
        self.session = Some(SearchSession {
            query: String::new(),
            cursor: self.cursor,
            row_offset: self.row_offset,
            col_offset: self.col_offset,
        });
    }

    fn search_query_changed(&mut self, query: String) -> Result<Outcome, CommandError> {
        self.search.clear_overlay(&mut self.document);
        self.search.reset_match();
        if let Some(session) = self.session.as_mut() {
            session.query = query;
        }
        self.search_step(SearchDirection::Forward)
    }

    fn search_step(&mut self, direction: SearchDirection) -> Result<Outcome, CommandError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(Outcome::Handled);
        };
        let hit = self.search.find(&mut self.document, &session.query, direction)?;
        let outcome = match hit {
            Some(hit) => {
                self.cursor = Position::new(hit.row, hit.column);
                self.row_offset = self.document.len();
                Outcome::Found(hit)
            }
            None => Outcome::NotFound,
        };
        self.scroll();
        Ok(outcome)
    }

    fn end_search(&mut self, restore: bool) {
        self.search.finish(&mut self.document);
        if let Some(session) = self.session.take()
            && restore
        {
            self.cursor = session.cursor;
            self.row_offset = session.row_offset;
            self.col_offset = session.col_offset;
        }
        self.selection.reset(self.cursor);
        self.scroll();
    }
}
