#![warn(missing_docs)]
//! Kewetext Core - the editing core of a line-oriented terminal text editor
//!
//! # Overview
//!
//! `kewetext-core` keeps a document as an ordered list of rows and, for every row, the
//! representations derived from it: the tab-expanded render form, one highlight classification
//! per render cell and a multi-line comment continuation flag. Every mutation recomputes what it
//! touched, and highlighting only walks forward into later rows while the continuation flag
//! keeps changing, so a keystroke never rescans the whole file.
//!
//! It does no terminal I/O. A front-end feeds decoded events in and reads [`RowView`]s out.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Editor (events, cursor, scroll, quit)      │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Snapshot (RowView)                         │  ← Rendering Data
//! ├──────────────────────┬──────────────────────┤
//! │  SearchEngine        │  SelectionModel      │  ← Overlays
//! ├──────────────────────┴──────────────────────┤
//! │  Document (row store + highlight cascade)   │  ← Mutation
//! ├─────────────────────────────────────────────┤
//! │  Row, CoordinateMapper, SyntaxHighlighter   │  ← Per-row derivation
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use kewetext_core::{Document, Editor, EditorConfig, EditorEvent, Highlight, Motion};
//! use kewetext_lang::c_syntax;
//!
//! let mut doc = Document::from_text("int x;\n", 8);
//! doc.set_syntax(Some(c_syntax()));
//!
//! let mut editor = Editor::with_document(doc, EditorConfig::default());
//! editor.handle(EditorEvent::Move(Motion::End)).unwrap();
//! editor.handle(EditorEvent::Insert(' ')).unwrap();
//! for ch in "/* note".chars() {
//!     editor.handle(EditorEvent::Insert(ch)).unwrap();
//! }
//!
//! let row = editor.document().row(0).unwrap();
//! assert_eq!(row.highlight()[0], Highlight::Keyword2);
//! assert!(row.open_comment());
//! ```
//!
//! # Module Description
//!
//! - [`document`] - row store, mutation operations and persistence boundary
//! - [`row`] - a single row and its derived data
//! - [`layout`] - tab expansion and document/visual column mapping
//! - [`highlight`] - row scanner and continuation cascade
//! - [`search`] - ring search with a match overlay
//! - [`selection`] - anchored selection ranges
//! - [`snapshot`] - per-row render data
//! - [`commands`] - the `Editor` state object and event dispatch

pub mod commands;
pub mod config;
pub mod document;
pub mod highlight;
pub mod layout;
pub mod line_ending;
pub mod position;
pub mod row;
pub mod search;
pub mod selection;
pub mod snapshot;
mod text;

pub use commands::{CommandError, Editor, EditorEvent, Motion, Outcome};
pub use config::{DEFAULT_QUIT_TIMES, DEFAULT_TAB_STOP, EditorConfig};
pub use document::Document;
pub use highlight::{Highlight, RowHighlight, SyntaxHighlighter, is_separator};
pub use layout::CoordinateMapper;
pub use line_ending::LineEnding;
pub use position::Position;
pub use row::Row;
pub use search::{SearchDirection, SearchEngine, SearchError, SearchHit};
pub use selection::{SelectionDirection, SelectionModel, SelectionRange};
pub use snapshot::{RowView, Viewport, visible_rows};
