//! A single line of text plus everything derived from it.

use crate::highlight::Highlight;
use crate::layout::{expand_tabs, leading_indent};

/// One document row.
///
/// The raw content is the source of truth. The render form, highlight classification,
/// indentation measure and continuation flag are derived from it; the owning
/// [`Document`](crate::Document) recomputes them after every mutation, so reads through the
/// public accessors always observe a consistent row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    index: usize,
    chars: String,
    size: usize,
    render: String,
    render_len: usize,
    highlight: Vec<Highlight>,
    indent: usize,
    open_comment: bool,
    /// Continuation flag of the previous row at the time this row was last highlighted.
    carried_in: bool,
}

impl Row {
    pub(crate) fn new(index: usize, text: &str, tab_width: usize) -> Self {
        let mut row = Self {
            index,
            chars: text.to_string(),
            size: 0,
            render: String::new(),
            render_len: 0,
            highlight: Vec::new(),
            indent: 0,
            open_comment: false,
            carried_in: false,
        };
        row.update_render(tab_width);
        row
    }

    /// Position of this row in its document.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw content, without line terminator.
    pub fn chars(&self) -> &str {
        &self.chars
    }

    /// Length of the raw content in characters.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Tab-expanded content as displayed.
    pub fn render(&self) -> &str {
        &self.render
    }

    /// Length of the render form in cells.
    pub fn render_len(&self) -> usize {
        self.render_len
    }

    /// One classification per render cell.
    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// Number of leading indentation characters (spaces and tabs).
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Leading indentation of the raw content.
    pub fn indent_prefix(&self) -> &str {
        &self.chars[..self.byte_offset(self.indent)]
    }

    /// Whether a multi-line comment is still open at the end of this row.
    pub fn open_comment(&self) -> bool {
        self.open_comment
    }

    pub(crate) fn carried_in(&self) -> bool {
        self.carried_in
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    fn byte_offset(&self, column: usize) -> usize {
        self.chars
            .char_indices()
            .nth(column)
            .map_or(self.chars.len(), |(b, _)| b)
    }

    /// Insert `ch` before column `column` (clamped to the row length).
    pub(crate) fn insert_char(&mut self, column: usize, ch: char) {
        let at = self.byte_offset(column.min(self.size));
        self.chars.insert(at, ch);
        self.size += 1;
    }

    /// Insert `text` before column `column` (clamped to the row length).
    pub(crate) fn insert_str(&mut self, column: usize, text: &str) {
        let at = self.byte_offset(column.min(self.size));
        self.chars.insert_str(at, text);
        self.size += text.chars().count();
    }

    /// Remove the character at `column`. Columns past the end remove the last character.
    pub(crate) fn delete_char(&mut self, column: usize) -> Option<char> {
        let last = self.size.checked_sub(1)?;
        let removed = self.chars.remove(self.byte_offset(column.min(last)));
        self.size = last;
        Some(removed)
    }

    pub(crate) fn append_str(&mut self, text: &str) {
        self.chars.push_str(text);
        self.size += text.chars().count();
    }

    /// Cut the row at `column` (clamped) and return the removed tail.
    pub(crate) fn split_off(&mut self, column: usize) -> String {
        let column = column.min(self.size);
        let tail = self.chars.split_off(self.byte_offset(column));
        self.size = column;
        tail
    }

    pub(crate) fn into_chars(self) -> String {
        self.chars
    }

    /// Recompute everything derived from the raw content except highlighting.
    ///
    /// The highlight array is reset to `Normal` cells so its length matches the new render
    /// length until the highlighter runs.
    pub(crate) fn update_render(&mut self, tab_width: usize) {
        self.size = self.chars.chars().count();
        self.render = expand_tabs(&self.chars, tab_width);
        self.render_len = self.render.chars().count();
        self.indent = leading_indent(&self.chars);
        self.highlight.clear();
        self.highlight.resize(self.render_len, Highlight::Normal);
    }

    /// Install a freshly computed classification. Returns `true` if the continuation flag
    /// changed.
    pub(crate) fn set_highlight(
        &mut self,
        highlight: Vec<Highlight>,
        open_comment: bool,
        carried_in: bool,
    ) -> bool {
        debug_assert_eq!(highlight.len(), self.render_len);
        self.highlight = highlight;
        self.carried_in = carried_in;
        let changed = self.open_comment != open_comment;
        self.open_comment = open_comment;
        changed
    }

    /// Overwrite the classification of render cells `start..end` (clamped).
    pub(crate) fn overlay(&mut self, start: usize, end: usize, class: Highlight) {
        let end = end.min(self.render_len);
        if start < end {
            self.highlight[start..end].fill(class);
        }
    }

    /// Put back a previously saved classification. Ignored if the row changed shape since.
    pub(crate) fn restore_highlight(&mut self, saved: Vec<Highlight>) -> bool {
        if saved.len() != self.render_len {
            return false;
        }
        self.highlight = saved;
        true
    }
}
