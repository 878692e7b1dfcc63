//! Editor settings shared by the core and its front-ends.

/// Default tab stop, in cells.
pub const DEFAULT_TAB_STOP: usize = 8;

/// Default number of extra quit presses required when the document has unsaved changes.
pub const DEFAULT_QUIT_TIMES: usize = 2;

/// Editor settings.
///
/// Front-ends typically fill this from an rc file; the core only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// Width of a tab stop in cells (always at least 1).
    pub tab_stop: usize,
    /// Extra quit presses required while the document is dirty.
    pub quit_times: usize,
    /// Copy the leading whitespace of a row into the row created by a newline.
    pub auto_indent: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_stop: DEFAULT_TAB_STOP,
            quit_times: DEFAULT_QUIT_TIMES,
            auto_indent: false,
        }
    }
}

impl EditorConfig {
    /// Set the tab stop. Zero is bumped to 1.
    pub fn with_tab_stop(mut self, tab_stop: usize) -> Self {
        self.tab_stop = tab_stop.max(1);
        self
    }

    /// Set the number of extra quit presses.
    pub fn with_quit_times(mut self, quit_times: usize) -> Self {
        self.quit_times = quit_times;
        self
    }

    /// Enable or disable auto-indent.
    pub fn with_auto_indent(mut self, auto_indent: bool) -> Self {
        self.auto_indent = auto_indent;
        self
    }
}
