//! Kewetext terminal editor
//!
//! A small terminal text editor built with crossterm and ratatui on top of `kewetext-core`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p kewetext-tui -- [file_path]
//! ```
//!
//! Settings are read from the file named by `KEWETEXT_RC`, or `./.kewetextrc`
//! (`TAB_STOP`, `QUIT_TIMES`, `AUTO_INDENT`). Logging goes to stderr and is controlled with
//! `RUST_LOG` (default `warn`).
//!
//! # Shortcuts
//!
//! - Arrows / Home / End / PageUp / PageDown: move the cursor
//! - Shift + motion: extend the selection
//! - Ctrl-S: save (asks for a name if the buffer has none)
//! - Ctrl-N: save as
//! - Ctrl-F: incremental search (arrows step through matches, Enter accepts, Esc cancels)
//! - Ctrl-Q: quit (repeat to discard unsaved changes)
//! - Backspace / Ctrl-H / Delete: delete characters
//! - Enter: insert a newline

mod config;
mod keymap;

use config::{load_config, rc_path};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use keymap::{KeyAction, PromptKey, normal_key, prompt_key};
use kewetext_core::{
    CommandError, Document, Editor, EditorConfig, EditorEvent, Highlight, Outcome, RowView,
};
use kewetext_lang::{SyntaxDescriptor, builtin_syntaxes, select_syntax};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env, fs,
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

/// How long a status message stays visible.
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Find,
    SaveAs,
}

/// Application state
struct App {
    editor: Editor,
    /// File being edited; `None` until the first save
    file_path: Option<PathBuf>,
    /// Language descriptors to pick from by file name
    syntaxes: Vec<SyntaxDescriptor>,
    should_quit: bool,
    status_message: String,
    status_time: Instant,
    input_mode: InputMode,
    /// Prompt line contents (search query or file name)
    input_buffer: String,
}

impl App {
    fn new(file_path: Option<PathBuf>, config: EditorConfig) -> io::Result<Self> {
        let mut app = Self {
            editor: Editor::new(config),
            file_path: None,
            syntaxes: builtin_syntaxes(),
            should_quit: false,
            status_message: String::new(),
            status_time: Instant::now(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
        };

        if let Some(path) = file_path {
            app.open(path)?;
        }
        app.set_status("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find");
        Ok(app)
    }

    fn open(&mut self, path: PathBuf) -> io::Result<()> {
        let text = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            // A missing file is a new buffer that will be created on save.
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err),
        };

        let doc = Document::from_text(&text, self.editor.config().tab_stop);
        log::info!("opened {} ({} rows)", path.display(), doc.len());
        self.editor.replace_document(doc);
        self.file_path = Some(path);
        self.apply_syntax();
        Ok(())
    }

    fn file_name(&self) -> Option<String> {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }

    fn apply_syntax(&mut self) {
        let syntax = self
            .file_name()
            .and_then(|name| select_syntax(&self.syntaxes, &name).cloned());
        self.editor.document_mut().set_syntax(syntax);
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_time = Instant::now();
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_mode {
            InputMode::Normal => match normal_key(key) {
                KeyAction::Editor(EditorEvent::StartSearch) => {
                    self.input_buffer.clear();
                    self.input_mode = InputMode::Find;
                    self.dispatch(EditorEvent::StartSearch);
                }
                KeyAction::Editor(event) => self.dispatch(event),
                KeyAction::Save => self.save(),
                KeyAction::SaveAs => self.begin_save_as(),
                KeyAction::Ignore => {}
            },
            InputMode::Find => self.handle_find_key(key),
            InputMode::SaveAs => self.handle_save_as_key(key),
        }
    }

    fn handle_find_key(&mut self, key: KeyEvent) {
        let event = match prompt_key(key) {
            PromptKey::Push(c) => {
                self.input_buffer.push(c);
                EditorEvent::SearchQuery(self.input_buffer.clone())
            }
            PromptKey::Pop => {
                self.input_buffer.pop();
                EditorEvent::SearchQuery(self.input_buffer.clone())
            }
            PromptKey::Next => EditorEvent::SearchNext,
            PromptKey::Prev => EditorEvent::SearchPrev,
            PromptKey::Accept => {
                self.input_mode = InputMode::Normal;
                EditorEvent::Confirm
            }
            PromptKey::Abort => {
                self.input_mode = InputMode::Normal;
                self.set_status("");
                EditorEvent::Cancel
            }
            PromptKey::Ignore => return,
        };
        self.dispatch(event);
    }

    fn handle_save_as_key(&mut self, key: KeyEvent) {
        match prompt_key(key) {
            PromptKey::Push(c) => self.input_buffer.push(c),
            PromptKey::Pop => {
                self.input_buffer.pop();
            }
            PromptKey::Accept if !self.input_buffer.is_empty() => {
                self.input_mode = InputMode::Normal;
                self.file_path = Some(PathBuf::from(std::mem::take(&mut self.input_buffer)));
                self.apply_syntax();
                self.save();
            }
            PromptKey::Abort => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.set_status("Save aborted");
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, event: EditorEvent) {
        match self.editor.handle(event) {
            Ok(Outcome::Quit) => self.should_quit = true,
            Ok(Outcome::QuitPending { remaining }) => self.set_status(format!(
                "WARNING! File has unsaved changes. Press Ctrl-Q {remaining} more times to quit."
            )),
            Ok(Outcome::NotFound) => self.set_status("No match"),
            Ok(Outcome::Found(_)) | Ok(Outcome::Handled) => {}
            Err(CommandError::Search(err)) => {
                log::warn!("search failed: {err}");
                self.set_status(format!("Search failed: {err}"));
            }
        }
    }

    fn begin_save_as(&mut self) {
        self.input_buffer = self
            .file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.input_mode = InputMode::SaveAs;
    }

    fn save(&mut self) {
        let Some(path) = self.file_path.clone() else {
            self.begin_save_as();
            return;
        };

        let bytes = self.editor.document().serialize();
        match fs::write(&path, &bytes) {
            Ok(()) => {
                self.editor.document_mut().mark_saved();
                log::info!("wrote {} bytes to {}", bytes.len(), path.display());
                self.set_status(format!("{} bytes written to disk", bytes.len()));
            }
            Err(err) => {
                // The document stays dirty so quitting still asks for confirmation.
                log::warn!("saving {} failed: {err}", path.display());
                self.set_status(format!("Can't save! I/O error: {err}"));
            }
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // text
                Constraint::Length(1), // status line
                Constraint::Length(1), // message / prompt line
            ])
            .split(frame.area());

        let editor_area = chunks[0];
        let rows = editor_area.height.saturating_sub(2) as usize;
        let cols = editor_area.width.saturating_sub(2) as usize;
        if self.editor.screen_size() != (rows, cols) {
            self.editor.set_screen_size(rows, cols);
        }

        self.render_editor(frame, editor_area);
        self.render_status_line(frame, chunks[1]);
        self.render_message_line(frame, chunks[2]);
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let (rows, cols) = self.editor.screen_size();
        let views = self.editor.visible_rows();
        let empty_document = self.editor.document().is_empty();

        let mut display_lines: Vec<Line> = views.iter().map(line_for_row).collect();
        while display_lines.len() < rows {
            let filler = if empty_document && display_lines.len() == rows / 3 {
                let welcome = format!("kewetext -- version {}", env!("CARGO_PKG_VERSION"));
                let padding = cols.saturating_sub(welcome.len()) / 2;
                format!("~{}{welcome}", " ".repeat(padding.saturating_sub(1)))
            } else {
                "~".to_string()
            };
            display_lines.push(Line::styled(filler, Style::default().fg(Color::DarkGray)));
        }

        let title = format!(
            " {}{} ",
            self.file_name().unwrap_or_else(|| "[No Name]".to_string()),
            if self.editor.document().is_dirty() {
                " [+]"
            } else {
                ""
            },
        );
        let paragraph =
            Paragraph::new(display_lines).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);

        if self.input_mode != InputMode::Normal {
            return;
        }
        let cursor = self.editor.cursor();
        let (Some(y), Some(x)) = (
            cursor.line.checked_sub(self.editor.row_offset()),
            self.editor.render_x().checked_sub(self.editor.col_offset()),
        ) else {
            return;
        };
        if y < rows && x < cols.max(1) {
            frame.set_cursor_position((area.x + 1 + x as u16, area.y + 1 + y as u16));
        }
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let doc = self.editor.document();
        let filetype = doc
            .syntax()
            .map_or("no ft", |syntax| syntax.filetype.as_str());
        let left = format!(
            "{} - {} lines{}",
            self.file_name().unwrap_or_else(|| "[No Name]".to_string()),
            doc.len(),
            if doc.is_dirty() { " (modified)" } else { "" }
        );
        let right = format!("{} | {}/{}", filetype, self.editor.cursor().line + 1, doc.len());
        let width = area.width as usize;
        let gap = width.saturating_sub(left.chars().count() + right.chars().count());
        let status_text = format!("{left}{}{right}", " ".repeat(gap));

        let status_line = Paragraph::new(status_text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status_line, area);
    }

    fn render_message_line(&self, frame: &mut Frame, area: Rect) {
        let text = match self.input_mode {
            InputMode::Find => {
                format!("Search: {} (Use ESC/Arrows/Enter)", self.input_buffer)
            }
            InputMode::SaveAs => format!("Save as: {} (ESC to cancel)", self.input_buffer),
            InputMode::Normal if self.status_time.elapsed() < STATUS_TIMEOUT => {
                self.status_message.clone()
            }
            InputMode::Normal => String::new(),
        };
        frame.render_widget(Paragraph::new(text), area);
    }
}

fn style_for_highlight(highlight: Highlight) -> Style {
    let style = Style::default();
    match highlight {
        Highlight::Normal => style,
        Highlight::Number => style.fg(Color::Red),
        Highlight::String => style.fg(Color::Magenta),
        Highlight::Comment | Highlight::MultilineComment => {
            style.fg(Color::Cyan).add_modifier(Modifier::ITALIC)
        }
        Highlight::Keyword1 => style.fg(Color::Yellow),
        Highlight::Keyword2 => style.fg(Color::Green),
        Highlight::Match => style.fg(Color::Black).bg(Color::LightBlue),
    }
}

fn line_for_row(view: &RowView) -> Line<'static> {
    let mut spans: Vec<Span> = Vec::new();
    let mut current_style: Option<Style> = None;
    let mut buffer = String::new();

    for (ch, highlight, selected) in view.cells() {
        let mut style = style_for_highlight(highlight);
        if selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if current_style.is_some_and(|s| s != style) {
            spans.push(Span::styled(
                std::mem::take(&mut buffer),
                current_style.unwrap_or_default(),
            ));
        }
        current_style = Some(style);
        buffer.push(ch);
    }

    if !buffer.is_empty() {
        spans.push(Span::styled(buffer, current_style.unwrap_or_default()));
    }
    Line::from(spans)
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match load_config(&rc_path()) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("{err}; using default settings");
            EditorConfig::default()
        }
    };
    let file_path = env::args_os().nth(1).map(PathBuf::from);
    let mut app = App::new(file_path, config)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key);
            }
        }
    }

    Ok(())
}
