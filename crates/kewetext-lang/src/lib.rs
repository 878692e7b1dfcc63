#![warn(missing_docs)]
//! `kewetext-lang` - data-driven language descriptors for `kewetext-core`.
//!
//! This crate intentionally stays lightweight and has no dependencies. It describes *what* a
//! language looks like to the highlighter (keywords, comment markers, literal flags) and how a
//! descriptor is picked for a file name. The scanning itself lives in `kewetext-core`.

use std::path::Path;

/// Comment tokens/config for a given language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `//`, `#`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `/*`).
    pub block_start: Option<String>,
    /// Block comment end token (e.g. `*/`).
    pub block_end: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
            block_start: None,
            block_end: None,
        }
    }

    /// Create a config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: Some(line.into()),
            block_start: Some(block_start.into()),
            block_end: Some(block_end.into()),
        }
    }

    /// The line comment token, if one is configured and non-empty.
    pub fn line_token(&self) -> Option<&str> {
        self.line.as_deref().filter(|s| !s.is_empty())
    }

    /// The block comment tokens, only if both are configured and non-empty.
    pub fn block_tokens(&self) -> Option<(&str, &str)> {
        let start = self.block_start.as_deref().filter(|s| !s.is_empty())?;
        let end = self.block_end.as_deref().filter(|s| !s.is_empty())?;
        Some((start, end))
    }
}

/// Which literal classes a language wants highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighlightFlags {
    /// Highlight numeric literals.
    pub numbers: bool,
    /// Highlight quoted string/char literals.
    pub strings: bool,
}

impl HighlightFlags {
    /// Numbers and strings both enabled.
    pub const ALL: Self = Self {
        numbers: true,
        strings: true,
    };

    /// Nothing but keywords and comments.
    pub const NONE: Self = Self {
        numbers: false,
        strings: false,
    };
}

/// Keyword priority class. The renderer decides what each class looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordClass {
    /// Control-flow and declaration keywords.
    Primary,
    /// Type-like keywords (written with a trailing `|` in keyword tables).
    Secondary,
}

/// A single keyword entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    /// The keyword text, without any class marker.
    pub text: String,
    /// Highlight class.
    pub class: KeywordClass,
}

impl Keyword {
    /// Marker suffix that selects [`KeywordClass::Secondary`] in table notation.
    pub const SECONDARY_MARKER: char = '|';

    /// Parse the table notation: `"int|"` is a secondary keyword, `"if"` a primary one.
    pub fn parse(entry: &str) -> Self {
        match entry.strip_suffix(Self::SECONDARY_MARKER) {
            Some(text) => Self {
                text: text.to_string(),
                class: KeywordClass::Secondary,
            },
            None => Self {
                text: entry.to_string(),
                class: KeywordClass::Primary,
            },
        }
    }
}

/// Everything the highlighter needs to know about one language.
///
/// Keywords are kept in their configured order: the highlighter takes the first entry that
/// matches at a token boundary, so ordering is observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDescriptor {
    /// Human-readable file type, shown in the status line (e.g. `c`).
    pub filetype: String,
    /// File-name patterns. A pattern starting with `.` must equal the file extension,
    /// anything else matches as a substring of the file name.
    pub filematch: Vec<String>,
    /// Keywords in match-priority order.
    pub keywords: Vec<Keyword>,
    /// Comment markers.
    pub comments: CommentConfig,
    /// Literal highlighting switches.
    pub flags: HighlightFlags,
}

impl SyntaxDescriptor {
    /// Create a descriptor with no patterns, keywords or comments.
    pub fn new(filetype: impl Into<String>) -> Self {
        Self {
            filetype: filetype.into(),
            filematch: Vec::new(),
            keywords: Vec::new(),
            comments: CommentConfig::default(),
            flags: HighlightFlags::NONE,
        }
    }

    /// Set file-name patterns.
    pub fn with_filematch<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filematch = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Set keywords from table notation (see [`Keyword::parse`]).
    pub fn with_keywords<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = entries
            .into_iter()
            .map(|e| Keyword::parse(e.as_ref()))
            .collect();
        self
    }

    /// Set comment markers.
    pub fn with_comments(mut self, comments: CommentConfig) -> Self {
        self.comments = comments;
        self
    }

    /// Set literal highlighting flags.
    pub fn with_flags(mut self, flags: HighlightFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Returns `true` if `file_name` is matched by any of the descriptor's patterns.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"));

        self.filematch.iter().any(|pattern| {
            if pattern.starts_with('.') {
                extension.as_deref() == Some(pattern.as_str())
            } else {
                file_name.contains(pattern.as_str())
            }
        })
    }
}

/// Pick the first descriptor whose patterns match `file_name`.
pub fn select_syntax<'a>(
    descriptors: &'a [SyntaxDescriptor],
    file_name: &str,
) -> Option<&'a SyntaxDescriptor> {
    descriptors.iter().find(|d| d.matches_file_name(file_name))
}

/// The built-in descriptor table.
pub fn builtin_syntaxes() -> Vec<SyntaxDescriptor> {
    vec![c_syntax(), rust_syntax()]
}

/// C / C++ descriptor.
pub fn c_syntax() -> SyntaxDescriptor {
    SyntaxDescriptor::new("c")
        .with_filematch([".c", ".h", ".cpp", ".hpp", ".cc"])
        .with_keywords([
            "switch", "if", "while", "for", "break", "continue", "return", "else", "struct",
            "union", "typedef", "static", "enum", "class", "case", "#include", "#define",
            "int|", "long|", "double|", "float|", "char|", "unsigned|", "signed|", "void|",
            "const|", "size_t|",
        ])
        .with_comments(CommentConfig::line_and_block("//", "/*", "*/"))
        .with_flags(HighlightFlags::ALL)
}

/// Rust descriptor.
pub fn rust_syntax() -> SyntaxDescriptor {
    SyntaxDescriptor::new("rust")
        .with_filematch([".rs"])
        .with_keywords([
            "as", "break", "const", "continue", "crate", "else", "enum", "extern", "fn", "for",
            "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
            "return", "self", "static", "struct", "super", "trait", "type", "unsafe", "use",
            "where", "while", "i8|", "i16|", "i32|", "i64|", "isize|", "u8|", "u16|", "u32|",
            "u64|", "usize|", "f32|", "f64|", "bool|", "char|", "str|", "String|", "Self|",
            "Option|", "Result|", "Vec|",
        ])
        .with_comments(CommentConfig::line_and_block("//", "/*", "*/"))
        .with_flags(HighlightFlags::ALL)
}
