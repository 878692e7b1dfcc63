//! Incremental, row-at-a-time syntax highlighting.
//!
//! A row is classified by a single left-to-right scan of its render form. The only state that
//! crosses row boundaries is the continuation flag ("a multi-line comment is still open"), so
//! after a row changes, re-highlighting only has to walk forward while that flag keeps changing.

use crate::row::Row;
use kewetext_lang::{KeywordClass, SyntaxDescriptor};

/// Classification of a single render cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Highlight {
    /// Plain text.
    #[default]
    Normal,
    /// Numeric literal.
    Number,
    /// String or character literal, quotes included.
    String,
    /// Single-line comment.
    Comment,
    /// Multi-line comment, markers included.
    MultilineComment,
    /// Primary keyword.
    Keyword1,
    /// Secondary (type-like) keyword.
    Keyword2,
    /// Search match overlay.
    Match,
}

impl Highlight {
    /// Keyword classification for a keyword class.
    pub fn for_keyword(class: KeywordClass) -> Self {
        match class {
            KeywordClass::Primary => Self::Keyword1,
            KeywordClass::Secondary => Self::Keyword2,
        }
    }
}

/// Characters that end a token: whitespace, NUL and the punctuation `,.()+-/*=~%<>[];`.
pub fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == '\0' || ",.()+-/*=~%<>[];".contains(ch)
}

/// Result of scanning one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHighlight {
    /// One classification per render cell.
    pub highlight: Vec<Highlight>,
    /// Whether a multi-line comment is still open at the end of the row.
    pub open_comment: bool,
}

#[derive(Debug, Clone)]
struct CompiledKeyword {
    text: Vec<char>,
    class: Highlight,
}

/// Row highlighter for an optional language descriptor.
///
/// Without a descriptor every cell is [`Highlight::Normal`] and no comment is ever open.
#[derive(Debug, Clone, Default)]
pub struct SyntaxHighlighter {
    enabled: bool,
    line_comment: Vec<char>,
    block: Option<(Vec<char>, Vec<char>)>,
    keywords: Vec<CompiledKeyword>,
    numbers: bool,
    strings: bool,
}

fn matches_at(text: &[char], at: usize, token: &[char]) -> bool {
    !token.is_empty() && text.get(at..at + token.len()) == Some(token)
}

impl SyntaxHighlighter {
    /// Build a highlighter from a descriptor.
    pub fn new(syntax: Option<&SyntaxDescriptor>) -> Self {
        let Some(syntax) = syntax else {
            return Self::default();
        };

        Self {
            enabled: true,
            line_comment: syntax
                .comments
                .line_token()
                .map(|t| t.chars().collect())
                .unwrap_or_default(),
            block: syntax
                .comments
                .block_tokens()
                .map(|(start, end)| (start.chars().collect(), end.chars().collect())),
            keywords: syntax
                .keywords
                .iter()
                .filter(|k| !k.text.is_empty())
                .map(|k| CompiledKeyword {
                    text: k.text.chars().collect(),
                    class: Highlight::for_keyword(k.class),
                })
                .collect(),
            numbers: syntax.flags.numbers,
            strings: syntax.flags.strings,
        }
    }

    /// Classify one render line, given whether the previous row left a comment open.
    pub fn scan(&self, render: &str, carried_in: bool) -> RowHighlight {
        let text: Vec<char> = render.chars().collect();
        let mut hl = vec![Highlight::Normal; text.len()];

        if !self.enabled {
            return RowHighlight {
                highlight: hl,
                open_comment: false,
            };
        }

        let mut prev_sep = true;
        let mut in_string: Option<char> = None;
        let mut in_comment = carried_in && self.block.is_some();

        let mut i = 0usize;
        while i < text.len() {
            let c = text[i];
            let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

            if in_string.is_none() && !in_comment && matches_at(&text, i, &self.line_comment) {
                hl[i..].fill(Highlight::Comment);
                break;
            }

            if let Some((start, end)) = &self.block
                && in_string.is_none()
            {
                if in_comment {
                    if matches_at(&text, i, end) {
                        hl[i..i + end.len()].fill(Highlight::MultilineComment);
                        i += end.len();
                        in_comment = false;
                        prev_sep = true;
                    } else {
                        hl[i] = Highlight::MultilineComment;
                        i += 1;
                    }
                    continue;
                } else if matches_at(&text, i, start) {
                    hl[i..i + start.len()].fill(Highlight::MultilineComment);
                    i += start.len();
                    in_comment = true;
                    continue;
                }
            }

            if self.strings {
                if let Some(quote) = in_string {
                    hl[i] = Highlight::String;
                    if c == '\\' && i + 1 < text.len() {
                        hl[i + 1] = Highlight::String;
                        i += 2;
                        continue;
                    }
                    if c == quote {
                        in_string = None;
                    }
                    i += 1;
                    prev_sep = true;
                    continue;
                } else if c == '"' || c == '\'' {
                    in_string = Some(c);
                    hl[i] = Highlight::String;
                    i += 1;
                    continue;
                }
            }

            if self.numbers
                && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                    || (c == '.' && prev_hl == Highlight::Number))
            {
                hl[i] = Highlight::Number;
                i += 1;
                prev_sep = false;
                continue;
            }

            if prev_sep {
                let hit = self.keywords.iter().find(|kw| {
                    matches_at(&text, i, &kw.text)
                        && text.get(i + kw.text.len()).is_none_or(|&c| is_separator(c))
                });
                if let Some(kw) = hit {
                    hl[i..i + kw.text.len()].fill(kw.class);
                    i += kw.text.len();
                    prev_sep = false;
                    continue;
                }
            }

            prev_sep = is_separator(c);
            i += 1;
        }

        RowHighlight {
            highlight: hl,
            open_comment: in_comment,
        }
    }

    /// Re-highlight `rows[from..=through]` unconditionally, then keep going while the next
    /// row was highlighted with a continuation flag that no longer matches its predecessor.
    ///
    /// Returns the number of rows scanned. The walk is a plain loop, bounded by the row count.
    pub fn rehighlight(&self, rows: &mut [Row], from: usize, through: usize) -> usize {
        let mut at = from;
        let mut scanned = 0usize;

        while at < rows.len() {
            let carried_in = at > 0 && rows[at - 1].open_comment();
            let result = self.scan(rows[at].render(), carried_in);
            let changed = rows[at].set_highlight(result.highlight, result.open_comment, carried_in);
            scanned += 1;

            log::trace!(
                "highlighted row {at} (open_comment={}, changed={changed})",
                rows[at].open_comment()
            );

            let open = rows[at].open_comment();
            let next_stale = rows.get(at + 1).is_some_and(|next| next.carried_in() != open);
            if at >= through && !next_stale {
                break;
            }
            at += 1;
        }

        if scanned > through.saturating_sub(from) + 1 {
            log::debug!("continuation cascade from row {from} re-highlighted {scanned} rows");
        }
        scanned
    }

    /// Re-highlight starting at `at` only if that row's carried-in flag is stale.
    pub fn repair_from(&self, rows: &mut [Row], at: usize) -> usize {
        let Some(row) = rows.get(at) else {
            return 0;
        };
        let expected = at > 0 && rows[at - 1].open_comment();
        if row.carried_in() == expected {
            return 0;
        }
        self.rehighlight(rows, at, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kewetext_lang::{CommentConfig, HighlightFlags};
    use pretty_assertions::assert_eq;

    use super::Highlight::{
        Keyword1 as K1, Keyword2 as K2, Normal as N, Number as Num, String as S,
    };

    fn syntax() -> SyntaxDescriptor {
        SyntaxDescriptor::new("test")
            .with_keywords(["if", "return", "int|"])
            .with_comments(CommentConfig::line_and_block("//", "/*", "*/"))
            .with_flags(HighlightFlags::ALL)
    }

    #[test]
    fn test_no_descriptor_is_all_normal() {
        let hl = SyntaxHighlighter::new(None).scan("/* if 12 \"x\"", true);
        assert!(hl.highlight.iter().all(|h| *h == N));
        assert!(!hl.open_comment);
    }

    #[test]
    fn test_keyword_classes_and_line_comment() {
        let hl = SyntaxHighlighter::new(Some(&syntax())).scan("int x; // c", false);
        let mut expected = vec![K2, K2, K2, N, N, N, N];
        expected.extend([Highlight::Comment; 4]);
        assert_eq!(hl.highlight, expected);
        assert!(!hl.open_comment);
    }

    #[test]
    fn test_keyword_requires_separator_after() {
        let hl = SyntaxHighlighter::new(Some(&syntax())).scan("iffy if", false);
        assert_eq!(hl.highlight, vec![N, N, N, N, N, K1, K1]);
    }

    #[test]
    fn test_keyword_requires_boundary_before() {
        let hl = SyntaxHighlighter::new(Some(&syntax())).scan("xif", false);
        assert_eq!(hl.highlight, vec![N, N, N]);
    }

    #[test]
    fn test_keyword_first_match_in_list_order() {
        let syntax = SyntaxDescriptor::new("t").with_keywords(["in", "int|"]);
        let hl = SyntaxHighlighter::new(Some(&syntax)).scan("int", false);
        // "in" is tried first but is followed by 't', so "int" wins.
        assert_eq!(hl.highlight, vec![K2, K2, K2]);

        let syntax = SyntaxDescriptor::new("t").with_keywords(["i", "if"]);
        let hl = SyntaxHighlighter::new(Some(&syntax)).scan("i if", false);
        assert_eq!(hl.highlight, vec![K1, N, K1, K1]);
    }

    #[test]
    fn test_numbers() {
        let hl = SyntaxHighlighter::new(Some(&syntax())).scan("x1 12.5+3", false);
        assert_eq!(hl.highlight, vec![N, N, N, Num, Num, Num, Num, N, Num]);
    }

    #[test]
    fn test_strings_with_escape() {
        let hl = SyntaxHighlighter::new(Some(&syntax())).scan(r#""a\"b" if"#, false);
        assert_eq!(hl.highlight, vec![S, S, S, S, S, S, N, K1, K1]);
    }

    #[test]
    fn test_comment_marker_inside_string_is_string() {
        let hl = SyntaxHighlighter::new(Some(&syntax())).scan("'//'", false);
        assert_eq!(hl.highlight, vec![S, S, S, S]);
    }

    #[test]
    fn test_flags_disable_literals() {
        let syntax = syntax().with_flags(HighlightFlags::NONE);
        let hl = SyntaxHighlighter::new(Some(&syntax)).scan("\"1\" 2", false);
        assert!(hl.highlight.iter().all(|h| *h == N));
    }

    #[test]
    fn test_block_comment_open_and_close_in_row() {
        use Highlight::MultilineComment as M;
        let hl = SyntaxHighlighter::new(Some(&syntax())).scan("a/*b*/c", false);
        assert_eq!(hl.highlight, vec![N, M, M, M, M, M, N]);
        assert!(!hl.open_comment);

        let hl = SyntaxHighlighter::new(Some(&syntax())).scan("x /* y", false);
        assert!(hl.open_comment);

        let hl = SyntaxHighlighter::new(Some(&syntax())).scan("y */ if", true);
        assert_eq!(hl.highlight, vec![M, M, M, M, N, K1, K1]);
        assert!(!hl.open_comment);
    }
}
