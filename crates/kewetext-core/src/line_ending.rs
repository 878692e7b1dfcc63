//! Row terminators.
//!
//! Rows never store their terminator: `"\r\n"` and `"\n"` are both stripped when a document is
//! loaded. The terminator seen on load is remembered so that
//! [`Document::serialize`](crate::Document::serialize) writes the file back the way it came in.

/// The newline sequence written after every row when serializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `"\n"`
    #[default]
    Lf,
    /// `"\r\n"`
    Crlf,
}

impl LineEnding {
    /// Pick the terminator for a freshly loaded file. Any CRLF wins.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    /// The terminator as written to disk.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(LineEnding::detect("a\nb\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\nb\r\n"), LineEnding::Crlf);
        assert_eq!(LineEnding::detect(""), LineEnding::Lf);
    }
}
