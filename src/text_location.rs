//! Text location tracking for error reporting.

use std::fmt;
use std::path::PathBuf;

/// A position within a literate source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextLocation {
    /// The document path.
    pub document: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
}

impl TextLocation {
    /// Creates a new TextLocation.
    pub fn new(document: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            document: document.into(),
            line,
        }
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.document.display(), self.line)
    }
}
