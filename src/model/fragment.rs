//! Fragment representation.

use crate::text_location::TextLocation;

/// Variant-specific data for a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// A named, referenceable unit of text.
    Code {
        /// Concatenates onto a prior definition of the same name.
        append: bool,
    },
    /// A fragment materialized as an output file.
    File {
        /// The output file receives execute permission.
        executable: bool,
    },
}

/// A named unit of text extracted from a literate document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Fragment name; for file fragments this is the relative output path.
    pub name: String,

    /// Location of the header line in the source document.
    pub location: TextLocation,

    /// Raw, unexpanded body lines in insertion order.
    pub lines: Vec<String>,

    /// Code or file variant.
    pub kind: FragmentKind,
}

impl Fragment {
    /// Creates an empty code fragment.
    pub fn code(name: impl Into<String>, location: TextLocation, append: bool) -> Self {
        Self {
            name: name.into(),
            location,
            lines: Vec::new(),
            kind: FragmentKind::Code { append },
        }
    }

    /// Creates an empty file fragment.
    pub fn file(name: impl Into<String>, location: TextLocation, executable: bool) -> Self {
        Self {
            name: name.into(),
            location,
            lines: Vec::new(),
            kind: FragmentKind::File { executable },
        }
    }

    /// Appends a body line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Returns true for an append-mode code fragment.
    pub fn is_append(&self) -> bool {
        matches!(self.kind, FragmentKind::Code { append: true })
    }

    /// Returns true for a file fragment with the executable flag.
    pub fn is_executable(&self) -> bool {
        matches!(self.kind, FragmentKind::File { executable: true })
    }
}
