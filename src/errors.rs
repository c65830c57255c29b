//! Error types for the tangler.

use std::path::PathBuf;
use thiserror::Error;

use crate::text_location::TextLocation;

/// Main error type for tangling operations.
#[derive(Error, Debug)]
pub enum LitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed fragment header at {location}")]
    MalformedHeader { location: TextLocation },

    #[error("duplicate file fragment \"{name}\" at {location}, previously defined at {previous}")]
    DuplicateFileFragment {
        name: String,
        location: TextLocation,
        previous: TextLocation,
    },

    #[error("duplicate code fragment \"{name}\" at {location}, previously defined at {previous}")]
    DuplicateCodeFragment {
        name: String,
        location: TextLocation,
        previous: TextLocation,
    },

    #[error("cannot append to undefined code fragment \"{name}\" at {location}")]
    AppendToUndefined { name: String, location: TextLocation },

    #[error("unterminated fragment \"{name}\" starting at {location}")]
    UnterminatedFragment { name: String, location: TextLocation },

    #[error("undefined fragment \"{name}\" referenced from \"{referrer}\" at {location}")]
    UndefinedReference {
        name: String,
        referrer: String,
        location: TextLocation,
    },

    #[error("circular fragment reference: {}", .0.join(" -> "))]
    CircularReference(Vec<String>),

    #[error("cannot create directory '{}': a file exists with the same name", .path.display())]
    DirectoryConflict { path: PathBuf },

    #[error("failed to create directory '{}': {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to update permissions on '{}': {source}", .path.display())]
    Permissions {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for tangling operations.
pub type Result<T> = std::result::Result<T, LitError>;
