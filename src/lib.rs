//! Lit - Literate Programming Tangler
//!
//! This library reconstructs ("tangles") output files from literate source
//! documents that interleave prose with named text fragments.
//!
//! A document declares fragments with `@code <name>` and `@file <path>`
//! headers followed by fenced bodies; inside a body, a line holding only
//! `@{name}` is replaced at expansion time by that fragment's fully
//! expanded content, re-indented to the reference site. Documents link to
//! further documents with ordinary markdown links.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! lit::tangle_file(Path::new("book.md"), Path::new("build")).unwrap();
//! ```

pub mod errors;
pub mod io;
pub mod model;
pub mod readers;
pub mod text_location;

// Re-export commonly used types
pub use errors::{LitError, Result};
pub use model::{Fragment, FragmentKind, FragmentMap};

use std::path::Path;

/// Tangles the document graph rooted at `root` into `out_dir`.
///
/// Parses every reachable document, expands all file fragments, and
/// materializes them. Any fatal error aborts immediately; files already
/// written stay on disk.
pub fn tangle_file(root: &Path, out_dir: &Path) -> Result<()> {
    let fragments = readers::parse_document_graph(root)?;
    let outputs = model::tangle_all(&fragments)?;
    for (fragment, lines) in &outputs {
        io::write_output(out_dir, fragment, lines)?;
    }
    Ok(())
}
