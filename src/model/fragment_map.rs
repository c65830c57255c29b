//! Name-keyed fragment tables with duplicate and append handling.

use indexmap::IndexMap;

use crate::errors::{LitError, Result};

use super::fragment::{Fragment, FragmentKind};

/// The two fragment tables built by the parser.
///
/// Both tables preserve insertion order so that output files are
/// materialized in the order their fragments were encountered.
#[derive(Debug, Clone, Default)]
pub struct FragmentMap {
    /// Code fragments: at most one non-append definition per name.
    code: IndexMap<String, Fragment>,

    /// File fragments: a name may appear at most once, ever.
    files: IndexMap<String, Fragment>,
}

impl FragmentMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a finalized fragment.
    ///
    /// Append-mode code fragments are merged into the existing entry of the
    /// same name rather than stored separately. Duplicate file fragments,
    /// duplicate non-append code fragments, and appends to undefined names
    /// are fatal.
    pub fn insert(&mut self, fragment: Fragment) -> Result<()> {
        match fragment.kind {
            FragmentKind::File { .. } => {
                if let Some(previous) = self.files.get(&fragment.name) {
                    return Err(LitError::DuplicateFileFragment {
                        name: fragment.name,
                        location: fragment.location,
                        previous: previous.location.clone(),
                    });
                }
                self.files.insert(fragment.name.clone(), fragment);
            }

            FragmentKind::Code { append: false } => {
                if let Some(previous) = self.code.get(&fragment.name) {
                    return Err(LitError::DuplicateCodeFragment {
                        name: fragment.name,
                        location: fragment.location,
                        previous: previous.location.clone(),
                    });
                }
                self.code.insert(fragment.name.clone(), fragment);
            }

            FragmentKind::Code { append: true } => match self.code.get_mut(&fragment.name) {
                Some(existing) => existing.lines.extend(fragment.lines),
                None => {
                    return Err(LitError::AppendToUndefined {
                        name: fragment.name,
                        location: fragment.location,
                    });
                }
            },
        }
        Ok(())
    }

    /// Gets a code fragment by name.
    pub fn code(&self, name: &str) -> Option<&Fragment> {
        self.code.get(name)
    }

    /// Gets a file fragment by name.
    pub fn file(&self, name: &str) -> Option<&Fragment> {
        self.files.get(name)
    }

    /// Returns all file fragments in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &Fragment> {
        self.files.values()
    }

    /// Returns the number of code fragments.
    pub fn code_len(&self) -> usize {
        self.code.len()
    }

    /// Returns the number of file fragments.
    pub fn file_len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if neither table has entries.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.files.is_empty()
    }
}
