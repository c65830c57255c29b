//! Idempotent, permission-aware output materialization.

use std::fs;
use std::path::Path;

use crate::errors::{LitError, Result};
use crate::model::Fragment;

/// Whether a write actually touched the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Content was written (created or replaced).
    Written,
    /// Destination already held identical content; nothing was touched.
    Unchanged,
}

/// Materializes one expanded file fragment under `out_dir`.
///
/// The fragment name may contain path separators denoting subdirectories;
/// missing ancestors are created. If the destination already holds
/// byte-identical content the write is skipped entirely, leaving
/// permissions and timestamps alone.
pub fn write_output(out_dir: &Path, fragment: &Fragment, lines: &[String]) -> Result<WriteOutcome> {
    let destination = out_dir.join(&fragment.name);

    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }

    if let Ok(existing) = fs::read(&destination) {
        if existing == content.as_bytes() {
            tracing::debug!("\"{}\" is up to date, skipping", destination.display());
            return Ok(WriteOutcome::Unchanged);
        }
    }

    ensure_ancestors(&destination)?;
    fs::write(&destination, &content)?;
    tracing::info!("wrote \"{}\"", destination.display());

    if fragment.is_executable() {
        set_executable(&destination)?;
    }
    Ok(WriteOutcome::Written)
}

/// Creates every missing ancestor directory of `destination`, root first.
///
/// An ancestor that exists but is not a directory is fatal.
fn ensure_ancestors(destination: &Path) -> Result<()> {
    let Some(parent) = destination.parent() else {
        return Ok(());
    };
    let ancestors: Vec<&Path> = parent
        .ancestors()
        .filter(|path| !path.as_os_str().is_empty())
        .collect();

    for dir in ancestors.into_iter().rev() {
        match fs::metadata(dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(LitError::DirectoryConflict {
                    path: dir.to_path_buf(),
                })
            }
            Err(_) => fs::create_dir(dir).map_err(|source| LitError::CreateDirectory {
                path: dir.to_path_buf(),
                source,
            })?,
        }
    }
    Ok(())
}

/// ORs owner/group/other execute bits into the file's current mode.
#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions_err = |source| LitError::Permissions {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(permissions_err)?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions).map_err(permissions_err)
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
