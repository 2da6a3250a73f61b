//! Log path preparation and repository-root discovery.
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoggingError;
use crate::exec;

/// Create the missing parent directories of `path`.
///
/// # Errors
///
/// Returns [`LoggingError::PathPreparation`] if a directory cannot be created.
pub fn prepare_log_path(path: &Path) -> Result<(), LoggingError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| LoggingError::PathPreparation {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Top-level directory of the git work tree containing `dir`.
///
/// Returns `None` if `git` is not installed, `dir` is not inside a
/// repository, or the reported path cannot be canonicalised.
#[must_use]
pub fn repo_root_in(dir: &Path) -> Option<PathBuf> {
    which::which("git").ok()?;
    let result = exec::run_in(dir, "git", &["rev-parse", "--show-toplevel"]).ok()?;
    let top = result.stdout.trim();
    if top.is_empty() {
        return None;
    }
    dunce::canonicalize(top).ok()
}

/// Top-level directory of the git work tree containing the current directory.
#[must_use]
pub fn repo_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    repo_root_in(&cwd)
}

/// Resolve a log path for use by a sink.
///
/// Absolute paths are returned unchanged.  Relative paths are joined to
/// `base` if given, otherwise to the repository root, otherwise to the
/// current directory.
#[must_use]
pub fn resolve_log_path(path: &Path, base: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let base = base
        .map(Path::to_path_buf)
        .or_else(repo_root)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(path)
}
