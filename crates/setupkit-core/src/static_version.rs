//! Pull a `__version__` literal out of a source file without executing it.

use std::io;
use std::path::{Path, PathBuf};

/// Hard errors: callers reach for this function precisely because the value
/// is expected to exist, so nothing here defaults silently.
#[derive(Debug, thiserror::Error)]
pub enum StaticVersionError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no __version__ assignment found in {path}")]
    NotFound { path: PathBuf },
}

/// Return the string literal assigned to `__version__` in `path`.
///
/// Matches a line of the form `__version__ = "1.2.3"` (single or double
/// quotes). The file is only read as text, never executed.
pub fn find_version(path: &Path) -> Result<String, StaticVersionError> {
    let contents = fs_err::read_to_string(path).map_err(|source| StaticVersionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    contents
        .lines()
        .find_map(version_literal)
        .ok_or_else(|| StaticVersionError::NotFound {
            path: path.to_path_buf(),
        })
}

fn version_literal(line: &str) -> Option<String> {
    let (lhs, rhs) = line.split_once('=')?;
    if lhs.trim() != "__version__" {
        return None;
    }
    let rhs = rhs.trim();
    let quote = rhs.chars().next().filter(|ch| *ch == '"' || *ch == '\'')?;
    let inner = &rhs[1..];
    let end = inner.find(quote)?;
    Some(inner[..end].to_string())
}
