//! Long-description assembly: README text, else a caller-supplied docstring.

use std::path::{Path, PathBuf};

use tracing::warn;

const README_EXTENSIONS: [&str; 2] = ["md", "rst"];

/// Locate a conventional README in `dir`: stem `readme` (any case) with a
/// `.md` or `.rst` extension. When several qualify, the lexically first
/// file name wins so the result is stable across platforms.
pub fn find_readme(dir: &Path) -> Option<PathBuf> {
    let entries = fs_err::read_dir(dir).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_readme(path))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

fn is_readme(path: &Path) -> bool {
    let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
        return false;
    };
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    stem.eq_ignore_ascii_case("readme")
        && README_EXTENSIONS
            .iter()
            .any(|known| extension.eq_ignore_ascii_case(known))
}

/// Text for a package's long description.
///
/// Prefers README content from `dir`, falls back to `docstring`, and settles
/// for the empty string — a missing description never aborts a packaging
/// run.
pub fn long_description(dir: &Path, docstring: Option<&str>) -> String {
    if let Some(path) = find_readme(dir) {
        match fs_err::read_to_string(&path) {
            Ok(text) => return text.trim().to_string(),
            Err(err) => {
                warn!(error = %err, "readme found but unreadable; falling back");
            }
        }
    }
    if let Some(doc) = docstring {
        warn!("missing readme; falling back to docstring");
        return doc.to_string();
    }
    warn!("missing readme and docstring; long description is empty");
    String::new()
}
