//! Pure version formatting: tag + commit count + branch into a PEP440 string.

use std::fmt;
use std::str::FromStr;

use pep440_rs::Version;

/// Version reported when no usable git metadata exists.
pub const FALLBACK_VERSION: &str = "0.0.0";

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("tag {tag:?} is not a valid PEP440 version")]
    InvalidTag { tag: String },
    #[error("tag {tag:?} has no release components")]
    EmptyRelease { tag: String },
}

/// A derived version: release text, optional dev iteration, optional local
/// identifier. Renders as `BASE[.devN][+LOCAL]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedVersion {
    base: String,
    dev: Option<u64>,
    local: Option<String>,
}

impl DerivedVersion {
    /// Build from the latest reachable tag and the commit count past it.
    ///
    /// A zero count means the checkout sits exactly on the tag, and the
    /// version is the tag's PEP440 text unmodified. Otherwise the most minor
    /// release component is incremented and `.devN` appended. A leading `v`
    /// on the tag is tolerated and stripped.
    pub fn from_tag(tag: &str, commits_since: u64) -> Result<Self, VersionError> {
        let trimmed = tag.trim().trim_start_matches('v');
        let version = Version::from_str(trimmed).map_err(|_| VersionError::InvalidTag {
            tag: tag.to_string(),
        })?;
        if commits_since == 0 {
            return Ok(Self {
                base: version.to_string(),
                dev: None,
                local: None,
            });
        }
        let mut release: Vec<u64> = version.release().to_vec();
        let Some(last) = release.last_mut() else {
            return Err(VersionError::EmptyRelease {
                tag: tag.to_string(),
            });
        };
        *last += 1;
        let base = release
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        Ok(Self {
            base,
            dev: Some(commits_since),
            local: None,
        })
    }

    /// An exact release from a literal version string (CI tag override).
    pub fn exact(text: &str) -> Result<Self, VersionError> {
        let trimmed = text.trim().trim_start_matches('v');
        let version = Version::from_str(trimmed).map_err(|_| VersionError::InvalidTag {
            tag: text.to_string(),
        })?;
        Ok(Self {
            base: version.to_string(),
            dev: None,
            local: None,
        })
    }

    /// Attach a local version identifier when `branch` is not the default
    /// branch. Characters not valid in a local identifier are normalized; a
    /// branch that normalizes to nothing is ignored.
    pub fn on_branch(mut self, branch: &str, default_branch: &str) -> Self {
        if branch == default_branch {
            return self;
        }
        let local = normalize_local(branch);
        if !local.is_empty() {
            self.local = Some(local);
        }
        self
    }
}

impl fmt::Display for DerivedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if let Some(dev) = self.dev {
            write!(f, ".dev{dev}")?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{local}")?;
        }
        Ok(())
    }
}

/// Map arbitrary text into a PEP440 local version identifier. Characters
/// already valid there (alphanumerics, `.`, `-`, `_`) pass through
/// lowercased; anything else (slashes, spaces) becomes a dot. Separator runs
/// collapse and the edges stay alphanumeric, since a local identifier may
/// not begin or end with a separator.
pub fn normalize_local(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
            ch.to_ascii_lowercase()
        } else {
            '.'
        };
        let separator = !mapped.is_ascii_alphanumeric();
        if separator && !out.ends_with(|ch: char| ch.is_ascii_alphanumeric()) {
            continue;
        }
        out.push(mapped);
    }
    while out.ends_with(|ch: char| !ch.is_ascii_alphanumeric()) {
        out.pop();
    }
    out
}

/// Pick the newest tag by PEP440 ordering, not lexical or chronological
/// order. Tags that do not parse as PEP440 versions are skipped.
pub fn latest_release_tag<'a>(tags: impl IntoIterator<Item = &'a str>) -> Option<String> {
    tags.into_iter()
        .filter_map(|tag| {
            let version = Version::from_str(tag.trim().trim_start_matches('v')).ok()?;
            Some((version, tag.trim().to_string()))
        })
        .max_by(|(left, _), (right, _)| left.cmp(right))
        .map(|(_, tag)| tag)
}
