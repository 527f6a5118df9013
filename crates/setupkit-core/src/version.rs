//! Derive a PEP440 version from git tag/commit metadata.

use anyhow::{anyhow, Result};
use setupkit_domain::{DerivedVersion, FALLBACK_VERSION};
use tracing::warn;

use crate::vcs::VersionControl;

/// Forces an exact release version, bypassing git entirely. Set by CI when
/// building from a tag.
pub const TAG_ENV: &str = "SETUPKIT_TAG";

/// Overrides the detected branch name. Set by CI where HEAD is detached.
pub const BRANCH_ENV: &str = "SETUPKIT_BRANCH";

#[derive(Debug, Clone)]
pub struct VersionOptions {
    /// Branch that publishes without a local version identifier.
    pub default_branch: String,
}

impl Default for VersionOptions {
    fn default() -> Self {
        Self {
            default_branch: "main".to_string(),
        }
    }
}

/// Derive a version string for the checkout `vcs` points at.
///
/// This never fails: when no usable metadata exists (not a checkout, no
/// release tags, git missing) the fixed fallback is returned and the reason
/// logged, so packaging flows are never forced to handle an error here.
pub fn derive_version(vcs: &dyn VersionControl, options: &VersionOptions) -> String {
    let overrides = EnvOverrides::from_env();
    match try_derive(vcs, options, &overrides) {
        Ok(version) => version.to_string(),
        Err(err) => {
            warn!(error = %err, fallback = FALLBACK_VERSION, "no version metadata; using fallback");
            FALLBACK_VERSION.to_string()
        }
    }
}

#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    tag: Option<String>,
    branch: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            tag: non_empty_env(TAG_ENV),
            branch: non_empty_env(BRANCH_ENV),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn try_derive(
    vcs: &dyn VersionControl,
    options: &VersionOptions,
    overrides: &EnvOverrides,
) -> Result<DerivedVersion> {
    if let Some(tag) = &overrides.tag {
        return Ok(DerivedVersion::exact(tag)?);
    }

    let tag = vcs
        .latest_tag()
        .ok_or_else(|| anyhow!("no release tags found"))?;
    let commits = vcs
        .commits_since(&tag)
        .ok_or_else(|| anyhow!("could not count commits since tag {tag}"))?;
    let branch = overrides
        .branch
        .clone()
        .or_else(|| vcs.current_branch())
        .unwrap_or_else(|| options.default_branch.clone());

    let version = DerivedVersion::from_tag(&tag, commits)?;
    Ok(version.on_branch(&branch, &options.default_branch))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeVcs {
        tag: Option<&'static str>,
        commits: Option<u64>,
        branch: Option<&'static str>,
    }

    impl VersionControl for FakeVcs {
        fn latest_tag(&self) -> Option<String> {
            self.tag.map(str::to_string)
        }

        fn commits_since(&self, _tag: &str) -> Option<u64> {
            self.commits
        }

        fn current_branch(&self) -> Option<String> {
            self.branch.map(str::to_string)
        }
    }

    fn derive(vcs: &FakeVcs) -> String {
        match try_derive(vcs, &VersionOptions::default(), &EnvOverrides::default()) {
            Ok(version) => version.to_string(),
            Err(_) => FALLBACK_VERSION.to_string(),
        }
    }

    #[test]
    fn exactly_tagged_commit_uses_the_tag() {
        let vcs = FakeVcs {
            tag: Some("1.2.3"),
            commits: Some(0),
            branch: Some("main"),
        };
        assert_eq!(derive(&vcs), "1.2.3");
    }

    #[test]
    fn commits_past_tag_produce_a_dev_release() {
        let vcs = FakeVcs {
            tag: Some("1.2.3"),
            commits: Some(4),
            branch: Some("main"),
        };
        assert_eq!(derive(&vcs), "1.2.4.dev4");
    }

    #[test]
    fn feature_branch_appends_local_identifier() {
        let vcs = FakeVcs {
            tag: Some("1.2.3"),
            commits: Some(4),
            branch: Some("feature-x"),
        };
        assert_eq!(derive(&vcs), "1.2.4.dev4+feature-x");
    }

    #[test]
    fn missing_metadata_falls_back() {
        let vcs = FakeVcs {
            tag: None,
            commits: None,
            branch: None,
        };
        assert_eq!(derive(&vcs), FALLBACK_VERSION);
    }

    #[test]
    fn detached_head_counts_as_default_branch() {
        let vcs = FakeVcs {
            tag: Some("1.2.3"),
            commits: Some(2),
            branch: None,
        };
        assert_eq!(derive(&vcs), "1.2.4.dev2");
    }

    #[test]
    fn tag_override_skips_git_entirely() {
        let vcs = FakeVcs {
            tag: None,
            commits: None,
            branch: None,
        };
        let overrides = EnvOverrides {
            tag: Some("3.1.4".to_string()),
            branch: None,
        };
        let version = try_derive(&vcs, &VersionOptions::default(), &overrides).expect("override");
        assert_eq!(version.to_string(), "3.1.4");
    }

    #[test]
    fn branch_override_beats_detected_branch() {
        let vcs = FakeVcs {
            tag: Some("1.0.0"),
            commits: Some(1),
            branch: Some("main"),
        };
        let overrides = EnvOverrides {
            tag: None,
            branch: Some("release-qa".to_string()),
        };
        let version = try_derive(&vcs, &VersionOptions::default(), &overrides).expect("derive");
        assert_eq!(version.to_string(), "1.0.1.dev1+release-qa");
    }

    #[test]
    fn custom_default_branch_is_respected() {
        let vcs = FakeVcs {
            tag: Some("1.2.3"),
            commits: Some(4),
            branch: Some("trunk"),
        };
        let options = VersionOptions {
            default_branch: "trunk".to_string(),
        };
        let version = try_derive(&vcs, &options, &EnvOverrides::default()).expect("derive");
        assert_eq!(version.to_string(), "1.2.4.dev4");
    }

    #[test]
    fn unparseable_tag_is_an_error_not_a_panic() {
        let vcs = FakeVcs {
            tag: Some("nightly"),
            commits: Some(4),
            branch: Some("main"),
        };
        assert_eq!(derive(&vcs), FALLBACK_VERSION);
    }
}
