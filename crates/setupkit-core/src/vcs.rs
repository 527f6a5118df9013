use std::path::PathBuf;

use setupkit_domain::latest_release_tag;
use tracing::{debug, warn};

use crate::process::run_command;

/// Narrow view of the version-control tool. The deriver only ever needs
/// these three questions answered; everything else stays behind the git CLI.
pub trait VersionControl {
    /// Newest release tag by PEP440 order, `None` when there are no
    /// parseable tags or no checkout at all.
    fn latest_tag(&self) -> Option<String>;

    /// Commits on HEAD since `tag`, `None` when git cannot answer.
    fn commits_since(&self, tag: &str) -> Option<u64>;

    /// Current branch name, `None` for a detached HEAD or no checkout.
    fn current_branch(&self) -> Option<String>;
}

/// `VersionControl` over the `git` binary. Every failure mode (no binary,
/// not a repository, garbage output) collapses to `None`; the deriver turns
/// that into the fixed fallback version.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn git(&self, args: &[&str]) -> Option<String> {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        let output = match run_command("git", &args, &self.root) {
            Ok(output) => output,
            Err(err) => {
                debug!(error = %err, "git invocation failed");
                return None;
            }
        };
        if output.code != 0 {
            debug!(code = output.code, args = ?args, "git exited non-zero");
            return None;
        }
        Some(output.stdout)
    }
}

impl VersionControl for GitCli {
    fn latest_tag(&self) -> Option<String> {
        let listing = self.git(&["tag", "--list"])?;
        latest_release_tag(listing.lines().map(str::trim))
    }

    fn commits_since(&self, tag: &str) -> Option<u64> {
        // Merge commits do not count toward the dev iteration.
        let range = format!("{tag}..HEAD");
        let count = self.git(&["rev-list", "--no-merges", "--count", &range])?;
        count.trim().parse().ok()
    }

    fn current_branch(&self) -> Option<String> {
        let branch = self.git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let branch = branch.trim();
        if branch.is_empty() {
            return None;
        }
        if branch == "HEAD" {
            warn!("HEAD is detached; treating it as the default branch");
            return None;
        }
        Some(branch.to_string())
    }
}
