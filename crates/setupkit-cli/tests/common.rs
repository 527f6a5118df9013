#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use assert_cmd::cargo::cargo_bin_cmd;

/// The binary under test, with ambient setupkit environment scrubbed so CI
/// settings cannot leak into fixtures.
pub fn setupkit() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("setupkit");
    for key in [
        "SETUPKIT_TAG",
        "SETUPKIT_BRANCH",
        "SETUPKIT_DEFAULT_BRANCH",
        "SETUPKIT_PYTHON",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=setupkit tests"])
        .args(["-c", "user.email=tests@example.invalid"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed in {}", dir.display());
}

/// Initialize a repository on `branch` with one commit.
pub fn init_repo(dir: &Path, branch: &str) {
    git(dir, &["init", "-q", "-b", branch]);
    std::fs::write(dir.join("module.py"), "__version__ = \"0.0.0\"\n").expect("write module");
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", "initial"]);
}

pub fn commit_empty(dir: &Path, count: usize) {
    for index in 0..count {
        let message = format!("change {index}");
        git(dir, &["commit", "-q", "--allow-empty", "-m", &message]);
    }
}
