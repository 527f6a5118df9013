#![deny(clippy::all, warnings)]
#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

//! Core operations behind the `setupkit` CLI: git-derived versions, static
//! `__version__` extraction, long-description assembly, and test-runner
//! command construction. Each operation stands alone; nothing here keeps
//! state between calls.

mod description;
mod outcome;
mod process;
mod static_version;
mod testcmd;
mod vcs;
mod version;

pub use setupkit_domain::{DerivedVersion, TestRunner, FALLBACK_VERSION};

pub use crate::description::{find_readme, long_description};
pub use crate::outcome::{CommandStatus, ExecutionOutcome};
pub use crate::process::{
    run_command, run_command_passthrough, CommandRunner, HostRunner, RunOutput,
};
pub use crate::static_version::{find_version, StaticVersionError};
pub use crate::testcmd::{
    test_command, TestCommand, TestCommandError, TestOptions, TEST_COMMAND_NAME,
};
pub use crate::vcs::{GitCli, VersionControl};
pub use crate::version::{derive_version, VersionOptions, BRANCH_ENV, TAG_ENV};
