use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "setupkit",
    version,
    about = "Build-script helpers for Python packaging: git-derived versions, static version extraction, long descriptions, and test commands."
)]
pub struct SetupkitCli {
    #[arg(long, global = true, help = "Emit {status,message,details} JSON envelopes")]
    pub json: bool,
    #[arg(long, short = 'q', global = true, help = "Suppress normal output")]
    pub quiet: bool,
    #[arg(
        long,
        short = 'v',
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity"
    )]
    pub verbose: u8,
    #[arg(long, global = true, help = "Enable trace-level logging")]
    pub trace: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Derive a PEP440 version from git tag/commit history.",
        override_usage = "setupkit version [--default-branch NAME] [PATH]"
    )]
    Version(VersionArgs),
    #[command(
        about = "Extract the __version__ literal from a source file without executing it.",
        override_usage = "setupkit static-version <FILE>"
    )]
    StaticVersion(StaticVersionArgs),
    #[command(
        about = "Assemble a long description from a README, else a docstring fallback.",
        override_usage = "setupkit description [--fallback TEXT] [PATH]"
    )]
    Description(DescriptionArgs),
    #[command(
        about = "Run the configured test runner, propagating its exit status.",
        override_usage = "setupkit test [--runner NAME] [--cover MODULE] [-- <TEST_ARG>...]"
    )]
    Test(TestArgs),
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    #[arg(
        long,
        value_name = "NAME",
        default_value = "main",
        env = "SETUPKIT_DEFAULT_BRANCH",
        help = "Branch that releases without a local version identifier"
    )]
    pub default_branch: String,
    #[arg(value_name = "PATH", default_value = ".", help = "Checkout to inspect")]
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct StaticVersionArgs {
    #[arg(value_name = "FILE", help = "Source file containing a __version__ assignment")]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct DescriptionArgs {
    #[arg(
        long,
        value_name = "TEXT",
        help = "Docstring text to use when no README exists"
    )]
    pub fallback: Option<String>,
    #[arg(value_name = "PATH", default_value = ".", help = "Directory to probe for a README")]
    pub path: PathBuf,
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct TestArgs {
    #[arg(
        long,
        value_name = "NAME",
        default_value = "pytest",
        help = "Test runner: pytest, nose, or unittest"
    )]
    pub runner: String,
    #[arg(long, value_name = "MODULE", help = "Module to measure coverage for")]
    pub cover: Option<String>,
    #[arg(long, value_name = "DIR", help = "Test directory, when discovery needs the hint")]
    pub test_dir: Option<String>,
    #[arg(
        long,
        value_name = "PATH",
        env = "SETUPKIT_PYTHON",
        help = "Interpreter to invoke the runner module with"
    )]
    pub python: Option<String>,
    #[arg(long, help = "Drop into pdb on test failure")]
    pub pdb: bool,
    #[arg(long, help = "Disable verbose test output")]
    pub no_verbose: bool,
    #[arg(long, help = "Keep running after the first test failure")]
    pub no_exit_first: bool,
    #[arg(long, help = "Disable extra detail on test failure")]
    pub no_extra_fails: bool,
    #[arg(long, help = "Print the assembled command without running it")]
    pub dry_run: bool,
    #[arg(last = true, value_name = "TEST_ARG")]
    pub args: Vec<String>,
}
