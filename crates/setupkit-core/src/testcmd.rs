//! Build the "test" command a packaging flow hands to a runner.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use setupkit_domain::TestRunner;

use crate::process::CommandRunner;

/// Logical command name the descriptor map is keyed under.
pub const TEST_COMMAND_NAME: &str = "test";

const DEFAULT_PYTHON: &str = "python3";
const DEFAULT_TEST_DIR: &str = "tests";

/// Raised while the build script assembles its configuration, before any
/// subprocess is spawned.
#[derive(Debug, thiserror::Error)]
pub enum TestCommandError {
    #[error("unrecognized test runner {name:?} (expected pytest, nose, or unittest)")]
    UnknownRunner { name: String },
}

/// Knobs shared across runners. Defaults mirror what a packaging script
/// wants in CI: verbose, stop on first failure, extra failure detail.
#[derive(Debug, Clone, Serialize)]
pub struct TestOptions {
    pub verbose: bool,
    pub exit_first: bool,
    pub pdb: bool,
    pub extra_fails: bool,
    /// Module to measure coverage for.
    pub cover: Option<String>,
    /// Test directory, when discovery needs the hint.
    pub test_dir: Option<String>,
    /// Interpreter to invoke the runner module with.
    pub python: Option<String>,
    /// Extra arguments passed through to the runner verbatim.
    pub args: Vec<String>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            exit_first: true,
            pdb: false,
            extra_fails: true,
            cover: None,
            test_dir: None,
            python: None,
            args: Vec::new(),
        }
    }
}

/// A fully assembled runner invocation, ready to spawn. Serializes for
/// `--json` / dry-run output.
#[derive(Debug, Clone, Serialize)]
pub struct TestCommand {
    pub runner: TestRunner,
    pub program: String,
    pub args: Vec<String>,
}

/// Build the command map for the conventional "test" action.
///
/// The runner identifier is validated here, at build-script time; an unknown
/// name never reaches a subprocess.
pub fn test_command(
    runner: &str,
    options: &TestOptions,
) -> Result<BTreeMap<String, TestCommand>, TestCommandError> {
    let runner: TestRunner = runner
        .parse()
        .map_err(|_| TestCommandError::UnknownRunner {
            name: runner.to_string(),
        })?;
    Ok(BTreeMap::from([(
        TEST_COMMAND_NAME.to_string(),
        TestCommand::new(runner, options),
    )]))
}

impl TestCommand {
    pub fn new(runner: TestRunner, options: &TestOptions) -> Self {
        let mut args = vec!["-m".to_string(), runner.module().to_string()];
        match runner {
            TestRunner::Pytest => {
                if options.verbose {
                    args.push("-v".to_string());
                }
                if options.exit_first {
                    args.push("-x".to_string());
                }
                if options.pdb {
                    args.push("--pdb".to_string());
                }
                if options.extra_fails {
                    args.push("-rx".to_string());
                }
                if let Some(cover) = &options.cover {
                    args.extend([
                        "--cov".to_string(),
                        cover.clone(),
                        "--cov-report".to_string(),
                        "term-missing".to_string(),
                    ]);
                }
                if let Some(test_dir) = &options.test_dir {
                    args.push(test_dir.clone());
                }
            }
            TestRunner::Nose => {
                if options.verbose {
                    args.push("-v".to_string());
                }
                if options.extra_fails {
                    args.push("-d".to_string());
                }
                if let Some(cover) = &options.cover {
                    args.extend([
                        "--with-coverage".to_string(),
                        "--cov-report".to_string(),
                        "term-missing".to_string(),
                        "--cov".to_string(),
                        cover.clone(),
                    ]);
                }
            }
            TestRunner::Unittest => {
                args.push("discover".to_string());
                args.push(
                    options
                        .test_dir
                        .clone()
                        .unwrap_or_else(|| DEFAULT_TEST_DIR.to_string()),
                );
            }
        }
        args.extend(options.args.iter().cloned());
        Self {
            runner,
            program: options
                .python
                .clone()
                .unwrap_or_else(|| DEFAULT_PYTHON.to_string()),
            args,
        }
    }

    /// Spawn the runner with inherited stdio and hand back its exit status.
    ///
    /// A failing test run is not an `Err`: the non-zero code is the contract
    /// with the caller, which exits the process with it. Only spawn failures
    /// propagate as errors, uncaught.
    pub fn run(&self, runner: &dyn CommandRunner, cwd: &Path) -> Result<i32> {
        let output = runner.run_command_passthrough(&self.program, &self.args, cwd)?;
        Ok(output.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RunOutput;
    use std::cell::RefCell;

    #[test]
    fn unknown_runner_is_a_configuration_error() {
        let err = test_command("tox", &TestOptions::default()).unwrap_err();
        assert!(matches!(err, TestCommandError::UnknownRunner { .. }));
        assert!(err.to_string().contains("tox"));
    }

    #[test]
    fn map_is_keyed_under_the_test_action() {
        let commands = test_command("pytest", &TestOptions::default()).expect("build");
        assert_eq!(commands.len(), 1);
        assert!(commands.contains_key(TEST_COMMAND_NAME));
    }

    #[test]
    fn pytest_defaults_include_verbose_and_exit_first() {
        let command = TestCommand::new(TestRunner::Pytest, &TestOptions::default());
        assert_eq!(command.program, "python3");
        assert_eq!(command.args, ["-m", "pytest", "-v", "-x", "-rx"]);
    }

    #[test]
    fn pytest_coverage_flags_follow_the_target() {
        let options = TestOptions {
            cover: Some("mypkg".to_string()),
            test_dir: Some("tests/unit".to_string()),
            ..TestOptions::default()
        };
        let command = TestCommand::new(TestRunner::Pytest, &options);
        assert_eq!(
            command.args,
            [
                "-m",
                "pytest",
                "-v",
                "-x",
                "-rx",
                "--cov",
                "mypkg",
                "--cov-report",
                "term-missing",
                "tests/unit"
            ]
        );
    }

    #[test]
    fn pdb_flag_is_opt_in() {
        let options = TestOptions {
            pdb: true,
            ..TestOptions::default()
        };
        let command = TestCommand::new(TestRunner::Pytest, &options);
        assert!(command.args.contains(&"--pdb".to_string()));
    }

    #[test]
    fn nose_builds_its_own_coverage_flags() {
        let options = TestOptions {
            cover: Some("mypkg".to_string()),
            ..TestOptions::default()
        };
        let command = TestCommand::new(TestRunner::Nose, &options);
        assert_eq!(
            command.args,
            [
                "-m",
                "nose",
                "-v",
                "-d",
                "--with-coverage",
                "--cov-report",
                "term-missing",
                "--cov",
                "mypkg"
            ]
        );
    }

    #[test]
    fn unittest_discovers_the_default_test_dir() {
        let command = TestCommand::new(TestRunner::Unittest, &TestOptions::default());
        assert_eq!(command.args, ["-m", "unittest", "discover", "tests"]);
    }

    #[test]
    fn extra_args_pass_through_verbatim() {
        let options = TestOptions {
            args: vec!["-k".to_string(), "smoke".to_string()],
            ..TestOptions::default()
        };
        let command = TestCommand::new(TestRunner::Pytest, &options);
        assert!(command.args.ends_with(&["-k".to_string(), "smoke".to_string()]));
    }

    struct RecordingRunner {
        code: i32,
        calls: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl CommandRunner for RecordingRunner {
        fn run_command(&self, program: &str, args: &[String], _cwd: &Path) -> Result<RunOutput> {
            self.run_command_passthrough(program, args, _cwd)
        }

        fn run_command_passthrough(
            &self,
            program: &str,
            args: &[String],
            _cwd: &Path,
        ) -> Result<RunOutput> {
            self.calls
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            Ok(RunOutput {
                code: self.code,
                stdout: String::new(),
                stderr: String::new(),
            })
        }
    }

    #[test]
    fn run_propagates_the_runner_exit_status() {
        let runner = RecordingRunner {
            code: 7,
            calls: RefCell::new(Vec::new()),
        };
        let command = TestCommand::new(TestRunner::Pytest, &TestOptions::default());
        let code = command.run(&runner, Path::new(".")).expect("run");
        assert_eq!(code, 7);
        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "python3");
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_a_real_child_exit_status_unix() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let stub = dir.path().join("python-stub");
        std::fs::write(&stub, "#!/bin/sh\nexit 5\n").expect("write stub");
        std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755))
            .expect("mark executable");

        let options = TestOptions {
            python: Some(stub.display().to_string()),
            ..TestOptions::default()
        };
        let command = TestCommand::new(TestRunner::Unittest, &options);
        let code = command
            .run(&crate::process::HostRunner, dir.path())
            .expect("spawn stub");
        assert_eq!(code, 5);
    }
}
