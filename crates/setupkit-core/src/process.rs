use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Execute a program and capture stdout/stderr.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned or waited on. A
/// non-zero exit is not an error here; callers inspect `code`.
pub fn run_command(program: &str, args: &[String], cwd: &Path) -> Result<RunOutput> {
    let output = configured_command(program, args, cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("failed to start {program}"))?;
    Ok(RunOutput {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Execute a program with inherited stdio, for runners that own the
/// terminal. The child's exit status comes back in `code`.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned or exits abnormally.
pub fn run_command_passthrough(program: &str, args: &[String], cwd: &Path) -> Result<RunOutput> {
    let status = configured_command(program, args, cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to start {program}"))?;
    Ok(RunOutput {
        code: status.code().unwrap_or(-1),
        stdout: String::new(),
        stderr: String::new(),
    })
}

fn configured_command(program: &str, args: &[String], cwd: &Path) -> Command {
    let mut command = Command::new(program);
    command.args(args);
    command.current_dir(cwd);
    command
}

/// Seam for spawning subprocesses so tests can substitute a fake.
pub trait CommandRunner {
    fn run_command(&self, program: &str, args: &[String], cwd: &Path) -> Result<RunOutput>;

    fn run_command_passthrough(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<RunOutput>;
}

/// The real thing: spawns on the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostRunner;

impl CommandRunner for HostRunner {
    fn run_command(&self, program: &str, args: &[String], cwd: &Path) -> Result<RunOutput> {
        run_command(program, args, cwd)
    }

    fn run_command_passthrough(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<RunOutput> {
        run_command_passthrough(program, args, cwd)
    }
}
