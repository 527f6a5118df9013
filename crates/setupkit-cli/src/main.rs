use std::path::Path;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use serde_json::json;
use setupkit_core::{
    derive_version, find_version, long_description, test_command, CommandStatus, ExecutionOutcome,
    GitCli, HostRunner, TestOptions, VersionOptions, TEST_COMMAND_NAME,
};

mod cli;

use cli::{Command, DescriptionArgs, SetupkitCli, StaticVersionArgs, TestArgs, VersionArgs};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = SetupkitCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let outcome = dispatch(&cli).map_err(|err| eyre!("{err:?}"))?;
    let code = emit_output(&cli, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("setupkit_cli={level},setupkit_core={level},setupkit_domain={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn dispatch(cli: &SetupkitCli) -> anyhow::Result<ExecutionOutcome> {
    match &cli.command {
        Command::Version(args) => Ok(run_version(args)),
        Command::StaticVersion(args) => Ok(run_static_version(args)),
        Command::Description(args) => Ok(run_description(args)),
        Command::Test(args) => run_test(args),
    }
}

fn run_version(args: &VersionArgs) -> ExecutionOutcome {
    let vcs = GitCli::new(&args.path);
    let options = VersionOptions {
        default_branch: args.default_branch.clone(),
    };
    let version = derive_version(&vcs, &options);
    ExecutionOutcome::success(
        version.clone(),
        json!({
            "version": version,
            "default_branch": options.default_branch,
            "path": args.path.display().to_string(),
        }),
    )
}

fn run_static_version(args: &StaticVersionArgs) -> ExecutionOutcome {
    match find_version(&args.file) {
        Ok(version) => ExecutionOutcome::success(
            version.clone(),
            json!({
                "version": version,
                "file": args.file.display().to_string(),
            }),
        ),
        Err(err) => ExecutionOutcome::user_error(
            err.to_string(),
            json!({
                "file": args.file.display().to_string(),
            }),
        ),
    }
}

fn run_description(args: &DescriptionArgs) -> ExecutionOutcome {
    let description = long_description(&args.path, args.fallback.as_deref());
    ExecutionOutcome::success(
        description.clone(),
        json!({
            "description": description,
            "path": args.path.display().to_string(),
        }),
    )
}

fn run_test(args: &TestArgs) -> anyhow::Result<ExecutionOutcome> {
    let options = TestOptions {
        verbose: !args.no_verbose,
        exit_first: !args.no_exit_first,
        pdb: args.pdb,
        extra_fails: !args.no_extra_fails,
        cover: args.cover.clone(),
        test_dir: args.test_dir.clone(),
        python: args.python.clone(),
        args: args.args.clone(),
    };
    let commands = match test_command(&args.runner, &options) {
        Ok(commands) => commands,
        Err(err) => {
            return Ok(ExecutionOutcome::user_error(
                err.to_string(),
                json!({ "runner": args.runner }),
            ));
        }
    };
    let command = &commands[TEST_COMMAND_NAME];

    if args.dry_run {
        return Ok(ExecutionOutcome::success(
            format!("{} {}", command.program, command.args.join(" ")),
            json!({ "command": command }),
        ));
    }

    let code = command.run(&HostRunner, Path::new("."))?;
    let details = json!({ "command": command });
    let outcome = if code == 0 {
        ExecutionOutcome::success(format!("{} passed", command.runner), details)
    } else {
        ExecutionOutcome::failure(
            format!("{} exited with status {code}", command.runner),
            details,
        )
    };
    // The test command exits with the runner's own status.
    Ok(outcome.with_exit_code(code))
}

fn emit_output(cli: &SetupkitCli, outcome: &ExecutionOutcome) -> Result<i32> {
    let code = outcome.process_code();

    if cli.json {
        let payload = json!({
            "status": outcome.status,
            "message": outcome.message,
            "details": outcome.details,
            "code": code,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if !cli.quiet {
        match outcome.status {
            CommandStatus::Ok => println!("{}", outcome.message),
            _ => eprintln!("setupkit: {}", outcome.message),
        }
    }

    Ok(code)
}
