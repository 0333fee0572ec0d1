//! The `run` command: wrap one command invocation in a task turnstile.
//!
//! Join the task lineage, poll until admitted (serving as master when this
//! process holds that role), mark the record ACTIVE, execute the wrapped
//! command with inherited stdio, and propagate its exit code. Cleanup runs
//! exactly once, on the success path and on every error path alike.


use crate::cli::RunArgs;
use crate::config::{self, Config};
use crate::error::{Result, TurnstileError};
use crate::exit_codes;
use crate::participant::Participant;
use crate::probe::KillProbe;
use crate::storage::{DiskStorage, Storage};
use std::process::{Command, ExitStatus};
use std::time::Duration;

pub fn cmd_run(args: RunArgs) -> Result<i32> {
    let config = build_config(&args)?;

    let participant = Participant::join(
        DiskStorage::new(),
        &KillProbe,
        config,
        &args.task,
        std::process::id(),
    )?;
    if args.verbose {
        eprintln!(
            "turnstile: joined '{}' as pid {} ({})",
            args.task,
            participant.pid(),
            if participant.is_master()? {
                "master"
            } else {
                "waiting on master"
            }
        );
    }

    let outcome = admit_and_execute(&participant, &args);

    if let Err(e) = participant.cleanup() {
        eprintln!("Warning: cleanup failed: {e}");
    }

    outcome
}

fn admit_and_execute<S: Storage>(participant: &Participant<S>, args: &RunArgs) -> Result<i32> {
    participant.wait_until_ready()?;
    participant.mark_active()?;

    if args.verbose {
        eprintln!("turnstile: admitted, running command");
    }
    execute(&args.command)
}

/// Build a `Config` from CLI flags, rejecting nonsensical timings.
fn build_config(args: &RunArgs) -> Result<Config> {
    for (name, value) in [
        ("--poll-interval", args.poll_interval),
        ("--settle-delay", args.settle_delay),
        ("--master-timeout", args.master_timeout),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(TurnstileError::UserError(format!(
                "{name} must be a non-negative number of seconds, got {value}"
            )));
        }
    }

    Ok(Config {
        root: config::resolve_root(args.dir.clone()),
        poll_interval: Duration::from_secs_f64(args.poll_interval),
        settle_delay: Duration::from_secs_f64(args.settle_delay),
        master_timeout: Duration::from_secs_f64(args.master_timeout),
    })
}

/// Execute the wrapped command with inherited stdio.
///
/// stdout/stderr pass straight through to this process's own streams; the
/// exit code comes back verbatim for propagation.
fn execute(argv: &[String]) -> Result<i32> {
    let (program, rest) = argv
        .split_first()
        .ok_or_else(|| TurnstileError::UserError("no command given".to_string()))?;

    let status = Command::new(program)
        .args(rest)
        .status()
        .map_err(|e| TurnstileError::UserError(format!("failed to run '{program}': {e}")))?;

    Ok(exit_code_of(status))
}

/// Shell convention: a command killed by signal N reports 128 + N.
#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(exit_codes::USER_ERROR)
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(exit_codes::USER_ERROR)
}
