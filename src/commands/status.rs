//! The `status` command: report one arena's membership.
//!
//! Read-only; useful for checking why a batch is serialized the way it is,
//! or whether a stale arena is holding a task name hostage. `--json` emits
//! the same report machine-readably.

use crate::arena::Arena;
use crate::cli::StatusArgs;
use crate::config;
use crate::error::{Result, TurnstileError};
use crate::exit_codes;
use crate::probe::{KillProbe, Liveness};
use crate::state::ParticipantState;
use crate::storage::{DiskStorage, Storage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Snapshot of one arena.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub task: String,
    pub directory: PathBuf,
    pub checked_at: DateTime<Utc>,
    pub master: Option<MasterStatus>,
    pub participants: Vec<ParticipantStatus>,
}

#[derive(Debug, Serialize)]
pub struct MasterStatus {
    pub pid: u32,
    pub alive: bool,
    pub heartbeat_at: Option<DateTime<Utc>>,
    pub heartbeat_age_secs: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ParticipantStatus {
    pub pid: u32,
    pub state: ParticipantState,
    pub alive: bool,
    pub age_secs: f64,
}

pub fn cmd_status(args: StatusArgs) -> Result<i32> {
    let root = config::resolve_root(args.dir);
    let arena = Arena::new(DiskStorage::new(), &root, &args.task)?;

    if !arena.exists() {
        println!("no active arena for task '{}'", args.task);
        return Ok(exit_codes::SUCCESS);
    }

    let report = build_report(&arena, &KillProbe, &args.task)?;
    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| TurnstileError::UserError(format!("failed to encode report: {e}")))?;
        println!("{json}");
    } else {
        print_report(&report);
    }
    Ok(exit_codes::SUCCESS)
}

/// Assemble the report. Split from printing so it can be exercised against
/// fake storage and a fake probe.
pub fn build_report<S: Storage>(
    arena: &Arena<S>,
    probe: &impl Liveness,
    task: &str,
) -> Result<StatusReport> {
    let checked_at = Utc::now();

    let master = match arena.master()? {
        Some(pid) => {
            let age = arena.master_age()?;
            let heartbeat_at = age
                .and_then(|a| chrono::Duration::from_std(a).ok())
                .map(|a| checked_at - a);
            Some(MasterStatus {
                pid,
                alive: probe.is_alive(pid),
                heartbeat_at,
                heartbeat_age_secs: age.map(|a| a.as_secs_f64()),
            })
        }
        None => None,
    };

    let mut participants: Vec<ParticipantStatus> = arena
        .list_records()?
        .into_iter()
        .map(|record| ParticipantStatus {
            pid: record.pid,
            state: record.state,
            alive: probe.is_alive(record.pid),
            age_secs: record.age.as_secs_f64(),
        })
        .collect();
    participants.sort_by_key(|p| p.pid);

    Ok(StatusReport {
        task: task.to_string(),
        directory: arena.dir().to_path_buf(),
        checked_at,
        master,
        participants,
    })
}

fn print_report(report: &StatusReport) {
    println!("task: {}", report.task);
    println!("arena: {}", report.directory.display());

    match &report.master {
        Some(master) => {
            let heartbeat = master
                .heartbeat_age_secs
                .map_or_else(|| "heartbeat unknown".to_string(), |s| {
                    format!("heartbeat {s:.1}s ago")
                });
            println!(
                "master: pid {} ({}, {})",
                master.pid,
                if master.alive { "alive" } else { "dead" },
                heartbeat
            );
        }
        None => println!("master: none"),
    }

    if report.participants.is_empty() {
        println!("participants: none");
        return;
    }
    println!("participants:");
    for p in &report.participants {
        println!(
            "  pid {:<10} {:<14} {}",
            p.pid,
            p.state,
            if p.alive { "alive" } else { "dead" }
        );
    }
}
