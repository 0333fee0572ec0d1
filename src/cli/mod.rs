//! CLI argument parsing for turnstile.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Turnstile: run concurrently launched commands one at a time.
///
/// Processes sharing a task name coordinate through a directory on a common
/// filesystem. The first arrival becomes the master and admits the others
/// one by one, oldest first, running its own command last; a master that
/// goes silent makes the remaining waiters give up instead of blocking
/// forever.
#[derive(Parser, Debug)]
#[command(name = "turnstile")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for turnstile.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command once the task's turnstile admits this process.
    ///
    /// Joins the task lineage, waits for admission, executes the command
    /// with inherited stdio, and exits with the command's own exit code.
    Run(RunArgs),

    /// Show a task's arena: master, heartbeat, and participants.
    Status(StatusArgs),

    /// Purge a task's arena by hand.
    ///
    /// Refuses while the recorded master is still alive unless --force.
    Clean(CleanArgs),
}

/// Arguments for the `run` command.
#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Task name identifying the lineage to serialize under.
    pub task: String,

    /// Command (and arguments) to execute after admission; give it after --.
    #[arg(last = true, required = true)]
    pub command: Vec<String>,

    /// Arena root directory (default: $TURNSTILE_DIR, else the system temp dir).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Seconds between readiness polls.
    #[arg(long, value_name = "SECS", default_value_t = config::DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval: f64,

    /// Seconds to let concurrent joiners settle after bootstrapping an arena.
    #[arg(long, value_name = "SECS", default_value_t = config::DEFAULT_SETTLE_DELAY_SECS)]
    pub settle_delay: f64,

    /// Seconds of master-heartbeat silence before giving up.
    #[arg(long, value_name = "SECS", default_value_t = config::DEFAULT_MASTER_TIMEOUT_SECS)]
    pub master_timeout: f64,

    /// Print progress diagnostics to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the `status` command.
#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Task name to report on.
    pub task: String,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Arena root directory (default: $TURNSTILE_DIR, else the system temp dir).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

/// Arguments for the `clean` command.
#[derive(clap::Args, Debug)]
pub struct CleanArgs {
    /// Task name whose arena should be purged.
    pub task: String,

    /// Purge even while the recorded master is alive.
    #[arg(long)]
    pub force: bool,

    /// Arena root directory (default: $TURNSTILE_DIR, else the system temp dir).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
