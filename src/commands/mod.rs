//! Command implementations for turnstile.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod clean;
mod run;
mod status;

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
///
/// Returns the process exit code. For `run` this is the wrapped command's
/// own exit code, propagated verbatim.
pub fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Run(args) => run::cmd_run(args),
        Command::Status(args) => status::cmd_status(args),
        Command::Clean(args) => clean::cmd_clean(args),
    }
}
