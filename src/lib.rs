//! Turnstile: filesystem-mediated mutual exclusion for concurrently
//! launched commands.
//!
//! A batch of processes sharing a task name (think several CI jobs or cron
//! firings all wanting to deploy the same thing) coordinate through nothing
//! but a directory on a common filesystem. The first arrival bootstraps the
//! arena and becomes the master; everyone registers a WAITING record named
//! by its pid; the master's scheduling tick admits one participant at a
//! time, oldest first, and admits itself only once the queue is drained.
//! Staleness recovery (a master that died without cleaning up) and a
//! heartbeat watchdog (a master that dies mid-run) keep the shared
//! directory from wedging a task name forever.
//!
//! The coordination core is `participant` (join/poll/activate/cleanup),
//! `scheduler` (the master's tick), and `arena` (directory lifecycle);
//! `storage` and `probe` are the injectable seams that make all of it
//! testable without a real filesystem or real processes.

pub mod arena;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod participant;
pub mod probe;
pub mod scheduler;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Result, TurnstileError};
pub use participant::{Participant, join};
