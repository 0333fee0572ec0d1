//! Arena lifecycle: the shared directory that serializes one task lineage.
//!
//! An arena holds one record per live participant (file named by pid,
//! containing a state literal) and one `master` file naming the process that
//! runs the scheduler. The directory exists from first bootstrap until the
//! master tears it down after its own payload completes.
//!
//! All repair paths here are best-effort and idempotent: a stale arena is
//! renamed aside and deleted, a lost creation race means deferring to the
//! winner, and none of that surfaces as an error.

mod master;


use crate::error::{Result, TurnstileError};
use crate::probe::Liveness;
use crate::state::ParticipantState;
use crate::storage::Storage;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed name of the master pointer file inside an arena.
pub const MASTER_FILE: &str = "master";

/// Prefix for arena directory names under the configured root.
pub const ARENA_PREFIX: &str = "turnstile-";

/// One task lineage's shared directory.
#[derive(Debug)]
pub struct Arena<S: Storage> {
    storage: S,
    root: PathBuf,
    dir: PathBuf,
}

/// One participant record as seen by a directory scan.
#[derive(Debug, Clone)]
pub struct RecordEntry {
    pub pid: u32,
    pub state: ParticipantState,
    /// Time since the record was last written. Untouched between join and
    /// promotion, so for a WAITING record this approximates time-in-queue.
    pub age: Duration,
}

impl<S: Storage> Arena<S> {
    /// Resolve the arena for `task_key` under `root`. Validates the key but
    /// touches nothing on storage.
    pub fn new(storage: S, root: &Path, task_key: &str) -> Result<Self> {
        validate_task_key(task_key)?;
        Ok(Self {
            storage,
            root: root.to_path_buf(),
            dir: root.join(format!("{ARENA_PREFIX}{task_key}")),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn exists(&self) -> bool {
        self.storage.exists(&self.dir)
    }

    /// Make the arena usable, repairing a stale one if needed.
    ///
    /// Returns `true` when this call bootstrapped a fresh arena with
    /// `own_pid` as master. Returns `false` when an existing live arena was
    /// found, or when another participant won the re-creation race; both
    /// mean "defer to the current master".
    pub fn ensure(&self, probe: &impl Liveness, own_pid: u32) -> Result<bool> {
        if let Some(master_pid) = self.master()?
            && probe.is_alive(master_pid)
        {
            return Ok(false);
        }

        // No pointer, or its process is dead: the whole directory is stale.
        if self.storage.exists(&self.dir) {
            self.purge(own_pid);
        }

        self.storage.create_dir_all(&self.root)?;
        if !self.storage.create_dir(&self.dir)? {
            // Another participant re-created it first; defer to them.
            return Ok(false);
        }

        self.write_master(own_pid)?;
        Ok(true)
    }

    /// Rename the arena aside and delete the renamed copy.
    ///
    /// Both steps are best-effort: a concurrent participant may already have
    /// removed or replaced the directory, and that is not an error here.
    pub fn purge(&self, own_pid: u32) {
        let Some(name) = self.dir.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        let aside = self.dir.with_file_name(format!("{name}.stale.{own_pid}"));
        if self.storage.rename(&self.dir, &aside).is_ok() {
            let _ = self.storage.remove_all(&aside);
        }
    }

    /// Path of the record owned by `pid`.
    pub fn record_path(&self, pid: u32) -> PathBuf {
        self.dir.join(pid.to_string())
    }

    /// Current state of `pid`'s record, or `None` if it has no record.
    pub fn read_state(&self, pid: u32) -> Result<Option<ParticipantState>> {
        Ok(self
            .storage
            .read(&self.record_path(pid))?
            .and_then(|s| ParticipantState::from_str(s.trim())))
    }

    /// Overwrite `pid`'s record with `state`.
    ///
    /// Unforced writes enforce the transition table and fail with
    /// `InvalidTransition` otherwise. `force` exists for exactly one caller:
    /// the initial WAITING registration at join time.
    pub fn set_state(&self, pid: u32, state: ParticipantState, force: bool) -> Result<()> {
        if !force {
            let current = self.read_state(pid)?;
            if !state.follows(current) {
                return Err(TurnstileError::InvalidTransition {
                    from: current.map_or_else(|| "<none>".to_string(), |s| s.to_string()),
                    to: state.to_string(),
                });
            }
        }
        self.storage.write(&self.record_path(pid), state.as_str())
    }

    /// Remove `pid`'s record. Returns `false` if it was already gone.
    pub fn remove_record(&self, pid: u32) -> Result<bool> {
        self.storage.remove(&self.record_path(pid))
    }

    /// Scan all participant records currently in the arena.
    ///
    /// The master pointer, foreign files, and records that vanish or change
    /// mid-scan are skipped, since concurrent churn is normal here.
    pub fn list_records(&self) -> Result<Vec<RecordEntry>> {
        let mut records = Vec::new();
        for name in self.storage.list(&self.dir)? {
            if name == MASTER_FILE {
                continue;
            }
            let Ok(pid) = name.parse::<u32>() else {
                continue;
            };
            let path = self.record_path(pid);
            let Some(state) = self
                .storage
                .read(&path)?
                .and_then(|s| ParticipantState::from_str(s.trim()))
            else {
                continue;
            };
            let Some(age) = self.storage.age(&path)? else {
                continue;
            };
            records.push(RecordEntry { pid, state, age });
        }
        Ok(records)
    }
}

fn validate_task_key(task_key: &str) -> Result<()> {
    if task_key.is_empty() {
        return Err(TurnstileError::UserError(
            "task key must not be empty".to_string(),
        ));
    }
    if task_key == "." || task_key == ".." || task_key.contains(['/', '\\']) {
        return Err(TurnstileError::UserError(format!(
            "invalid task key '{task_key}': path separators and dot names are not allowed"
        )));
    }
    Ok(())
}
