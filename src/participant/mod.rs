//! Participant handles: join a task lineage, poll for admission, run, leave.
//!
//! This is the surface the command layer drives. A participant joins (which
//! repairs or bootstraps the arena and registers a WAITING record), polls
//! `ready_to_run` until admitted, performing master duties itself when it
//! holds that role. Once admitted it marks itself ACTIVE around its payload
//! and cleans up on every exit path.


use crate::arena::Arena;
use crate::config::Config;
use crate::error::{Result, TurnstileError};
use crate::probe::{KillProbe, Liveness};
use crate::scheduler;
use crate::state::ParticipantState;
use crate::storage::{DiskStorage, Storage};
use std::thread;

/// One process's membership in a task lineage.
#[derive(Debug)]
pub struct Participant<S: Storage> {
    arena: Arena<S>,
    config: Config,
    pid: u32,
}

/// Join `task_key`'s lineage as the calling process, with real storage and
/// the real liveness probe.
pub fn join(task_key: &str) -> Result<Participant<DiskStorage>> {
    Participant::join(
        DiskStorage::new(),
        &KillProbe,
        Config::default(),
        task_key,
        std::process::id(),
    )
}

impl<S: Storage> Participant<S> {
    /// Join a task lineage: ensure or repair the arena, then register as
    /// WAITING.
    ///
    /// When this call wins the bootstrap, it sleeps the configured settle
    /// delay so concurrently starting participants can discover the fresh
    /// arena before the first scheduling decision.
    pub fn join(
        storage: S,
        probe: &impl Liveness,
        config: Config,
        task_key: &str,
        pid: u32,
    ) -> Result<Self> {
        let arena = Arena::new(storage, &config.root, task_key)?;
        let created = arena.ensure(probe, pid)?;

        if created && !config.settle_delay.is_zero() {
            thread::sleep(config.settle_delay);
        }

        // The one and only forced write: a participant's first state.
        arena.set_state(pid, ParticipantState::Waiting, true)?;

        Ok(Self { arena, config, pid })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn arena(&self) -> &Arena<S> {
        &self.arena
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether this participant currently holds the master role.
    ///
    /// Always re-derived from the pointer, never cached: election settles
    /// once at bootstrap, but the pointer can disappear or change under a
    /// stale takeover.
    pub fn is_master(&self) -> Result<bool> {
        Ok(self.arena.master()? == Some(self.pid))
    }

    /// One poll step.
    ///
    /// Runs a scheduling tick first when this participant is the master,
    /// then reports whether it has been admitted. When not admitted and not
    /// the master, the master-liveness watchdog runs: a silent master makes
    /// this return `MasterLost` rather than letting the caller wait forever.
    pub fn ready_to_run(&self) -> Result<bool> {
        let is_master = self.is_master()?;
        if is_master {
            scheduler::tick(&self.arena, self.pid)?;
        }

        match self.arena.read_state(self.pid)? {
            Some(ParticipantState::ReadyToRun) => Ok(true),
            Some(_) => {
                if !is_master {
                    self.check_master_liveness()?;
                }
                Ok(false)
            }
            None => Err(TurnstileError::RecordMissing(self.pid)),
        }
    }

    /// Block until admitted, polling at the configured interval.
    pub fn wait_until_ready(&self) -> Result<()> {
        while !self.ready_to_run()? {
            thread::sleep(self.config.poll_interval);
        }
        Ok(())
    }

    /// Record that the payload is now executing. Requires prior admission.
    pub fn mark_active(&self) -> Result<()> {
        self.arena
            .set_state(self.pid, ParticipantState::Active, false)
    }

    /// Remove this participant's record; as master, tear the arena down.
    ///
    /// Idempotent: an already-absent record (e.g. after a concurrent purge)
    /// is not an error. Must run after the payload on every exit path,
    /// success or failure.
    pub fn cleanup(&self) -> Result<()> {
        self.arena.remove_record(self.pid)?;
        if self.is_master()? {
            self.arena.purge(self.pid);
        }
        Ok(())
    }

    fn check_master_liveness(&self) -> Result<()> {
        match self.arena.master_age()? {
            None => Err(TurnstileError::MasterLost(
                "master pointer is gone".to_string(),
            )),
            Some(age) if age > self.config.master_timeout => {
                Err(TurnstileError::MasterLost(format!(
                    "heartbeat is {:.1}s old (timeout {:.1}s)",
                    age.as_secs_f64(),
                    self.config.master_timeout.as_secs_f64()
                )))
            }
            Some(_) => Ok(()),
        }
    }
}
