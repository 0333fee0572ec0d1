//! Master pointer operations.
//!
//! The pointer is a file literally named `master` containing the master's
//! pid as decimal text and nothing else; the bytes are a wire contract. Its
//! modification timestamp doubles as the liveness heartbeat: the master
//! refreshes it on every scheduling tick, and waiters measure its age.

use super::{Arena, MASTER_FILE};
use crate::error::Result;
use crate::storage::Storage;
use std::path::PathBuf;
use std::time::Duration;

impl<S: Storage> Arena<S> {
    pub fn master_path(&self) -> PathBuf {
        self.dir().join(MASTER_FILE)
    }

    /// Pid named by the master pointer, if it exists and parses.
    ///
    /// An unparsable pointer reads as absent, which upstream treats as a
    /// stale arena.
    pub fn master(&self) -> Result<Option<u32>> {
        Ok(self
            .storage()
            .read(&self.master_path())?
            .and_then(|s| s.trim().parse().ok()))
    }

    /// Write the pointer, naming `pid` as master.
    pub fn write_master(&self, pid: u32) -> Result<()> {
        self.storage().write(&self.master_path(), &pid.to_string())
    }

    /// Heartbeat refresh: timestamp only, bytes unchanged.
    pub fn touch_master(&self) -> Result<()> {
        self.storage().touch(&self.master_path())
    }

    /// Age of the heartbeat, or `None` if the pointer is gone.
    pub fn master_age(&self) -> Result<Option<Duration>> {
        self.storage().age(&self.master_path())
    }
}
