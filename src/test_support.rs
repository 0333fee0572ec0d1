//! Shared test fixtures.

use crate::arena::Arena;
use crate::config::Config;
use crate::probe::Liveness;
use crate::storage::MemoryStorage;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Probe answering from a fixed set of live pids.
pub(crate) struct FakeProbe {
    live: HashSet<u32>,
}

impl FakeProbe {
    pub(crate) fn new(live: &[u32]) -> Self {
        Self {
            live: live.iter().copied().collect(),
        }
    }
}

impl Liveness for FakeProbe {
    fn is_alive(&self, pid: u32) -> bool {
        self.live.contains(&pid)
    }
}

/// Config with no real-time delays, rooted at a virtual path for
/// `MemoryStorage`.
pub(crate) fn test_config() -> Config {
    Config {
        root: PathBuf::from("/virtual"),
        poll_interval: Duration::ZERO,
        settle_delay: Duration::ZERO,
        master_timeout: Duration::from_secs(15),
    }
}

pub(crate) fn test_arena(storage: MemoryStorage, task_key: &str) -> Arena<MemoryStorage> {
    Arena::new(storage, &test_config().root, task_key).unwrap()
}
