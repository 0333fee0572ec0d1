//! Runtime tunables for turnstile.
//!
//! Every interval is a `Config` field with a default, overridable from the
//! CLI, rather than a constant baked into the protocol. The arena root can
//! additionally come from the `TURNSTILE_DIR` environment variable.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the arena root directory.
pub const ROOT_ENV_VAR: &str = "TURNSTILE_DIR";

/// Default seconds between readiness polls.
pub const DEFAULT_POLL_INTERVAL_SECS: f64 = 0.5;

/// Default seconds to let concurrent joiners settle after a bootstrap.
pub const DEFAULT_SETTLE_DELAY_SECS: f64 = 1.0;

/// Default seconds of master-heartbeat silence before waiters give up.
pub const DEFAULT_MASTER_TIMEOUT_SECS: f64 = 15.0;

/// Tunables for one participant.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory under which arenas are created.
    pub root: PathBuf,

    /// Delay between readiness polls.
    pub poll_interval: Duration,

    /// Delay after winning a bootstrap, letting concurrently starting
    /// participants discover the fresh arena before the first tick.
    pub settle_delay: Duration,

    /// Maximum master heartbeat age before a waiter gives up.
    pub master_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: resolve_root(None),
            poll_interval: Duration::from_secs_f64(DEFAULT_POLL_INTERVAL_SECS),
            settle_delay: Duration::from_secs_f64(DEFAULT_SETTLE_DELAY_SECS),
            master_timeout: Duration::from_secs_f64(DEFAULT_MASTER_TIMEOUT_SECS),
        }
    }
}

/// Root directory for arenas: an explicit flag wins, then `$TURNSTILE_DIR`,
/// then the system temp directory.
pub fn resolve_root(flag: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    if let Ok(dir) = env::var(ROOT_ENV_VAR)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    env::temp_dir()
}
