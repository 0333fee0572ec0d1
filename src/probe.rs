//! Process liveness probing.
//!
//! Staleness recovery needs to know whether the pid recorded in a master
//! pointer still names a running process. The probe is a trait so the
//! coordination logic can be exercised against a fake set of live pids.

/// Non-destructive liveness probe against a process identifier.
pub trait Liveness {
    /// Whether `pid` refers to a currently running process.
    fn is_alive(&self, pid: u32) -> bool;
}

/// Real probe using `kill(pid, 0)`.
///
/// Signal 0 performs an existence check without delivering anything. ESRCH
/// means the process is gone; EPERM means it exists but belongs to another
/// user, which still counts as alive; treating it as dead could purge an
/// arena out from under a running lineage.
#[derive(Debug, Clone, Copy, Default)]
pub struct KillProbe;

impl Liveness for KillProbe {
    fn is_alive(&self, pid: u32) -> bool {
        // pid 0 would address our own process group, and values above
        // i32::MAX wrap negative and address groups by absolute value.
        // Neither names a single process, so report dead.
        if pid == 0 || pid > i32::MAX as u32 {
            return false;
        }

        // SAFETY: signal 0 delivers no signal and accesses no memory; the
        // cast cannot wrap after the guard above.
        let ret = unsafe { libc::kill(pid as libc::pid_t, 0) };
        if ret == 0 {
            return true;
        }

        let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        errno != libc::ESRCH
    }
}
