//! The `clean` command: manually purge a task's arena.
//!
//! Normally teardown is the master's job; this exists for the aftermath of
//! a wedged lineage. It refuses to touch an arena whose recorded master is
//! still alive unless forced.

use crate::arena::Arena;
use crate::cli::CleanArgs;
use crate::config;
use crate::error::{Result, TurnstileError};
use crate::exit_codes;
use crate::probe::{KillProbe, Liveness};
use crate::storage::{DiskStorage, Storage};

pub fn cmd_clean(args: CleanArgs) -> Result<i32> {
    let root = config::resolve_root(args.dir);
    let arena = Arena::new(DiskStorage::new(), &root, &args.task)?;

    if purge_arena(&arena, &KillProbe, args.force, std::process::id())? {
        println!("purged arena for task '{}'", args.task);
    } else {
        println!("nothing to clean for task '{}'", args.task);
    }
    Ok(exit_codes::SUCCESS)
}

/// Purge `arena` unless a live master holds it and `force` is off.
///
/// Returns whether there was anything to purge.
pub fn purge_arena<S: Storage>(
    arena: &Arena<S>,
    probe: &impl Liveness,
    force: bool,
    own_pid: u32,
) -> Result<bool> {
    if !arena.exists() {
        return Ok(false);
    }

    if let Some(master_pid) = arena.master()?
        && probe.is_alive(master_pid)
        && !force
    {
        return Err(TurnstileError::UserError(format!(
            "master pid {master_pid} is still alive; pass --force to purge anyway"
        )));
    }

    arena.purge(own_pid);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ParticipantState;
    use crate::storage::MemoryStorage;
    use crate::test_support::{FakeProbe, test_arena};

    #[test]
    fn purges_a_dead_arena() {
        let storage = MemoryStorage::new();
        let arena = test_arena(storage, "deploy");
        arena.ensure(&FakeProbe::new(&[]), 100).unwrap();
        arena
            .set_state(100, ParticipantState::Waiting, true)
            .unwrap();

        let purged = purge_arena(&arena, &FakeProbe::new(&[]), false, 999).unwrap();

        assert!(purged);
        assert!(!arena.exists());
    }

    #[test]
    fn nothing_to_do_without_an_arena() {
        let storage = MemoryStorage::new();
        let arena = test_arena(storage, "deploy");

        assert!(!purge_arena(&arena, &FakeProbe::new(&[]), false, 999).unwrap());
    }

    #[test]
    fn refuses_a_live_master_without_force() {
        let storage = MemoryStorage::new();
        let arena = test_arena(storage, "deploy");
        arena.ensure(&FakeProbe::new(&[]), 100).unwrap();

        let err = purge_arena(&arena, &FakeProbe::new(&[100]), false, 999).unwrap_err();
        assert!(matches!(err, TurnstileError::UserError(_)));
        assert!(arena.exists());

        assert!(purge_arena(&arena, &FakeProbe::new(&[100]), true, 999).unwrap());
        assert!(!arena.exists());
    }
}
