//! Master-side scheduling tick.
//!
//! The master is the only process that ever promotes anyone, so a single
//! serialized scan per tick is enough to keep at most one participant in
//! flight across the whole arena. No cross-process lock exists or is
//! needed.


use crate::arena::{Arena, RecordEntry};
use crate::error::Result;
use crate::state::ParticipantState;
use crate::storage::Storage;

/// One scheduling pass. Called by the master on every poll cycle.
///
/// Refreshes the heartbeat, then admits at most one participant: while any
/// other record is READY_TO_RUN or ACTIVE nothing happens; otherwise the
/// longest-waiting participant is promoted; the master promotes itself only
/// once nobody else is waiting or running.
pub fn tick<S: Storage>(arena: &Arena<S>, master_pid: u32) -> Result<()> {
    arena.touch_master()?;

    let records = arena.list_records()?;
    let mut waiting: Vec<&RecordEntry> = Vec::new();
    for record in records.iter().filter(|r| r.pid != master_pid) {
        match record.state {
            // Someone is already admitted or running; wait for them.
            ParticipantState::ReadyToRun | ParticipantState::Active => return Ok(()),
            ParticipantState::Waiting => waiting.push(record),
        }
    }

    if let Some(next) = pick_next(&waiting) {
        return arena.set_state(next.pid, ParticipantState::ReadyToRun, false);
    }

    // Queue drained: the master itself may finally run.
    if arena.read_state(master_pid)? == Some(ParticipantState::Waiting) {
        arena.set_state(master_pid, ParticipantState::ReadyToRun, false)?;
    }
    Ok(())
}

/// Longest-waiting record first, ties broken by ascending pid.
///
/// A record is written once at join and untouched until promotion, so age
/// order approximates join order: best-effort FIFO, bounded by storage
/// timestamp granularity.
fn pick_next<'a>(waiting: &[&'a RecordEntry]) -> Option<&'a RecordEntry> {
    waiting
        .iter()
        .copied()
        .max_by(|a, b| a.age.cmp(&b.age).then(b.pid.cmp(&a.pid)))
}
