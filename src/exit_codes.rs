//! Exit code constants for the turnstile CLI.
//!
//! Turnstile's own failures map to these codes:
//! - 0: Success
//! - 1: User error (bad args, command could not be started)
//! - 2: Protocol failure (invalid participant state transition)
//! - 3: Storage failure (unexpected filesystem error)
//! - 4: Master lost (heartbeat timeout or lost coordination state)
//!
//! Once the wrapped command has started, its exit code is propagated verbatim
//! and may coincide with any of these values.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid task key, or the wrapped command could
/// not be started.
pub const USER_ERROR: i32 = 1;

/// Protocol failure: a participant state transition outside the allowed
/// table was attempted.
pub const PROTOCOL_FAILURE: i32 = 2;

/// Storage failure: an unexpected filesystem error outside the tolerated
/// bootstrap/teardown races.
pub const STORAGE_FAILURE: i32 = 3;

/// Master lost: the master heartbeat went silent past the timeout, or the
/// coordination state this participant depends on disappeared.
pub const MASTER_LOST: i32 = 4;
