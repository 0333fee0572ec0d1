//! Error types for turnstile.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//!
//! The tolerated coordination races (stale-environment purge, bootstrap
//! directory creation losing to a concurrent joiner, best-effort teardown)
//! never surface here; they are swallowed at the call site. Everything that
//! does surface maps to a distinct exit code.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for turnstile operations.
#[derive(Error, Debug)]
pub enum TurnstileError {
    /// User provided invalid arguments or asked for something impossible.
    #[error("{0}")]
    UserError(String),

    /// Unexpected storage failure outside the tolerated races.
    #[error("{0}")]
    Storage(String),

    /// A participant state change outside the allowed transition table.
    #[error("invalid participant state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// This participant's own record disappeared, e.g. because a concurrent
    /// joiner purged the arena out from under it.
    #[error("participant record for pid {0} disappeared; coordination state was lost")]
    RecordMissing(u32),

    /// The master went silent; waiting any longer would block forever.
    #[error("master lost: {0}")]
    MasterLost(String),
}

impl TurnstileError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            TurnstileError::UserError(_) => exit_codes::USER_ERROR,
            TurnstileError::Storage(_) => exit_codes::STORAGE_FAILURE,
            TurnstileError::InvalidTransition { .. } => exit_codes::PROTOCOL_FAILURE,
            TurnstileError::RecordMissing(_) => exit_codes::MASTER_LOST,
            TurnstileError::MasterLost(_) => exit_codes::MASTER_LOST,
        }
    }
}

/// Result type alias for turnstile operations.
pub type Result<T> = std::result::Result<T, TurnstileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = TurnstileError::UserError("bad task key".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn storage_error_has_correct_exit_code() {
        let err = TurnstileError::Storage("disk on fire".to_string());
        assert_eq!(err.exit_code(), exit_codes::STORAGE_FAILURE);
    }

    #[test]
    fn invalid_transition_has_correct_exit_code() {
        let err = TurnstileError::InvalidTransition {
            from: "WAITING".to_string(),
            to: "ACTIVE".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::PROTOCOL_FAILURE);
    }

    #[test]
    fn lost_coordination_maps_to_master_lost() {
        let err = TurnstileError::RecordMissing(42);
        assert_eq!(err.exit_code(), exit_codes::MASTER_LOST);

        let err = TurnstileError::MasterLost("heartbeat is 20.0s old".to_string());
        assert_eq!(err.exit_code(), exit_codes::MASTER_LOST);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = TurnstileError::InvalidTransition {
            from: "WAITING".to_string(),
            to: "ACTIVE".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid participant state transition: WAITING -> ACTIVE"
        );

        let err = TurnstileError::MasterLost("master pointer is gone".to_string());
        assert_eq!(err.to_string(), "master lost: master pointer is gone");
    }
}
