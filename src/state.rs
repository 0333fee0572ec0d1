//! Participant lifecycle states and the transition table.
//!
//! A record's state is monotonic within a run: `WAITING` at join,
//! `READY_TO_RUN` when the master admits the participant, `ACTIVE` while the
//! payload executes. The persisted form is the literal string; the file's
//! bytes are a wire contract shared with any interoperating implementation.

use serde::{Deserialize, Serialize};

/// Lifecycle state of one participant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantState {
    /// Registered, waiting for admission.
    Waiting,
    /// Admitted by the master; the owner may start its payload.
    ReadyToRun,
    /// Payload is executing.
    Active,
}

impl ParticipantState {
    /// The literal string persisted inside a participant record.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantState::Waiting => "WAITING",
            ParticipantState::ReadyToRun => "READY_TO_RUN",
            ParticipantState::Active => "ACTIVE",
        }
    }

    /// Parse a persisted state string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "WAITING" => Some(ParticipantState::Waiting),
            "READY_TO_RUN" => Some(ParticipantState::ReadyToRun),
            "ACTIVE" => Some(ParticipantState::Active),
            _ => None,
        }
    }

    /// Whether an unforced transition from `from` into `self` is legal.
    ///
    /// Only `WAITING -> READY_TO_RUN` and `READY_TO_RUN -> ACTIVE` are;
    /// everything else, including writing a first state without `force` or
    /// jumping `WAITING -> ACTIVE`, is a protocol violation.
    pub fn follows(self, from: Option<ParticipantState>) -> bool {
        matches!(
            (from, self),
            (Some(ParticipantState::Waiting), ParticipantState::ReadyToRun)
                | (Some(ParticipantState::ReadyToRun), ParticipantState::Active)
        )
    }
}

impl std::fmt::Display for ParticipantState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
