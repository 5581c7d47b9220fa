//! SessionStatus enum for tracking the lifecycle of reading sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a reading session.
///
/// `Completed` is terminal; a completed session is never reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

impl SessionStatus {
    /// Returns true if the session is still open (Active or Paused).
    pub fn is_open(&self) -> bool {
        !matches!(self, SessionStatus::Completed)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Active -> Paused
    /// - Active -> Completed
    /// - Paused -> Active
    /// - Paused -> Completed
    pub fn can_transition_to(&self, target: &SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Active, Paused) | (Active, Completed) | (Paused, Active) | (Paused, Completed)
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Active => "Active",
            SessionStatus::Paused => "Paused",
            SessionStatus::Completed => "Completed",
        };
        write!(f, "{}", s)
    }
}
