//! Gate state and transition records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two possible states of the access gate.
///
/// Governed purely by surveillance verdicts and manual actions; a correct
/// PIN never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateState {
    /// PIN entry allowed
    Unlocked,
    /// PIN entry blocked
    Locked,
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GateState::Unlocked => "UNLOCKED",
            GateState::Locked => "LOCKED",
        };
        write!(f, "{}", name)
    }
}

/// Why the gate is in its current state; set on every transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockReason {
    /// Initial state at session start
    Startup,
    /// No face persisted for the stability window
    NoSubject,
    /// Multiple faces persisted; carries the observed count
    MultipleSubjects { count: usize },
    /// High motion persisted
    HighMotion,
    /// Explicit user lock
    Manual,
    /// A safe category persisted; gate open
    Cleared,
}

impl std::fmt::Display for LockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockReason::Startup => write!(f, "Running security checks"),
            LockReason::NoSubject => {
                write!(f, "No face detected - unauthorized access attempt")
            }
            LockReason::MultipleSubjects { count } => {
                write!(f, "{} faces detected - possible shoulder surfing", count)
            }
            LockReason::HighMotion => {
                write!(f, "High motion detected - suspicious activity")
            }
            LockReason::Manual => write!(f, "Emergency lock activated"),
            LockReason::Cleared => write!(f, "Safe: single authorized user detected"),
        }
    }
}

/// Result of the external credential check handed to `attempt_unlock`.
/// The gate never inspects the credential itself; authentication is an
/// independent requirement from gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialOutcome {
    Accepted,
    Rejected,
}

/// One gate state change, emitted exactly once per edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateTransition {
    pub timestamp: DateTime<Utc>,
    pub from: GateState,
    pub to: GateState,
    pub reason: LockReason,
}

impl GateTransition {
    pub fn new(from: GateState, to: GateState, reason: LockReason) -> Self {
        Self {
            timestamp: Utc::now(),
            from,
            to,
            reason,
        }
    }

    /// Did this transition start an alert (lock) rather than clear one?
    pub fn is_alert_start(&self) -> bool {
        self.to == GateState::Locked
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_messages() {
        let msg = LockReason::MultipleSubjects { count: 3 }.to_string();
        assert!(msg.contains("3 faces"));
        assert!(LockReason::Startup.to_string().contains("security checks"));
    }

    #[test]
    fn test_alert_edges() {
        let lock = GateTransition::new(GateState::Unlocked, GateState::Locked, LockReason::Manual);
        assert!(lock.is_alert_start());
        let clear =
            GateTransition::new(GateState::Locked, GateState::Unlocked, LockReason::Cleared);
        assert!(!clear.is_alert_start());
    }
}
