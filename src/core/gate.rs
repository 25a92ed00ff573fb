//! Access gate: the two-state machine that blocks or allows PIN entry
//!
//! Transitions:
//! - Unsafe verdict + auto-lock enabled → LOCKED (alert starts)
//! - Safe verdict → UNLOCKED, unconditionally (alert stops)
//! - Manual lock → LOCKED, regardless of auto-lock
//!
//! Gate state answers "is it currently safe to show a PIN pad";
//! authentication answers "is this the right person". The two are never
//! conflated: a correct PIN does not open the gate, and a locked gate
//! fails a submission before the credential is even examined.

use crate::types::{
    AccessError, CredentialOutcome, GateState, GateTransition, LockReason, SecuritySettings,
    Verdict,
};

/// Verdict-driven lock state machine
#[derive(Debug, Clone)]
pub struct AccessGate {
    state: GateState,
    reason: LockReason,
}

impl AccessGate {
    /// Sessions start locked until the first safe window completes
    pub fn new() -> Self {
        Self {
            state: GateState::Locked,
            reason: LockReason::Startup,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == GateState::Locked
    }

    /// Why the gate is in its current state
    pub fn reason(&self) -> &LockReason {
        &self.reason
    }

    /// Apply one verdict. Returns the transition if the state changed;
    /// repeated confirmations of the current state return None, which is
    /// what keeps the event stream at one record per edge.
    pub fn on_verdict(
        &mut self,
        verdict: Verdict,
        reason: LockReason,
        settings: &SecuritySettings,
    ) -> Option<GateTransition> {
        match verdict {
            Verdict::Unsafe => {
                if !settings.auto_lock || self.state == GateState::Locked {
                    return None;
                }
                Some(self.transition(GateState::Locked, reason))
            }
            // Safe always clears a lock, even with auto-lock disabled
            Verdict::Safe => {
                if self.state == GateState::Unlocked {
                    return None;
                }
                Some(self.transition(GateState::Unlocked, LockReason::Cleared))
            }
            Verdict::Indeterminate => None,
        }
    }

    /// Force a lock regardless of verdicts or the auto-lock setting.
    /// Always returns a transition record, even when already locked, so
    /// every manual action reaches the event sink.
    pub fn lock_manually(&mut self) -> GateTransition {
        self.transition(GateState::Locked, LockReason::Manual)
    }

    /// Check a submission against the gate, then against the credential.
    /// A locked gate fails fast with BlockedSubmission; the credential
    /// result is only consulted when the gate is open. Never mutates gate
    /// state: unlocking is the surveillance verdict's job alone.
    pub fn attempt_unlock(&self, credential: CredentialOutcome) -> Result<(), AccessError> {
        if self.is_locked() {
            return Err(AccessError::BlockedSubmission);
        }
        match credential {
            CredentialOutcome::Accepted => Ok(()),
            CredentialOutcome::Rejected => Err(AccessError::CredentialRejected),
        }
    }

    fn transition(&mut self, to: GateState, reason: LockReason) -> GateTransition {
        let t = GateTransition::new(self.state, to, reason.clone());
        self.state = to;
        self.reason = reason;
        t
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
