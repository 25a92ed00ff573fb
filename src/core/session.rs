//! Surveillance session: one tracker + gate pair with its gallery and sink
//!
//! All mutable surveillance state lives in one value that the tick driver
//! owns. Each `tick` is one atomic step: settings snapshot, classify,
//! debounce, gate, at most one event. Multiple sessions are fully
//! independent.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::{AccessGate, EventSink, IdentityMatcher, MatchResult, StabilityTracker, TickReport};
use crate::types::{
    AccessError, Category, CredentialOutcome, DetectionMode, Embedding, Gallery, GalleryError,
    GateState, GateTransition, LockReason, Sample, SecuritySettings, Severity, Verdict,
};

/// Result of one tick: the tracker's report plus the gate edge, if any
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub report: TickReport,
    pub transition: Option<GateTransition>,
}

/// One surveillance timeline: detection mode, debouncer, gate, gallery
pub struct SurveillanceSession {
    mode: DetectionMode,
    tracker: StabilityTracker,
    gate: AccessGate,
    matcher: IdentityMatcher,
    gallery: Gallery,
    settings: SecuritySettings,
    sink: Arc<dyn EventSink>,
    started_at: DateTime<Utc>,
    tick_seq: u64,
    event_count: u64,
    threat_count: u64,
}

impl SurveillanceSession {
    pub fn new(mode: DetectionMode, settings: SecuritySettings, sink: Arc<dyn EventSink>) -> Self {
        Self {
            mode,
            tracker: StabilityTracker::new(mode),
            gate: AccessGate::new(),
            matcher: IdentityMatcher::new(),
            gallery: Gallery::new(),
            settings,
            sink,
            started_at: Utc::now(),
            tick_seq: 0,
            event_count: 0,
            threat_count: 0,
        }
    }

    /// Start with a pre-loaded gallery (see `store::load_or_empty`)
    pub fn with_gallery(mut self, gallery: Gallery) -> Self {
        self.gallery = gallery;
        self
    }

    // =========================================================================
    // Tick path
    // =========================================================================

    /// Consume one sample. Applies the settings snapshot, debounces, drives
    /// the gate, and emits at most one event record (the transition edge).
    pub fn tick(&mut self, sample: &Sample) -> TickOutcome {
        self.tick_seq += 1;
        self.tracker.set_sensitivity(self.settings.sensitivity);

        let report = self.tracker.observe(sample);
        let reason = lock_reason(report.category, sample);
        let transition = self
            .gate
            .on_verdict(report.verdict, reason, &self.settings);

        if let Some(t) = &transition {
            let severity = if t.is_alert_start() {
                Severity::Threat
            } else {
                Severity::Success
            };
            let message = t.reason.to_string();
            self.record(&message, severity);
        }

        TickOutcome { report, transition }
    }

    /// The embedding to hand to a (possibly background) identity match:
    /// present only on a Safe verdict with a single detected subject and
    /// a non-empty gallery.
    pub fn match_candidate(&self, sample: &Sample, outcome: &TickOutcome) -> Option<Embedding> {
        if outcome.report.verdict != Verdict::Safe || self.gallery.is_empty() {
            return None;
        }
        match sample {
            Sample::Face {
                count: 1,
                embedding: Some(e),
            } => Some(e.clone()),
            _ => None,
        }
    }

    /// Run the identity match inline and record the annotation. The async
    /// driver instead spawns the search and calls `annotate_match` with the
    /// result, dropping it if the session has moved on.
    pub fn annotate_now(&mut self, sample: &Sample, outcome: &TickOutcome) -> Option<MatchResult> {
        let probe = self.match_candidate(sample, outcome)?;
        let result = self.matcher.best_match(&probe, &self.gallery)?;
        self.annotate_match(&result);
        Some(result)
    }

    /// Record a completed match. Informational only; never touches the gate.
    pub fn annotate_match(&mut self, result: &MatchResult) {
        let message = result.to_string();
        self.record(&message, Severity::Success);
    }

    // =========================================================================
    // Manual actions (applied between ticks)
    // =========================================================================

    /// Emergency lock: forces the gate closed and saturates the tracker's
    /// high-alert counter so a stale safe run cannot reopen it.
    pub fn lock_manually(&mut self) -> GateTransition {
        let transition = self.gate.lock_manually();
        self.tracker.bias_to_alert();
        self.record(&LockReason::Manual.to_string(), Severity::Threat);
        transition
    }

    /// Submit a credential-check result. The gate decides eligibility
    /// first; the credential outcome is only consulted when unlocked.
    pub fn attempt_unlock(&mut self, credential: CredentialOutcome) -> Result<(), AccessError> {
        let result = self.gate.attempt_unlock(credential);
        match &result {
            Ok(()) => self.record("PIN authentication successful", Severity::Success),
            Err(AccessError::BlockedSubmission) => {
                self.record("PIN entry blocked - unsafe to submit", Severity::Warn)
            }
            Err(AccessError::CredentialRejected) => {
                self.record("Failed PIN attempt", Severity::Threat)
            }
        }
        result
    }

    pub fn apply_settings(&mut self, settings: SecuritySettings) {
        self.settings = settings;
    }

    // =========================================================================
    // Enrollment
    // =========================================================================

    pub fn enroll(&mut self, label: &str, embedding: Embedding) -> Result<(), GalleryError> {
        self.gallery.enroll(label, embedding)?;
        let message = format!("New user enrolled: {}", label.trim());
        self.record(&message, Severity::Success);
        Ok(())
    }

    pub fn remove_user(&mut self, label: &str) -> bool {
        match self.gallery.remove_label(label) {
            Some(identity) => {
                let message = format!("User deleted: {}", identity.label);
                self.record(&message, Severity::Warn);
                true
            }
            None => false,
        }
    }

    pub fn clear_enrollments(&mut self) {
        self.gallery.clear();
        self.record("All user enrollments cleared", Severity::Warn);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn gate_reason(&self) -> &LockReason {
        self.gate.reason()
    }

    pub fn settings(&self) -> &SecuritySettings {
        &self.settings
    }

    pub fn tracker(&self) -> &StabilityTracker {
        &self.tracker
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Monotonic tick sequence; background match results compare against
    /// it to detect staleness
    pub fn tick_seq(&self) -> u64 {
        self.tick_seq
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn threat_count(&self) -> u64 {
        self.threat_count
    }

    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }

    fn record(&mut self, message: &str, severity: Severity) {
        self.event_count += 1;
        if severity.is_threat() {
            self.threat_count += 1;
        }
        self.sink.record(message, severity);
    }
}

/// Map a tick's category to the reason the gate would record on a lock
fn lock_reason(category: Option<Category>, sample: &Sample) -> LockReason {
    match category {
        Some(Category::NoSubject) => LockReason::NoSubject,
        Some(Category::MultipleSubjects) => {
            let count = match sample {
                Sample::Face { count, .. } => *count,
                Sample::Motion { .. } => 0,
            };
            LockReason::MultipleSubjects { count }
        }
        Some(Category::HighMotion) => LockReason::HighMotion,
        Some(Category::SingleSubject) | Some(Category::LowMotion) | None => LockReason::Cleared,
    }
}

// =============================================================================
// TESTS
// =============================================================================
