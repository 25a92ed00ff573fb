//! Motion-mode integration: intensity samples through the full session
//!
//! The motion policy has three bands. Low and High debounce like face
//! categories; the neutral band between them is a true no-op tick.

use std::sync::Arc;

use omniguard::core::{MemorySink, SurveillanceSession};
use omniguard::types::{
    Category, DetectionMode, GateState, LockReason, Sample, SecuritySettings, Verdict,
};

fn session(sensitivity: u8) -> SurveillanceSession {
    SurveillanceSession::new(
        DetectionMode::Motion,
        SecuritySettings::new(sensitivity, true),
        Arc::new(MemorySink::new()),
    )
}

/// Sensitivity 5: low threshold 13, high threshold 17, window 8 ticks
#[test]
fn test_low_intensity_goes_safe_on_eighth_tick() {
    let mut s = session(5);
    for tick in 1..=7 {
        let outcome = s.tick(&Sample::motion(5.0));
        assert_eq!(outcome.report.verdict, Verdict::Indeterminate, "tick {}", tick);
        assert_eq!(s.gate_state(), GateState::Locked);
    }
    let outcome = s.tick(&Sample::motion(5.0));
    assert_eq!(outcome.report.verdict, Verdict::Safe);
    assert_eq!(s.gate_state(), GateState::Unlocked);
}

#[test]
fn test_high_intensity_goes_unsafe_on_eighth_tick() {
    let mut s = session(5);
    // Open the gate first so the unsafe edge is observable
    for _ in 0..8 {
        s.tick(&Sample::motion(5.0));
    }
    assert_eq!(s.gate_state(), GateState::Unlocked);

    for tick in 1..=7 {
        let outcome = s.tick(&Sample::motion(20.0));
        assert_eq!(outcome.report.verdict, Verdict::Indeterminate, "tick {}", tick);
        assert_eq!(s.gate_state(), GateState::Unlocked);
    }
    let outcome = s.tick(&Sample::motion(20.0));
    assert_eq!(outcome.report.verdict, Verdict::Unsafe);
    assert_eq!(s.gate_state(), GateState::Locked);
    assert_eq!(*s.gate_reason(), LockReason::HighMotion);
}

/// Readings inside the neutral band never produce a verdict and never
/// change the gate
#[test]
fn test_neutral_band_leaves_everything_unchanged() {
    let mut s = session(5);
    for _ in 0..8 {
        let outcome = s.tick(&Sample::motion(15.0));
        assert_eq!(outcome.report.verdict, Verdict::Indeterminate);
        assert_eq!(outcome.report.category, None);
    }
    assert_eq!(s.gate_state(), GateState::Locked);
    assert_eq!(*s.gate_reason(), LockReason::Startup);
}

/// A neutral tick interrupting a low run neither extends nor resets it
#[test]
fn test_neutral_tick_preserves_run() {
    let mut s = session(5);
    for _ in 0..6 {
        s.tick(&Sample::motion(3.0));
    }
    assert_eq!(s.tracker().run_for(Category::LowMotion), 6);

    s.tick(&Sample::motion(15.0));
    assert_eq!(s.tracker().run_for(Category::LowMotion), 6);
    assert_eq!(s.gate_state(), GateState::Locked);

    s.tick(&Sample::motion(3.0));
    let outcome = s.tick(&Sample::motion(3.0));
    assert_eq!(outcome.report.run, 8);
    assert_eq!(outcome.report.verdict, Verdict::Safe);
    assert_eq!(s.gate_state(), GateState::Unlocked);
}

/// Higher sensitivity narrows the safe band and lowers the high
/// threshold: the same reading can be Safe, neutral, or High depending
/// on the setting
#[test]
fn test_sensitivity_moves_intensity_bands() {
    // At sensitivity 5 (low 13), 10.0 is in the Low band
    let mut relaxed = session(5);
    let outcome = relaxed.tick(&Sample::motion(10.0));
    assert_eq!(outcome.report.category, Some(Category::LowMotion));

    // At sensitivity 10 (low 8, high 12), 10.0 falls in the neutral band
    let mut strict = session(10);
    let outcome = strict.tick(&Sample::motion(10.0));
    assert_eq!(outcome.report.category, None);

    // And 13.0 is already High at sensitivity 10
    let outcome = strict.tick(&Sample::motion(13.0));
    assert_eq!(outcome.report.category, Some(Category::HighMotion));
}

/// Changing sensitivity mid-run keeps the counters; the new bands apply
/// from the next tick
#[test]
fn test_sensitivity_change_applies_next_tick() {
    let mut s = session(5);
    for _ in 0..5 {
        s.tick(&Sample::motion(10.0)); // Low at sensitivity 5
    }
    assert_eq!(s.tracker().run_for(Category::LowMotion), 5);

    let mut settings = *s.settings();
    settings.set_sensitivity(10);
    s.apply_settings(settings);

    // 10.0 is now neutral: the run is preserved but stops growing
    s.tick(&Sample::motion(10.0));
    assert_eq!(s.tracker().run_for(Category::LowMotion), 5);

    // 5.0 is still Low under the new bands and resumes the run
    for _ in 0..3 {
        s.tick(&Sample::motion(5.0));
    }
    assert_eq!(s.gate_state(), GateState::Unlocked);
}
