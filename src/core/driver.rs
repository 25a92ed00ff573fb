//! Async tick driver: periodic sampling plus background identity matching
//!
//! One logical timeline. The loop pulls a sample, snapshots settings, and
//! runs the session tick while holding its lock, so manual actions and
//! settings writes land between ticks, never inside one. Identity matching
//! is the only detached work: at most one search in flight, results applied
//! to the event sink only, stale results dropped by tick-sequence check,
//! and a timeout that degrades to NoMatch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::MissedTickBehavior;

use crate::core::{IdentityMatcher, SurveillanceSession};
use crate::types::{DetectionMode, Sample, SecuritySettings, SignalError};
use crate::MATCH_TIMEOUT_MS;

/// Pull-based sample boundary. Implementations must not block past the
/// tick period under normal operation; a stall is reported as
/// `Unavailable` and degrades to a skipped tick.
pub trait SignalSource: Send {
    fn next_sample(&mut self) -> Result<Sample, SignalError>;
}

/// A source that replays a fixed sequence, then reports exhaustion.
/// Useful for tests and the CLI's scripted replay mode.
pub struct ScriptedSource {
    samples: std::vec::IntoIter<Result<Sample, SignalError>>,
}

impl ScriptedSource {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples: samples
                .into_iter()
                .map(Ok)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }

    /// Replay including per-tick failures
    pub fn with_results(samples: Vec<Result<Sample, SignalError>>) -> Self {
        Self {
            samples: samples.into_iter(),
        }
    }
}

impl SignalSource for ScriptedSource {
    fn next_sample(&mut self) -> Result<Sample, SignalError> {
        self.samples.next().unwrap_or(Err(SignalError::Exhausted))
    }
}

/// Driver timing knobs; defaults follow the active detection mode
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    pub tick: Duration,
    pub match_timeout: Duration,
}

impl DriverConfig {
    pub fn for_mode(mode: DetectionMode) -> Self {
        Self {
            tick: Duration::from_millis(mode.tick_ms()),
            match_timeout: Duration::from_millis(MATCH_TIMEOUT_MS),
        }
    }
}

/// Run the periodic tick loop until the source is exhausted.
///
/// `settings` is the asynchronously-writable settings cell; a snapshot is
/// taken at the top of each tick so a mid-tick write can never tear the
/// thresholds.
pub async fn run_session<S: SignalSource>(
    session: Arc<Mutex<SurveillanceSession>>,
    mut source: S,
    settings: Arc<RwLock<SecuritySettings>>,
    config: DriverConfig,
) {
    let mut interval = tokio::time::interval(config.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let match_in_flight = Arc::new(AtomicBool::new(false));

    loop {
        interval.tick().await;

        let snapshot = *settings.read().await;
        let sample = match source.next_sample() {
            Ok(sample) => sample,
            // Skip tick: no counters mutated, no verdict emitted
            Err(SignalError::Unavailable(_)) => continue,
            Err(SignalError::Exhausted) => break,
        };

        let mut guard = session.lock().await;
        guard.apply_settings(snapshot);
        let outcome = guard.tick(&sample);

        let Some(probe) = guard.match_candidate(&sample, &outcome) else {
            continue;
        };
        // At most one match in flight; a tick that arrives while one is
        // running simply doesn't start another.
        if match_in_flight.swap(true, Ordering::AcqRel) {
            continue;
        }
        let seq = guard.tick_seq();
        let gallery = guard.gallery().clone();
        drop(guard);

        let session = session.clone();
        let in_flight = match_in_flight.clone();
        let timeout = config.match_timeout;
        tokio::spawn(async move {
            let search = tokio::task::spawn_blocking(move || {
                IdentityMatcher::new().best_match(&probe, &gallery)
            });
            // Timeout degrades to NoMatch
            let result = match tokio::time::timeout(timeout, search).await {
                Ok(Ok(result)) => result,
                _ => None,
            };

            let mut guard = session.lock().await;
            // Drop stale results: a newer tick means a different sample
            if guard.tick_seq() == seq {
                if let Some(m) = &result {
                    guard.annotate_match(m);
                }
            }
            in_flight.store(false, Ordering::Release);
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemorySink;
    use crate::types::{GateState, Severity};

    fn fast_config() -> DriverConfig {
        DriverConfig {
            tick: Duration::from_millis(2),
            match_timeout: Duration::from_millis(100),
        }
    }

    fn new_session(sensitivity: u8) -> (Arc<Mutex<SurveillanceSession>>, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let session = SurveillanceSession::new(
            DetectionMode::Face,
            SecuritySettings::new(sensitivity, true),
            sink.clone(),
        );
        (Arc::new(Mutex::new(session)), sink)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_loop_runs_to_exhaustion_and_unlocks() {
        let (session, sink) = new_session(5); // threshold 4
        let source = ScriptedSource::new(vec![Sample::faces(1); 6]);
        let settings = Arc::new(RwLock::new(SecuritySettings::new(5, true)));
        run_session(session.clone(), source, settings, fast_config()).await;

        let guard = session.lock().await;
        assert_eq!(guard.gate_state(), GateState::Unlocked);
        assert_eq!(guard.tick_seq(), 6);
        assert_eq!(sink.count(), 1); // one unlock edge
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unavailable_ticks_are_skipped() {
        let (session, _) = new_session(5);
        let source = ScriptedSource::with_results(vec![
            Ok(Sample::faces(1)),
            Err(SignalError::Unavailable("camera stall".into())),
            Ok(Sample::faces(1)),
            Ok(Sample::faces(1)),
            Ok(Sample::faces(1)),
        ]);
        let settings = Arc::new(RwLock::new(SecuritySettings::new(5, true)));
        run_session(session.clone(), source, settings, fast_config()).await;

        let guard = session.lock().await;
        // Skipped tick mutated nothing: the safe run is unbroken and
        // crossed its threshold of 4 on the last sample
        assert_eq!(guard.tick_seq(), 4);
        assert_eq!(guard.gate_state(), GateState::Unlocked);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_background_match_annotates() {
        use crate::types::Embedding;
        use crate::EMBEDDING_DIM;

        let (session, sink) = new_session(10); // threshold 1
        {
            let mut guard = session.lock().await;
            guard
                .enroll(
                    "alice",
                    Embedding::new(vec![0.001; EMBEDDING_DIM]).unwrap(),
                )
                .unwrap();
        }
        let sample = Sample::Face {
            count: 1,
            embedding: Some(Embedding::new(vec![0.0; EMBEDDING_DIM]).unwrap()),
        };
        // Single sample: the tick sequence stays put after the spawn, so
        // the match result is still fresh when it lands
        let source = ScriptedSource::new(vec![sample]);
        let settings = Arc::new(RwLock::new(SecuritySettings::new(10, true)));
        run_session(session.clone(), source, settings, fast_config()).await;

        // Allow the detached match task to finish
        tokio::time::sleep(Duration::from_millis(150)).await;
        let recognized = sink
            .events()
            .iter()
            .any(|e| e.severity == Severity::Success && e.message.starts_with("Recognized: alice"));
        assert!(recognized);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_settings_written_mid_run_apply_next_tick() {
        let (session, _) = new_session(1); // threshold 8
        let settings = Arc::new(RwLock::new(SecuritySettings::new(1, true)));
        let writer = settings.clone();
        // Flip sensitivity to 10 (threshold 1) while the loop runs
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            writer.write().await.set_sensitivity(10);
        });
        let source = ScriptedSource::new(vec![Sample::faces(1); 4]);
        let config = DriverConfig {
            tick: Duration::from_millis(20),
            match_timeout: Duration::from_millis(100),
        };
        run_session(session.clone(), source, settings, config).await;

        let guard = session.lock().await;
        // With threshold 8 it could not unlock in 4 ticks; the lowered
        // threshold took effect without resetting the run
        assert_eq!(guard.gate_state(), GateState::Unlocked);
    }
}
