//! Stability tracker: run-length debouncing of per-tick classifications
//!
//! One counter per category; each tick increments the counter matching the
//! observed category and resets the others. A verdict is emitted only once
//! a counter reaches its threshold, and keeps being emitted every tick the
//! run persists (level-triggered, not edge-triggered). A neutral motion
//! reading is a true no-op: nothing increments, nothing resets.

use serde::{Deserialize, Serialize};

use crate::types::{Category, DetectionMode, Sample, Verdict};
use crate::{SENSITIVITY_DEFAULT, SENSITIVITY_MAX, SENSITIVITY_MIN, STABILITY_FRAMES};

/// Tracker output for one tick
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TickReport {
    /// Debounced verdict; Indeterminate while no threshold is crossed
    pub verdict: Verdict,
    /// The category this tick classified into; None for a neutral motion tick
    pub category: Option<Category>,
    /// Run length of the current category after this tick
    pub run: u32,
    /// Run-length threshold in effect for this tick
    pub threshold: u32,
}

/// Debounces noisy per-tick samples into Safe/Unsafe/Indeterminate verdicts
#[derive(Debug, Clone)]
pub struct StabilityTracker {
    mode: DetectionMode,
    sensitivity: u8,
    base_frames: u32,
    /// Current run: at most one counter is ever non-zero, so a single
    /// (category, length) pair is the whole counter state
    current: Option<Category>,
    run: u32,
    tick_count: u64,
}

impl StabilityTracker {
    pub fn new(mode: DetectionMode) -> Self {
        Self::with_base_frames(mode, STABILITY_FRAMES)
    }

    /// Override the base stability window (default: 8 ticks)
    pub fn with_base_frames(mode: DetectionMode, base_frames: u32) -> Self {
        Self {
            mode,
            sensitivity: SENSITIVITY_DEFAULT,
            base_frames: base_frames.max(1),
            current: None,
            run: 0,
            tick_count: 0,
        }
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    pub fn sensitivity(&self) -> u8 {
        self.sensitivity
    }

    /// Change sensitivity; clamped, takes effect on the next tick without
    /// resetting existing counters
    pub fn set_sensitivity(&mut self, sensitivity: u8) {
        self.sensitivity = sensitivity.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX);
    }

    /// Run-length threshold currently in effect.
    ///
    /// Face mode scales the window with sensitivity (higher sensitivity,
    /// shorter window); motion mode always uses the full base window and
    /// instead moves its intensity thresholds.
    pub fn run_threshold(&self) -> u32 {
        match self.mode {
            DetectionMode::Face => {
                (self.base_frames * (11 - u32::from(self.sensitivity)) / 10).max(1)
            }
            DetectionMode::Motion => self.base_frames,
        }
    }

    /// Motion intensity below this is the Low (safe) band
    pub fn motion_low_threshold(&self) -> f64 {
        f64::from(8 + (10 - u16::from(self.sensitivity)))
    }

    /// Motion intensity above this is the High (unsafe) band
    pub fn motion_high_threshold(&self) -> f64 {
        f64::from(12 + (10 - u16::from(self.sensitivity)))
    }

    /// Consume one sample and emit the debounced verdict for this tick
    pub fn observe(&mut self, sample: &Sample) -> TickReport {
        self.tick_count += 1;
        let threshold = self.run_threshold();

        let category = match self.classify(sample) {
            Some(c) => c,
            // Neutral motion band or a sample from the wrong mode: no
            // counter is touched and none is reset
            None => {
                return TickReport {
                    verdict: Verdict::Indeterminate,
                    category: None,
                    run: self.run,
                    threshold,
                }
            }
        };

        // Increment the matching counter, reset the others. With a single
        // active run this is a switch check.
        if self.current == Some(category) {
            self.run = self.run.saturating_add(1);
        } else {
            self.current = Some(category);
            self.run = 1;
        }

        let verdict = if self.run >= threshold {
            category.verdict()
        } else {
            Verdict::Indeterminate
        };

        TickReport {
            verdict,
            category: Some(category),
            run: self.run,
            threshold,
        }
    }

    /// Classify one sample; None means a no-op tick
    fn classify(&self, sample: &Sample) -> Option<Category> {
        match (self.mode, sample) {
            (DetectionMode::Face, Sample::Face { count, .. }) => Some(match count {
                0 => Category::NoSubject,
                1 => Category::SingleSubject,
                _ => Category::MultipleSubjects,
            }),
            (DetectionMode::Motion, Sample::Motion { intensity }) => {
                if *intensity < self.motion_low_threshold() {
                    Some(Category::LowMotion)
                } else if *intensity > self.motion_high_threshold() {
                    Some(Category::HighMotion)
                } else {
                    None
                }
            }
            // Sample from the inactive mode; the mode is fixed per session
            _ => None,
        }
    }

    /// Saturate the high-alert counter so a stale safe-leaning run cannot
    /// immediately override a manual lock; a fresh full window of safe
    /// ticks is required before the gate can open again.
    pub fn bias_to_alert(&mut self) {
        let category = match self.mode {
            DetectionMode::Face => Category::NoSubject,
            DetectionMode::Motion => Category::HighMotion,
        };
        self.current = Some(category);
        self.run = self.run_threshold();
    }

    /// Run length of one category's counter (zero unless it is the
    /// current run)
    pub fn run_for(&self, category: Category) -> u32 {
        if self.current == Some(category) {
            self.run
        } else {
            0
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Reset all counters to the initial state
    pub fn reset(&mut self) {
        self.current = None;
        self.run = 0;
    }
}

// =============================================================================
// TESTS
// =============================================================================
