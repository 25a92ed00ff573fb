//! Runtime-adjustable security settings

use serde::{Deserialize, Serialize};

use crate::{SENSITIVITY_DEFAULT, SENSITIVITY_MAX, SENSITIVITY_MIN};

/// Settings read as a snapshot at the start of every tick. Writable
/// asynchronously; changes apply on the next tick's classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySettings {
    /// Detection sensitivity, 1 (laziest) to 10 (fastest reaction)
    pub sensitivity: u8,
    /// When false, Unsafe verdicts do not lock the gate. Safe verdicts
    /// still clear a lock, and manual lock still works.
    pub auto_lock: bool,
}

impl SecuritySettings {
    pub fn new(sensitivity: u8, auto_lock: bool) -> Self {
        Self {
            sensitivity: clamp_sensitivity(sensitivity),
            auto_lock,
        }
    }

    /// Set sensitivity, clamping out-of-range values instead of rejecting
    pub fn set_sensitivity(&mut self, sensitivity: u8) {
        self.sensitivity = clamp_sensitivity(sensitivity);
    }
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            sensitivity: SENSITIVITY_DEFAULT,
            auto_lock: true,
        }
    }
}

fn clamp_sensitivity(s: u8) -> u8 {
    s.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitivity_clamps() {
        assert_eq!(SecuritySettings::new(0, true).sensitivity, 1);
        assert_eq!(SecuritySettings::new(99, true).sensitivity, 10);
        assert_eq!(SecuritySettings::new(7, true).sensitivity, 7);
    }

    #[test]
    fn test_defaults() {
        let s = SecuritySettings::default();
        assert_eq!(s.sensitivity, SENSITIVITY_DEFAULT);
        assert!(s.auto_lock);
    }
}
