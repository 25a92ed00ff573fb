//! OmniGuard core: surveillance-gated PIN access
//!
//! Pipeline: SignalSource → StabilityTracker → AccessGate → EventSink
//!
//! The tracker debounces noisy per-tick samples (face counts or motion
//! intensity) into SAFE / UNSAFE verdicts; the gate turns verdicts into
//! lock/unlock decisions that block or allow PIN entry. Identity matching
//! runs off the same samples but only ever annotates, never gates.

pub mod core;
pub mod types;

// =============================================================================
// POLICY CONSTANTS
// =============================================================================

/// Base stability window: consecutive ticks a category must persist
pub const STABILITY_FRAMES: u32 = 8;

/// Tick period in face mode (milliseconds)
pub const FACE_TICK_MS: u64 = 300;

/// Tick period in motion mode (milliseconds)
pub const MOTION_TICK_MS: u64 = 350;

/// Sensitivity bounds; out-of-range values clamp, never reject
pub const SENSITIVITY_MIN: u8 = 1;
pub const SENSITIVITY_MAX: u8 = 10;
pub const SENSITIVITY_DEFAULT: u8 = 5;

/// Euclidean acceptance radius for identity matching
pub const MATCH_RADIUS: f64 = 0.6;

/// Embedding dimension produced by the external face model
pub const EMBEDDING_DIM: usize = 128;

/// Budget for a background identity match before it degrades to NoMatch.
/// Kept under the face tick period so matching never backs up the loop.
pub const MATCH_TIMEOUT_MS: u64 = 250;

/// Maximum PIN length accepted by the demo keypad
pub const PIN_MAX_LEN: usize = 8;

/// Minimum PIN length accepted for submission
pub const PIN_MIN_LEN: usize = 4;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
