//! Core modules for OmniGuard

pub mod driver;
pub mod events;
pub mod gate;
pub mod matcher;
pub mod session;
pub mod stability;
pub mod store;

pub use driver::{run_session, DriverConfig, ScriptedSource, SignalSource};
pub use events::{EventSink, MemorySink, NullSink, TerminalSink};
pub use gate::AccessGate;
pub use matcher::{IdentityMatcher, MatchResult};
pub use session::{SurveillanceSession, TickOutcome};
pub use stability::{StabilityTracker, TickReport};
pub use store::{load_or_empty, GalleryStore, JsonGalleryStore};
