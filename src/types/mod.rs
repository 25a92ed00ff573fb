//! Core types for OmniGuard

mod category;
mod error;
mod event;
mod gallery;
mod gate;
mod sample;
mod settings;

pub use category::{Category, Verdict};
pub use error::{AccessError, GalleryError, SignalError};
pub use event::{SecurityEvent, Severity};
pub use gallery::{EnrolledIdentity, Gallery};
pub use gate::{CredentialOutcome, GateState, GateTransition, LockReason};
pub use sample::{DetectionMode, Embedding, Sample};
pub use settings::SecuritySettings;
