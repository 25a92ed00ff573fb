//! Error taxonomy. Nothing here is fatal to a session: signal failures
//! skip the tick, gallery failures degrade to an empty gallery, and
//! submission failures surface to the caller. Fail closed throughout.

use thiserror::Error;

/// Errors surfaced by `attempt_unlock`. The two variants are deliberately
/// distinct: a blocked submission must never be reported as a wrong
/// credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The gate is locked; the credential was not even examined
    #[error("PIN entry blocked - unsafe to submit")]
    BlockedSubmission,
    /// The gate was open but the credential did not match
    #[error("credential rejected")]
    CredentialRejected,
}

/// The signal source could not produce a sample this tick.
/// Policy: skip the tick, touch no counters, emit no verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("signal source unavailable: {0}")]
    Unavailable(String),
    /// The source is done producing samples (end of session)
    #[error("signal source exhausted")]
    Exhausted,
}

/// Gallery construction / persistence failures
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("embedding dimension mismatch: expected {expected}, found {found}")]
    BadDimension { expected: usize, found: usize },
    #[error("enrollment label must be non-empty")]
    EmptyLabel,
    #[error("malformed gallery data: {0}")]
    Malformed(String),
    #[error("gallery store I/O: {0}")]
    Io(#[from] std::io::Error),
}
