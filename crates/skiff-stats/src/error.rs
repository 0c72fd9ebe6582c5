//! Error types for the statistics crate.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while refreshing note statistics.
///
/// Folding itself never fails: malformed events are skipped (logged at
/// debug), so the only failure mode is the event-source collaborator.
#[derive(Debug, Error)]
pub enum Error {
    /// The event source failed to answer a fetch; carries the collaborator's
    /// transport error.
    #[error("event source error: {0}")]
    Source(#[from] Box<dyn std::error::Error + Send + Sync>),
}
