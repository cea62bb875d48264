//! Error types for the form layer.

use thiserror::Error;

/// Errors surfaced by the form driver.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormError {
    /// A state mutation was requested from inside the update pass it would
    /// trigger. Re-entrant changes would observe half-applied widget state,
    /// so they are rejected; queue the mutation outside the pass instead.
    #[error("change() called while an update pass is already in progress")]
    ReentrantChange,
}
