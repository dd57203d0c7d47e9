use crate::bookings::models::BookingStatus;
use thiserror::Error;

/// Unified error type for store operations that application code can handle
#[derive(Error, Debug)]
pub enum StoreError {
    /// Entity not found by the given identifier
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation
    #[error("Unique constraint violation on {field}")]
    UniqueViolation { field: &'static str, message: String },

    /// A booking transition was applied to a booking that is no longer WAITING.
    /// Carries the status observed under the entry lock so callers can report
    /// the losing side of a race accurately.
    #[error("Booking is already {current:?}")]
    TransitionConflict { current: BookingStatus },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type alias for store operation results
pub type Result<T> = std::result::Result<T, StoreError>;
