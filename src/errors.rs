use crate::store::errors::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Requested entity missing, or present but not visible to the caller.
    /// The two are deliberately indistinguishable so that an unauthorized
    /// probe learns nothing about whether the entity exists.
    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    Validation { message: String },

    /// Caller lacks the specific capability for the operation
    #[error("{message}")]
    Forbidden { message: String },

    /// State-machine guard violated, e.g. deciding a non-waiting booking
    #[error("{message}")]
    Conflict { message: String },

    /// Store operation error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::Store(store_err) => match store_err {
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::UniqueViolation { .. } => StatusCode::CONFLICT,
                StoreError::TransitionConflict { .. } => StatusCode::CONFLICT,
                StoreError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::NotFound { .. } | Error::Validation { .. } | Error::Forbidden { .. } | Error::Conflict { .. } => {
                self.to_string()
            }
            Error::Store(store_err) => match store_err {
                StoreError::NotFound => "Resource not found".to_string(),
                StoreError::UniqueViolation { field, .. } => match *field {
                    "email" => "A user with this email already exists".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                StoreError::TransitionConflict { .. } => "Booking status has already been decided".to_string(),
                StoreError::Other(_) => "Internal server error".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Store(StoreError::Other(_)) | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Store(_) => {
                tracing::warn!("Store constraint error: {}", self);
            }
            Error::Conflict { .. } => {
                tracing::warn!("Conflict error: {}", self);
            }
            Error::Forbidden { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::Validation { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = json!({ "error": self.user_message() });
        (status, axum::response::Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_expected_statuses() {
        assert_eq!(
            Error::Store(StoreError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Store(StoreError::UniqueViolation {
                field: "email",
                message: "taken".to_string()
            })
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::Store(StoreError::TransitionConflict {
                current: crate::bookings::models::BookingStatus::Approved
            })
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let err = Error::Other(anyhow::anyhow!("connection pool exhausted at 10.0.0.3"));
        assert_eq!(err.user_message(), "Internal server error");
    }
}
