//! Caller identity extraction.
//!
//! Every operation acts on behalf of a user identified by the `X-User-Id`
//! header. The service sits behind a gateway that authenticates callers and
//! forwards their id, so the header is trusted as-is. A missing or malformed
//! header is a client error, not an authentication failure.

use crate::errors::Error;
use crate::types::UserId;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// The id the caller claims to act as. Visibility and capability checks
/// against it happen in the engine and handlers, not here.
#[derive(Debug, Clone, Copy)]
pub struct CallerId(pub UserId);

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.headers.get(USER_ID_HEADER).ok_or_else(|| Error::Validation {
            message: format!("Missing {USER_ID_HEADER} header"),
        })?;
        let value = raw.to_str().map_err(|_| Error::Validation {
            message: format!("{USER_ID_HEADER} header is not valid UTF-8"),
        })?;
        let id = Uuid::parse_str(value).map_err(|_| Error::Validation {
            message: format!("{USER_ID_HEADER} header is not a valid UUID"),
        })?;
        Ok(CallerId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts as _;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/bookings");
        if let Some(value) = value {
            builder = builder.header(USER_ID_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn valid_header_is_extracted() {
        let id = Uuid::new_v4();
        let mut parts = parts_with_header(Some(&id.to_string()));
        let caller = CallerId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(caller.0, id);
    }

    #[tokio::test]
    async fn missing_or_malformed_header_is_a_client_error() {
        for value in [None, Some("not-a-uuid")] {
            let mut parts = parts_with_header(value);
            let err = CallerId::from_request_parts(&mut parts, &()).await.unwrap_err();
            assert!(matches!(err, Error::Validation { .. }));
        }
    }
}
