//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: axum route handlers for all endpoints
//! - **[`models`]**: request/response data structures
//! - **[`identity`]**: caller identity extraction from the `X-User-Id` header
//!
//! All endpoints are documented with OpenAPI annotations via `utoipa`; the
//! rendered docs are served at `/docs`.

pub mod handlers;
pub mod identity;
pub mod models;
