//! HTTP request handlers, organized by resource type.
//!
//! Each handler deserializes and validates the request, runs the operation
//! against the stores (or the booking engine for anything with lifecycle or
//! temporal semantics), and shapes the response. Errors convert to status
//! codes through [`crate::errors::Error`].
//!
//! - [`users`]: account CRUD
//! - [`items`]: catalog CRUD, search, comments, item detail with the
//!   owner-only schedule projection
//! - [`bookings`]: booking lifecycle and partitioned listings
//! - [`requests`]: want-ads

pub mod bookings;
pub mod items;
pub mod requests;
pub mod users;
