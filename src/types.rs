//! Common type definitions.
//!
//! All entity IDs are UUIDs wrapped in type aliases for better type safety:
//!
//! - [`UserId`]: User account identifier
//! - [`ItemId`]: Catalog item identifier
//! - [`BookingId`]: Booking identifier
//! - [`CommentId`]: Comment identifier
//! - [`RequestId`]: Want-ad (item request) identifier

use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type ItemId = Uuid;
pub type BookingId = Uuid;
pub type CommentId = Uuid;
pub type RequestId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}
