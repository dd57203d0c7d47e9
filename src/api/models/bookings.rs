//! API request/response models for bookings.

use crate::bookings::{Booking, BookingStatus};
use crate::types::{BookingId, ItemId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingCreate {
    #[schema(value_type = String, format = "uuid")]
    pub item_id: ItemId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: BookingId,
    #[schema(value_type = String, format = "uuid")]
    pub item_id: ItemId,
    #[schema(value_type = String, format = "uuid")]
    pub booker_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            item_id: booking.item_id,
            booker_id: booking.booker_id,
            start: booking.start,
            end: booking.end,
            status: booking.status,
        }
    }
}

/// Query parameters for booking listings.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBookingsQuery {
    /// Partition token: ALL (default), CURRENT, PAST, FUTURE, WAITING or
    /// REJECTED, case-insensitive.
    pub state: Option<String>,
}

/// Query parameters for the approval decision.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ApproveQuery {
    /// `true` approves, `false` rejects.
    pub approved: bool,
}
