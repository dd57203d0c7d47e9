//! Booking records and the closed vocabularies of the lifecycle engine.

use crate::types::{BookingId, ItemId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle state of a booking.
///
/// Every booking enters as `Waiting`; `Approved` and `Rejected` are terminal.
/// There is no transition out of a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

/// A request by a user (the booker) to use another user's item for a time
/// interval, subject to owner approval.
///
/// `item_id`, `booker_id`, `start` and `end` are immutable after creation;
/// `status` changes at most once (see [`BookingStatus`]). `start < end`
/// strictly, enforced at creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Booking {
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

/// Creation request for a booking. The store assigns the id and the initial
/// `Waiting` status; there is no other way to enter the state machine.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub item_id: ItemId,
    pub booker_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Minimal owner-facing view of a booking, embedded in item detail.
/// Deliberately not the full record: this is a summary, not an audit view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookingSummary {
    #[schema(value_type = String, format = "uuid")]
    pub id: BookingId,
    #[schema(value_type = String, format = "uuid")]
    pub booker_id: UserId,
}

impl From<&Booking> for BookingSummary {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            booker_id: booking.booker_id,
        }
    }
}

/// Whose bookings a listing is about: the user as the borrowing party, or the
/// user as the owner of the booked items. Both roles share one classification
/// path so the time-window semantics cannot diverge between call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingRole {
    Booker,
    Owner,
}

/// Named filter applied to a booking listing.
///
/// `All`, `Current`, `Past` and `Future` classify against a fixed `now`;
/// `Waiting` and `Rejected` filter on status and ignore time entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

#[derive(Debug, Error)]
#[error("Unknown state: {0}")]
pub struct UnknownPartition(pub String);

impl FromStr for Partition {
    type Err = UnknownPartition;

    /// Case-insensitive; this is the only place the string tokens exist.
    /// The engine itself deals exclusively in the enum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Partition::All),
            "CURRENT" => Ok(Partition::Current),
            "PAST" => Ok(Partition::Past),
            "FUTURE" => Ok(Partition::Future),
            "WAITING" => Ok(Partition::Waiting),
            "REJECTED" => Ok(Partition::Rejected),
            _ => Err(UnknownPartition(s.to_string())),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Partition::All => "ALL",
            Partition::Current => "CURRENT",
            Partition::Past => "PAST",
            Partition::Future => "FUTURE",
            Partition::Waiting => "WAITING",
            Partition::Rejected => "REJECTED",
        };
        write!(f, "{token}")
    }
}
