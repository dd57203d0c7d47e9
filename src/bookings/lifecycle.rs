//! Booking lifecycle transitions.
//!
//! State machine: `Waiting` is the only entry point; `Approved` and
//! `Rejected` are terminal. A booking is decided at most once, by the item's
//! owner, and the terminal write is an atomic compare-and-set in the store,
//! so two racing decisions cannot both land.

use super::models::{Booking, BookingStatus, NewBooking};
use super::Bookings;
use crate::errors::{Error, Result};
use crate::store::errors::StoreError;
use crate::store::models::Item;
use crate::types::{abbrev_uuid, BookingId, ItemId, UserId};
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

impl Bookings {
    /// Create a booking in `Waiting` state.
    ///
    /// Fails `NotFound` if booker or item is missing, `Validation` if the
    /// item is unavailable or the window is empty/inverted. An owner booking
    /// their own item gets the item-not-found response rather than a
    /// forbidden one, so the two parties see symmetric information about the
    /// item's existence.
    #[instrument(
        skip(self),
        fields(booker = %abbrev_uuid(&booker_id), item = %abbrev_uuid(&item_id)),
        err
    )]
    pub async fn create(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Booking> {
        self.users.find_by_id(booker_id).await?.ok_or(Error::NotFound {
            resource: "user",
            id: booker_id.to_string(),
        })?;
        let item = self.items.find_by_id(item_id).await?.ok_or(Error::NotFound {
            resource: "item",
            id: item_id.to_string(),
        })?;

        if !item.available {
            return Err(Error::Validation {
                message: "Item is not available for booking".to_string(),
            });
        }
        if item.owner_id == booker_id {
            // Not-found-shaped on purpose; see the method docs.
            return Err(Error::NotFound {
                resource: "item",
                id: item_id.to_string(),
            });
        }
        if end <= start {
            return Err(Error::Validation {
                message: "Booking must end after it starts".to_string(),
            });
        }

        let booking = self
            .store
            .create(NewBooking {
                item_id,
                booker_id,
                start,
                end,
            })
            .await?;
        info!(booking = %abbrev_uuid(&booking.id), "booking created");
        Ok(booking)
    }

    /// Decide a waiting booking: `approved == true` moves it to `Approved`,
    /// otherwise to `Rejected`.
    ///
    /// Only the item's owner may decide (`Forbidden` otherwise); a booking
    /// that has already been decided yields `Conflict` and is left unchanged.
    #[instrument(
        skip(self),
        fields(caller = %abbrev_uuid(&caller_id), booking = %abbrev_uuid(&booking_id)),
        err
    )]
    pub async fn approve(&self, caller_id: UserId, booking_id: BookingId, approved: bool) -> Result<Booking> {
        let booking = self.store.find_by_id(booking_id).await?.ok_or(Error::NotFound {
            resource: "booking",
            id: booking_id.to_string(),
        })?;
        let item = self.item_of(&booking).await?;

        if item.owner_id != caller_id {
            return Err(Error::Forbidden {
                message: "Only the item's owner can decide a booking".to_string(),
            });
        }
        if booking.status != BookingStatus::Waiting {
            return Err(Error::Conflict {
                message: "Booking status has already been decided".to_string(),
            });
        }

        let to = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        // Guard re-validated under the per-booking lock; a concurrent winner
        // turns this into the same Conflict the pre-check produces.
        let decided = self.store.resolve(booking_id, to).await.map_err(|err| match err {
            StoreError::TransitionConflict { .. } => Error::Conflict {
                message: "Booking status has already been decided".to_string(),
            },
            other => Error::Store(other),
        })?;
        info!(status = ?decided.status, "booking decided");
        Ok(decided)
    }

    /// Fetch a booking for one of its two parties.
    ///
    /// Anyone who is neither the booker nor the item's owner receives the
    /// same not-found response as for a booking that does not exist.
    #[instrument(
        skip(self),
        fields(caller = %abbrev_uuid(&caller_id), booking = %abbrev_uuid(&booking_id)),
        err
    )]
    pub async fn get(&self, caller_id: UserId, booking_id: BookingId) -> Result<Booking> {
        let not_found = || Error::NotFound {
            resource: "booking",
            id: booking_id.to_string(),
        };
        let booking = self.store.find_by_id(booking_id).await?.ok_or_else(not_found)?;
        let item = self.item_of(&booking).await?;

        if caller_id != booking.booker_id && caller_id != item.owner_id {
            return Err(not_found());
        }
        Ok(booking)
    }

    /// Resolve the item a booking points at. A dangling reference means the
    /// stores disagree with each other, which is an internal fault, not a
    /// client-visible 404.
    pub(super) async fn item_of(&self, booking: &Booking) -> Result<Item> {
        self.items
            .find_by_id(booking.item_id)
            .await?
            .ok_or_else(|| Error::Other(anyhow!("booking {} references missing item {}", booking.id, booking.item_id)))
    }
}
