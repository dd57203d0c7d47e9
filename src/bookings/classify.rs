//! Temporal classification of booking listings.
//!
//! `now` is captured once per call so a single listing is internally
//! consistent, and both subject roles (borrower, owner) run through the same
//! filter and the same sort. The only difference between the roles is which
//! bookings are in scope: the borrower's own, or those on the owner's items,
//! with the owned item set resolved through the catalog store rather than by
//! walking from a booking to its item to its owner.

use super::models::{Booking, BookingRole, Partition};
use super::Bookings;
use crate::errors::{Error, Result};
use crate::types::{abbrev_uuid, ItemId, UserId};
use chrono::{DateTime, Utc};
use tracing::instrument;

impl Partition {
    /// Membership test against a fixed `now`. Time-based partitions ignore
    /// status; status-based partitions ignore time.
    pub fn matches(self, booking: &Booking, now: DateTime<Utc>) -> bool {
        match self {
            Partition::All => true,
            Partition::Current => booking.start <= now && now < booking.end,
            Partition::Past => booking.end <= now,
            Partition::Future => booking.start > now,
            Partition::Waiting => booking.status == super::models::BookingStatus::Waiting,
            Partition::Rejected => booking.status == super::models::BookingStatus::Rejected,
        }
    }
}

/// The one sort applied to every listing, regardless of partition: latest
/// `start` first, id as the deterministic tiebreaker.
fn sort_latest_first(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| b.start.cmp(&a.start).then_with(|| b.id.cmp(&a.id)));
}

impl Bookings {
    /// List the subject's bookings in the requested partition.
    ///
    /// The subject must exist (`NotFound` otherwise). Every partition comes
    /// back sorted descending by `start`.
    #[instrument(
        skip(self),
        fields(subject = %abbrev_uuid(&subject_id), role = ?role, partition = %partition),
        err
    )]
    pub async fn list(&self, subject_id: UserId, role: BookingRole, partition: Partition) -> Result<Vec<Booking>> {
        self.users.find_by_id(subject_id).await?.ok_or(Error::NotFound {
            resource: "user",
            id: subject_id.to_string(),
        })?;

        let now = Utc::now();
        let mut bookings = match role {
            BookingRole::Booker => self.store.find_by_booker(subject_id).await?,
            BookingRole::Owner => {
                let item_ids: Vec<ItemId> = self
                    .items
                    .list_by_owner(subject_id)
                    .await?
                    .into_iter()
                    .map(|item| item.id)
                    .collect();
                self.store.find_by_items(&item_ids).await?
            }
        };

        bookings.retain(|booking| partition.matches(booking, now));
        sort_latest_first(&mut bookings);
        Ok(bookings)
    }

    /// Whether `booker` has at least one booking of `item` that has already
    /// ended. Gates after-use comments.
    pub async fn has_finished_booking(&self, booker_id: UserId, item_id: ItemId) -> Result<bool> {
        let now = Utc::now();
        let finished = self.store.finished_for_booker(booker_id, item_id, now).await?;
        Ok(!finished.is_empty())
    }
}
