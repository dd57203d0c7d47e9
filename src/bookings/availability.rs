//! Owner-only projection of an item's booking schedule.
//!
//! `last` is the approved booking that most recently began (`start < now`,
//! including one still in progress), `next` the nearest approved booking yet
//! to begin (`start > now`). Non-approved bookings never surface here, and a
//! viewer who is not the item's owner sees nothing at all.

use super::models::{Booking, BookingStatus, BookingSummary};
use super::Bookings;
use crate::errors::{Error, Result};
use crate::types::{abbrev_uuid, ItemId, UserId};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

/// The owner-facing schedule summary embedded in item detail. Either side
/// may be absent.
#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
pub struct ItemAvailability {
    pub last: Option<BookingSummary>,
    pub next: Option<BookingSummary>,
}

impl Bookings {
    /// Project the last/next approved bookings of an item for a viewer.
    ///
    /// Fails `NotFound` if the item is missing. For any viewer other than
    /// the owner the projection is empty rather than an error: the item
    /// detail view is public, the schedule is not.
    #[instrument(skip(self), fields(item = %abbrev_uuid(&item_id), viewer = %abbrev_uuid(&viewer_id)), err)]
    pub async fn availability(&self, item_id: ItemId, viewer_id: UserId) -> Result<ItemAvailability> {
        let item = self.items.find_by_id(item_id).await?.ok_or(Error::NotFound {
            resource: "item",
            id: item_id.to_string(),
        })?;
        if item.owner_id != viewer_id {
            return Ok(ItemAvailability::default());
        }

        let now = Utc::now();
        let bookings = self.store.find_by_item(item_id).await?;
        let approved = |b: &&Booking| b.status == BookingStatus::Approved;

        // Extremal picks with the id as tiebreaker keep equal-start results
        // reproducible run-to-run.
        let last = bookings
            .iter()
            .filter(approved)
            .filter(|b| b.start < now)
            .max_by_key(|b| (b.start, b.id));
        let next = bookings
            .iter()
            .filter(approved)
            .filter(|b| b.start > now)
            .min_by_key(|b| (b.start, b.id));

        Ok(ItemAvailability {
            last: last.map(BookingSummary::from),
            next: next.map(BookingSummary::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{engine, seed_item, seed_user};
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    async fn approved_booking(
        bookings: &Bookings,
        owner: UserId,
        booker: UserId,
        item: ItemId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Booking {
        let booking = bookings.create(booker, item, start, end).await.unwrap();
        bookings.approve(owner, booking.id, true).await.unwrap()
    }

    #[test_log::test(tokio::test)]
    async fn non_owner_sees_no_schedule() {
        let (store, bookings) = engine();
        let owner = seed_user(&store, "owner").await;
        let booker = seed_user(&store, "booker").await;
        let item = seed_item(&store, owner.id, true).await;

        approved_booking(
            &bookings,
            owner.id,
            booker.id,
            item.id,
            Utc::now() - Duration::days(2),
            Utc::now() - Duration::days(1),
        )
        .await;

        let view = bookings.availability(item.id, booker.id).await.unwrap();
        assert!(view.last.is_none());
        assert!(view.next.is_none());
    }

    #[test_log::test(tokio::test)]
    async fn owner_sees_most_recent_past_and_nearest_future() {
        let (store, bookings) = engine();
        let owner = seed_user(&store, "owner").await;
        let booker = seed_user(&store, "booker").await;
        let item = seed_item(&store, owner.id, true).await;

        let now = Utc::now();
        // Two in the past, two in the future; the inner pair should win.
        approved_booking(&bookings, owner.id, booker.id, item.id, now - Duration::days(10), now - Duration::days(9)).await;
        let recent_past =
            approved_booking(&bookings, owner.id, booker.id, item.id, now - Duration::days(2), now - Duration::days(1)).await;
        let near_future =
            approved_booking(&bookings, owner.id, booker.id, item.id, now + Duration::days(1), now + Duration::days(2)).await;
        approved_booking(&bookings, owner.id, booker.id, item.id, now + Duration::days(9), now + Duration::days(10)).await;

        let view = bookings.availability(item.id, owner.id).await.unwrap();
        assert_eq!(view.last.unwrap().id, recent_past.id);
        assert_eq!(view.next.unwrap().id, near_future.id);
        assert_eq!(view.last.unwrap().booker_id, booker.id);
    }

    #[test_log::test(tokio::test)]
    async fn in_progress_booking_counts_as_last() {
        let (store, bookings) = engine();
        let owner = seed_user(&store, "owner").await;
        let booker = seed_user(&store, "booker").await;
        let item = seed_item(&store, owner.id, true).await;

        let current = approved_booking(
            &bookings,
            owner.id,
            booker.id,
            item.id,
            Utc::now() - Duration::hours(1),
            Utc::now() + Duration::hours(1),
        )
        .await;

        let view = bookings.availability(item.id, owner.id).await.unwrap();
        assert_eq!(view.last.unwrap().id, current.id);
        assert!(view.next.is_none());
    }

    #[test_log::test(tokio::test)]
    async fn undecided_and_rejected_bookings_never_surface() {
        let (store, bookings) = engine();
        let owner = seed_user(&store, "owner").await;
        let booker = seed_user(&store, "booker").await;
        let item = seed_item(&store, owner.id, true).await;

        let now = Utc::now();
        // One waiting in the past, one rejected in the future.
        bookings
            .create(booker.id, item.id, now - Duration::days(2), now - Duration::days(1))
            .await
            .unwrap();
        let rejected = bookings
            .create(booker.id, item.id, now + Duration::days(1), now + Duration::days(2))
            .await
            .unwrap();
        bookings.approve(owner.id, rejected.id, false).await.unwrap();

        let view = bookings.availability(item.id, owner.id).await.unwrap();
        assert!(view.last.is_none());
        assert!(view.next.is_none());
    }

    #[test_log::test(tokio::test)]
    async fn equal_starts_break_ties_by_id() {
        let (store, bookings) = engine();
        let owner = seed_user(&store, "owner").await;
        let first_booker = seed_user(&store, "first").await;
        let second_booker = seed_user(&store, "second").await;
        let item = seed_item(&store, owner.id, true).await;

        let start = Utc::now() + Duration::days(1);
        let end = start + Duration::days(1);
        let a = approved_booking(&bookings, owner.id, first_booker.id, item.id, start, end).await;
        let b = approved_booking(&bookings, owner.id, second_booker.id, item.id, start, end).await;
        let expected = if a.id < b.id { a.id } else { b.id };

        // Repeated projections pick the same winner.
        for _ in 0..3 {
            let view = bookings.availability(item.id, owner.id).await.unwrap();
            assert_eq!(view.next.unwrap().id, expected);
        }
    }

    #[test_log::test(tokio::test)]
    async fn missing_item_is_not_found() {
        let (store, bookings) = engine();
        let viewer = seed_user(&store, "viewer").await;

        let err = bookings.availability(Uuid::new_v4(), viewer.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { resource: "item", .. }));
    }
}
