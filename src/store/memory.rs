//! Concurrent in-memory store backing all collaborator traits.
//!
//! One `DashMap` per entity, keyed by id, plus a secondary email index that
//! stands in for a unique constraint. Per-booking mutual exclusion for the
//! terminal transition comes from the map's entry guard: `get_mut` holds the
//! shard write lock for the key while the guard re-validates and writes, so
//! the compare-and-set in [`resolve`](MemoryStore::resolve) cannot race.
//!
//! Reads clone records out and never block writers beyond the shard locks;
//! listings may therefore be slightly stale, which is within the consistency
//! contract of the engine.

use crate::bookings::models::{Booking, BookingStatus, NewBooking};
use crate::store::errors::{Result, StoreError};
use crate::store::models::{
    Comment, Item, ItemPatch, ItemRequest, NewComment, NewItem, NewItemRequest, NewUser, User, UserPatch,
};
use crate::store::{BookingStore, CommentStore, ItemStore, RequestStore, UserStore};
use crate::types::{abbrev_uuid, BookingId, CommentId, ItemId, RequestId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashSet;
use tracing::instrument;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    /// email -> user id; the unique "constraint" on users.
    emails: DashMap<String, UserId>,
    items: DashMap<ItemId, Item>,
    bookings: DashMap<BookingId, Booking>,
    comments: DashMap<CommentId, Comment>,
    requests: DashMap<RequestId, ItemRequest>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an email in the index for `id`. Fails if another user holds it.
    fn claim_email(&self, email: &str, id: UserId) -> Result<()> {
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(existing) if *existing.get() != id => Err(StoreError::UniqueViolation {
                field: "email",
                message: format!("email {email} is already registered"),
            }),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    fn release_email(&self, email: &str, id: UserId) {
        self.emails.remove_if(email, |_, owner| *owner == id);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    #[instrument(skip(self, new), fields(email = %new.email), err)]
    async fn create(&self, new: NewUser) -> Result<User> {
        let id = Uuid::new_v4();
        self.claim_email(&new.email, id)?;
        let user = User {
            id,
            name: new.name,
            email: new.email,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    #[instrument(skip(self, patch), fields(user = %abbrev_uuid(&id)), err)]
    async fn update(&self, id: UserId, patch: UserPatch) -> Result<User> {
        let current = self.users.get(&id).map(|u| u.clone()).ok_or(StoreError::NotFound)?;

        let new_email = patch.email.filter(|email| *email != current.email);
        if let Some(email) = &new_email {
            self.claim_email(email, id)?;
        }

        // Entry guards are never held across map boundaries, so the claim
        // above cannot deadlock against a concurrent create.
        let Some(mut entry) = self.users.get_mut(&id) else {
            // Deleted between the read and the write; undo the claim.
            if let Some(email) = &new_email {
                self.release_email(email, id);
            }
            return Err(StoreError::NotFound);
        };
        if let Some(name) = patch.name {
            entry.name = name;
        }
        let old_email = new_email.map(|email| std::mem::replace(&mut entry.email, email));
        let updated = entry.clone();
        drop(entry);
        if let Some(old) = old_email {
            self.release_email(&old, id);
        }
        Ok(updated)
    }

    #[instrument(skip(self), fields(user = %abbrev_uuid(&id)), err)]
    async fn delete(&self, id: UserId) -> Result<()> {
        let (_, user) = self.users.remove(&id).ok_or(StoreError::NotFound)?;
        self.release_email(&user.email, id);
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn list(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    #[instrument(skip(self, new), fields(owner = %abbrev_uuid(&new.owner_id)), err)]
    async fn create(&self, new: NewItem) -> Result<Item> {
        let item = Item {
            id: Uuid::new_v4(),
            owner_id: new.owner_id,
            name: new.name,
            description: new.description,
            available: new.available,
            request_id: new.request_id,
        };
        self.items.insert(item.id, item.clone());
        Ok(item)
    }

    #[instrument(skip(self, patch), fields(item = %abbrev_uuid(&id)), err)]
    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Item> {
        let mut entry = self.items.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = patch.name {
            entry.name = name;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(available) = patch.available {
            entry.available = available;
        }
        Ok(entry.clone())
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>> {
        Ok(self.items.get(&id).map(|i| i.clone()))
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = self
            .items
            .iter()
            .filter(|e| e.value().owner_id == owner)
            .map(|e| e.value().clone())
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn list_by_request(&self, request: RequestId) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = self
            .items
            .iter()
            .filter(|e| e.value().request_id == Some(request))
            .map(|e| e.value().clone())
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn search_available(&self, text: &str) -> Result<Vec<Item>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let needle = text.to_lowercase();
        let mut items: Vec<Item> = self
            .items
            .iter()
            .filter(|e| {
                let item = e.value();
                item.available
                    && (item.name.to_lowercase().contains(&needle)
                        || item.description.to_lowercase().contains(&needle))
            })
            .map(|e| e.value().clone())
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    #[instrument(
        skip(self, new),
        fields(item = %abbrev_uuid(&new.item_id), booker = %abbrev_uuid(&new.booker_id)),
        err
    )]
    async fn create(&self, new: NewBooking) -> Result<Booking> {
        let booking = Booking {
            id: Uuid::new_v4(),
            item_id: new.item_id,
            booker_id: new.booker_id,
            start: new.start,
            end: new.end,
            status: BookingStatus::Waiting,
        };
        self.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.bookings.get(&id).map(|b| b.clone()))
    }

    async fn find_by_booker(&self, booker: UserId) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| e.value().booker_id == booker)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn find_by_items(&self, items: &[ItemId]) -> Result<Vec<Booking>> {
        let wanted: HashSet<ItemId> = items.iter().copied().collect();
        Ok(self
            .bookings
            .iter()
            .filter(|e| wanted.contains(&e.value().item_id))
            .map(|e| e.value().clone())
            .collect())
    }

    async fn find_by_item(&self, item: ItemId) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| e.value().item_id == item)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn finished_for_booker(&self, booker: UserId, item: ItemId, before: DateTime<Utc>) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| {
                let b = e.value();
                b.booker_id == booker && b.item_id == item && b.end < before
            })
            .map(|e| e.value().clone())
            .collect())
    }

    #[instrument(skip(self), fields(booking = %abbrev_uuid(&id)), err)]
    async fn resolve(&self, id: BookingId, to: BookingStatus) -> Result<Booking> {
        debug_assert!(to != BookingStatus::Waiting, "resolve targets are terminal");
        // The entry guard is the per-booking lock: guard check and write are
        // one critical section, so a racing resolve observes the new status.
        let mut entry = self.bookings.get_mut(&id).ok_or(StoreError::NotFound)?;
        if entry.status != BookingStatus::Waiting {
            return Err(StoreError::TransitionConflict { current: entry.status });
        }
        entry.status = to;
        Ok(entry.clone())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    #[instrument(skip(self, new), fields(item = %abbrev_uuid(&new.item_id)), err)]
    async fn create(&self, new: NewComment) -> Result<Comment> {
        let comment = Comment {
            id: Uuid::new_v4(),
            item_id: new.item_id,
            author_id: new.author_id,
            text: new.text,
            created: Utc::now(),
        };
        self.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_by_item(&self, item: ItemId) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|e| e.value().item_id == item)
            .map(|e| e.value().clone())
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    #[instrument(skip(self, new), fields(requester = %abbrev_uuid(&new.requester_id)), err)]
    async fn create(&self, new: NewItemRequest) -> Result<ItemRequest> {
        let request = ItemRequest {
            id: Uuid::new_v4(),
            requester_id: new.requester_id,
            description: new.description,
            created: Utc::now(),
        };
        self.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: RequestId) -> Result<Option<ItemRequest>> {
        Ok(self.requests.get(&id).map(|r| r.clone()))
    }

    async fn list_by_requester(&self, requester: UserId) -> Result<Vec<ItemRequest>> {
        let mut requests: Vec<ItemRequest> = self
            .requests
            .iter()
            .filter(|e| e.value().requester_id == requester)
            .map(|e| e.value().clone())
            .collect();
        requests.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.id.cmp(&a.id)));
        Ok(requests)
    }

    async fn list_excluding(&self, requester: UserId, skip: usize, limit: usize) -> Result<Vec<ItemRequest>> {
        let mut requests: Vec<ItemRequest> = self
            .requests
            .iter()
            .filter(|e| e.value().requester_id != requester)
            .map(|e| e.value().clone())
            .collect();
        requests.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.id.cmp(&a.id)));
        Ok(requests.into_iter().skip(skip).take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test_log::test(tokio::test)]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("ada", "ada@example.com")).await.unwrap();

        let err = UserStore::create(&store, new_user("imposter", "ada@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { field: "email", .. }));
    }

    #[test_log::test(tokio::test)]
    async fn email_is_freed_on_delete_and_change() {
        let store = MemoryStore::new();
        let ada = UserStore::create(&store, new_user("ada", "ada@example.com")).await.unwrap();

        let patch = UserPatch {
            name: None,
            email: Some("countess@example.com".to_string()),
        };
        UserStore::update(&store, ada.id, patch).await.unwrap();

        // The old address is reusable, the new one is not.
        UserStore::create(&store, new_user("other", "ada@example.com")).await.unwrap();
        let err = UserStore::create(&store, new_user("third", "countess@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));

        UserStore::delete(&store, ada.id).await.unwrap();
        UserStore::create(&store, new_user("fourth", "countess@example.com")).await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn updating_user_to_taken_email_conflicts() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("ada", "ada@example.com")).await.unwrap();
        let bob = UserStore::create(&store, new_user("bob", "bob@example.com")).await.unwrap();

        let patch = UserPatch {
            name: None,
            email: Some("ada@example.com".to_string()),
        };
        let err = UserStore::update(&store, bob.id, patch).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));

        let unchanged = UserStore::find_by_id(&store, bob.id).await.unwrap().unwrap();
        assert_eq!(unchanged.email, "bob@example.com");
    }

    fn waiting_booking() -> NewBooking {
        let now = Utc::now();
        NewBooking {
            item_id: Uuid::new_v4(),
            booker_id: Uuid::new_v4(),
            start: now + Duration::days(1),
            end: now + Duration::days(2),
        }
    }

    #[test_log::test(tokio::test)]
    async fn resolve_is_single_shot() {
        let store = MemoryStore::new();
        let draft = waiting_booking();
        let booking = BookingStore::create(&store, draft).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Waiting);

        let approved = store.resolve(booking.id, BookingStatus::Approved).await.unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);

        let err = store.resolve(booking.id, BookingStatus::Rejected).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::TransitionConflict {
                current: BookingStatus::Approved
            }
        ));

        let stored = BookingStore::find_by_id(&store, booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Approved);
    }

    #[test_log::test(tokio::test)]
    async fn racing_resolves_admit_exactly_one_winner() {
        let store = Arc::new(MemoryStore::new());
        let draft = waiting_booking();
        let booking = BookingStore::create(&*store, draft).await.unwrap();

        let mut handles = Vec::new();
        for to in [BookingStatus::Approved, BookingStatus::Rejected] {
            let store = store.clone();
            let id = booking.id;
            handles.push(tokio::spawn(async move { store.resolve(id, to).await }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }

    #[test_log::test(tokio::test)]
    async fn blank_search_matches_nothing() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        ItemStore::create(
            &store,
            NewItem {
                owner_id: owner,
                name: "Torque wrench".to_string(),
                description: "1/2 inch drive".to_string(),
                available: true,
                request_id: None,
            },
        )
        .await
        .unwrap();

        assert!(store.search_available("").await.unwrap().is_empty());
        assert!(store.search_available("   ").await.unwrap().is_empty());
        assert_eq!(store.search_available("WRENCH").await.unwrap().len(), 1);
    }
}
