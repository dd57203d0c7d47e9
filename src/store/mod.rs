//! Storage layer: collaborator traits and the in-memory implementation.
//!
//! The engine and the API handlers never touch a concrete store type; every
//! cross-entity fact is obtained through one of the traits below. This keeps
//! the core free of object-graph traversal: resolving "the owner of the item
//! of a booking" is always two explicit lookups, never a lazy association
//! walk. It also leaves a seam where a database-backed store could be
//! swapped in.
//!
//! The shipped implementation is [`memory::MemoryStore`], a concurrent-map
//! store providing exactly the persistence the rest of the service assumes:
//! key-indexed lookup and basic filtered range queries.
//!
//! # Ordering contract
//!
//! Booking queries return in unspecified order; the temporal classifier owns
//! the single latest-first sort applied to listings. Comment and want-ad
//! queries return in the documented per-method order, since no further
//! derivation happens on those.

pub mod errors;
pub mod memory;
pub mod models;

use crate::bookings::models::{Booking, BookingStatus, NewBooking};
use crate::types::{BookingId, ItemId, RequestId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use errors::Result;
use models::{Comment, Item, ItemPatch, ItemRequest, NewComment, NewItem, NewItemRequest, NewUser, User, UserPatch};

/// Identity collaborator: account records, with email uniqueness enforced
/// at the storage boundary.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new: NewUser) -> Result<User>;
    /// Applies the non-`None` fields. Fails `UniqueViolation` if the patch
    /// claims an email already registered to another user.
    async fn update(&self, id: UserId, patch: UserPatch) -> Result<User>;
    async fn delete(&self, id: UserId) -> Result<()>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;
    async fn list(&self) -> Result<Vec<User>>;
}

/// Catalog collaborator: item records.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn create(&self, new: NewItem) -> Result<Item>;
    /// Mechanical patch; ownership checks belong to the caller.
    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Item>;
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>>;
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Item>>;
    async fn list_by_request(&self, request: RequestId) -> Result<Vec<Item>>;
    /// Case-insensitive substring match on name/description, available items
    /// only. A blank query matches nothing.
    async fn search_available(&self, text: &str) -> Result<Vec<Item>>;
}

/// Booking persistence. Writes happen in exactly two places: creation (which
/// assigns the id and the initial `Waiting` status) and [`resolve`], the
/// single terminal transition.
///
/// [`resolve`]: BookingStore::resolve
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(&self, new: NewBooking) -> Result<Booking>;
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>>;
    async fn find_by_booker(&self, booker: UserId) -> Result<Vec<Booking>>;
    async fn find_by_items(&self, items: &[ItemId]) -> Result<Vec<Booking>>;
    async fn find_by_item(&self, item: ItemId) -> Result<Vec<Booking>>;
    /// Bookings by `booker` on `item` that ended strictly before `before`.
    async fn finished_for_booker(&self, booker: UserId, item: ItemId, before: DateTime<Utc>) -> Result<Vec<Booking>>;
    /// Atomic compare-and-set: moves the booking out of `Waiting` into `to`.
    /// The guard is re-validated under the per-booking entry lock, so two
    /// racing calls cannot both succeed; the loser gets
    /// [`TransitionConflict`](errors::StoreError::TransitionConflict) with the
    /// status it observed. `to` must be a terminal status.
    async fn resolve(&self, id: BookingId, to: BookingStatus) -> Result<Booking>;
}

/// After-use comments on items.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn create(&self, new: NewComment) -> Result<Comment>;
    /// Oldest first.
    async fn list_by_item(&self, item: ItemId) -> Result<Vec<Comment>>;
}

/// Want-ads (item requests).
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn create(&self, new: NewItemRequest) -> Result<ItemRequest>;
    async fn find_by_id(&self, id: RequestId) -> Result<Option<ItemRequest>>;
    /// The requester's own want-ads, newest first.
    async fn list_by_requester(&self, requester: UserId) -> Result<Vec<ItemRequest>>;
    /// Everyone else's want-ads, newest first, offset/limit paginated.
    async fn list_excluding(&self, requester: UserId, skip: usize, limit: usize) -> Result<Vec<ItemRequest>>;
}
