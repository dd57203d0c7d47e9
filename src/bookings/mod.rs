//! The booking subsystem: lifecycle state machine, temporal classifier, and
//! item availability projector.
//!
//! This is the part of the service with real invariants. Everything else is
//! CRUD plumbing around it. The subsystem talks to the rest of the world only
//! through the collaborator traits in [`crate::store`]; identity and catalog
//! facts are fetched explicitly, one lookup at a time.
//!
//! - [`lifecycle`]: create / approve / get with ownership and availability
//!   guards ([`Bookings::create`], [`Bookings::approve`], [`Bookings::get`])
//! - [`classify`]: partitioned listings at a fixed `now`
//!   ([`Bookings::list`])
//! - [`availability`]: owner-only last/next approved booking summaries
//!   ([`Bookings::availability`])

pub mod availability;
pub mod classify;
pub mod lifecycle;
pub mod models;

pub use availability::ItemAvailability;
pub use models::{Booking, BookingRole, BookingStatus, BookingSummary, Partition};

use crate::store::{BookingStore, ItemStore, UserStore};
use std::sync::Arc;

/// The booking engine. Cheap to clone; handlers keep one in application state.
#[derive(Clone)]
pub struct Bookings {
    users: Arc<dyn UserStore>,
    items: Arc<dyn ItemStore>,
    store: Arc<dyn BookingStore>,
}

impl Bookings {
    pub fn new(users: Arc<dyn UserStore>, items: Arc<dyn ItemStore>, store: Arc<dyn BookingStore>) -> Self {
        Self { users, items, store }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Bookings;
    use crate::store::memory::MemoryStore;
    use crate::store::models::{NewItem, NewUser};
    use crate::store::{ItemStore, UserStore};
    use crate::types::UserId;
    use std::sync::Arc;

    pub fn engine() -> (Arc<MemoryStore>, Bookings) {
        let store = Arc::new(MemoryStore::new());
        let engine = Bookings::new(store.clone(), store.clone(), store.clone());
        (store, engine)
    }

    pub async fn seed_user(store: &MemoryStore, name: &str) -> crate::store::models::User {
        UserStore::create(
            store,
            NewUser {
                name: name.to_string(),
                email: format!("{name}@example.com"),
            },
        )
        .await
        .unwrap()
    }

    pub async fn seed_item(store: &MemoryStore, owner: UserId, available: bool) -> crate::store::models::Item {
        ItemStore::create(
            store,
            NewItem {
                owner_id: owner,
                name: "Pressure washer".to_string(),
                description: "2000 PSI, electric".to_string(),
                available,
                request_id: None,
            },
        )
        .await
        .unwrap()
    }
}
