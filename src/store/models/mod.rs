//! Store record structures and their create/update request types.
//!
//! Each entity gets a plain record (what the store hands back) plus the
//! request types the store accepts for writes. Booking records live with the
//! lifecycle engine in [`crate::bookings::models`] since their shape is owned
//! by the state machine, not the storage layer.

pub mod comments;
pub mod items;
pub mod requests;
pub mod users;

pub use comments::{Comment, NewComment};
pub use items::{Item, ItemPatch, NewItem};
pub use requests::{ItemRequest, NewItemRequest};
pub use users::{NewUser, User, UserPatch};
