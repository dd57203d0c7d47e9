use crate::types::{ItemId, RequestId, UserId};
use serde::{Deserialize, Serialize};

/// A shareable catalog item.
///
/// `available == false` blocks new bookings regardless of the requested time
/// window. `request_id` links the item to the want-ad it was listed in answer
/// to, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<RequestId>,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<RequestId>,
}

/// Partial update; `None` fields are left untouched. Ownership and the
/// want-ad link are immutable after creation.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}
