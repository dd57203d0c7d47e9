use crate::types::{RequestId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A want-ad: a user describing an item they would like to borrow.
/// Other users can attach items to it at item creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRequest {
    pub id: RequestId,
    pub requester_id: UserId,
    pub description: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewItemRequest {
    pub requester_id: UserId,
    pub description: String,
}
