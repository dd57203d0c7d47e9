//! API request/response models for want-ads (item requests).

use super::items::ItemResponse;
use crate::store::models::ItemRequest;
use crate::types::{RequestId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemRequestCreate {
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemRequestResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: RequestId,
    #[schema(value_type = String, format = "uuid")]
    pub requester_id: UserId,
    pub description: String,
    pub created: DateTime<Utc>,
    /// Items listed in answer to this want-ad.
    pub items: Vec<ItemResponse>,
}

impl ItemRequestResponse {
    pub fn new(request: ItemRequest, items: Vec<ItemResponse>) -> Self {
        Self {
            id: request.id,
            requester_id: request.requester_id,
            description: request.description,
            created: request.created,
            items,
        }
    }
}
