//! API request/response models for items and their comments.

use crate::bookings::BookingSummary;
use crate::store::models::{Comment, Item};
use crate::types::{CommentId, ItemId, RequestId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemCreate {
    pub name: String,
    pub description: String,
    pub available: bool,
    /// Want-ad this item is listed in answer to, if any.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub request_id: Option<RequestId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ItemId,
    #[schema(value_type = String, format = "uuid")]
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub request_id: Option<RequestId>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            owner_id: item.owner_id,
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id,
        }
    }
}

/// Item detail: the item, its comments, and (for the owner only) the
/// last/next approved booking summaries.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemDetailResponse {
    #[serde(flatten)]
    pub item: ItemResponse,
    pub comments: Vec<CommentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_booking: Option<BookingSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_booking: Option<BookingSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentCreate {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CommentId,
    pub text: String,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

impl CommentResponse {
    pub fn new(comment: Comment, author_name: String) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            author_name,
            created: comment.created,
        }
    }
}

/// Query parameters for item search.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Substring to match against name/description (case-insensitive).
    pub text: Option<String>,
}
