use crate::types::{CommentId, ItemId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A borrower's after-use comment on an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub item_id: ItemId,
    pub author_id: UserId,
    pub text: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub item_id: ItemId,
    pub author_id: UserId,
    pub text: String,
}
