use crate::api::identity::CallerId;
use crate::api::models::items::{
    CommentCreate, CommentResponse, ItemCreate, ItemDetailResponse, ItemResponse, ItemUpdate, SearchQuery,
};
use crate::errors::{Error, Result};
use crate::store::errors::StoreError;
use crate::store::models::{Comment, ItemPatch, NewComment, NewItem};
use crate::types::ItemId;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = ItemCreate,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Blank name or description"),
        (status = 404, description = "Caller or referenced want-ad missing"),
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    CallerId(owner_id): CallerId,
    Json(body): Json<ItemCreate>,
) -> Result<(StatusCode, Json<ItemResponse>)> {
    state.users.find_by_id(owner_id).await?.ok_or(Error::NotFound {
        resource: "user",
        id: owner_id.to_string(),
    })?;
    if body.name.trim().is_empty() || body.description.trim().is_empty() {
        return Err(Error::Validation {
            message: "Item name and description must not be blank".to_string(),
        });
    }
    if let Some(request_id) = body.request_id {
        state.requests.find_by_id(request_id).await?.ok_or(Error::NotFound {
            resource: "request",
            id: request_id.to_string(),
        })?;
    }

    let item = state
        .items
        .create(NewItem {
            owner_id,
            name: body.name,
            description: body.description,
            available: body.available,
            request_id: body.request_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item id")),
    request_body = ItemUpdate,
    responses(
        (status = 200, description = "Updated item", body = ItemResponse),
        (status = 404, description = "No such item, or caller is not the owner"),
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Path(id): Path<ItemId>,
    Json(body): Json<ItemUpdate>,
) -> Result<Json<ItemResponse>> {
    let item = state.items.find_by_id(id).await?.ok_or(Error::NotFound {
        resource: "item",
        id: id.to_string(),
    })?;
    if item.owner_id != caller_id {
        // Same response as a missing item: a non-owner learns nothing.
        return Err(Error::NotFound {
            resource: "item",
            id: id.to_string(),
        });
    }

    let patch = ItemPatch {
        name: body.name.filter(|name| !name.trim().is_empty()),
        description: body.description.filter(|description| !description.trim().is_empty()),
        available: body.available,
    };
    let updated = state.items.update(id, patch).await.map_err(|err| match err {
        StoreError::NotFound => Error::NotFound {
            resource: "item",
            id: id.to_string(),
        },
        other => Error::Store(other),
    })?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item detail with comments; booking summaries for the owner", body = ItemDetailResponse),
        (status = 404, description = "No such item"),
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Path(id): Path<ItemId>,
) -> Result<Json<ItemDetailResponse>> {
    let item = state.items.find_by_id(id).await?.ok_or(Error::NotFound {
        resource: "item",
        id: id.to_string(),
    })?;

    let comments = state.comments.list_by_item(id).await?;
    let mut comment_responses = Vec::with_capacity(comments.len());
    for comment in comments {
        comment_responses.push(resolve_author(&state, comment).await?);
    }

    let schedule = state.bookings.availability(id, caller_id).await?;

    Ok(Json(ItemDetailResponse {
        item: item.into(),
        comments: comment_responses,
        last_booking: schedule.last,
        next_booking: schedule.next,
    }))
}

/// Attach the author's display name. The author may have deleted their
/// account since; the comment outlives them rather than breaking the view.
async fn resolve_author(state: &AppState, comment: Comment) -> Result<CommentResponse> {
    let author_name = state
        .users
        .find_by_id(comment.author_id)
        .await?
        .map(|user| user.name)
        .unwrap_or_else(|| "unknown".to_string());
    Ok(CommentResponse::new(comment, author_name))
}

#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses((status = 200, description = "The caller's items", body = [ItemResponse]))
)]
pub async fn list_items(State(state): State<AppState>, CallerId(caller_id): CallerId) -> Result<Json<Vec<ItemResponse>>> {
    let items = state.items.list_by_owner(caller_id).await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(SearchQuery),
    responses((status = 200, description = "Available items matching the text", body = [ItemResponse]))
)]
pub async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ItemResponse>>> {
    let text = query.text.unwrap_or_default();
    let items = state.items.search_available(&text).await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/items/{id}/comments",
    tag = "items",
    params(("id" = String, Path, description = "Item id")),
    request_body = CommentCreate,
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Blank text, or the caller never finished a booking of this item"),
        (status = 404, description = "No such item or caller"),
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    CallerId(author_id): CallerId,
    Path(id): Path<ItemId>,
    Json(body): Json<CommentCreate>,
) -> Result<(StatusCode, Json<CommentResponse>)> {
    if body.text.trim().is_empty() {
        return Err(Error::Validation {
            message: "Comment text must not be blank".to_string(),
        });
    }
    let author = state.users.find_by_id(author_id).await?.ok_or(Error::NotFound {
        resource: "user",
        id: author_id.to_string(),
    })?;
    state.items.find_by_id(id).await?.ok_or(Error::NotFound {
        resource: "item",
        id: id.to_string(),
    })?;

    if !state.bookings.has_finished_booking(author_id, id).await? {
        return Err(Error::Validation {
            message: "Comments are allowed only after a finished booking of the item".to_string(),
        });
    }

    let comment = state
        .comments
        .create(NewComment {
            item_id: id,
            author_id,
            text: body.text,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(CommentResponse::new(comment, author.name))))
}
