use crate::api::identity::CallerId;
use crate::api::models::items::ItemResponse;
use crate::api::models::pagination::Pagination;
use crate::api::models::requests::{ItemRequestCreate, ItemRequestResponse};
use crate::errors::{Error, Result};
use crate::store::models::{ItemRequest, NewItemRequest};
use crate::types::{RequestId, UserId};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

async fn ensure_user(state: &AppState, id: UserId) -> Result<()> {
    state.users.find_by_id(id).await?.ok_or(Error::NotFound {
        resource: "user",
        id: id.to_string(),
    })?;
    Ok(())
}

/// Shape a want-ad with the items listed in answer to it.
async fn with_items(state: &AppState, request: ItemRequest) -> Result<ItemRequestResponse> {
    let items = state
        .items
        .list_by_request(request.id)
        .await?
        .into_iter()
        .map(ItemResponse::from)
        .collect();
    Ok(ItemRequestResponse::new(request, items))
}

#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = ItemRequestCreate,
    responses(
        (status = 201, description = "Want-ad created", body = ItemRequestResponse),
        (status = 400, description = "Blank description"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    CallerId(requester_id): CallerId,
    Json(body): Json<ItemRequestCreate>,
) -> Result<(StatusCode, Json<ItemRequestResponse>)> {
    ensure_user(&state, requester_id).await?;
    if body.description.trim().is_empty() {
        return Err(Error::Validation {
            message: "Request description must not be blank".to_string(),
        });
    }

    let request = state
        .requests
        .create(NewItemRequest {
            requester_id,
            description: body.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ItemRequestResponse::new(request, Vec::new()))))
}

#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    responses(
        (status = 200, description = "The caller's want-ads, newest first", body = [ItemRequestResponse]),
        (status = 404, description = "No such user"),
    )
)]
pub async fn list_own_requests(
    State(state): State<AppState>,
    CallerId(requester_id): CallerId,
) -> Result<Json<Vec<ItemRequestResponse>>> {
    ensure_user(&state, requester_id).await?;

    let requests = state.requests.list_by_requester(requester_id).await?;
    let mut responses = Vec::with_capacity(requests.len());
    for request in requests {
        responses.push(with_items(&state, request).await?);
    }
    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    params(Pagination),
    responses(
        (status = 200, description = "Other users' want-ads, newest first", body = [ItemRequestResponse]),
        (status = 404, description = "No such user"),
    )
)]
pub async fn list_other_requests(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<ItemRequestResponse>>> {
    ensure_user(&state, caller_id).await?;

    let requests = state
        .requests
        .list_excluding(caller_id, pagination.skip(), pagination.limit())
        .await?;
    let mut responses = Vec::with_capacity(requests.len());
    for request in requests {
        responses.push(with_items(&state, request).await?);
    }
    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = String, Path, description = "Want-ad id")),
    responses(
        (status = 200, description = "The want-ad with its items", body = ItemRequestResponse),
        (status = 404, description = "No such want-ad or user"),
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Path(id): Path<RequestId>,
) -> Result<Json<ItemRequestResponse>> {
    ensure_user(&state, caller_id).await?;

    let request = state.requests.find_by_id(id).await?.ok_or(Error::NotFound {
        resource: "request",
        id: id.to_string(),
    })?;
    Ok(Json(with_items(&state, request).await?))
}

#[cfg(test)]
mod tests {
    use crate::api::models::requests::ItemRequestResponse;
    use crate::test_utils::{seed_user, server_with_state, user_header};
    use axum::http::StatusCode;
    use serde_json::json;

    #[test_log::test(tokio::test)]
    async fn own_and_other_listings_are_disjoint() {
        let (state, server) = server_with_state();
        let asker = seed_user(&state, "asker").await;
        let other = seed_user(&state, "other").await;

        for (user, text) in [(&asker, "need a ladder"), (&other, "need a drill"), (&other, "need a canoe")] {
            server
                .post("/requests")
                .add_header(user_header(), user.id.to_string())
                .json(&json!({"description": text}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let own: Vec<ItemRequestResponse> = server
            .get("/requests")
            .add_header(user_header(), asker.id.to_string())
            .await
            .json();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].description, "need a ladder");

        let others: Vec<ItemRequestResponse> = server
            .get("/requests/all")
            .add_header(user_header(), asker.id.to_string())
            .await
            .json();
        assert_eq!(others.len(), 2);
        assert!(others.iter().all(|r| r.requester_id == other.id));
        // Newest first.
        assert!(others[0].created >= others[1].created);

        let paged: Vec<ItemRequestResponse> = server
            .get("/requests/all?skip=1&limit=1")
            .add_header(user_header(), asker.id.to_string())
            .await
            .json();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].id, others[1].id);
    }

    #[test_log::test(tokio::test)]
    async fn detail_includes_answering_items() {
        let (state, server) = server_with_state();
        let asker = seed_user(&state, "asker").await;
        let lister = seed_user(&state, "lister").await;

        let request: ItemRequestResponse = server
            .post("/requests")
            .add_header(user_header(), asker.id.to_string())
            .json(&json!({"description": "need a projector"}))
            .await
            .json();

        server
            .post("/items")
            .add_header(user_header(), lister.id.to_string())
            .json(&json!({
                "name": "Projector",
                "description": "1080p",
                "available": true,
                "request_id": request.id,
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let detail: ItemRequestResponse = server
            .get(&format!("/requests/{}", request.id))
            .add_header(user_header(), asker.id.to_string())
            .await
            .json();
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].name, "Projector");
    }

    #[test_log::test(tokio::test)]
    async fn unknown_caller_cannot_use_want_ads() {
        let (_state, server) = server_with_state();
        let ghost = uuid::Uuid::new_v4();

        let resp = server
            .post("/requests")
            .add_header(user_header(), ghost.to_string())
            .json(&json!({"description": "need anything"}))
            .await;
        resp.assert_status_not_found();

        let resp = server.get("/requests").add_header(user_header(), ghost.to_string()).await;
        resp.assert_status_not_found();
    }
}
