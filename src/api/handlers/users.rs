use crate::api::models::users::{UserCreate, UserResponse, UserUpdate};
use crate::errors::{Error, Result};
use crate::store::errors::StoreError;
use crate::store::models::{NewUser, UserPatch};
use crate::types::UserId;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::Validation {
            message: "Email must not be blank".to_string(),
        });
    }
    if !email.contains('@') {
        return Err(Error::Validation {
            message: "Email must contain an @".to_string(),
        });
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Blank or malformed email"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    validate_email(&body.email)?;
    if body.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Name must not be blank".to_string(),
        });
    }

    let user = state
        .users
        .create(NewUser {
            name: body.name,
            email: body.email,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses((status = 200, description = "All users", body = [UserResponse]))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "No such user"),
    )
)]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<Json<UserResponse>> {
    let user = state.users.find_by_id(id).await?.ok_or(Error::NotFound {
        resource: "user",
        id: id.to_string(),
    })?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 404, description = "No such user"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(body): Json<UserUpdate>,
) -> Result<Json<UserResponse>> {
    // Blank fields mean "leave as is", not "set to empty".
    let patch = UserPatch {
        name: body.name.filter(|name| !name.trim().is_empty()),
        email: body.email.filter(|email| !email.trim().is_empty()),
    };
    if let Some(email) = &patch.email {
        validate_email(email)?;
    }

    let user = state.users.update(id, patch).await.map_err(|err| match err {
        StoreError::NotFound => Error::NotFound {
            resource: "user",
            id: id.to_string(),
        },
        other => Error::Store(other),
    })?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<StatusCode> {
    state.users.delete(id).await.map_err(|err| match err {
        StoreError::NotFound => Error::NotFound {
            resource: "user",
            id: id.to_string(),
        },
        other => Error::Store(other),
    })?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::models::users::UserResponse;
    use crate::test_utils::server;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test_log::test(tokio::test)]
    async fn user_crud_round_trip() {
        let server = server();

        let created = server
            .post("/users")
            .json(&json!({"name": "Ada", "email": "ada@example.com"}))
            .await;
        created.assert_status(StatusCode::CREATED);
        let user: UserResponse = created.json();

        let fetched = server.get(&format!("/users/{}", user.id)).await;
        fetched.assert_status_ok();
        assert_eq!(fetched.json::<UserResponse>().email, "ada@example.com");

        let updated = server
            .patch(&format!("/users/{}", user.id))
            .json(&json!({"name": "Countess"}))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<UserResponse>().name, "Countess");
        // Untouched field survives the patch.
        assert_eq!(updated.json::<UserResponse>().email, "ada@example.com");

        let deleted = server.delete(&format!("/users/{}", user.id)).await;
        deleted.assert_status(StatusCode::NO_CONTENT);
        server.get(&format!("/users/{}", user.id)).await.assert_status_not_found();
    }

    #[test_log::test(tokio::test)]
    async fn duplicate_email_conflicts() {
        let server = server();

        server
            .post("/users")
            .json(&json!({"name": "Ada", "email": "ada@example.com"}))
            .await
            .assert_status(StatusCode::CREATED);

        let dup = server
            .post("/users")
            .json(&json!({"name": "Imposter", "email": "ada@example.com"}))
            .await;
        dup.assert_status(StatusCode::CONFLICT);
    }

    #[test_log::test(tokio::test)]
    async fn malformed_email_is_rejected() {
        let server = server();

        for email in ["", "   ", "no-at-sign"] {
            let resp = server.post("/users").json(&json!({"name": "Ada", "email": email})).await;
            resp.assert_status(StatusCode::BAD_REQUEST);
        }
    }
}
