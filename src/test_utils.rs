//! Shared helpers for in-source tests: a fresh application over a fresh
//! store, and seed shortcuts for the entities most tests need.

use crate::api::identity::USER_ID_HEADER;
use crate::config::Config;
use crate::store::memory::MemoryStore;
use crate::store::models::{NewUser, User};
use crate::{build_router, AppState};
use std::sync::Arc;

pub fn test_state() -> AppState {
    AppState::new(Config::default(), Arc::new(MemoryStore::new()))
}

/// A test server plus the state behind it, for tests that want to set up
/// fixtures through the stores and then drive the HTTP surface.
pub fn server_with_state() -> (AppState, axum_test::TestServer) {
    let state = test_state();
    let server = axum_test::TestServer::new(build_router(state.clone())).expect("test server");
    (state, server)
}

pub fn server() -> axum_test::TestServer {
    server_with_state().1
}

/// The identity header name, for use with `TestRequest::add_header`.
pub fn user_header() -> &'static str {
    USER_ID_HEADER
}

pub async fn seed_user(state: &AppState, name: &str) -> User {
    state
        .users
        .create(NewUser {
            name: name.to_string(),
            email: format!("{name}@example.com"),
        })
        .await
        .expect("seed user")
}
