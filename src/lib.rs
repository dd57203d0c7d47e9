//! # lendhub: a peer-to-peer item-sharing registry
//!
//! Users list items, other users request to borrow them for a time window,
//! owners approve or reject those requests, and borrowers may leave comments
//! after use. The interesting part of the system is the booking subsystem
//! ([`bookings`]): a three-state lifecycle machine (`WAITING` ->
//! `APPROVED`/`REJECTED`, terminal states sticky, decisions owner-only and
//! race-safe), a temporal classifier that partitions listings against a
//! single captured `now`, and an owner-only projection of each item's
//! last/next approved booking. Everything around it is deliberately plain
//! CRUD.
//!
//! ## Architecture
//!
//! The HTTP layer is [Axum](https://github.com/tokio-rs/axum); handlers live
//! in [`api::handlers`] with their request/response models in
//! [`api::models`]. Callers are identified by the trusted `X-User-Id` header
//! ([`api::identity`]), forwarded by whatever gateway fronts the service.
//!
//! Persistence sits behind the collaborator traits in [`store`] (users,
//! items, bookings, comments, want-ads). The booking engine only ever sees
//! those traits, and resolves every cross-entity fact with an explicit
//! lookup. The shipped implementation is
//! [`store::memory::MemoryStore`], a concurrent-map store whose per-key
//! entry locks double as the per-booking mutual exclusion the lifecycle
//! machine needs.
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use lendhub::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = lendhub::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     lendhub::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config);
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```
//!
//! API documentation is served at `/docs` while the server is running.

pub mod api;
pub mod bookings;
pub mod config;
pub mod errors;
pub mod openapi;
pub mod store;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use config::{Args, Config};

use crate::bookings::Bookings;
use crate::openapi::ApiDoc;
use crate::store::memory::MemoryStore;
use crate::store::{BookingStore, CommentStore, ItemStore, RequestStore, UserStore};
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Shared application state: the collaborator stores and the booking engine.
///
/// The five store handles are views onto one [`MemoryStore`], but nothing
/// downstream knows that; handlers and the engine work against the traits.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserStore>,
    pub items: Arc<dyn ItemStore>,
    pub comments: Arc<dyn CommentStore>,
    pub requests: Arc<dyn RequestStore>,
    pub bookings: Bookings,
}

impl AppState {
    pub fn new(config: Config, store: Arc<MemoryStore>) -> Self {
        let users: Arc<dyn UserStore> = store.clone();
        let items: Arc<dyn ItemStore> = store.clone();
        let comments: Arc<dyn CommentStore> = store.clone();
        let requests: Arc<dyn RequestStore> = store.clone();
        let booking_store: Arc<dyn BookingStore> = store;
        let bookings = Bookings::new(users.clone(), items.clone(), booking_store);

        Self {
            config,
            users,
            items,
            comments,
            requests,
            bookings,
        }
    }
}

/// Assemble the full router: API routes, health check, and rendered OpenAPI
/// docs, wrapped in CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/users", get(api::handlers::users::list_users))
        .route("/users", post(api::handlers::users::create_user))
        .route("/users/{id}", get(api::handlers::users::get_user))
        .route("/users/{id}", patch(api::handlers::users::update_user))
        .route("/users/{id}", delete(api::handlers::users::delete_user))
        .route("/items", get(api::handlers::items::list_items))
        .route("/items", post(api::handlers::items::create_item))
        .route("/items/search", get(api::handlers::items::search_items))
        .route("/items/{id}", get(api::handlers::items::get_item))
        .route("/items/{id}", patch(api::handlers::items::update_item))
        .route("/items/{id}/comments", post(api::handlers::items::add_comment))
        .route("/bookings", get(api::handlers::bookings::list_bookings))
        .route("/bookings", post(api::handlers::bookings::create_booking))
        .route("/bookings/owner", get(api::handlers::bookings::list_owner_bookings))
        .route("/bookings/{id}", get(api::handlers::bookings::get_booking))
        .route("/bookings/{id}", patch(api::handlers::bookings::approve_booking))
        .route("/requests", get(api::handlers::requests::list_own_requests))
        .route("/requests", post(api::handlers::requests::create_request))
        .route("/requests/all", get(api::handlers::requests::list_other_requests))
        .route("/requests/{id}", get(api::handlers::requests::get_request))
        .with_state(state);

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// The assembled application, ready to serve.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with a fresh in-memory store.
    pub fn new(config: Config) -> Self {
        let state = AppState::new(config.clone(), Arc::new(MemoryStore::new()));
        let router = build_router(state);
        Self { router, config }
    }

    /// Run the HTTP server until the `shutdown` future resolves.
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Registry listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
