//! OpenAPI documentation for the registry API.

use crate::api::handlers;
use crate::api::models::{bookings, items, requests, users};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "lendhub",
        description = "Peer-to-peer item-sharing registry: list items, book them, \
                       approve or reject bookings, comment after use."
    ),
    paths(
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::items::create_item,
        handlers::items::update_item,
        handlers::items::get_item,
        handlers::items::list_items,
        handlers::items::search_items,
        handlers::items::add_comment,
        handlers::bookings::create_booking,
        handlers::bookings::approve_booking,
        handlers::bookings::get_booking,
        handlers::bookings::list_bookings,
        handlers::bookings::list_owner_bookings,
        handlers::requests::create_request,
        handlers::requests::list_own_requests,
        handlers::requests::list_other_requests,
        handlers::requests::get_request,
    ),
    components(schemas(
        users::UserCreate,
        users::UserUpdate,
        users::UserResponse,
        items::ItemCreate,
        items::ItemUpdate,
        items::ItemResponse,
        items::ItemDetailResponse,
        items::CommentCreate,
        items::CommentResponse,
        bookings::BookingCreate,
        bookings::BookingResponse,
        requests::ItemRequestCreate,
        requests::ItemRequestResponse,
        crate::bookings::BookingStatus,
        crate::bookings::BookingSummary,
    )),
    tags(
        (name = "users", description = "Account management"),
        (name = "items", description = "Catalog, search and comments"),
        (name = "bookings", description = "Booking lifecycle and listings"),
        (name = "requests", description = "Want-ads"),
    )
)]
pub struct ApiDoc;
