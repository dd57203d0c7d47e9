use crate::api::identity::CallerId;
use crate::api::models::bookings::{ApproveQuery, BookingCreate, BookingResponse, ListBookingsQuery};
use crate::bookings::models::UnknownPartition;
use crate::bookings::{BookingRole, Partition};
use crate::errors::{Error, Result};
use crate::types::BookingId;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// Missing token means ALL; anything unrecognized is a client error, for
/// borrower and owner listings alike.
fn parse_partition(state: Option<String>) -> Result<Partition> {
    match state {
        None => Ok(Partition::All),
        Some(token) => token
            .parse()
            .map_err(|err: UnknownPartition| Error::Validation { message: err.to_string() }),
    }
}

#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = BookingCreate,
    responses(
        (status = 201, description = "Booking created in WAITING state", body = BookingResponse),
        (status = 400, description = "Item unavailable or empty/inverted time window"),
        (status = 404, description = "Booker or item missing (or the caller owns the item)"),
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    CallerId(booker_id): CallerId,
    Json(body): Json<BookingCreate>,
) -> Result<(StatusCode, Json<BookingResponse>)> {
    let booking = state.bookings.create(booker_id, body.item_id, body.start, body.end).await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(("id" = String, Path, description = "Booking id"), ApproveQuery),
    responses(
        (status = 200, description = "Booking decided", body = BookingResponse),
        (status = 403, description = "Caller does not own the booked item"),
        (status = 404, description = "No such booking"),
        (status = 409, description = "Booking already decided"),
    )
)]
pub async fn approve_booking(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Path(id): Path<BookingId>,
    Query(query): Query<ApproveQuery>,
) -> Result<Json<BookingResponse>> {
    let booking = state.bookings.approve(caller_id, id, query.approved).await?;
    Ok(Json(booking.into()))
}

#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "The booking", body = BookingResponse),
        (status = 404, description = "No such booking, or the caller is neither party"),
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Path(id): Path<BookingId>,
) -> Result<Json<BookingResponse>> {
    let booking = state.bookings.get(caller_id, id).await?;
    Ok(Json(booking.into()))
}

#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(ListBookingsQuery),
    responses(
        (status = 200, description = "The caller's bookings as borrower, latest start first", body = [BookingResponse]),
        (status = 400, description = "Unknown state token"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>> {
    let partition = parse_partition(query.state)?;
    let bookings = state.bookings.list(caller_id, BookingRole::Booker, partition).await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(ListBookingsQuery),
    responses(
        (status = 200, description = "Bookings on the caller's items, latest start first", body = [BookingResponse]),
        (status = 400, description = "Unknown state token"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    CallerId(caller_id): CallerId,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>> {
    let partition = parse_partition(query.state)?;
    let bookings = state.bookings.list(caller_id, BookingRole::Owner, partition).await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}
