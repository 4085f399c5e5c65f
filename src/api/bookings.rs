//! Booking endpoints.

use crate::{
    api::{ApiResult, AppState, DeleteRequest, Session},
    core::{booking, stats},
    entities::{booking as booking_entity, profile},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One booking row with its seller attached.
#[derive(Debug, Serialize)]
pub struct BookingRow {
    #[serde(flatten)]
    booking: booking_entity::Model,
    user: Option<profile::Model>,
}

/// Month-over-month booking summary for the dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    prev_month: u64,
    curr_month: u64,
    bookings: Vec<BookingRow>,
}

/// Payload for creating a booking.
#[derive(Debug, Deserialize)]
pub struct NewBooking {
    name: String,
    date: NaiveDate,
    time: String,
}

/// Payload for rewriting a booking's display fields.
#[derive(Debug, Deserialize)]
pub struct UpdateBooking {
    id: i64,
    name: String,
    date: NaiveDate,
    time: String,
}

/// `GET /api/bookings`
pub async fn list(
    State(state): State<AppState>,
    _session: Session,
) -> ApiResult<Json<BookingSummary>> {
    let today = Utc::now().date_naive();
    let totals = stats::booking_totals(&state.db, None, today).await?;
    let bookings = booking::list_bookings(&state.db, today)
        .await?
        .into_iter()
        .map(|(booking, user)| BookingRow { booking, user })
        .collect();
    Ok(Json(BookingSummary {
        prev_month: totals.prev_month,
        curr_month: totals.curr_month,
        bookings,
    }))
}

/// `POST /api/bookings`
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<NewBooking>,
) -> ApiResult<(StatusCode, Json<booking_entity::Model>)> {
    let created = booking::create_booking(
        &state.db,
        &session.profile_id,
        payload.name,
        payload.date,
        payload.time,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/bookings`
pub async fn update(
    State(state): State<AppState>,
    _session: Session,
    Json(payload): Json<UpdateBooking>,
) -> ApiResult<Json<booking_entity::Model>> {
    let updated = booking::update_booking(
        &state.db,
        payload.id,
        payload.name,
        payload.date,
        payload.time,
    )
    .await?;
    Ok(Json(updated))
}

/// `DELETE /api/bookings`
pub async fn delete(
    State(state): State<AppState>,
    _session: Session,
    Json(payload): Json<DeleteRequest>,
) -> ApiResult<StatusCode> {
    booking::delete_booking(&state.db, payload.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
