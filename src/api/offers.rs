//! Offer endpoints.

use crate::{
    api::{ApiResult, AppState, DeleteRequest, Session},
    core::{offer, stats},
    entities::{offer as offer_entity, profile},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One offer row with its seller attached.
#[derive(Debug, Serialize)]
pub struct OfferRow {
    #[serde(flatten)]
    offer: offer_entity::Model,
    user: Option<profile::Model>,
}

/// Month-over-month offer summary. Totals are sums of batch amounts, not
/// row counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSummary {
    prev_month: i64,
    curr_month: i64,
    offers: Vec<OfferRow>,
}

/// Payload for creating an offer batch.
#[derive(Debug, Deserialize)]
pub struct NewOffer {
    name: String,
    date: NaiveDate,
    time: String,
    amount: i32,
}

/// Payload for rewriting an offer, including its batch amount.
#[derive(Debug, Deserialize)]
pub struct UpdateOffer {
    id: i64,
    name: String,
    date: NaiveDate,
    time: String,
    amount: i32,
}

/// `GET /api/offers`
pub async fn list(
    State(state): State<AppState>,
    _session: Session,
) -> ApiResult<Json<OfferSummary>> {
    let today = Utc::now().date_naive();
    let totals = stats::offer_totals(&state.db, None, today).await?;
    let offers = offer::list_offers(&state.db, today)
        .await?
        .into_iter()
        .map(|(offer, user)| OfferRow { offer, user })
        .collect();
    Ok(Json(OfferSummary {
        prev_month: totals.prev_month,
        curr_month: totals.curr_month,
        offers,
    }))
}

/// `POST /api/offers`
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<NewOffer>,
) -> ApiResult<(StatusCode, Json<offer_entity::Model>)> {
    let created = offer::create_offer(
        &state.db,
        &session.profile_id,
        payload.name,
        payload.date,
        payload.time,
        payload.amount,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/offers`
pub async fn update(
    State(state): State<AppState>,
    _session: Session,
    Json(payload): Json<UpdateOffer>,
) -> ApiResult<Json<offer_entity::Model>> {
    let updated = offer::update_offer(
        &state.db,
        payload.id,
        payload.name,
        payload.date,
        payload.time,
        payload.amount,
    )
    .await?;
    Ok(Json(updated))
}

/// `DELETE /api/offers`
pub async fn delete(
    State(state): State<AppState>,
    _session: Session,
    Json(payload): Json<DeleteRequest>,
) -> ApiResult<StatusCode> {
    offer::delete_offer(&state.db, payload.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
