//! Sale endpoints.

use crate::{
    api::{ApiResult, AppState, DeleteRequest, Session},
    core::{
        profile::require_profile,
        sale::{self, SaleDetails, SaleInput, SaleUpdate},
        stats,
    },
    entities::{profile, sale as sale_entity},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// This month's highest sale with its seller.
#[derive(Debug, Serialize)]
pub struct HighestSale {
    #[serde(flatten)]
    sale: sale_entity::Model,
    user: Option<profile::Model>,
}

/// Month-over-month revenue summary plus the current top sale.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    prev_month: f64,
    curr_month: f64,
    highest: Option<HighestSale>,
    sales: Vec<SaleDetails>,
}

/// Payload for rewriting a sale, keyed by row id.
#[derive(Debug, Deserialize)]
pub struct UpdateSale {
    id: i64,
    #[serde(flatten)]
    fields: SaleUpdate,
}

/// `GET /api/sales`
pub async fn list(
    State(state): State<AppState>,
    _session: Session,
) -> ApiResult<Json<SaleSummary>> {
    let today = Utc::now().date_naive();
    let totals = stats::sale_totals(&state.db, None, today).await?;
    let highest = stats::highest_sale(&state.db, today)
        .await?
        .map(|(sale, user)| HighestSale { sale, user });
    let sales = sale::list_sales(&state.db, today).await?;
    Ok(Json(SaleSummary {
        prev_month: totals.prev_month,
        curr_month: totals.curr_month,
        highest,
        sales,
    }))
}

/// `POST /api/sales`
///
/// Announces the closed sale to the team channel after the transaction
/// commits.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SaleInput>,
) -> ApiResult<(StatusCode, Json<sale_entity::Model>)> {
    let created = sale::create_sale(&state.db, &session.profile_id, payload).await?;
    let seller = require_profile(&state.db, &session.profile_id).await?;
    state.notifier.sale_closed(&seller.name, created.revenue);
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/sales`
pub async fn update(
    State(state): State<AppState>,
    _session: Session,
    Json(payload): Json<UpdateSale>,
) -> ApiResult<Json<sale_entity::Model>> {
    let updated = sale::update_sale(&state.db, payload.id, payload.fields).await?;
    Ok(Json(updated))
}

/// `DELETE /api/sales`
pub async fn delete(
    State(state): State<AppState>,
    _session: Session,
    Json(payload): Json<DeleteRequest>,
) -> ApiResult<StatusCode> {
    sale::delete_sale(&state.db, payload.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
