//! Meeting endpoints.

use crate::{
    api::{ApiResult, AppState, DeleteRequest, Session},
    core::{meeting, stats},
    entities::{meeting as meeting_entity, profile},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One meeting row with its seller attached.
#[derive(Debug, Serialize)]
pub struct MeetingRow {
    #[serde(flatten)]
    meeting: meeting_entity::Model,
    user: Option<profile::Model>,
}

/// Month-over-month meeting summary for the dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingSummary {
    prev_month: u64,
    curr_month: u64,
    meetings: Vec<MeetingRow>,
}

/// Payload for creating a meeting.
#[derive(Debug, Deserialize)]
pub struct NewMeeting {
    name: String,
    date: NaiveDate,
    time: String,
}

/// Payload for rewriting a meeting's display fields.
#[derive(Debug, Deserialize)]
pub struct UpdateMeeting {
    id: i64,
    name: String,
    date: NaiveDate,
    time: String,
}

/// `GET /api/meetings`
pub async fn list(
    State(state): State<AppState>,
    _session: Session,
) -> ApiResult<Json<MeetingSummary>> {
    let today = Utc::now().date_naive();
    let totals = stats::meeting_totals(&state.db, None, today).await?;
    let meetings = meeting::list_meetings(&state.db, today)
        .await?
        .into_iter()
        .map(|(meeting, user)| MeetingRow { meeting, user })
        .collect();
    Ok(Json(MeetingSummary {
        prev_month: totals.prev_month,
        curr_month: totals.curr_month,
        meetings,
    }))
}

/// `POST /api/meetings`
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<NewMeeting>,
) -> ApiResult<(StatusCode, Json<meeting_entity::Model>)> {
    let created = meeting::create_meeting(
        &state.db,
        &session.profile_id,
        payload.name,
        payload.date,
        payload.time,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/meetings`
pub async fn update(
    State(state): State<AppState>,
    _session: Session,
    Json(payload): Json<UpdateMeeting>,
) -> ApiResult<Json<meeting_entity::Model>> {
    let updated = meeting::update_meeting(
        &state.db,
        payload.id,
        payload.name,
        payload.date,
        payload.time,
    )
    .await?;
    Ok(Json(updated))
}

/// `DELETE /api/meetings`
pub async fn delete(
    State(state): State<AppState>,
    _session: Session,
    Json(payload): Json<DeleteRequest>,
) -> ApiResult<StatusCode> {
    meeting::delete_meeting(&state.db, payload.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
