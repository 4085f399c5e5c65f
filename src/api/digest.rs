//! Daily digest endpoint, meant to be hit by a morning cron job.

use crate::{
    api::{ApiError, ApiResult, AppState},
    core::digest::{DailyDigest, build_daily_digest, format_daily_digest},
    errors::Error,
};
use axum::{Json, extract::State, http::HeaderMap};
use chrono::Utc;

/// Checks the scheduler's shared secret in the `x-digest-token` header.
///
/// An unconfigured token disables the endpoint outright; anything short of
/// an exact match is rejected, so anonymous callers cannot spam the team
/// channel.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let expected = state
        .digest_token
        .as_deref()
        .ok_or(ApiError(Error::NotAuthenticated))?;
    let presented = headers
        .get("x-digest-token")
        .and_then(|value| value.to_str().ok());
    if presented == Some(expected) {
        Ok(())
    } else {
        Err(ApiError(Error::NotAuthenticated))
    }
}

/// `GET /api/daily/digest`
///
/// Builds the last-24h summary, posts the formatted greeting to the team
/// channel, and returns the raw digest. The caller is a scheduler, not a
/// user, so instead of a session it must present the configured
/// `x-digest-token` secret.
pub async fn daily(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<DailyDigest>> {
    authorize(&state, &headers)?;
    let digest = build_daily_digest(&state.db, Utc::now()).await?;
    state.notifier.message(format_daily_digest(&digest));
    Ok(Json(digest))
}
