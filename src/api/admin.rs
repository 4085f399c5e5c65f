//! User administration endpoints. All require the `ADMIN` role.

use crate::{
    api::{ApiResult, AppState, Session, require_admin},
    core::profile,
    entities::profile as profile_entity,
};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

/// Payload for registering a new user. The id comes from the external auth
/// collaborator.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    id: String,
    name: String,
    email: String,
    #[serde(default = "default_role")]
    role: profile_entity::Role,
}

fn default_role() -> profile_entity::Role {
    profile_entity::Role::User
}

/// Payload for deactivating a user.
#[derive(Debug, Deserialize)]
pub struct RemoveUser {
    id: String,
}

/// `POST /api/admin/users`
pub async fn create_user(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<profile_entity::Model>)> {
    require_admin(&state.db, &session).await?;
    let created = profile::create_profile(
        &state.db,
        payload.id,
        payload.name,
        payload.email,
        payload.role,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `DELETE /api/admin/users`
///
/// Soft delete: the profile is marked inactive and drops off the
/// leaderboard, but its records and ledger stay intact.
pub async fn deactivate_user(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RemoveUser>,
) -> ApiResult<Json<profile_entity::Model>> {
    require_admin(&state.db, &session).await?;
    let deactivated = profile::deactivate_profile(&state.db, &payload.id).await?;
    Ok(Json(deactivated))
}
