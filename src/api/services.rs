//! Service catalog endpoints.

use crate::{
    api::{ApiResult, AppState, DeleteRequest, Session, require_admin},
    core::service::{self, ServiceUsage},
    entities::service as service_entity,
};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

/// Payload for adding a catalog service.
#[derive(Debug, Deserialize)]
pub struct NewService {
    name: String,
    provision: String,
}

/// Payload for rewriting a catalog service.
#[derive(Debug, Deserialize)]
pub struct UpdateService {
    id: i64,
    name: String,
    provision: String,
}

/// `GET /api/services` - catalog ordered by sales popularity.
pub async fn list(
    State(state): State<AppState>,
    _session: Session,
) -> ApiResult<Json<Vec<ServiceUsage>>> {
    let services = service::list_services(&state.db).await?;
    Ok(Json(services))
}

/// `POST /api/services` (admin only)
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<NewService>,
) -> ApiResult<(StatusCode, Json<service_entity::Model>)> {
    require_admin(&state.db, &session).await?;
    let created = service::create_service(&state.db, payload.name, payload.provision).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/services` (admin only)
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateService>,
) -> ApiResult<Json<service_entity::Model>> {
    require_admin(&state.db, &session).await?;
    let updated =
        service::update_service(&state.db, payload.id, payload.name, payload.provision).await?;
    Ok(Json(updated))
}

/// `DELETE /api/services` (admin only)
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<DeleteRequest>,
) -> ApiResult<StatusCode> {
    require_admin(&state.db, &session).await?;
    service::delete_service(&state.db, payload.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
