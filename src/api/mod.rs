//! HTTP API surface.
//!
//! Thin `axum` handlers over the `core` operations: extract the session,
//! deserialize the payload, call into core, serialize the result. All
//! business rules live in `core`; this layer only translates between HTTP
//! and the crate's [`Error`] taxonomy.
//!
//! Authentication is terminated upstream. Handlers trust the `x-profile-id`
//! header to carry the session profile id and reject requests without it.

pub mod admin;
pub mod bookings;
pub mod cling;
pub mod digest;
pub mod meetings;
pub mod offers;
pub mod profiles;
pub mod sales;
pub mod services;

use crate::{entities::profile, errors::Error, notify::Notifier};
use axum::{
    Json, Router, async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::error;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Database handle, cheap to clone
    pub db: DatabaseConnection,
    /// Webhook announcer
    pub notifier: Notifier,
    /// Shared secret the digest scheduler must present
    pub digest_token: Option<String>,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/meetings",
            get(meetings::list)
                .post(meetings::create)
                .put(meetings::update)
                .delete(meetings::delete),
        )
        .route(
            "/api/offers",
            get(offers::list)
                .post(offers::create)
                .put(offers::update)
                .delete(offers::delete),
        )
        .route(
            "/api/sales",
            get(sales::list)
                .post(sales::create)
                .put(sales::update)
                .delete(sales::delete),
        )
        .route(
            "/api/bookings",
            get(bookings::list)
                .post(bookings::create)
                .put(bookings::update)
                .delete(bookings::delete),
        )
        .route(
            "/api/me/:id",
            get(profiles::stats).put(profiles::update_settings),
        )
        .route("/api/me/:id/level-up", axum::routing::post(profiles::level_up))
        .route("/api/profiles", get(profiles::leaderboard))
        .route(
            "/api/admin/users",
            axum::routing::post(admin::create_user).delete(admin::deactivate_user),
        )
        .route(
            "/api/services",
            get(services::list)
                .post(services::create)
                .put(services::update)
                .delete(services::delete),
        )
        .route("/api/cling/offer", axum::routing::post(cling::offer))
        .route("/api/cling/sale", axum::routing::post(cling::sale))
        .route("/api/daily/digest", get(digest::daily))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Session identity extracted from the `x-profile-id` header.
#[derive(Debug, Clone)]
pub struct Session {
    /// Profile id of the authenticated user
    pub profile_id: String,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let profile_id = parts
            .headers
            .get("x-profile-id")
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or(ApiError(Error::NotAuthenticated))?;
        Ok(Self {
            profile_id: profile_id.to_string(),
        })
    }
}

/// Loads the session profile and checks it carries the `ADMIN` role.
pub async fn require_admin(
    db: &DatabaseConnection,
    session: &Session,
) -> Result<profile::Model, Error> {
    let user = crate::core::profile::require_profile(db, &session.profile_id).await?;
    if user.role == profile::Role::Admin {
        Ok(user)
    } else {
        Err(Error::Forbidden {
            required: "ADMIN".to_string(),
        })
    }
}

/// Body for collection-level `DELETE` requests.
#[derive(Debug, serde::Deserialize)]
pub struct DeleteRequest {
    /// Row id to delete
    pub id: i64,
}

/// Handler result alias.
pub type ApiResult<T> = Result<T, ApiError>;

/// Wraps [`Error`] so it can be returned straight from handlers with `?`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            Error::NotAuthenticated => (StatusCode::UNAUTHORIZED, "not_authenticated"),
            Error::Forbidden { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            Error::ProfileNotFound { .. } | Error::RecordNotFound { .. } => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            Error::LevelUpNotEligible { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "level_up_not_eligible")
            }
            Error::InvalidAmount { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_amount"),
            Error::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
            Error::Config { .. } | Error::Database(_) | Error::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let description = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Details stay in the log, not on the wire
            error!(error = %self.0, "request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        let body = Json(json!({ "error": code, "description": description }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::create_profile;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_require_admin_gate() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        create_profile(
            &db,
            "boss".to_string(),
            "Boss".to_string(),
            "boss@example.com".to_string(),
            profile::Role::Admin,
        )
        .await?;
        create_test_profile(&db, "seller", "Seller").await?;

        let admin = require_admin(
            &db,
            &Session {
                profile_id: "boss".to_string(),
            },
        )
        .await?;
        assert_eq!(admin.id, "boss");

        let denied = require_admin(
            &db,
            &Session {
                profile_id: "seller".to_string(),
            },
        )
        .await;
        assert!(matches!(denied, Err(Error::Forbidden { .. })));

        let unknown = require_admin(
            &db,
            &Session {
                profile_id: "ghost".to_string(),
            },
        )
        .await;
        assert!(matches!(unknown, Err(Error::ProfileNotFound { .. })));

        Ok(())
    }

    #[test]
    fn test_error_statuses() {
        let cases = [
            (Error::NotAuthenticated, StatusCode::UNAUTHORIZED),
            (
                Error::Forbidden {
                    required: "ADMIN".to_string(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                Error::ProfileNotFound {
                    id: "nope".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                Error::RecordNotFound {
                    kind: "meeting",
                    id: 7,
                },
                StatusCode::NOT_FOUND,
            ),
            (
                Error::LevelUpNotEligible { level: 1 },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                Error::InvalidAmount {
                    message: "too many".to_string(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                Error::Validation {
                    message: "empty name".to_string(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                Error::Config {
                    message: "bad toml".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status_and_code().0, expected);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError(Error::Config {
            message: "secret path".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
