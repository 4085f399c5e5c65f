//! Profile endpoints: per-user stats, settings, level-up, leaderboard.

use crate::{
    api::{ApiResult, AppState, Session, require_admin},
    core::{
        points::{self, LevelProgress},
        profile::{self, SettingsUpdate},
        stats::{self, ProfileStats},
    },
    entities::profile as profile_entity,
};
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Settings payload. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    name: Option<String>,
    avatar: Option<String>,
    meeting_goal: Option<i32>,
    offer_goal: Option<i32>,
    sale_goal: Option<f64>,
    booking_goal: Option<i32>,
}

/// Only the profile's owner or an admin may write to it.
async fn require_owner_or_admin(state: &AppState, session: &Session, id: &str) -> ApiResult<()> {
    if session.profile_id != id {
        require_admin(&state.db, session).await?;
    }
    Ok(())
}

/// Profile dashboard payload: raw totals plus the derived ratios the
/// dashboard renders directly.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDashboard {
    /// Rank badge for the current level
    rank: &'static str,
    /// Whether the level-up button should be offered
    level_up_eligible: bool,
    /// Per-gate progress toward the next level, in percent (uncapped)
    level_progress: LevelProgress,
    /// Month-over-month change per record kind, in percent
    meeting_change: f64,
    offer_change: f64,
    sale_change: f64,
    booking_change: f64,
    /// Goal-progress bars, capped at 100 for display
    meeting_goal_progress: f64,
    offer_goal_progress: f64,
    sale_goal_progress: f64,
    booking_goal_progress: f64,
    #[serde(flatten)]
    summary: ProfileStats,
}

/// `GET /api/me/:id`
#[allow(clippy::cast_precision_loss)]
pub async fn stats(
    State(state): State<AppState>,
    _session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<ProfileDashboard>> {
    let today = Utc::now().date_naive();
    let summary = stats::profile_stats(&state.db, &id, today).await?;
    let user = &summary.user;

    let dashboard = ProfileDashboard {
        rank: points::rank_name(user.level),
        level_up_eligible: points::level_up_eligible(user),
        level_progress: points::level_progress(user),
        meeting_change: stats::percent_change(
            summary.prev_month_meetings as f64,
            summary.curr_month_meetings as f64,
        ),
        offer_change: stats::percent_change(
            summary.prev_month_offers as f64,
            summary.curr_month_offers as f64,
        ),
        sale_change: stats::percent_change(summary.prev_month_sales, summary.curr_month_sales),
        booking_change: stats::percent_change(
            summary.prev_month_bookings as f64,
            summary.curr_month_bookings as f64,
        ),
        meeting_goal_progress: stats::display_capped(stats::goal_progress(
            summary.curr_month_meetings as f64,
            f64::from(user.meeting_goal),
        )),
        offer_goal_progress: stats::display_capped(stats::goal_progress(
            summary.curr_month_offers as f64,
            f64::from(user.offer_goal),
        )),
        sale_goal_progress: stats::display_capped(stats::goal_progress(
            summary.curr_month_sales,
            user.sale_goal,
        )),
        booking_goal_progress: stats::display_capped(stats::goal_progress(
            summary.curr_month_bookings as f64,
            f64::from(user.booking_goal),
        )),
        summary,
    };
    Ok(Json(dashboard))
}

/// `PUT /api/me/:id`
pub async fn update_settings(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(payload): Json<Settings>,
) -> ApiResult<Json<profile_entity::Model>> {
    require_owner_or_admin(&state, &session, &id).await?;
    let updated = profile::update_settings(
        &state.db,
        &id,
        SettingsUpdate {
            name: payload.name,
            avatar: payload.avatar,
            meeting_goal: payload.meeting_goal,
            offer_goal: payload.offer_goal,
            sale_goal: payload.sale_goal,
            booking_goal: payload.booking_goal,
        },
    )
    .await?;
    Ok(Json(updated))
}

/// `POST /api/me/:id/level-up`
///
/// Eligibility is revalidated against fresh counters inside the transaction;
/// the client's own check is advisory. Announces the new level on success.
pub async fn level_up(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<profile_entity::Model>> {
    require_owner_or_admin(&state, &session, &id).await?;
    let leveled = profile::level_up(&state.db, &id).await?;
    state.notifier.level_up(&leveled.name, leveled.level);
    Ok(Json(leveled))
}

/// `GET /api/profiles` - active profiles ordered by points for the
/// leaderboard.
pub async fn leaderboard(
    State(state): State<AppState>,
    _session: Session,
) -> ApiResult<Json<Vec<profile_entity::Model>>> {
    let profiles = profile::list_profiles(&state.db).await?;
    Ok(Json(profiles))
}
