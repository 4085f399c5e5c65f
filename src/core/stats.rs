//! Monthly aggregation business logic.
//!
//! Buckets record activity into calendar-month windows and derives the
//! dashboard figures: previous vs current month totals per record kind,
//! globally or scoped to one profile, plus the highest sale of the month and
//! the percent-change/goal-progress ratios the presentation layer renders.
//!
//! Windowing always uses the server-set `created_at` timestamp, never the
//! user-editable `date`: a meeting logged today with last week's date still
//! counts toward this month. The reference date is an explicit `as_of`
//! parameter resolved per call, so a long-lived process never serves a stale
//! window.

use crate::{
    entities::{Booking, Meeting, Offer, Profile, Sale, booking, meeting, offer, profile, sale},
    errors::Result,
};
use chrono::{Datelike, NaiveDate, NaiveTime};
use sea_orm::{
    DatabaseConnection, FromQueryResult, PaginatorTrait, QueryOrder, QuerySelect, prelude::*,
};
use serde::Serialize;

/// A half-open calendar-month window `[first_of_month, first_of_next_month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    /// Midnight UTC on the first day of the month
    pub start: DateTimeUtc,
    /// Midnight UTC on the first day of the following month
    pub end: DateTimeUtc,
}

impl MonthWindow {
    /// The month containing `as_of`.
    #[must_use]
    pub fn containing(as_of: NaiveDate) -> Self {
        Self::shifted(as_of, 0)
    }

    /// The month immediately before the one containing `as_of`.
    #[must_use]
    pub fn preceding(as_of: NaiveDate) -> Self {
        Self::shifted(as_of, -1)
    }

    fn shifted(as_of: NaiveDate, shift: i32) -> Self {
        let start = first_of_shifted_month(as_of, shift);
        let end = first_of_shifted_month(as_of, shift + 1);
        Self {
            start: start.and_time(NaiveTime::MIN).and_utc(),
            end: end.and_time(NaiveTime::MIN).and_utc(),
        }
    }
}

/// First day of the month `shift` months away from `as_of`'s month,
/// carrying across year boundaries in either direction.
fn first_of_shifted_month(as_of: NaiveDate, shift: i32) -> NaiveDate {
    let months = as_of.year() * 12 + as_of.month0() as i32 + shift;
    let year = months.div_euclid(12);
    let month = months.rem_euclid(12) as u32 + 1;
    // Day 1 of a valid month always exists
    #[allow(clippy::unwrap_used)]
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    first
}

/// A previous-vs-current month pair for one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthOverMonth<T> {
    /// Total for the immediately preceding calendar month
    pub prev_month: T,
    /// Total for the current calendar month
    pub curr_month: T,
}

#[derive(FromQueryResult)]
struct AmountSum {
    total: Option<i64>,
}

#[derive(FromQueryResult)]
struct RevenueSum {
    total: Option<f64>,
}

async fn meeting_count_in(
    db: &DatabaseConnection,
    window: MonthWindow,
    profile_id: Option<&str>,
) -> Result<u64> {
    let mut query = Meeting::find()
        .filter(meeting::Column::CreatedAt.gte(window.start))
        .filter(meeting::Column::CreatedAt.lt(window.end));
    if let Some(id) = profile_id {
        query = query.filter(meeting::Column::ProfileId.eq(id));
    }
    query.count(db).await.map_err(Into::into)
}

async fn booking_count_in(
    db: &DatabaseConnection,
    window: MonthWindow,
    profile_id: Option<&str>,
) -> Result<u64> {
    let mut query = Booking::find()
        .filter(booking::Column::CreatedAt.gte(window.start))
        .filter(booking::Column::CreatedAt.lt(window.end));
    if let Some(id) = profile_id {
        query = query.filter(booking::Column::ProfileId.eq(id));
    }
    query.count(db).await.map_err(Into::into)
}

async fn offer_sum_in(
    db: &DatabaseConnection,
    window: MonthWindow,
    profile_id: Option<&str>,
) -> Result<i64> {
    let mut query = Offer::find()
        .select_only()
        .column_as(offer::Column::Amount.sum(), "total")
        .filter(offer::Column::CreatedAt.gte(window.start))
        .filter(offer::Column::CreatedAt.lt(window.end));
    if let Some(id) = profile_id {
        query = query.filter(offer::Column::ProfileId.eq(id));
    }
    let row = query.into_model::<AmountSum>().one(db).await?;
    Ok(row.and_then(|r| r.total).unwrap_or(0))
}

async fn sale_sum_in(
    db: &DatabaseConnection,
    window: MonthWindow,
    profile_id: Option<&str>,
) -> Result<f64> {
    let mut query = Sale::find()
        .select_only()
        .column_as(sale::Column::Revenue.sum(), "total")
        .filter(sale::Column::CreatedAt.gte(window.start))
        .filter(sale::Column::CreatedAt.lt(window.end));
    if let Some(id) = profile_id {
        query = query.filter(sale::Column::ProfileId.eq(id));
    }
    let row = query.into_model::<RevenueSum>().one(db).await?;
    Ok(row.and_then(|r| r.total).unwrap_or(0.0))
}

/// Meeting counts for the previous and current month.
pub async fn meeting_totals(
    db: &DatabaseConnection,
    profile_id: Option<&str>,
    as_of: NaiveDate,
) -> Result<MonthOverMonth<u64>> {
    Ok(MonthOverMonth {
        prev_month: meeting_count_in(db, MonthWindow::preceding(as_of), profile_id).await?,
        curr_month: meeting_count_in(db, MonthWindow::containing(as_of), profile_id).await?,
    })
}

/// Booking counts for the previous and current month.
pub async fn booking_totals(
    db: &DatabaseConnection,
    profile_id: Option<&str>,
    as_of: NaiveDate,
) -> Result<MonthOverMonth<u64>> {
    Ok(MonthOverMonth {
        prev_month: booking_count_in(db, MonthWindow::preceding(as_of), profile_id).await?,
        curr_month: booking_count_in(db, MonthWindow::containing(as_of), profile_id).await?,
    })
}

/// Offer totals for the previous and current month.
///
/// Sums the batch `amount` rather than counting rows: one entry logging
/// three offers contributes 3.
pub async fn offer_totals(
    db: &DatabaseConnection,
    profile_id: Option<&str>,
    as_of: NaiveDate,
) -> Result<MonthOverMonth<i64>> {
    Ok(MonthOverMonth {
        prev_month: offer_sum_in(db, MonthWindow::preceding(as_of), profile_id).await?,
        curr_month: offer_sum_in(db, MonthWindow::containing(as_of), profile_id).await?,
    })
}

/// Revenue totals (SEK) for the previous and current month.
pub async fn sale_totals(
    db: &DatabaseConnection,
    profile_id: Option<&str>,
    as_of: NaiveDate,
) -> Result<MonthOverMonth<f64>> {
    Ok(MonthOverMonth {
        prev_month: sale_sum_in(db, MonthWindow::preceding(as_of), profile_id).await?,
        curr_month: sale_sum_in(db, MonthWindow::containing(as_of), profile_id).await?,
    })
}

/// The single highest-revenue sale of the current month, with its seller.
///
/// Ties keep storage order (first row encountered wins).
pub async fn highest_sale(
    db: &DatabaseConnection,
    as_of: NaiveDate,
) -> Result<Option<(sale::Model, Option<profile::Model>)>> {
    let window = MonthWindow::containing(as_of);
    Sale::find()
        .find_also_related(Profile)
        .filter(sale::Column::CreatedAt.gte(window.start))
        .filter(sale::Column::CreatedAt.lt(window.end))
        .order_by_desc(sale::Column::Revenue)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Per-profile dashboard summary: all four kinds, both windows, plus the
/// profile row itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    /// Meetings last month
    pub prev_month_meetings: u64,
    /// Meetings this month
    pub curr_month_meetings: u64,
    /// Offers sent last month (sum of batch amounts)
    pub prev_month_offers: i64,
    /// Offers sent this month (sum of batch amounts)
    pub curr_month_offers: i64,
    /// Revenue last month (SEK)
    pub prev_month_sales: f64,
    /// Revenue this month (SEK)
    pub curr_month_sales: f64,
    /// Bookings last month
    pub prev_month_bookings: u64,
    /// Bookings this month
    pub curr_month_bookings: u64,
    /// The profile the figures are scoped to
    pub user: profile::Model,
}

/// Computes the full per-profile summary consumed by the profile dashboard.
pub async fn profile_stats(
    db: &DatabaseConnection,
    profile_id: &str,
    as_of: NaiveDate,
) -> Result<ProfileStats> {
    let user = crate::core::profile::require_profile(db, profile_id).await?;
    let meetings = meeting_totals(db, Some(profile_id), as_of).await?;
    let offers = offer_totals(db, Some(profile_id), as_of).await?;
    let sales = sale_totals(db, Some(profile_id), as_of).await?;
    let bookings = booking_totals(db, Some(profile_id), as_of).await?;

    Ok(ProfileStats {
        prev_month_meetings: meetings.prev_month,
        curr_month_meetings: meetings.curr_month,
        prev_month_offers: offers.prev_month,
        curr_month_offers: offers.curr_month,
        prev_month_sales: sales.prev_month,
        curr_month_sales: sales.curr_month,
        prev_month_bookings: bookings.prev_month,
        curr_month_bookings: bookings.curr_month,
        user,
    })
}

/// Month-over-month change in percent.
///
/// Guards mirror the dashboard's display rules exactly: an empty previous
/// month with an empty current month is 0%, while growth from an empty
/// previous month reads as `curr * 100` - an uncapped sentinel for
/// "infinite" growth, deliberately not normalized.
#[must_use]
pub fn percent_change(prev: f64, curr: f64) -> f64 {
    let change = (curr - prev) / prev * 100.0;
    if change.is_nan() {
        0.0
    } else if change.is_finite() {
        change
    } else {
        curr * 100.0
    }
}

/// Progress toward a monthly goal in percent, uncapped.
///
/// A zero or unset goal reads as 0% rather than dividing by zero.
#[must_use]
pub fn goal_progress(curr: f64, goal: f64) -> f64 {
    if goal == 0.0 {
        return 0.0;
    }
    curr / goal * 100.0
}

/// Caps a percentage at 100 for progress-bar display.
///
/// Only goal-progress bars are capped; month-over-month change is shown raw.
#[must_use]
pub fn display_capped(percent: f64) -> f64 {
    percent.min(100.0)
}
