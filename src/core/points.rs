//! Points engine - The rules converting record activity into ledger deltas.
//!
//! Every record mutation (create, update, delete) maps to a [`LedgerDelta`]:
//! a signed quantity for one record kind, worth a fixed number of points per
//! unit. The delta is applied to the owning profile's `points` and the
//! matching counter with SQL-level additive updates inside the same
//! transaction as the record write, so the pair commits or rolls back
//! together and concurrent deltas compose instead of overwriting each other.
//!
//! The module also owns the level-up arithmetic: the per-area thresholds,
//! the eligibility predicate, and the progress ratios the client uses for
//! button affordance. Eligibility is always evaluated on freshly loaded
//! counters; nothing here trusts a client-side check.

use crate::{
    entities::{Profile, profile},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, prelude::*};
use serde::Serialize;
use tracing::debug;

/// Points awarded per completed meeting
pub const MEETING_POINTS: f64 = 1500.0;
/// Points awarded per offer sent (multiplied by the entry's batch amount)
pub const OFFER_POINTS: f64 = 3000.0;
/// Points awarded per SEK of sale revenue
pub const SALE_POINTS: f64 = 1.0;
/// Points awarded per booked meeting
pub const BOOKING_POINTS: f64 = 500.0;

/// Meetings required per level: `8 * level`
pub const MEETING_LEVEL_STEP: i32 = 8;
/// Offers required per level: `6 * level`
pub const OFFER_LEVEL_STEP: i32 = 6;
/// Sale revenue required per level: `14000 * level`
pub const SALE_LEVEL_STEP: f64 = 14000.0;

/// The four record kinds tracked by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Completed meeting, quantity is always 1
    Meeting,
    /// Sent offers, quantity is the entry's batch amount
    Offer,
    /// Closed sale, quantity is the revenue in SEK
    Sale,
    /// Booked meeting, quantity is always 1
    Booking,
}

impl RecordKind {
    /// Points awarded per unit of quantity
    #[must_use]
    pub const fn points_per_unit(self) -> f64 {
        match self {
            Self::Meeting => MEETING_POINTS,
            Self::Offer => OFFER_POINTS,
            Self::Sale => SALE_POINTS,
            Self::Booking => BOOKING_POINTS,
        }
    }

    /// Lowercase kind name, used in errors and logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::Offer => "offer",
            Self::Sale => "sale",
            Self::Booking => "booking",
        }
    }
}

/// A signed point/counter adjustment for one profile.
///
/// Quantity units per kind: meetings and bookings are 1 per row, offers are
/// the batch `amount`, sales are the `revenue` in SEK.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerDelta {
    /// Which counter the delta applies to
    pub kind: RecordKind,
    /// Signed quantity change
    pub quantity: f64,
}

impl LedgerDelta {
    /// Delta for creating a record: the full quantity is added.
    #[must_use]
    pub const fn create(kind: RecordKind, quantity: f64) -> Self {
        Self { kind, quantity }
    }

    /// Delta for updating a record's quantity.
    ///
    /// Computed from the pre-update and post-update quantities, which makes
    /// point accounting order-independent; the caller must read the old row
    /// inside the same transaction before mutating it.
    #[must_use]
    pub const fn update(kind: RecordKind, old_quantity: f64, new_quantity: f64) -> Self {
        Self {
            kind,
            quantity: new_quantity - old_quantity,
        }
    }

    /// Delta for deleting a record: the full contribution is reversed.
    #[must_use]
    pub const fn delete(kind: RecordKind, quantity: f64) -> Self {
        Self {
            kind,
            quantity: -quantity,
        }
    }

    /// Point change this delta is worth
    #[must_use]
    pub fn points(self) -> f64 {
        self.quantity * self.kind.points_per_unit()
    }
}

/// Applies a [`LedgerDelta`] to a profile with atomic additive updates.
///
/// Runs `points = points + delta` and `counter = counter + quantity` as a
/// single SQL UPDATE instead of read-modify-write, so concurrent record
/// submissions against the same profile cannot lose a counter update. Must
/// be called on the same transaction as the record mutation it pairs with.
///
/// # Returns
/// The updated profile row
pub async fn apply_ledger_delta<C>(
    db: &C,
    profile_id: &str,
    delta: LedgerDelta,
) -> Result<profile::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    debug!(
        kind = delta.kind.name(),
        quantity = delta.quantity,
        profile_id,
        "applying ledger delta"
    );

    // Verify the profile exists before touching its counters
    let _profile = Profile::find_by_id(profile_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            id: profile_id.to_string(),
        })?;

    let update = Profile::update_many().col_expr(
        profile::Column::Points,
        Expr::col(profile::Column::Points).add(delta.points()),
    );

    // Counter columns are integers except sale_count, which accumulates
    // fractional SEK revenue.
    #[allow(clippy::cast_possible_truncation)]
    let update = match delta.kind {
        RecordKind::Meeting => update.col_expr(
            profile::Column::MeetingCount,
            Expr::col(profile::Column::MeetingCount).add(delta.quantity as i32),
        ),
        RecordKind::Offer => update.col_expr(
            profile::Column::OfferCount,
            Expr::col(profile::Column::OfferCount).add(delta.quantity as i32),
        ),
        RecordKind::Sale => update.col_expr(
            profile::Column::SaleCount,
            Expr::col(profile::Column::SaleCount).add(delta.quantity),
        ),
        RecordKind::Booking => update.col_expr(
            profile::Column::BookingCount,
            Expr::col(profile::Column::BookingCount).add(delta.quantity as i32),
        ),
    };

    update
        .filter(profile::Column::Id.eq(profile_id))
        .exec(db)
        .await?;

    Profile::find_by_id(profile_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            id: profile_id.to_string(),
        })
}

/// Meetings required to leave the given level
#[must_use]
pub const fn meeting_threshold(level: i32) -> i32 {
    MEETING_LEVEL_STEP * level
}

/// Offers required to leave the given level
#[must_use]
pub const fn offer_threshold(level: i32) -> i32 {
    OFFER_LEVEL_STEP * level
}

/// Sale revenue required to leave the given level
#[must_use]
pub fn sale_threshold(level: i32) -> f64 {
    SALE_LEVEL_STEP * f64::from(level)
}

/// Whether the profile's counters satisfy all three level-up gates.
///
/// The booking counter is tracked and has a goal but is not a gate.
#[must_use]
pub fn level_up_eligible(profile: &profile::Model) -> bool {
    profile.meeting_count >= meeting_threshold(profile.level)
        && profile.offer_count >= offer_threshold(profile.level)
        && profile.sale_count >= sale_threshold(profile.level)
}

/// Per-area progress toward the next level, as uncapped percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelProgress {
    /// Meeting counter vs `8 * level`, in percent
    pub meetings: f64,
    /// Offer counter vs `6 * level`, in percent
    pub offers: f64,
    /// Sale counter vs `14000 * level`, in percent
    pub sales: f64,
}

/// Computes the three gate ratios for the profile's current level.
#[must_use]
pub fn level_progress(profile: &profile::Model) -> LevelProgress {
    LevelProgress {
        meetings: f64::from(profile.meeting_count) / f64::from(meeting_threshold(profile.level))
            * 100.0,
        offers: f64::from(profile.offer_count) / f64::from(offer_threshold(profile.level)) * 100.0,
        sales: profile.sale_count / sale_threshold(profile.level) * 100.0,
    }
}

/// Rank name for a level band, used for badges on the profile page.
#[must_use]
pub const fn rank_name(level: i32) -> &'static str {
    match level {
        i32::MIN..=4 => "ROOKIE",
        5..=9 => "MASTER",
        10..=14 => "VETERAN",
        15..=19 => "LEGEND",
        20..=24 => "OMEGA",
        25..=29 => "IMMORTAL",
        _ => "GOAT",
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_points_per_unit_table() {
        assert_eq!(RecordKind::Meeting.points_per_unit(), 1500.0);
        assert_eq!(RecordKind::Offer.points_per_unit(), 3000.0);
        assert_eq!(RecordKind::Sale.points_per_unit(), 1.0);
        assert_eq!(RecordKind::Booking.points_per_unit(), 500.0);
    }

    #[test]
    fn test_offer_delta_scales_with_batch_amount() {
        let delta = LedgerDelta::create(RecordKind::Offer, 3.0);
        assert_eq!(delta.points(), 9000.0);
        assert_eq!(delta.quantity, 3.0);

        // Deleting the same entry reverses exactly that contribution
        let reversal = LedgerDelta::delete(RecordKind::Offer, 3.0);
        assert_eq!(reversal.points(), -9000.0);
        assert_eq!(reversal.quantity, -3.0);
    }

    #[test]
    fn test_update_delta_is_difference_of_quantities() {
        // Revenue corrected from 12000 to 9500
        let delta = LedgerDelta::update(RecordKind::Sale, 12000.0, 9500.0);
        assert_eq!(delta.quantity, -2500.0);
        assert_eq!(delta.points(), -2500.0);

        // Offer batch grown from 2 to 5
        let delta = LedgerDelta::update(RecordKind::Offer, 2.0, 5.0);
        assert_eq!(delta.quantity, 3.0);
        assert_eq!(delta.points(), 9000.0);
    }

    #[test]
    fn test_create_then_delete_is_conservation() {
        let create = LedgerDelta::create(RecordKind::Sale, 14000.0);
        let delete = LedgerDelta::delete(RecordKind::Sale, 14000.0);
        assert_eq!(create.points() + delete.points(), 0.0);
        assert_eq!(create.quantity + delete.quantity, 0.0);
    }

    #[test]
    fn test_thresholds_scale_with_level() {
        assert_eq!(meeting_threshold(1), 8);
        assert_eq!(offer_threshold(1), 6);
        assert_eq!(sale_threshold(1), 14000.0);
        assert_eq!(meeting_threshold(3), 24);
        assert_eq!(offer_threshold(3), 18);
        assert_eq!(sale_threshold(3), 42000.0);
    }

    #[test]
    fn test_eligibility_requires_all_three_gates() {
        let mut profile = profile_fixture();
        profile.level = 1;
        profile.meeting_count = 8;
        profile.offer_count = 6;
        profile.sale_count = 14000.0;
        assert!(level_up_eligible(&profile));

        // One counter short in any area blocks the level-up
        profile.meeting_count = 7;
        assert!(!level_up_eligible(&profile));
        profile.meeting_count = 8;

        profile.offer_count = 5;
        assert!(!level_up_eligible(&profile));
        profile.offer_count = 6;

        profile.sale_count = 13999.99;
        assert!(!level_up_eligible(&profile));
    }

    #[test]
    fn test_eligibility_ignores_booking_counter() {
        let mut profile = profile_fixture();
        profile.meeting_count = 8;
        profile.offer_count = 6;
        profile.sale_count = 14000.0;
        profile.booking_count = 0;
        assert!(level_up_eligible(&profile));
    }

    #[test]
    fn test_level_progress_ratios() {
        let mut profile = profile_fixture();
        profile.level = 2;
        profile.meeting_count = 8;
        profile.offer_count = 6;
        profile.sale_count = 14000.0;

        let progress = level_progress(&profile);
        assert_eq!(progress.meetings, 50.0);
        assert_eq!(progress.offers, 50.0);
        assert_eq!(progress.sales, 50.0);
    }

    #[test]
    fn test_rank_bands() {
        assert_eq!(rank_name(1), "ROOKIE");
        assert_eq!(rank_name(4), "ROOKIE");
        assert_eq!(rank_name(5), "MASTER");
        assert_eq!(rank_name(10), "VETERAN");
        assert_eq!(rank_name(15), "LEGEND");
        assert_eq!(rank_name(20), "OMEGA");
        assert_eq!(rank_name(25), "IMMORTAL");
        assert_eq!(rank_name(30), "GOAT");
        assert_eq!(rank_name(42), "GOAT");
    }

    #[tokio::test]
    async fn test_apply_ledger_delta_updates_points_and_counter() -> Result<()> {
        let (db, profile) = setup_with_profile().await?;

        let updated =
            apply_ledger_delta(&db, &profile.id, LedgerDelta::create(RecordKind::Meeting, 1.0))
                .await?;
        assert_eq!(updated.points, 1500.0);
        assert_eq!(updated.meeting_count, 1);
        assert_eq!(updated.offer_count, 0);

        let updated =
            apply_ledger_delta(&db, &profile.id, LedgerDelta::create(RecordKind::Offer, 4.0))
                .await?;
        assert_eq!(updated.points, 1500.0 + 12000.0);
        assert_eq!(updated.offer_count, 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_ledger_delta_can_go_negative() -> Result<()> {
        let (db, profile) = setup_with_profile().await?;

        let updated =
            apply_ledger_delta(&db, &profile.id, LedgerDelta::delete(RecordKind::Booking, 1.0))
                .await?;
        assert_eq!(updated.points, -500.0);
        assert_eq!(updated.booking_count, -1);

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_ledger_delta_unknown_profile() -> Result<()> {
        let db = setup_test_db().await?;

        let result =
            apply_ledger_delta(&db, "missing", LedgerDelta::create(RecordKind::Meeting, 1.0)).await;
        assert!(matches!(result, Err(Error::ProfileNotFound { .. })));

        Ok(())
    }
}
