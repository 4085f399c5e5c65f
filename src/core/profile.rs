//! Profile business logic - Ledger lifecycle, settings, leaderboard, level-up.
//!
//! Profiles are created alongside an auth account by an admin and soft-deleted
//! by flipping `active`, never removed, so historical records keep their
//! owner. The level-up operation here is the authoritative one: it reloads the
//! profile inside a transaction and re-checks the gates regardless of what the
//! client pre-computed.

use crate::{
    core::points,
    entities::{Profile, profile},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};

/// Creates a profile for a freshly issued auth account.
///
/// The id comes from the auth collaborator; counters start at zero, the
/// level at 1, and every goal at 1.
pub async fn create_profile(
    db: &DatabaseConnection,
    id: String,
    name: String,
    email: String,
    role: profile::Role,
) -> Result<profile::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Profile name cannot be empty".to_string(),
        });
    }

    let model = profile::ActiveModel {
        id: Set(id),
        name: Set(name.trim().to_string()),
        email: Set(email),
        role: Set(role),
        active: Set(true),
        avatar: Set(None),
        points: Set(0.0),
        level: Set(1),
        meeting_count: Set(0),
        offer_count: Set(0),
        sale_count: Set(0.0),
        booking_count: Set(0),
        meeting_goal: Set(1),
        offer_goal: Set(1),
        sale_goal: Set(1.0),
        booking_goal: Set(1),
    };

    let result = model.insert(db).await?;
    Ok(result)
}

/// Finds a profile by id, deactivated ones included.
pub async fn get_profile(db: &DatabaseConnection, id: &str) -> Result<Option<profile::Model>> {
    Profile::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Finds a profile by email, used to resolve inbound webhook payloads.
pub async fn find_profile_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<profile::Model>> {
    Profile::find()
        .filter(profile::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a profile by id or fails with `ProfileNotFound`.
pub async fn require_profile<C>(db: &C, id: &str) -> Result<profile::Model>
where
    C: ConnectionTrait,
{
    Profile::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProfileNotFound { id: id.to_string() })
}

/// All active profiles ordered by all-time points descending.
///
/// This is the leaderboard ordering; ties keep storage order.
pub async fn list_profiles(db: &DatabaseConnection) -> Result<Vec<profile::Model>> {
    Profile::find()
        .filter(profile::Column::Active.eq(true))
        .order_by_desc(profile::Column::Points)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Top scorers with a positive points balance, for podium displays.
pub async fn top_profiles(db: &DatabaseConnection, limit: u64) -> Result<Vec<profile::Model>> {
    Profile::find()
        .filter(profile::Column::Points.gt(0.0))
        .order_by_desc(profile::Column::Points)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// User-editable settings: display fields and monthly goals.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    /// New display name, if changing
    pub name: Option<String>,
    /// New avatar URL, if changing
    pub avatar: Option<String>,
    /// New monthly meeting target
    pub meeting_goal: Option<i32>,
    /// New monthly offer target
    pub offer_goal: Option<i32>,
    /// New monthly revenue target (SEK)
    pub sale_goal: Option<f64>,
    /// New monthly booking target
    pub booking_goal: Option<i32>,
}

/// Applies a settings update to a profile. Goals must stay >= 1.
pub async fn update_settings(
    db: &DatabaseConnection,
    id: &str,
    settings: SettingsUpdate,
) -> Result<profile::Model> {
    if let Some(name) = &settings.name {
        if name.trim().is_empty() {
            return Err(Error::Validation {
                message: "Profile name cannot be empty".to_string(),
            });
        }
    }
    for goal in [
        settings.meeting_goal,
        settings.offer_goal,
        settings.booking_goal,
    ]
    .into_iter()
    .flatten()
    {
        if goal < 1 {
            return Err(Error::Validation {
                message: format!("Goals must be at least 1, got {goal}"),
            });
        }
    }
    if let Some(goal) = settings.sale_goal {
        if goal < 1.0 {
            return Err(Error::Validation {
                message: format!("Goals must be at least 1, got {goal}"),
            });
        }
    }

    let current = require_profile(db, id).await?;
    let mut model: profile::ActiveModel = current.into();
    if let Some(name) = settings.name {
        model.name = Set(name.trim().to_string());
    }
    if let Some(avatar) = settings.avatar {
        model.avatar = Set(Some(avatar));
    }
    if let Some(goal) = settings.meeting_goal {
        model.meeting_goal = Set(goal);
    }
    if let Some(goal) = settings.offer_goal {
        model.offer_goal = Set(goal);
    }
    if let Some(goal) = settings.sale_goal {
        model.sale_goal = Set(goal);
    }
    if let Some(goal) = settings.booking_goal {
        model.booking_goal = Set(goal);
    }

    model.update(db).await.map_err(Into::into)
}

/// Soft-deletes a profile by clearing its `active` flag.
///
/// The row stays in place so existing records keep a valid owner.
pub async fn deactivate_profile(db: &DatabaseConnection, id: &str) -> Result<profile::Model> {
    let current = require_profile(db, id).await?;
    let mut model: profile::ActiveModel = current.into();
    model.active = Set(false);
    model.update(db).await.map_err(Into::into)
}

/// Performs a level-up, re-validating eligibility server-side.
///
/// Inside one transaction: reload the profile, check the three gates against
/// the current level, then increment the level and subtract each gate's
/// threshold at the old level from its counter. Surplus rolls over rather
/// than resetting to zero, and `points` is never touched. An ineligible
/// request fails with [`Error::LevelUpNotEligible`] and changes nothing.
pub async fn level_up(db: &DatabaseConnection, id: &str) -> Result<profile::Model> {
    let txn = db.begin().await?;

    // Fresh counters only; the client's eligibility check is advisory
    let current = require_profile(&txn, id).await?;
    if !points::level_up_eligible(&current) {
        return Err(Error::LevelUpNotEligible {
            level: current.level,
        });
    }

    let old_level = current.level;
    let mut model: profile::ActiveModel = current.clone().into();
    model.level = Set(old_level + 1);
    model.meeting_count = Set(current.meeting_count - points::meeting_threshold(old_level));
    model.offer_count = Set(current.offer_count - points::offer_threshold(old_level));
    model.sale_count = Set(current.sale_count - points::sale_threshold(old_level));
    let updated = model.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_profile_defaults() -> Result<()> {
        let db = setup_test_db().await?;

        let profile = create_test_profile(&db, "u1", "Anna").await?;
        assert_eq!(profile.id, "u1");
        assert_eq!(profile.name, "Anna");
        assert_eq!(profile.level, 1);
        assert_eq!(profile.points, 0.0);
        assert_eq!(profile.meeting_count, 0);
        assert_eq!(profile.offer_count, 0);
        assert_eq!(profile.sale_count, 0.0);
        assert_eq!(profile.booking_count, 0);
        assert!(profile.active);
        assert_eq!(profile.role, profile::Role::User);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_profile_rejects_empty_name() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_profile(
            &db,
            "u1".to_string(),
            "   ".to_string(),
            "a@example.com".to_string(),
            profile::Role::User,
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_profiles_orders_by_points_and_skips_inactive() -> Result<()> {
        let db = setup_test_db().await?;

        let low = create_test_profile(&db, "low", "Low").await?;
        let high = create_test_profile(&db, "high", "High").await?;
        let gone = create_test_profile(&db, "gone", "Gone").await?;

        set_profile_points(&db, &low.id, 100.0).await?;
        set_profile_points(&db, &high.id, 900.0).await?;
        set_profile_points(&db, &gone.id, 5000.0).await?;
        deactivate_profile(&db, &gone.id).await?;

        let profiles = list_profiles(&db).await?;
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].id, "high");
        assert_eq!(profiles[1].id, "low");

        Ok(())
    }

    #[tokio::test]
    async fn test_top_profiles_requires_positive_points() -> Result<()> {
        let db = setup_test_db().await?;

        for (id, pts) in [("a", 300.0), ("b", 200.0), ("c", 100.0), ("d", 0.0)] {
            let p = create_test_profile(&db, id, id).await?;
            set_profile_points(&db, &p.id, pts).await?;
        }

        let top = top_profiles(&db, 3).await?;
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].id, "a");
        assert_eq!(top[2].id, "c");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_settings_goals_and_name() -> Result<()> {
        let (db, profile) = setup_with_profile().await?;

        let updated = update_settings(
            &db,
            &profile.id,
            SettingsUpdate {
                name: Some("New Name".to_string()),
                avatar: Some("https://cdn.example.com/a.png".to_string()),
                meeting_goal: Some(10),
                offer_goal: Some(8),
                sale_goal: Some(50000.0),
                booking_goal: Some(12),
            },
        )
        .await?;

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.avatar.as_deref(), Some("https://cdn.example.com/a.png"));
        assert_eq!(updated.meeting_goal, 10);
        assert_eq!(updated.offer_goal, 8);
        assert_eq!(updated.sale_goal, 50000.0);
        assert_eq!(updated.booking_goal, 12);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_settings_rejects_zero_goal() -> Result<()> {
        let (db, profile) = setup_with_profile().await?;

        let result = update_settings(
            &db,
            &profile.id,
            SettingsUpdate {
                meeting_goal: Some(0),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_deactivate_keeps_row() -> Result<()> {
        let (db, profile) = setup_with_profile().await?;

        let updated = deactivate_profile(&db, &profile.id).await?;
        assert!(!updated.active);

        // Row still resolvable for record ownership
        let found = get_profile(&db, &profile.id).await?;
        assert!(found.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_level_up_rejected_below_thresholds() -> Result<()> {
        let (db, profile) = setup_with_profile().await?;

        set_profile_counters(&db, &profile.id, 8, 6, 13999.0, 0).await?;

        let result = level_up(&db, &profile.id).await;
        assert!(matches!(result, Err(Error::LevelUpNotEligible { level: 1 })));

        // Profile unchanged
        let unchanged = require_profile(&db, &profile.id).await?;
        assert_eq!(unchanged.level, 1);
        assert_eq!(unchanged.meeting_count, 8);
        assert_eq!(unchanged.sale_count, 13999.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_level_up_rolls_over_surplus() -> Result<()> {
        let (db, profile) = setup_with_profile().await?;

        set_profile_points(&db, &profile.id, 44000.0).await?;
        set_profile_counters(&db, &profile.id, 10, 7, 15500.0, 3).await?;

        let updated = level_up(&db, &profile.id).await?;
        assert_eq!(updated.level, 2);
        assert_eq!(updated.meeting_count, 2);
        assert_eq!(updated.offer_count, 1);
        assert_eq!(updated.sale_count, 1500.0);
        // Booking counter and points are untouched
        assert_eq!(updated.booking_count, 3);
        assert_eq!(updated.points, 44000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_level_up_after_real_record_pipeline() -> Result<()> {
        let (db, profile) = setup_with_profile().await?;

        // Qualify for level 2 through the actual create operations
        for _ in 0..8 {
            create_test_meeting(&db, &profile.id).await?;
        }
        for _ in 0..6 {
            create_test_offer(&db, &profile.id, 1).await?;
        }
        create_test_sale(&db, &profile.id, 14000.0).await?;

        let before = require_profile(&db, &profile.id).await?;
        assert_eq!(before.meeting_count, 8);
        assert_eq!(before.offer_count, 6);
        assert_eq!(before.sale_count, 14000.0);
        assert_eq!(before.points, 8.0 * 1500.0 + 6.0 * 3000.0 + 14000.0);

        let updated = level_up(&db, &profile.id).await?;
        assert_eq!(updated.level, 2);
        assert_eq!(updated.meeting_count, 0);
        assert_eq!(updated.offer_count, 0);
        assert_eq!(updated.sale_count, 0.0);
        // All-time points survive the reset
        assert_eq!(updated.points, 44000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_level_up_thresholds_scale_at_higher_levels() -> Result<()> {
        let (db, profile) = setup_with_profile().await?;

        set_profile_counters(&db, &profile.id, 16, 12, 28000.0, 0).await?;
        set_profile_level(&db, &profile.id, 2).await?;

        let updated = level_up(&db, &profile.id).await?;
        assert_eq!(updated.level, 3);
        assert_eq!(updated.meeting_count, 0);
        assert_eq!(updated.offer_count, 0);
        assert_eq!(updated.sale_count, 0.0);

        // Immediately re-firing must re-qualify from fresh counters - it fails
        let again = level_up(&db, &profile.id).await;
        assert!(matches!(again, Err(Error::LevelUpNotEligible { level: 3 })));

        Ok(())
    }
}
