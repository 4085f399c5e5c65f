//! Shared test utilities for `Salesboard`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{booking, meeting, offer, profile, sale},
    entities,
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A profile model that never touches a database, for pure calculations.
///
/// Fresh ledger: level 1, zero points, zero counters, goals of 1.
#[must_use]
pub fn profile_fixture() -> entities::profile::Model {
    entities::profile::Model {
        id: "fixture".to_string(),
        name: "Fixture".to_string(),
        email: "fixture@example.com".to_string(),
        role: entities::profile::Role::User,
        active: true,
        avatar: None,
        points: 0.0,
        level: 1,
        meeting_count: 0,
        offer_count: 0,
        sale_count: 0.0,
        booking_count: 0,
        meeting_goal: 1,
        offer_goal: 1,
        sale_goal: 1.0,
        booking_goal: 1,
    }
}

/// Creates a test profile with sensible defaults.
///
/// # Defaults
/// * `email`: `"<id>@example.com"`
/// * `role`: `User`
pub async fn create_test_profile(
    db: &DatabaseConnection,
    id: &str,
    name: &str,
) -> Result<entities::profile::Model> {
    profile::create_profile(
        db,
        id.to_string(),
        name.to_string(),
        format!("{id}@example.com"),
        entities::profile::Role::User,
    )
    .await
}

/// Sets up a complete test environment with a profile.
/// Returns (db, profile) for common test scenarios.
pub async fn setup_with_profile() -> Result<(DatabaseConnection, entities::profile::Model)> {
    let db = setup_test_db().await?;
    let profile = create_test_profile(&db, "test-user", "Test User").await?;
    Ok((db, profile))
}

/// Overwrites a profile's point balance directly, bypassing the ledger.
pub async fn set_profile_points(
    db: &DatabaseConnection,
    profile_id: &str,
    points: f64,
) -> Result<()> {
    let row = entities::profile::ActiveModel {
        id: Set(profile_id.to_string()),
        points: Set(points),
        ..Default::default()
    };
    row.update(db).await?;
    Ok(())
}

/// Overwrites a profile's activity counters directly, bypassing the ledger.
pub async fn set_profile_counters(
    db: &DatabaseConnection,
    profile_id: &str,
    meetings: i32,
    offers: i32,
    sales: f64,
    bookings: i32,
) -> Result<()> {
    let row = entities::profile::ActiveModel {
        id: Set(profile_id.to_string()),
        meeting_count: Set(meetings),
        offer_count: Set(offers),
        sale_count: Set(sales),
        booking_count: Set(bookings),
        ..Default::default()
    };
    row.update(db).await?;
    Ok(())
}

/// Overwrites a profile's level directly.
pub async fn set_profile_level(
    db: &DatabaseConnection,
    profile_id: &str,
    level: i32,
) -> Result<()> {
    let row = entities::profile::ActiveModel {
        id: Set(profile_id.to_string()),
        level: Set(level),
        ..Default::default()
    };
    row.update(db).await?;
    Ok(())
}

/// Default calendar date used by record fixtures.
fn test_date() -> NaiveDate {
    Utc::now().date_naive()
}

/// Creates a test meeting on today's date.
pub async fn create_test_meeting(
    db: &DatabaseConnection,
    profile_id: &str,
) -> Result<entities::meeting::Model> {
    meeting::create_meeting(
        db,
        profile_id,
        "Test Meeting".to_string(),
        test_date(),
        "10:00".to_string(),
    )
    .await
}

/// Creates a test booking on today's date.
pub async fn create_test_booking(
    db: &DatabaseConnection,
    profile_id: &str,
) -> Result<entities::booking::Model> {
    booking::create_booking(
        db,
        profile_id,
        "Test Booking".to_string(),
        test_date(),
        "11:00".to_string(),
    )
    .await
}

/// Creates a test offer on today's date with the given amount.
pub async fn create_test_offer(
    db: &DatabaseConnection,
    profile_id: &str,
    amount: i32,
) -> Result<entities::offer::Model> {
    offer::create_offer(
        db,
        profile_id,
        "Test Offer".to_string(),
        test_date(),
        "12:00".to_string(),
        amount,
    )
    .await
}

/// Creates a single-unit test sale with the given revenue and no services.
pub async fn create_test_sale(
    db: &DatabaseConnection,
    profile_id: &str,
    revenue: f64,
) -> Result<entities::sale::Model> {
    sale::create_sale(
        db,
        profile_id,
        sale::SaleInput {
            name: "Test Sale".to_string(),
            date: test_date(),
            time: "13:00".to_string(),
            amount: 1,
            revenue,
            invoice: "30 dagar".to_string(),
            customer: Some(entities::sale::Customer::New),
            services: Vec::new(),
        },
    )
    .await
}
