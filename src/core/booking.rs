//! Booking business logic.
//!
//! Bookings mirror meetings with a smaller point value (500 per booking).
//! The booking counter feeds its own goal bar but is not a level-up gate,
//! an asymmetry preserved from the game rules.

use crate::{
    core::points::{self, LedgerDelta, RecordKind},
    core::stats::MonthWindow,
    entities::{Booking, Profile, booking, profile},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Creates a booking and credits the owning profile atomically.
pub async fn create_booking(
    db: &DatabaseConnection,
    profile_id: &str,
    name: String,
    date: NaiveDate,
    time: String,
) -> Result<booking::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Booking name cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    let model = booking::ActiveModel {
        name: Set(name.trim().to_string()),
        date: Set(date),
        time: Set(time),
        profile_id: Set(profile_id.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let result = model.insert(&txn).await?;

    points::apply_ledger_delta(
        &txn,
        profile_id,
        LedgerDelta::create(RecordKind::Booking, 1.0),
    )
    .await?;

    txn.commit().await?;
    Ok(result)
}

/// Updates a booking's display fields; the ledger is untouched.
pub async fn update_booking(
    db: &DatabaseConnection,
    id: i64,
    name: String,
    date: NaiveDate,
    time: String,
) -> Result<booking::Model> {
    let booking = Booking::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "booking",
            id,
        })?;

    let mut model: booking::ActiveModel = booking.into();
    model.name = Set(name.trim().to_string());
    model.date = Set(date);
    model.time = Set(time);
    model.update(db).await.map_err(Into::into)
}

/// Deletes a booking and reverses its contribution on the owning profile.
pub async fn delete_booking(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let booking = Booking::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "booking",
            id,
        })?;

    let owner = booking.profile_id.clone();
    booking.delete(&txn).await?;

    points::apply_ledger_delta(&txn, &owner, LedgerDelta::delete(RecordKind::Booking, 1.0))
        .await?;

    txn.commit().await?;
    Ok(())
}

/// Current-month bookings with their owners, newest `date` first.
pub async fn list_bookings(
    db: &DatabaseConnection,
    as_of: NaiveDate,
) -> Result<Vec<(booking::Model, Option<profile::Model>)>> {
    let window = MonthWindow::containing(as_of);
    Booking::find()
        .find_also_related(Profile)
        .filter(booking::Column::CreatedAt.gte(window.start))
        .filter(booking::Column::CreatedAt.lt(window.end))
        .order_by_desc(booking::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}
