//! Meeting business logic.
//!
//! A meeting is worth one quantity unit, so creating one awards 1500 points
//! and bumps the meeting counter; the ledger update rides in the same
//! transaction as the row write. Editing a meeting only touches its display
//! fields - the quantity is fixed at 1, so no ledger delta applies.

use crate::{
    core::points::{self, LedgerDelta, RecordKind},
    core::stats::MonthWindow,
    entities::{Meeting, Profile, meeting, profile},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Creates a meeting and credits the owning profile atomically.
pub async fn create_meeting(
    db: &DatabaseConnection,
    profile_id: &str,
    name: String,
    date: NaiveDate,
    time: String,
) -> Result<meeting::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Meeting name cannot be empty".to_string(),
        });
    }

    // Record insert and ledger credit commit or roll back together
    let txn = db.begin().await?;

    let model = meeting::ActiveModel {
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
        LedgerDelta::create(RecordKind::Meeting, 1.0),
    )
    .await?;

    txn.commit().await?;
    Ok(result)
}

/// Updates a meeting's display fields. Quantity is fixed, so the ledger is
/// untouched.
pub async fn update_meeting(
    db: &DatabaseConnection,
    id: i64,
    name: String,
    date: NaiveDate,
    time: String,
) -> Result<meeting::Model> {
    let meeting = Meeting::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "meeting",
            id,
        })?;

    let mut model: meeting::ActiveModel = meeting.into();
    model.name = Set(name.trim().to_string());
    model.date = Set(date);
    model.time = Set(time);
    model.update(db).await.map_err(Into::into)
}

/// Deletes a meeting and reverses its contribution on the owning profile.
pub async fn delete_meeting(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let meeting = Meeting::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "meeting",
            id,
        })?;

    // Reversal targets the owner, not whoever issued the delete
    let owner = meeting.profile_id.clone();
    meeting.delete(&txn).await?;

    points::apply_ledger_delta(&txn, &owner, LedgerDelta::delete(RecordKind::Meeting, 1.0))
        .await?;

    txn.commit().await?;
    Ok(())
}

/// Current-month meetings with their owners, newest `date` first.
pub async fn list_meetings(
    db: &DatabaseConnection,
    as_of: NaiveDate,
) -> Result<Vec<(meeting::Model, Option<profile::Model>)>> {
    let window = MonthWindow::containing(as_of);
    Meeting::find()
        .find_also_related(Profile)
        .filter(meeting::Column::CreatedAt.gte(window.start))
        .filter(meeting::Column::CreatedAt.lt(window.end))
        .order_by_desc(meeting::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}
