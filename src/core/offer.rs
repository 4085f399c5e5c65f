//! Offer business logic.
//!
//! One offer row can batch up to five sent offers; the ledger credits 3000
//! points per offer in the batch. Because the batch size is editable, offer
//! updates compute a delta against the pre-update row - read inside the same
//! transaction - so accounting stays order-independent.

use crate::{
    core::points::{self, LedgerDelta, RecordKind},
    core::stats::MonthWindow,
    entities::{Offer, Profile, offer, profile},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

fn validate_amount(amount: i32) -> Result<()> {
    if !(1..=5).contains(&amount) {
        return Err(Error::InvalidAmount {
            message: format!("Offer amount must be between 1 and 5, got {amount}"),
        });
    }
    Ok(())
}

/// Creates an offer entry and credits the owning profile atomically.
pub async fn create_offer(
    db: &DatabaseConnection,
    profile_id: &str,
    name: String,
    date: NaiveDate,
    time: String,
    amount: i32,
) -> Result<offer::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Offer name cannot be empty".to_string(),
        });
    }
    validate_amount(amount)?;

    let txn = db.begin().await?;

    let model = offer::ActiveModel {
        name: Set(name.trim().to_string()),
        date: Set(date),
        time: Set(time),
        amount: Set(amount),
        profile_id: Set(profile_id.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let result = model.insert(&txn).await?;

    points::apply_ledger_delta(
        &txn,
        profile_id,
        LedgerDelta::create(RecordKind::Offer, f64::from(amount)),
    )
    .await?;

    txn.commit().await?;
    Ok(result)
}

/// Updates an offer entry, delta-adjusting the ledger for any batch-size
/// change.
pub async fn update_offer(
    db: &DatabaseConnection,
    id: i64,
    name: String,
    date: NaiveDate,
    time: String,
    amount: i32,
) -> Result<offer::Model> {
    validate_amount(amount)?;

    let txn = db.begin().await?;

    // The pre-update row must be in hand before mutating
    let offer = Offer::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::RecordNotFound { kind: "offer", id })?;

    let delta = LedgerDelta::update(
        RecordKind::Offer,
        f64::from(offer.amount),
        f64::from(amount),
    );
    let owner = offer.profile_id.clone();

    let mut model: offer::ActiveModel = offer.into();
    model.name = Set(name.trim().to_string());
    model.date = Set(date);
    model.time = Set(time);
    model.amount = Set(amount);
    let result = model.update(&txn).await?;

    points::apply_ledger_delta(&txn, &owner, delta).await?;

    txn.commit().await?;
    Ok(result)
}

/// Deletes an offer entry and reverses its full contribution.
pub async fn delete_offer(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let offer = Offer::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::RecordNotFound { kind: "offer", id })?;

    let owner = offer.profile_id.clone();
    let amount = offer.amount;
    offer.delete(&txn).await?;

    points::apply_ledger_delta(
        &txn,
        &owner,
        LedgerDelta::delete(RecordKind::Offer, f64::from(amount)),
    )
    .await?;

    txn.commit().await?;
    Ok(())
}

/// Current-month offer entries with their owners, newest `date` first.
pub async fn list_offers(
    db: &DatabaseConnection,
    as_of: NaiveDate,
) -> Result<Vec<(offer::Model, Option<profile::Model>)>> {
    let window = MonthWindow::containing(as_of);
    Offer::find()
        .find_also_related(Profile)
        .filter(offer::Column::CreatedAt.gte(window.start))
        .filter(offer::Column::CreatedAt.lt(window.end))
        .order_by_desc(offer::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}
