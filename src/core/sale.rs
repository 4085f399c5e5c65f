//! Sale business logic.
//!
//! Revenue drives points at 1:1 and accumulates in the `sale_count` level-up
//! counter, so updates delta-adjust on the revenue difference read from the
//! pre-update row. Sold services attach as `sale_services` join rows created
//! in the same transaction as the sale; the per-sale provision is derived
//! from the attached services' commission percentages.

use crate::{
    core::points::{self, LedgerDelta, RecordKind},
    core::stats::MonthWindow,
    entities::{
        Profile, Sale, SaleService, Service, profile, sale, sale_service, service,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

/// A service line-item attached to a new sale.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    /// Catalog service being sold
    pub service_id: i64,
    /// Billing label: one-off vs recurring
    pub subscription: String,
}

/// Input for creating a sale.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    /// Counterparty or company name
    pub name: String,
    /// Calendar date of the sale
    pub date: NaiveDate,
    /// Time of day
    pub time: String,
    /// Number of sales in this entry (1-5)
    pub amount: i32,
    /// Revenue in SEK
    pub revenue: f64,
    /// Billing-term label
    pub invoice: String,
    /// New or repeat customer
    pub customer: Option<sale::Customer>,
    /// Service line-items sold with this sale
    #[serde(default)]
    pub services: Vec<ServiceLine>,
}

/// Editable fields for updating a sale. Attached services are immutable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleUpdate {
    /// Counterparty or company name
    pub name: String,
    /// Calendar date of the sale
    pub date: NaiveDate,
    /// Time of day
    pub time: String,
    /// Number of sales in this entry (1-5)
    pub amount: i32,
    /// Revenue in SEK
    pub revenue: f64,
    /// Billing-term label
    pub invoice: String,
    /// New or repeat customer
    pub customer: Option<sale::Customer>,
}

fn validate(name: &str, amount: i32, revenue: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Sale name cannot be empty".to_string(),
        });
    }
    if !(1..=5).contains(&amount) {
        return Err(Error::InvalidAmount {
            message: format!("Sale amount must be between 1 and 5, got {amount}"),
        });
    }
    if !revenue.is_finite() || revenue <= 0.0 {
        return Err(Error::InvalidAmount {
            message: format!("Sale revenue must be a positive number, got {revenue}"),
        });
    }
    Ok(())
}

/// Creates a sale with its service line-items and credits the owning profile,
/// all in one transaction.
pub async fn create_sale(
    db: &DatabaseConnection,
    profile_id: &str,
    input: SaleInput,
) -> Result<sale::Model> {
    validate(&input.name, input.amount, input.revenue)?;

    let txn = db.begin().await?;

    let model = sale::ActiveModel {
        name: Set(input.name.trim().to_string()),
        date: Set(input.date),
        time: Set(input.time),
        amount: Set(input.amount),
        revenue: Set(input.revenue),
        invoice: Set(input.invoice),
        customer: Set(input.customer),
        profile_id: Set(profile_id.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let result = model.insert(&txn).await?;

    for line in input.services {
        sale_service::ActiveModel {
            sale_id: Set(result.id),
            service_id: Set(line.service_id),
            subscription: Set(line.subscription),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    points::apply_ledger_delta(
        &txn,
        profile_id,
        LedgerDelta::create(RecordKind::Sale, input.revenue),
    )
    .await?;

    txn.commit().await?;
    Ok(result)
}

/// Updates a sale, delta-adjusting the ledger for any revenue change.
pub async fn update_sale(
    db: &DatabaseConnection,
    id: i64,
    input: SaleUpdate,
) -> Result<sale::Model> {
    validate(&input.name, input.amount, input.revenue)?;

    let txn = db.begin().await?;

    let sale = Sale::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::RecordNotFound { kind: "sale", id })?;

    let delta = LedgerDelta::update(RecordKind::Sale, sale.revenue, input.revenue);
    let owner = sale.profile_id.clone();

    let mut model: sale::ActiveModel = sale.into();
    model.name = Set(input.name.trim().to_string());
    model.date = Set(input.date);
    model.time = Set(input.time);
    model.amount = Set(input.amount);
    model.revenue = Set(input.revenue);
    model.invoice = Set(input.invoice);
    model.customer = Set(input.customer);
    let result = model.update(&txn).await?;

    points::apply_ledger_delta(&txn, &owner, delta).await?;

    txn.commit().await?;
    Ok(result)
}

/// Deletes a sale, its line-items, and its full ledger contribution.
pub async fn delete_sale(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let sale = Sale::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::RecordNotFound { kind: "sale", id })?;

    let owner = sale.profile_id.clone();
    let revenue = sale.revenue;

    SaleService::delete_many()
        .filter(sale_service::Column::SaleId.eq(id))
        .exec(&txn)
        .await?;
    sale.delete(&txn).await?;

    points::apply_ledger_delta(
        &txn,
        &owner,
        LedgerDelta::delete(RecordKind::Sale, revenue),
    )
    .await?;

    txn.commit().await?;
    Ok(())
}

/// A sale's service line-item joined with its catalog entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    /// Billing label from the join row
    pub subscription: String,
    /// The sold service
    pub service: service::Model,
}

/// A sale enriched with its owner, line-items, and derived provision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetails {
    /// The sale row
    #[serde(flatten)]
    pub sale: sale::Model,
    /// Owning profile, when still resolvable
    pub profile: Option<profile::Model>,
    /// Attached service line-items
    pub services: Vec<SaleLine>,
    /// Total provision in SEK, formatted with 2 decimals
    pub provision: String,
}

/// Total provision for a sale: each attached service earns
/// `revenue * provision% / 100`, summed and formatted with 2 decimals.
///
/// An unparseable provision percentage contributes nothing.
#[must_use]
pub fn provision_total(revenue: f64, lines: &[SaleLine]) -> String {
    let total: f64 = lines
        .iter()
        .map(|line| revenue * (line.service.provision.parse::<f64>().unwrap_or(0.0) / 100.0))
        .sum();
    format!("{total:.2}")
}

/// Current-month sales with owners, line-items, and provisions, newest
/// `date` first.
pub async fn list_sales(db: &DatabaseConnection, as_of: NaiveDate) -> Result<Vec<SaleDetails>> {
    let window = MonthWindow::containing(as_of);
    let sales = Sale::find()
        .find_also_related(Profile)
        .filter(sale::Column::CreatedAt.gte(window.start))
        .filter(sale::Column::CreatedAt.lt(window.end))
        .order_by_desc(sale::Column::Date)
        .all(db)
        .await?;

    let mut details = Vec::with_capacity(sales.len());
    for (sale, profile) in sales {
        let lines = SaleService::find()
            .find_also_related(Service)
            .filter(sale_service::Column::SaleId.eq(sale.id))
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(join, service)| {
                service.map(|service| SaleLine {
                    subscription: join.subscription,
                    service,
                })
            })
            .collect::<Vec<_>>();

        let provision = provision_total(sale.revenue, &lines);
        details.push(SaleDetails {
            sale,
            profile,
            services: lines,
            provision,
        });
    }

    Ok(details)
}
