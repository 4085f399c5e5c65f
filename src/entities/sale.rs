//! Sale entity - A closed sale with revenue and billing details.
//!
//! Revenue is in SEK and feeds `points` at 1:1 as well as the `sale_count`
//! level-up counter. Sold services attach through the `sale_services` join
//! table, each join row carrying a subscription label.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer classification for a sale
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Customer {
    /// First purchase from this customer
    #[sea_orm(string_value = "NEW")]
    #[serde(rename = "NEW")]
    New,
    /// Returning customer
    #[sea_orm(string_value = "REPEAT")]
    #[serde(rename = "REPEAT")]
    Repeat,
}

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Counterparty or company name
    pub name: String,
    /// Calendar date of the sale (user-editable)
    pub date: Date,
    /// Time of day, as entered by the user
    pub time: String,
    /// Number of sales in this entry (1-5)
    pub amount: i32,
    /// Revenue in SEK; feeds points 1:1
    pub revenue: f64,
    /// Billing-term label (e.g. "30 dagar")
    pub invoice: String,
    /// New or repeat customer, when recorded
    pub customer: Option<Customer>,
    /// Owning profile, immutable after creation
    pub profile_id: String,
    /// Server timestamp at insert, immutable; used for monthly windowing
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Sale and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each sale belongs to one profile
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ProfileId",
        to = "super::profile::Column::Id"
    )]
    Profile,
    /// One sale has many service line-items
    #[sea_orm(has_many = "super::sale_service::Entity")]
    SaleServices,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::sale_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleServices.def()
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        super::sale_service::Relation::Service.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::sale_service::Relation::Sale.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
