//! Offer entity - A batch of offers sent to a counterparty.
//!
//! `amount` is the batch size (1-5): one row can represent several offers
//! sent at once, and monthly aggregates sum `amount` rather than counting
//! rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Offer database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offers")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the offer entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Counterparty or company name
    pub name: String,
    /// Calendar date the offers were sent (user-editable)
    pub date: Date,
    /// Time of day, as entered by the user
    pub time: String,
    /// Number of offers in this entry (1-5)
    pub amount: i32,
    /// Owning profile, immutable after creation
    pub profile_id: String,
    /// Server timestamp at insert, immutable; used for monthly windowing
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Offer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each offer entry belongs to one profile
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ProfileId",
        to = "super::profile::Column::Id"
    )]
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
