//! Meeting entity - A completed sales meeting logged by a profile.
//!
//! The user-editable `date` records when the meeting took place; `created_at`
//! is set by the server on insert and drives monthly windowing. The two are
//! deliberately distinct: a meeting logged today with last week's date still
//! counts toward this month's statistics.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meeting database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meetings")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the meeting
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Counterparty or company name
    pub name: String,
    /// Calendar date of the meeting (user-editable)
    pub date: Date,
    /// Time of day, as entered by the user
    pub time: String,
    /// Owning profile, immutable after creation
    pub profile_id: String,
    /// Server timestamp at insert, immutable; used for monthly windowing
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Meeting and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each meeting belongs to one profile
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
