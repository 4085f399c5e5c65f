//! Booking entity - A booked (future) meeting logged by a profile.
//!
//! Bookings share the meeting shape: `date` is user-editable, `created_at`
//! is server-set and drives monthly windowing. The booking counter feeds the
//! points score and its own goal bar but is not a level-up gate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Booking database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the booking
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Counterparty or company name
    pub name: String,
    /// Calendar date the meeting is booked for (user-editable)
    pub date: Date,
    /// Time of day, as entered by the user
    pub time: String,
    /// Owning profile, immutable after creation
    pub profile_id: String,
    /// Server timestamp at insert, immutable; used for monthly windowing
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Booking and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each booking belongs to one profile
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
