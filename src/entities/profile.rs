//! Profile entity - A salesperson's persistent ledger.
//!
//! Each profile carries the all-time `points` score, the current `level`, the
//! per-area counters accumulated since the last level-up, and the user-edited
//! monthly goals. Profile ids are issued by the external auth collaborator,
//! so the primary key is an opaque string rather than an autoincrement.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile role - admins may manage users and the service catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Role {
    /// Full access, including user administration
    #[sea_orm(string_value = "ADMIN")]
    #[serde(rename = "ADMIN")]
    Admin,
    /// Regular salesperson
    #[sea_orm(string_value = "USER")]
    #[serde(rename = "USER")]
    User,
}

/// Profile database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Auth-issued user id (opaque, externally created)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Access role
    pub role: Role,
    /// Soft-delete flag - deactivated profiles keep their record history
    pub active: bool,
    /// Optional avatar URL
    pub avatar: Option<String>,
    /// All-time score; may go negative after deletions
    pub points: f64,
    /// Current level, starts at 1
    pub level: i32,
    /// Meetings logged since the last level-up
    pub meeting_count: i32,
    /// Offers sent since the last level-up
    pub offer_count: i32,
    /// Sale revenue accumulated since the last level-up (SEK)
    pub sale_count: f64,
    /// Bookings logged since the last level-up
    pub booking_count: i32,
    /// Monthly meeting target
    pub meeting_goal: i32,
    /// Monthly offer target
    pub offer_goal: i32,
    /// Monthly revenue target (SEK)
    pub sale_goal: f64,
    /// Monthly booking target
    pub booking_goal: i32,
}

/// Defines relationships between Profile and the record entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One profile owns many meetings
    #[sea_orm(has_many = "super::meeting::Entity")]
    Meetings,
    /// One profile owns many offers
    #[sea_orm(has_many = "super::offer::Entity")]
    Offers,
    /// One profile owns many sales
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
    /// One profile owns many bookings
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::meeting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meetings.def()
    }
}

impl Related<super::offer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offers.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
