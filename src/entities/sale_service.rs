//! `SaleService` entity - Join row between a sale and a sold service.
//!
//! Each row carries the `subscription` label distinguishing one-off from
//! recurring billing for that line-item.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale-service join row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sale_services")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the line-item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The sale this line-item belongs to
    pub sale_id: i64,
    /// The service that was sold
    pub service_id: i64,
    /// Billing label: one-off vs recurring (e.g. `"Engångs"`, `"Löpande"`)
    pub subscription: String,
}

/// Defines relationships between `SaleService` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line-item belongs to one sale
    #[sea_orm(
        belongs_to = "super::sale::Entity",
        from = "Column::SaleId",
        to = "super::sale::Column::Id"
    )]
    Sale,
    /// Each line-item references one service
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::Id"
    )]
    Service,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sale.def()
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
