//! Service entity - A sellable service in the catalog.
//!
//! `provision` is the salesperson's commission percentage, stored as a
//! decimal string exactly as entered (e.g. `"12.5"`); it is parsed only when
//! computing per-sale provision amounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Service database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the service
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Service name (e.g. "Hemsida", "SEO")
    pub name: String,
    /// Commission percentage as a decimal string
    pub provision: String,
}

/// Defines relationships between Service and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One service appears in many sale line-items
    #[sea_orm(has_many = "super::sale_service::Entity")]
    SaleServices,
}

impl Related<super::sale_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleServices.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        super::sale_service::Relation::Sale.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::sale_service::Relation::Service.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
