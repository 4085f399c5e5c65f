//! Service catalog business logic.
//!
//! Services are the sellable catalog entries sales attach to. Deletion is
//! not guarded against referencing sales: a join row pointing at a removed
//! service simply stops resolving, which the sale listing tolerates.

use crate::{
    entities::{SaleService, Service, sale_service, service},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, Set, prelude::*};

/// Creates a catalog service. The provision percentage is kept verbatim as
/// a decimal string.
pub async fn create_service(
    db: &DatabaseConnection,
    name: String,
    provision: String,
) -> Result<service::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Service name cannot be empty".to_string(),
        });
    }

    let model = service::ActiveModel {
        name: Set(name.trim().to_string()),
        provision: Set(provision),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Updates a service's name and provision.
pub async fn update_service(
    db: &DatabaseConnection,
    id: i64,
    name: String,
    provision: String,
) -> Result<service::Model> {
    let service = Service::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "service",
            id,
        })?;

    let mut model: service::ActiveModel = service.into();
    model.name = Set(name.trim().to_string());
    model.provision = Set(provision);
    model.update(db).await.map_err(Into::into)
}

/// Deletes a service from the catalog.
///
/// Join rows referencing it are left in place and stop resolving.
pub async fn delete_service(db: &DatabaseConnection, id: i64) -> Result<()> {
    let service = Service::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "service",
            id,
        })?;

    service.delete(db).await?;
    Ok(())
}

/// A catalog service with its sale count, for popularity-ordered listings.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUsage {
    /// The catalog entry
    #[serde(flatten)]
    pub service: service::Model,
    /// How many sale line-items reference it
    pub sale_count: u64,
}

/// All services ordered by how often they have been sold, most first.
pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<ServiceUsage>> {
    let services = Service::find().all(db).await?;

    let mut usage = Vec::with_capacity(services.len());
    for service in services {
        let sale_count = SaleService::find()
            .filter(sale_service::Column::ServiceId.eq(service.id))
            .count(db)
            .await?;
        usage.push(ServiceUsage {
            service,
            sale_count,
        });
    }
    usage.sort_by(|a, b| b.sale_count.cmp(&a.sale_count));

    Ok(usage)
}
