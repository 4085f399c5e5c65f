//! Database configuration module.
//!
//! Handles `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions via `Schema::create_table_from_entity`,
//! so the database schema always matches the Rust structs without manual SQL.

use crate::entities::{Booking, Meeting, Offer, Profile, Sale, SaleService, Service};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database at the given URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions, skipping existing ones.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = [
        schema.create_table_from_entity(Profile),
        schema.create_table_from_entity(Meeting),
        schema.create_table_from_entity(Offer),
        schema.create_table_from_entity(Sale),
        schema.create_table_from_entity(Booking),
        schema.create_table_from_entity(Service),
        schema.create_table_from_entity(SaleService),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        booking::Model as BookingModel, meeting::Model as MeetingModel,
        offer::Model as OfferModel, profile::Model as ProfileModel, sale::Model as SaleModel,
        sale_service::Model as SaleServiceModel, service::Model as ServiceModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Every table exists and is queryable
        let _: Vec<ProfileModel> = Profile::find().limit(1).all(&db).await?;
        let _: Vec<MeetingModel> = Meeting::find().limit(1).all(&db).await?;
        let _: Vec<OfferModel> = Offer::find().limit(1).all(&db).await?;
        let _: Vec<SaleModel> = Sale::find().limit(1).all(&db).await?;
        let _: Vec<BookingModel> = Booking::find().limit(1).all(&db).await?;
        let _: Vec<ServiceModel> = Service::find().limit(1).all(&db).await?;
        let _: Vec<SaleServiceModel> = SaleService::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<ProfileModel> = Profile::find().limit(1).all(&db).await?;
        Ok(())
    }
}
