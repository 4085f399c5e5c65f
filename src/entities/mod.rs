//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod booking;
pub mod meeting;
pub mod offer;
pub mod profile;
pub mod sale;
pub mod sale_service;
pub mod service;

// Re-export specific types to avoid conflicts
pub use booking::{Column as BookingColumn, Entity as Booking, Model as BookingModel};
pub use meeting::{Column as MeetingColumn, Entity as Meeting, Model as MeetingModel};
pub use offer::{Column as OfferColumn, Entity as Offer, Model as OfferModel};
pub use profile::{Column as ProfileColumn, Entity as Profile, Model as ProfileModel};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
pub use sale_service::{
    Column as SaleServiceColumn, Entity as SaleService, Model as SaleServiceModel,
};
pub use service::{Column as ServiceColumn, Entity as Service, Model as ServiceModel};
