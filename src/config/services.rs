//! Service catalog loading from config.toml
//!
//! This module provides functionality to load the initial service catalog
//! from a TOML configuration file. The services defined in config.toml are
//! used to seed the database on first run, so sales can be linked to the
//! commissionable products right away.

use crate::entities::{service, Service};
use crate::errors::{Error, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of service configurations to seed
    pub services: Vec<ServiceConfig>,
}

/// Configuration for a single sellable service
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    /// Name of the service
    pub name: String,
    /// Provision percentage as a decimal string (e.g. "7.5")
    pub provision: String,
}

/// Loads the service catalog from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the service catalog from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

/// Seeds the service table from the catalog if it is currently empty.
///
/// An already-populated table is left untouched so admin edits made through
/// the API survive restarts.
pub async fn seed_initial_services(db: &DatabaseConnection, config: &Config) -> Result<()> {
    let existing = Service::find().count(db).await?;
    if existing > 0 {
        return Ok(());
    }

    for entry in &config.services {
        let row = service::ActiveModel {
            name: Set(entry.name.clone()),
            provision: Set(entry.provision.clone()),
            ..Default::default()
        };
        row.insert(db).await?;
    }

    info!(count = config.services.len(), "seeded initial service catalog");
    Ok(())
}
