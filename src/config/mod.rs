//! Configuration management for database and application settings.

/// Database connection and table creation
pub mod database;

/// Service catalog seeding from config.toml
pub mod services;

use crate::errors::Result;
use tracing::info;

/// Runtime application configuration, resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SeaORM database URL
    pub database_url: String,
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Team-channel webhook URL; notifications are disabled when unset
    pub webhook_url: Option<String>,
    /// Shared secret for the digest endpoint; the endpoint is disabled
    /// when unset
    pub digest_token: Option<String>,
}

/// Default local database path used when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/salesboard.sqlite?mode=rwc";

/// Default bind address used when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Loads the application configuration from environment variables.
///
/// `DATABASE_URL` and `BIND_ADDR` fall back to local defaults;
/// `WEBHOOK_URL` is optional and disables notifications when absent;
/// `DIGEST_TOKEN` is optional and disables the digest endpoint when absent.
pub fn load_app_configuration() -> Result<AppConfig> {
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let webhook_url = std::env::var("WEBHOOK_URL").ok();
    let digest_token = std::env::var("DIGEST_TOKEN").ok();

    if webhook_url.is_none() {
        info!("WEBHOOK_URL not set, channel notifications disabled");
    }
    if digest_token.is_none() {
        info!("DIGEST_TOKEN not set, digest endpoint disabled");
    }

    Ok(AppConfig {
        database_url,
        bind_addr,
        webhook_url,
        digest_token,
    })
}
