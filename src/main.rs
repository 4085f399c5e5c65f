//! Server entry point: configuration, database, seeding, HTTP listener.

use dotenvy::dotenv;
use salesboard::{
    api::{self, AppState},
    config,
    errors::Result,
    notify::Notifier,
};
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database
    let db = config::database::create_connection(&app_config.database_url)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Seed the service catalog when a config.toml is present
    if Path::new("config.toml").exists() {
        let catalog = config::services::load_default_config()?;
        config::services::seed_initial_services(&db, &catalog)
            .await
            .inspect_err(|e| error!("Failed to seed service catalog: {e}"))?;
    } else {
        info!("No config.toml found, skipping service catalog seeding.");
    }

    // 6. Run the HTTP server
    let notifier = Notifier::new(app_config.webhook_url.clone());
    let router = api::router(AppState {
        db,
        notifier,
        digest_token: app_config.digest_token.clone(),
    });
    let listener = tokio::net::TcpListener::bind(&app_config.bind_addr).await?;
    info!(addr = %app_config.bind_addr, "Listening for requests.");
    axum::serve(listener, router).await?;

    Ok(())
}
