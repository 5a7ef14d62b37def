//! Database migration command.
//!
//! Creates the `storage_hub.system_data` table used by the `postgres` store.
//!
//! # Usage
//!
//! ```bash
//! storage-hub migrate
//! ```
//!
//! # Environment Variables
//!
//! - `HUB_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! `crates/hub/migrations/`, named `YYYYMMDDHHMMSS_description.sql`.

use std::time::Duration;

use storage_hub::store::{MIGRATOR, create_pool};
use storage_hub::{ConfigError, PostgresConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns error if the database URL is missing, the connection fails, or a
/// migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    let config = PostgresConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.database_url, Duration::from_secs(10)).await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
