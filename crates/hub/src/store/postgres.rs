//! `PostgreSQL` store.
//!
//! # Table: `storage_hub.system_data`
//!
//! | column | type |
//! |---|---|
//! | `id` | `TEXT PRIMARY KEY` |
//! | `data` | `JSONB NOT NULL` |
//! | `updated_at` | `TIMESTAMPTZ NOT NULL DEFAULT NOW()` |
//!
//! # Migrations
//!
//! Migrations are stored in `crates/hub/migrations/` and run via:
//! ```bash
//! cargo run -p storage-hub-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use storage_hub_core::SystemData;

use super::{DocumentStore, StoreError};

/// Schema migrations for the document table.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create a `PostgreSQL` connection pool.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `acquire_timeout` - How long to wait for a free connection
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &SecretString,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(acquire_timeout)
        .connect(database_url.expose_secret())
        .await
}

/// System document stored in `storage_hub.system_data`.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    key: String,
}

impl PgDocumentStore {
    #[must_use]
    pub fn new(pool: PgPool, key: &str) -> Self {
        Self {
            pool,
            key: key.to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    #[tracing::instrument(skip(self), fields(key = %self.key))]
    async fn load(&self) -> Result<Option<SystemData>, StoreError> {
        let row: Option<serde_json::Value> = sqlx::query_scalar(
            r"
            SELECT data FROM storage_hub.system_data
            WHERE id = $1
            ",
        )
        .bind(&self.key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::from)
    }

    #[tracing::instrument(skip(self, data), fields(key = %self.key, jobs = data.jobs.len()))]
    async fn save(&self, data: &SystemData) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO storage_hub.system_data (id, data, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (id) DO UPDATE SET data = $2, updated_at = NOW()
            ",
        )
        .bind(&self.key)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
