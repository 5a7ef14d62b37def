//! Remote stores for the system document.
//!
//! The whole aggregate is stored as one opaque JSON document under a fixed
//! key. Stores know nothing about jobs or customers beyond serializing them.
//!
//! - [`RestDocumentStore`] - PostgREST-compatible HTTP table
//! - [`PgDocumentStore`] - `PostgreSQL` table in the `storage_hub` schema

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod memory;
mod postgres;
mod rest;

pub use postgres::{MIGRATOR, PgDocumentStore, create_pool};
pub use rest::RestDocumentStore;

use std::sync::Arc;

use async_trait::async_trait;
use storage_hub_core::SystemData;
use thiserror::Error;

use crate::config::{HubConfig, RemoteConfig};

/// Errors that can occur when talking to a remote store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The service rejected the API key.
    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The stored document does not decode into the aggregate.
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Client setup failed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A remote home for the system document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Read the document. `Ok(None)` means no document has been written yet.
    async fn load(&self) -> Result<Option<SystemData>, StoreError>;

    /// Write the whole document, replacing any previous version.
    async fn save(&self, data: &SystemData) -> Result<(), StoreError>;
}

/// Build the store selected by `config`.
///
/// # Errors
///
/// Returns `StoreError` if the HTTP client cannot be built or the database
/// pool cannot connect.
pub async fn connect(config: &HubConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match &config.remote {
        RemoteConfig::Rest(rest) => Ok(Arc::new(RestDocumentStore::new(
            rest,
            &config.document_key,
            config.remote_timeout,
        )?)),
        RemoteConfig::Postgres(pg) => {
            let pool = create_pool(&pg.database_url, config.remote_timeout).await?;
            Ok(Arc::new(PgDocumentStore::new(pool, &config.document_key)))
        }
    }
}
