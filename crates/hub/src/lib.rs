//! Storage Hub - storage sync layer and warehouse service.
//!
//! This crate connects the job lifecycle from `storage-hub-core` to durable
//! storage:
//!
//! - [`store`] - remote document stores (PostgREST over HTTP, `PostgreSQL`)
//! - [`cache`] - local JSON fallback copy
//! - [`sync`] - read-through/write-through layer with local fallback
//! - [`service`] - the [`Warehouse`] operations used by collaborators
//! - [`config`] - environment-driven configuration
//!
//! # Example
//!
//! ```rust,ignore
//! let config = HubConfig::from_env()?;
//! let warehouse = Warehouse::from_config(&config).await?;
//! let job = warehouse.pull_job(&job_id, 3).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod error;
pub mod service;
pub mod store;
pub mod sync;

pub use cache::{CacheError, LocalCache};
pub use config::{ConfigError, HubConfig, PostgresConfig, RemoteConfig, RestConfig, StoreKind};
pub use error::{HubError, PersistenceError};
pub use service::Warehouse;
pub use store::{DocumentStore, PgDocumentStore, RestDocumentStore, StoreError};
pub use sync::SyncLayer;
