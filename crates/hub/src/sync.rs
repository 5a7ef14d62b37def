//! Storage synchronization layer.
//!
//! The only path between the warehouse service and durable storage:
//!
//! - [`SyncLayer::fetch`] reads the remote document and refreshes the local
//!   fallback. When the remote is unreachable, slow or returns garbage it
//!   falls back to the cached copy, then to an empty aggregate. It never fails.
//! - [`SyncLayer::persist`] writes the whole aggregate remotely, then
//!   refreshes the fallback. A failed remote write leaves the fallback alone.

use std::sync::Arc;
use std::time::Duration;

use storage_hub_core::SystemData;
use tracing::{error, info, warn};

use crate::cache::LocalCache;
use crate::error::PersistenceError;
use crate::store::DocumentStore;

/// Read-through, write-through access to the system document.
#[derive(Clone)]
pub struct SyncLayer {
    remote: Arc<dyn DocumentStore>,
    cache: LocalCache,
    timeout: Duration,
}

impl SyncLayer {
    #[must_use]
    pub fn new(remote: Arc<dyn DocumentStore>, cache: LocalCache, timeout: Duration) -> Self {
        Self {
            remote,
            cache,
            timeout,
        }
    }

    #[must_use]
    pub const fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Current aggregate, degrading to the cached or empty aggregate when the
    /// remote store cannot be read.
    #[tracing::instrument(skip(self), fields(store = self.remote.name()))]
    pub async fn fetch(&self) -> SystemData {
        let reason = match tokio::time::timeout(self.timeout, self.remote.load()).await {
            Ok(Ok(Some(data))) => {
                self.refresh_cache(&data).await;
                return data;
            }
            Ok(Ok(None)) => {
                info!("remote store has no document yet, starting empty");
                return SystemData::empty();
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {}s", self.timeout.as_secs()),
        };

        match self.cache.load().await {
            Ok(Some(data)) => {
                warn!(
                    %reason,
                    cache = %self.cache.path().display(),
                    "remote read failed, using local copy"
                );
                data
            }
            Ok(None) => {
                warn!(%reason, "remote read failed and no local copy exists, using empty data");
                SystemData::empty()
            }
            Err(cache_error) => {
                warn!(
                    %reason,
                    %cache_error,
                    "remote read failed and local copy is unreadable, using empty data"
                );
                SystemData::empty()
            }
        }
    }

    /// Write the whole aggregate to the remote store, then to the local copy.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the remote write fails or times out. The
    /// local copy is not touched in that case.
    #[tracing::instrument(
        skip(self, data),
        fields(store = self.remote.name(), jobs = data.jobs.len())
    )]
    pub async fn persist(&self, data: &SystemData) -> Result<(), PersistenceError> {
        match tokio::time::timeout(self.timeout, self.remote.save(data)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(error = %e, "remote write failed");
                return Err(e.into());
            }
            Err(_) => {
                error!(timeout_secs = self.timeout.as_secs(), "remote write timed out");
                return Err(PersistenceError::Timeout(self.timeout));
            }
        }
        self.refresh_cache(data).await;
        Ok(())
    }

    async fn refresh_cache(&self, data: &SystemData) {
        if let Err(e) = self.cache.store(data).await {
            warn!(error = %e, cache = %self.cache.path().display(), "failed to update local copy");
        }
    }
}

impl std::fmt::Debug for SyncLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncLayer")
            .field("store", &self.remote.name())
            .field("cache", &self.cache)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use storage_hub_core::CustomerDraft;

    use super::*;
    use crate::store::memory::MemoryStore;

    fn customers(names: &[&str]) -> SystemData {
        let mut data = SystemData::empty();
        for name in names {
            data.create_customer(
                CustomerDraft {
                    name: (*name).to_string(),
                    contact: None,
                },
                Utc::now(),
            )
            .unwrap();
        }
        data
    }

    fn layer(store: &Arc<MemoryStore>, dir: &tempfile::TempDir) -> SyncLayer {
        SyncLayer::new(
            store.clone(),
            LocalCache::new(dir.path().join("cache.json")),
            Duration::from_millis(200),
        )
    }

    #[tokio::test]
    async fn test_fetch_refreshes_cache() {
        let dir = tempfile::tempdir().unwrap();
        let remote = customers(&["Lanna Foods"]);
        let store = Arc::new(MemoryStore::with_document(remote.clone()));
        let sync = layer(&store, &dir);

        assert_eq!(sync.fetch().await, remote);
        assert_eq!(sync.cache().load().await.unwrap(), Some(remote));
    }

    #[tokio::test]
    async fn test_fetch_without_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        let sync = layer(&store, &dir);
        assert!(sync.fetch().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_falls_back_to_cache() {
        let dir = tempfile::tempdir().unwrap();
        let remote = customers(&["Lanna Foods", "Isan Textiles"]);
        let store = Arc::new(MemoryStore::with_document(remote.clone()));
        let sync = layer(&store, &dir);
        sync.fetch().await;

        store.set_offline(true);
        assert_eq!(sync.fetch().await, remote);
    }

    #[tokio::test]
    async fn test_fetch_offline_without_cache_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::with_document(customers(&["A"])));
        store.set_offline(true);
        let sync = layer(&store, &dir);
        assert!(sync.fetch().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_unreadable_cache_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        store.set_offline(true);
        let sync = layer(&store, &dir);
        tokio::fs::write(sync.cache().path(), b"{\"jobs\": 7").await.unwrap();
        assert!(sync.fetch().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_timeout_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::with_document(customers(&["Slow Co"])));
        *store.delay.lock().unwrap() = Some(Duration::from_secs(5));
        let sync = layer(&store, &dir);
        assert!(sync.fetch().await.is_empty());
    }

    #[tokio::test]
    async fn test_persist_writes_remote_then_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        let sync = layer(&store, &dir);
        let data = customers(&["Phuket Pearls"]);

        sync.persist(&data).await.unwrap();
        assert_eq!(store.document(), Some(data.clone()));
        assert_eq!(sync.cache().load().await.unwrap(), Some(data));
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_cache_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let before = customers(&["Before"]);
        let store = Arc::new(MemoryStore::with_document(before.clone()));
        let sync = layer(&store, &dir);
        sync.fetch().await;

        store.set_offline(true);
        let err = sync.persist(&customers(&["After"])).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Remote(_)));
        assert_eq!(sync.cache().load().await.unwrap(), Some(before));
    }

    #[tokio::test]
    async fn test_persist_timeout_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        *store.delay.lock().unwrap() = Some(Duration::from_secs(5));
        let sync = layer(&store, &dir);
        let err = sync.persist(&customers(&["Late"])).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Timeout(_)));
        assert!(sync.cache().load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cache_write_failure_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        // A directory where the cache file should be makes the rename fail.
        let cache_path = dir.path().join("cache.json");
        std::fs::create_dir(&cache_path).unwrap();
        std::fs::write(cache_path.join("occupied"), b"x").unwrap();
        let sync = SyncLayer::new(
            store.clone(),
            LocalCache::new(cache_path),
            Duration::from_millis(200),
        );

        let data = customers(&["Remote Only"]);
        sync.persist(&data).await.unwrap();
        assert_eq!(store.document(), Some(data));
    }
}
