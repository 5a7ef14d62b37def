//! In-memory store double for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use storage_hub_core::SystemData;

use super::{DocumentStore, StoreError};

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    document: Mutex<Option<SystemData>>,
    pub(crate) fail_loads: AtomicBool,
    pub(crate) fail_saves: AtomicBool,
    pub(crate) delay: Mutex<Option<Duration>>,
    pub(crate) saves: AtomicUsize,
}

impl MemoryStore {
    pub(crate) fn with_document(data: SystemData) -> Self {
        Self {
            document: Mutex::new(Some(data)),
            ..Self::default()
        }
    }

    #[allow(clippy::unwrap_used)]
    pub(crate) fn document(&self) -> Option<SystemData> {
        self.document.lock().unwrap().clone()
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.fail_loads.store(offline, Ordering::SeqCst);
        self.fail_saves.store(offline, Ordering::SeqCst);
    }

    #[allow(clippy::unwrap_used)]
    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn offline() -> StoreError {
    StoreError::Api {
        status: 503,
        message: "store offline".to_string(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    #[allow(clippy::unwrap_used)]
    async fn load(&self) -> Result<Option<SystemData>, StoreError> {
        self.pause().await;
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(offline());
        }
        Ok(self.document.lock().unwrap().clone())
    }

    #[allow(clippy::unwrap_used)]
    async fn save(&self, data: &SystemData) -> Result<(), StoreError> {
        self.pause().await;
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(offline());
        }
        *self.document.lock().unwrap() = Some(data.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
