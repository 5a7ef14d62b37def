//! Warehouse service: every operation as fetch, mutate in memory, persist.
//!
//! Input checks that need nothing but the input run before any I/O. Checks
//! that need the aggregate (job exists, status allows the transition,
//! customer exists) run after the fetch and before the write, so a rejected
//! operation never reaches storage.
//!
//! Concurrent callers are last-writer-wins: each operation persists the
//! aggregate it fetched, with its own change applied.

use chrono::Utc;
use storage_hub_core::{
    BoxId, BoxRemoval, Customer, CustomerDraft, CustomerId, Job, JobDraft, JobId, LifecycleError,
    ProductionLine, StorageBox, SystemData, ValidationError, Zone, ZoneCatalog,
};
use tracing::info;

use crate::cache::LocalCache;
use crate::config::HubConfig;
use crate::error::HubError;
use crate::store::{self, StoreError};
use crate::sync::SyncLayer;

/// Entry point for collaborators (CLI, UI) into the job lifecycle.
#[derive(Debug, Clone)]
pub struct Warehouse {
    sync: SyncLayer,
    zones: ZoneCatalog,
}

impl Warehouse {
    #[must_use]
    pub const fn new(sync: SyncLayer, zones: ZoneCatalog) -> Self {
        Self { sync, zones }
    }

    /// Connect the configured remote store and local cache.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the remote store client cannot be created.
    pub async fn from_config(config: &HubConfig) -> Result<Self, StoreError> {
        let remote = store::connect(config).await?;
        let sync = SyncLayer::new(
            remote,
            LocalCache::new(&config.cache_path),
            config.remote_timeout,
        );
        Ok(Self::new(sync, config.zones.clone()))
    }

    /// Zones accepted by this warehouse.
    #[must_use]
    pub const fn zones(&self) -> &ZoneCatalog {
        &self.zones
    }

    /// Current aggregate. Falls back to the local copy, then to empty data,
    /// when the remote store is unavailable.
    pub async fn fetch_system_data(&self) -> SystemData {
        self.sync.fetch().await
    }

    async fn apply<T>(
        &self,
        op: impl FnOnce(&mut SystemData) -> Result<T, LifecycleError> + Send,
    ) -> Result<T, HubError> {
        let mut data = self.sync.fetch().await;
        let out = op(&mut data)?;
        self.sync.persist(&data).await?;
        Ok(out)
    }

    /// Register a job in `stored` state.
    ///
    /// # Errors
    ///
    /// Validation errors for an invalid draft or unknown customer, or a
    /// persistence error.
    #[tracing::instrument(
        skip(self, draft),
        fields(job_name = %draft.job_name, zone = %draft.zone)
    )]
    pub async fn create_job(&self, draft: JobDraft) -> Result<Job, HubError> {
        draft.validate(&self.zones)?;
        let job = self
            .apply(|data| data.create_job(draft, &self.zones, Utc::now()))
            .await?;
        info!(
            job_id = %job.id(),
            job_number = %job.job_number(),
            boxes = job.boxes().len(),
            "job created"
        );
        Ok(job)
    }

    /// Replace a job's descriptive fields and boxes.
    ///
    /// # Errors
    ///
    /// Validation errors, `JobNotFound`, `InvalidTransition` for deleted jobs,
    /// or a persistence error.
    #[tracing::instrument(skip(self, draft))]
    pub async fn edit_job(&self, job_id: &JobId, draft: JobDraft) -> Result<Job, HubError> {
        draft.validate(&self.zones)?;
        let job = self
            .apply(|data| data.edit_job(job_id, draft, &self.zones).cloned())
            .await?;
        info!(boxes = job.boxes().len(), "job edited");
        Ok(job)
    }

    /// Send a stored job to production line `line` (1 to 6).
    ///
    /// # Errors
    ///
    /// `InvalidLine`, `JobNotFound`, `InvalidTransition` unless stored, or a
    /// persistence error.
    #[tracing::instrument(skip(self))]
    pub async fn pull_job(&self, job_id: &JobId, line: u8) -> Result<Job, HubError> {
        let line = ProductionLine::new(line)?;
        let job = self
            .apply(|data| data.pull_job(job_id, line, Utc::now()).cloned())
            .await?;
        info!(%line, "job pulled");
        Ok(job)
    }

    /// Return a pulled job to storage at `zone`.
    ///
    /// # Errors
    ///
    /// `UnknownZone`, `JobNotFound`, `InvalidTransition` unless pulled, or a
    /// persistence error.
    #[tracing::instrument(skip(self))]
    pub async fn return_job(&self, job_id: &JobId, zone: Zone) -> Result<Job, HubError> {
        self.zones.validate(&zone)?;
        let job = self
            .apply(|data| {
                data.return_job(job_id, zone, &self.zones, Utc::now())
                    .cloned()
            })
            .await?;
        info!(zone = %job.zone(), "job returned");
        Ok(job)
    }

    /// Move a job to the recycle bin.
    ///
    /// # Errors
    ///
    /// `JobNotFound`, `InvalidTransition` if already deleted, or a persistence
    /// error.
    #[tracing::instrument(skip(self))]
    pub async fn soft_delete_job(&self, job_id: &JobId) -> Result<Job, HubError> {
        let job = self
            .apply(|data| data.soft_delete_job(job_id, Utc::now()).cloned())
            .await?;
        info!("job moved to recycle bin");
        Ok(job)
    }

    /// Permanently remove one box of a deleted job; the job goes with its
    /// last box.
    ///
    /// # Errors
    ///
    /// `JobNotFound`, `BoxNotFound`, `InvalidTransition` unless deleted, or a
    /// persistence error.
    #[tracing::instrument(skip(self))]
    pub async fn permanently_delete_box(
        &self,
        job_id: &JobId,
        box_id: &BoxId,
    ) -> Result<BoxRemoval, HubError> {
        let removal = self
            .apply(|data| data.permanently_delete_box(job_id, box_id))
            .await?;
        info!(?removal, "box permanently deleted");
        Ok(removal)
    }

    /// Permanently remove a deleted job with all of its boxes.
    ///
    /// # Errors
    ///
    /// `JobNotFound`, `InvalidTransition` unless deleted, or a persistence
    /// error.
    #[tracing::instrument(skip(self))]
    pub async fn permanently_delete_job(&self, job_id: &JobId) -> Result<Job, HubError> {
        let job = self
            .apply(|data| data.permanently_delete_job(job_id))
            .await?;
        info!(boxes = job.boxes().len(), "job permanently deleted");
        Ok(job)
    }

    /// Flag a box with a problem note.
    ///
    /// # Errors
    ///
    /// `EmptyIssueNote`, `JobNotFound`, `BoxNotFound`, or a persistence error.
    #[tracing::instrument(skip(self))]
    pub async fn flag_box_issue(
        &self,
        job_id: &JobId,
        box_id: &BoxId,
        note: &str,
    ) -> Result<StorageBox, HubError> {
        if note.trim().is_empty() {
            return Err(ValidationError::EmptyIssueNote.into());
        }
        let storage_box = self
            .apply(|data| data.flag_box_issue(job_id, box_id, note).cloned())
            .await?;
        info!("box flagged");
        Ok(storage_box)
    }

    /// Clear a box's issue flag.
    ///
    /// # Errors
    ///
    /// `JobNotFound`, `BoxNotFound`, or a persistence error.
    #[tracing::instrument(skip(self))]
    pub async fn clear_box_issue(
        &self,
        job_id: &JobId,
        box_id: &BoxId,
    ) -> Result<StorageBox, HubError> {
        let storage_box = self
            .apply(|data| data.clear_box_issue(job_id, box_id).cloned())
            .await?;
        info!("box issue cleared");
        Ok(storage_box)
    }

    /// Clear a flagged box, or flag a clear one with `note`.
    ///
    /// # Errors
    ///
    /// `EmptyIssueNote` when flagging without a note, `JobNotFound`,
    /// `BoxNotFound`, or a persistence error.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_box_issue(
        &self,
        job_id: &JobId,
        box_id: &BoxId,
        note: Option<&str>,
    ) -> Result<StorageBox, HubError> {
        let storage_box = self
            .apply(|data| data.toggle_box_issue(job_id, box_id, note).cloned())
            .await?;
        info!(flagged = storage_box.has_issue(), "box issue toggled");
        Ok(storage_box)
    }

    /// Register a customer.
    ///
    /// # Errors
    ///
    /// `MissingField` for a blank name, or a persistence error.
    #[tracing::instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_customer(&self, draft: CustomerDraft) -> Result<Customer, HubError> {
        draft.validate()?;
        let customer = self
            .apply(|data| {
                data.create_customer(draft, Utc::now())
                    .map_err(LifecycleError::from)
            })
            .await?;
        info!(customer_id = %customer.id, "customer created");
        Ok(customer)
    }

    /// Remove a customer. Jobs referencing it are left untouched.
    ///
    /// # Errors
    ///
    /// `CustomerNotFound`, or a persistence error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_customer(&self, customer_id: &CustomerId) -> Result<Customer, HubError> {
        let customer = self
            .apply(|data| data.delete_customer(customer_id))
            .await?;
        info!("customer deleted");
        Ok(customer)
    }
}
