//! Job lifecycle state machine.
//!
//! ```text
//!            pull              return(zone)
//!   stored ───────▶ pulled ───────────────▶ stored
//!     │                │
//!     └── soft delete ─┴──▶ deleted ──▶ (boxes purged one by one; the job
//!                                        disappears with its last box)
//! ```
//!
//! Every operation here works on an in-memory [`SystemData`]. Callers fetch
//! the aggregate, apply one of these methods and persist the result. On error
//! the aggregate is left exactly as it was.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::error::{LifecycleError, ValidationError};
use crate::model::{Customer, Job, JobState, PullRecord, StorageBox, SystemData};
use crate::types::{
    BoxId, CustomerId, JobId, JobNumber, JobStatus, Price, ProductionLine, Zone, ZoneCatalog,
    generate_box_number,
};

/// One box as entered on the job form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoxDraft {
    /// Existing box to keep when editing. Unknown or absent IDs create a new box.
    pub id: Option<BoxId>,
    /// Display label; generated (`BX-NNNN`) when absent or blank.
    pub box_number: Option<String>,
    pub color: String,
    pub box_size: String,
    pub price: Price,
    pub contents: String,
}

/// Descriptive fields of a job, used by both create and edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    pub job_name: String,
    pub product_size: String,
    pub customer_id: CustomerId,
    pub zone: Zone,
    pub boxes: Vec<BoxDraft>,
}

impl JobDraft {
    /// Check the draft on its own, without looking at the aggregate.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found: empty name, product size
    /// or customer, no boxes, a negative price, a box ID given twice, or a
    /// zone outside `zones`.
    pub fn validate(&self, zones: &ZoneCatalog) -> Result<(), ValidationError> {
        require("jobName", &self.job_name)?;
        require("productSize", &self.product_size)?;
        require("customerId", self.customer_id.as_str())?;
        if self.boxes.is_empty() {
            return Err(ValidationError::NoBoxes);
        }
        if let Some(b) = self.boxes.iter().find(|b| b.price.is_negative()) {
            return Err(ValidationError::NegativePrice {
                box_number: b.box_number.clone().unwrap_or_default(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(id) = self
            .boxes
            .iter()
            .filter_map(|b| b.id.as_ref())
            .find(|id| !seen.insert(*id))
        {
            return Err(ValidationError::DuplicateBox(id.clone()));
        }
        zones.validate(&self.zone)
    }
}

/// Fields entered when registering a customer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomerDraft {
    pub name: String,
    pub contact: Option<String>,
}

impl CustomerDraft {
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when the name is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)
    }
}

/// Outcome of permanently deleting a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxRemoval {
    /// The box is gone; the job still holds `remaining` boxes.
    Removed { remaining: usize },
    /// That was the last box, so the job was removed as well.
    JobRemoved,
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

fn invalid_transition(job: &Job, action: &'static str) -> LifecycleError {
    LifecycleError::InvalidTransition {
        job_id: job.id.clone(),
        from: job.status(),
        action,
    }
}

/// Turn drafts into boxes, keeping ID and issue state of boxes that already
/// exist in `existing`.
fn build_boxes(drafts: Vec<BoxDraft>, existing: &[StorageBox]) -> Vec<StorageBox> {
    drafts
        .into_iter()
        .map(|draft| {
            let kept = draft
                .id
                .as_ref()
                .and_then(|id| existing.iter().find(|b| &b.id == id));
            let box_number = draft
                .box_number
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(generate_box_number);
            StorageBox {
                id: kept.map_or_else(BoxId::generate, |b| b.id.clone()),
                box_number,
                color: draft.color,
                box_size: draft.box_size,
                price: draft.price,
                contents: draft.contents,
                issue: kept.and_then(|b| b.issue.clone()),
            }
        })
        .collect()
}

impl SystemData {
    /// Register a new job in `stored` state.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::Validation`] if the draft is invalid or its customer
    /// does not exist in this aggregate.
    pub fn create_job(
        &mut self,
        draft: JobDraft,
        zones: &ZoneCatalog,
        now: DateTime<Utc>,
    ) -> Result<Job, LifecycleError> {
        draft.validate(zones)?;
        if self.customer(&draft.customer_id).is_none() {
            return Err(ValidationError::UnknownCustomer(draft.customer_id).into());
        }

        let job = Job {
            id: JobId::generate(),
            job_number: JobNumber::from_millis(now.timestamp_millis()),
            job_name: draft.job_name,
            product_size: draft.product_size,
            customer_id: draft.customer_id,
            zone: draft.zone,
            boxes: build_boxes(draft.boxes, &[]),
            created_at: now,
            state: JobState::Stored,
            last_pull: None,
            returned_at: None,
        };
        self.jobs.push(job.clone());
        Ok(job)
    }

    /// Send a stored job to a production line.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::JobNotFound`], or [`LifecycleError::InvalidTransition`]
    /// unless the job is `stored`.
    pub fn pull_job(
        &mut self,
        id: &JobId,
        line: ProductionLine,
        now: DateTime<Utc>,
    ) -> Result<&Job, LifecycleError> {
        let job = self.job_mut(id)?;
        if job.status() != JobStatus::Stored {
            return Err(invalid_transition(job, "pull"));
        }
        job.set_state(JobState::Pulled(PullRecord {
            pulled_at: Some(now),
            line: Some(line),
        }));
        Ok(job)
    }

    /// Bring a pulled job back into storage at `zone`.
    ///
    /// Status, zone and return time change together. The pull record stays
    /// on the job.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::Validation`] for a zone outside the catalog,
    /// [`LifecycleError::JobNotFound`], or
    /// [`LifecycleError::InvalidTransition`] unless the job is `pulled`.
    pub fn return_job(
        &mut self,
        id: &JobId,
        zone: Zone,
        zones: &ZoneCatalog,
        now: DateTime<Utc>,
    ) -> Result<&Job, LifecycleError> {
        zones.validate(&zone)?;
        let job = self.job_mut(id)?;
        if job.status() != JobStatus::Pulled {
            return Err(invalid_transition(job, "return"));
        }
        job.set_state(JobState::Stored);
        job.zone = zone;
        job.returned_at = Some(now);
        Ok(job)
    }

    /// Move a job into the recycle bin. Boxes are kept.
    ///
    /// Pulled jobs may be deleted too; nothing guards an active job.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::JobNotFound`], or
    /// [`LifecycleError::InvalidTransition`] if the job is already deleted.
    pub fn soft_delete_job(
        &mut self,
        id: &JobId,
        now: DateTime<Utc>,
    ) -> Result<&Job, LifecycleError> {
        let job = self.job_mut(id)?;
        if job.status() == JobStatus::Deleted {
            return Err(invalid_transition(job, "delete"));
        }
        job.set_state(JobState::Deleted { deleted_at: now });
        Ok(job)
    }

    /// Replace a job's descriptive fields and boxes wholesale.
    ///
    /// Status and timestamps are untouched. Boxes whose draft carries an
    /// existing box ID keep that ID and their issue flag.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::Validation`] for an invalid draft,
    /// [`LifecycleError::JobNotFound`], or
    /// [`LifecycleError::InvalidTransition`] for a deleted job.
    pub fn edit_job(
        &mut self,
        id: &JobId,
        draft: JobDraft,
        zones: &ZoneCatalog,
    ) -> Result<&Job, LifecycleError> {
        draft.validate(zones)?;
        let job = self.job_mut(id)?;
        if job.status() == JobStatus::Deleted {
            return Err(invalid_transition(job, "edit"));
        }
        job.boxes = build_boxes(draft.boxes, &job.boxes);
        job.job_name = draft.job_name;
        job.product_size = draft.product_size;
        job.customer_id = draft.customer_id;
        job.zone = draft.zone;
        Ok(job)
    }

    /// Irreversibly remove one box from a soft-deleted job.
    ///
    /// If that leaves the job without boxes, the job itself is removed from
    /// the aggregate.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::JobNotFound`], [`LifecycleError::BoxNotFound`], or
    /// [`LifecycleError::InvalidTransition`] unless the job is `deleted`.
    pub fn permanently_delete_box(
        &mut self,
        job_id: &JobId,
        box_id: &BoxId,
    ) -> Result<BoxRemoval, LifecycleError> {
        let job = self.job_mut(job_id)?;
        if job.status() != JobStatus::Deleted {
            return Err(invalid_transition(job, "purge a box of"));
        }
        let position = job
            .boxes
            .iter()
            .position(|b| &b.id == box_id)
            .ok_or_else(|| LifecycleError::BoxNotFound {
                job_id: job_id.clone(),
                box_id: box_id.clone(),
            })?;
        job.boxes.remove(position);
        let remaining = job.boxes.len();

        if self.prune_empty_jobs().contains(job_id) {
            Ok(BoxRemoval::JobRemoved)
        } else {
            Ok(BoxRemoval::Removed { remaining })
        }
    }

    /// Irreversibly remove a soft-deleted job and all of its boxes.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::JobNotFound`], or
    /// [`LifecycleError::InvalidTransition`] unless the job is `deleted`.
    pub fn permanently_delete_job(&mut self, id: &JobId) -> Result<Job, LifecycleError> {
        let job = self.job_mut(id)?;
        if job.status() != JobStatus::Deleted {
            return Err(invalid_transition(job, "purge"));
        }
        let position = self
            .jobs
            .iter()
            .position(|j| &j.id == id)
            .ok_or_else(|| LifecycleError::JobNotFound(id.clone()))?;
        Ok(self.jobs.remove(position))
    }

    /// Register a customer.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingField`] when the name is blank.
    pub fn create_customer(
        &mut self,
        draft: CustomerDraft,
        now: DateTime<Utc>,
    ) -> Result<Customer, ValidationError> {
        draft.validate()?;
        let mut id = CustomerId::generate();
        while self.customer(&id).is_some() {
            id = CustomerId::generate();
        }
        let customer = Customer {
            id,
            name: draft.name.trim().to_owned(),
            contact: draft.contact.unwrap_or_default(),
            created_at: now,
        };
        self.customers.push(customer.clone());
        Ok(customer)
    }

    /// Remove a customer record.
    ///
    /// Jobs that reference the customer are left as they are.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::CustomerNotFound`] for an unknown ID.
    pub fn delete_customer(&mut self, id: &CustomerId) -> Result<Customer, LifecycleError> {
        let position = self
            .customers
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| LifecycleError::CustomerNotFound(id.clone()))?;
        Ok(self.customers.remove(position))
    }
}
