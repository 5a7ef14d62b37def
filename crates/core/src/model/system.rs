//! The aggregate root.

use serde::{Deserialize, Serialize};

use super::{Customer, Job};
use crate::error::LifecycleError;
use crate::types::{CustomerId, JobId};

/// Every job and customer, persisted as one document.
///
/// There is no per-entity storage: an operation takes the whole aggregate,
/// changes it in memory and hands the whole aggregate back for writing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemData {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub customers: Vec<Customer>,
}

impl SystemData {
    /// An aggregate with no jobs and no customers.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            jobs: Vec::new(),
            customers: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty() && self.customers.is_empty()
    }

    #[must_use]
    pub fn job(&self, id: &JobId) -> Option<&Job> {
        self.jobs.iter().find(|j| &j.id == id)
    }

    #[must_use]
    pub fn customer(&self, id: &CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| &c.id == id)
    }

    pub(crate) fn job_mut(&mut self, id: &JobId) -> Result<&mut Job, LifecycleError> {
        self.jobs
            .iter_mut()
            .find(|j| &j.id == id)
            .ok_or_else(|| LifecycleError::JobNotFound(id.clone()))
    }

    /// Remove every job whose box list is empty, returning the removed IDs.
    ///
    /// Run after any mutation that deletes boxes: a job never outlives its
    /// last box.
    pub fn prune_empty_jobs(&mut self) -> Vec<JobId> {
        let mut removed = Vec::new();
        self.jobs.retain(|job| {
            if job.boxes.is_empty() {
                removed.push(job.id.clone());
                false
            } else {
                true
            }
        });
        removed
    }
}
