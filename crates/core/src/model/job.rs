//! Jobs and their status-dependent state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::StorageBox;
use crate::types::{BoxId, CustomerId, JobId, JobNumber, JobStatus, ProductionLine, Zone};

/// When a job was sent to production and to which line.
///
/// A pull made here always sets both. Records written by older clients may
/// carry only one of them, and whichever is present is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRecord {
    pub pulled_at: Option<DateTime<Utc>>,
    pub line: Option<ProductionLine>,
}

impl PullRecord {
    fn from_parts(
        pulled_at: Option<DateTime<Utc>>,
        line: Option<ProductionLine>,
    ) -> Option<Self> {
        (pulled_at.is_some() || line.is_some()).then_some(Self { pulled_at, line })
    }
}

/// Lifecycle state of a job, carrying only the data valid in that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// In its zone, available to be pulled.
    Stored,
    /// On a production line.
    Pulled(PullRecord),
    /// In the recycle bin.
    Deleted { deleted_at: DateTime<Utc> },
}

impl JobState {
    /// Flat status label for this state.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        match self {
            Self::Stored => JobStatus::Stored,
            Self::Pulled(_) => JobStatus::Pulled,
            Self::Deleted { .. } => JobStatus::Deleted,
        }
    }
}

/// A customer's storage assignment: one or more boxes tracked through
/// stored, pulled and deleted.
///
/// Fields change only through the lifecycle operations on
/// [`crate::SystemData`]; this type exposes read accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "JobRecord", into = "JobRecord")]
pub struct Job {
    pub(crate) id: JobId,
    pub(crate) job_number: JobNumber,
    pub(crate) job_name: String,
    pub(crate) product_size: String,
    pub(crate) customer_id: CustomerId,
    pub(crate) zone: Zone,
    pub(crate) boxes: Vec<StorageBox>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) state: JobState,
    /// Most recent pull once the job has left the `Pulled` state.
    pub(crate) last_pull: Option<PullRecord>,
    pub(crate) returned_at: Option<DateTime<Utc>>,
}

impl Job {
    #[must_use]
    pub const fn id(&self) -> &JobId {
        &self.id
    }

    #[must_use]
    pub const fn job_number(&self) -> &JobNumber {
        &self.job_number
    }

    #[must_use]
    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    #[must_use]
    pub fn product_size(&self) -> &str {
        &self.product_size
    }

    #[must_use]
    pub const fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    #[must_use]
    pub const fn zone(&self) -> &Zone {
        &self.zone
    }

    #[must_use]
    pub fn boxes(&self) -> &[StorageBox] {
        &self.boxes
    }

    #[must_use]
    pub fn find_box(&self, box_id: &BoxId) -> Option<&StorageBox> {
        self.boxes.iter().find(|b| &b.id == box_id)
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn state(&self) -> &JobState {
        &self.state
    }

    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.state.status()
    }

    /// The current pull while pulled, otherwise the most recent one.
    #[must_use]
    pub const fn pull_record(&self) -> Option<&PullRecord> {
        match &self.state {
            JobState::Pulled(record) => Some(record),
            _ => self.last_pull.as_ref(),
        }
    }

    #[must_use]
    pub fn pulled_at(&self) -> Option<DateTime<Utc>> {
        self.pull_record().and_then(|p| p.pulled_at)
    }

    #[must_use]
    pub fn line_production(&self) -> Option<ProductionLine> {
        self.pull_record().and_then(|p| p.line)
    }

    #[must_use]
    pub const fn returned_at(&self) -> Option<DateTime<Utc>> {
        self.returned_at
    }

    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            JobState::Deleted { deleted_at } => Some(deleted_at),
            _ => None,
        }
    }

    /// Sum of the declared box prices.
    #[must_use]
    pub fn total_value(&self) -> crate::types::Price {
        self.boxes.iter().map(|b| b.price).sum()
    }

    /// Leave the current state, keeping a finished pull as history.
    pub(crate) fn set_state(&mut self, next: JobState) {
        if let JobState::Pulled(record) = self.state {
            self.last_pull = Some(record);
        }
        self.state = next;
    }
}

/// Flat persisted form of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobRecord {
    id: JobId,
    job_number: JobNumber,
    job_name: String,
    product_size: String,
    customer_id: CustomerId,
    zone: Zone,
    status: JobStatus,
    boxes: Vec<StorageBox>,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pulled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    returned_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    line_production: Option<ProductionLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deleted_at: Option<DateTime<Utc>>,
}

/// Status-dependent fields are read leniently: a single imperfect record must
/// not make the whole document unreadable.
impl From<JobRecord> for Job {
    fn from(r: JobRecord) -> Self {
        let pull = PullRecord::from_parts(r.pulled_at, r.line_production);

        let (state, last_pull) = match r.status {
            JobStatus::Stored => (JobState::Stored, pull),
            JobStatus::Returned => {
                tracing::warn!(job_id = %r.id, "decoding legacy `returned` status as `stored`");
                (JobState::Stored, pull)
            }
            JobStatus::Pulled => {
                if r.pulled_at.is_none() || r.line_production.is_none() {
                    tracing::warn!(
                        job_id = %r.id,
                        has_pulled_at = r.pulled_at.is_some(),
                        has_line = r.line_production.is_some(),
                        "pulled job has an incomplete pull record"
                    );
                }
                let record = PullRecord {
                    pulled_at: r.pulled_at,
                    line: r.line_production,
                };
                (JobState::Pulled(record), None)
            }
            JobStatus::Deleted => {
                let deleted_at = r.deleted_at.unwrap_or_else(|| {
                    tracing::warn!(job_id = %r.id, "deleted job has no deletedAt, using createdAt");
                    r.created_at
                });
                (JobState::Deleted { deleted_at }, pull)
            }
        };

        Self {
            id: r.id,
            job_number: r.job_number,
            job_name: r.job_name,
            product_size: r.product_size,
            customer_id: r.customer_id,
            zone: r.zone,
            boxes: r.boxes,
            created_at: r.created_at,
            state,
            last_pull,
            returned_at: r.returned_at,
        }
    }
}

impl From<Job> for JobRecord {
    fn from(job: Job) -> Self {
        let status = job.status();
        let pulled_at = job.pulled_at();
        let line_production = job.line_production();
        let deleted_at = job.deleted_at();
        Self {
            id: job.id,
            job_number: job.job_number,
            job_name: job.job_name,
            product_size: job.product_size,
            customer_id: job.customer_id,
            zone: job.zone,
            status,
            boxes: job.boxes,
            created_at: job.created_at,
            pulled_at,
            returned_at: job.returned_at,
            line_production,
            deleted_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn record(status: &str) -> Value {
        json!({
            "id": "j1",
            "jobNumber": "JOB-123456",
            "jobName": "Spring catalogue",
            "productSize": "M",
            "customerId": "CUST-AB12C",
            "zone": "A",
            "status": status,
            "boxes": [{
                "id": "b1", "boxNumber": "BX-1001", "color": "แดง",
                "boxSize": "10x10x10", "price": 50, "contents": "flyers"
            }],
            "createdAt": "2026-01-05T08:00:00Z"
        })
    }

    #[test]
    fn test_stored_record_round_trip_omits_absent_fields() {
        let job: Job = serde_json::from_value(record("stored")).unwrap();
        assert_eq!(job.status(), JobStatus::Stored);
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value, record("stored"));
    }

    #[test]
    fn test_pulled_record_without_line_still_decodes() {
        let mut value = record("pulled");
        value["pulledAt"] = json!("2026-01-06T09:00:00Z");
        let job: Job = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(job.status(), JobStatus::Pulled);
        assert!(job.pulled_at().is_some());
        assert!(job.line_production().is_none());
        assert_eq!(serde_json::to_value(&job).unwrap(), value);
    }

    #[test]
    fn test_pulled_record_decodes_into_state() {
        let mut value = record("pulled");
        value["pulledAt"] = json!("2026-01-06T09:00:00Z");
        value["lineProduction"] = json!(4);
        let job: Job = serde_json::from_value(value).unwrap();
        match job.state() {
            JobState::Pulled(record) => assert_eq!(record.line.map(|l| l.get()), Some(4)),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_returned_job_keeps_pull_history() {
        let mut value = record("stored");
        value["pulledAt"] = json!("2026-01-06T09:00:00Z");
        value["lineProduction"] = json!(3);
        value["returnedAt"] = json!("2026-01-07T09:00:00Z");
        let job: Job = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(job.line_production().unwrap().get(), 3);
        assert!(job.returned_at().is_some());
        assert_eq!(serde_json::to_value(&job).unwrap(), value);
    }

    #[test]
    fn test_legacy_returned_status_reads_as_stored() {
        let job: Job = serde_json::from_value(record("returned")).unwrap();
        assert_eq!(job.status(), JobStatus::Stored);
        assert_eq!(serde_json::to_value(&job).unwrap()["status"], "stored");
    }

    #[test]
    fn test_lone_pull_fields_survive_round_trip() {
        let mut only_time = record("stored");
        only_time["pulledAt"] = json!("2026-01-06T09:00:00Z");
        let job: Job = serde_json::from_value(only_time.clone()).unwrap();
        assert!(job.pulled_at().is_some());
        assert_eq!(serde_json::to_value(&job).unwrap(), only_time);

        let mut only_line = record("deleted");
        only_line["deletedAt"] = json!("2026-01-08T10:00:00Z");
        only_line["lineProduction"] = json!(2);
        let job: Job = serde_json::from_value(only_line.clone()).unwrap();
        assert_eq!(job.line_production().map(|l| l.get()), Some(2));
        assert_eq!(serde_json::to_value(&job).unwrap(), only_line);
    }

    #[test]
    fn test_deleted_record_without_timestamp_uses_created_at() {
        let job: Job = serde_json::from_value(record("deleted")).unwrap();
        assert_eq!(job.status(), JobStatus::Deleted);
        assert_eq!(job.deleted_at(), Some(job.created_at()));

        let mut value = record("deleted");
        value["deletedAt"] = json!("2026-01-08T10:00:00Z");
        let job: Job = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&job).unwrap(), value);
    }
}
