//! Read-only views over the aggregate.
//!
//! Searches are case-insensitive substring matches; an empty term matches
//! everything.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Job, StorageBox, SystemData};
use crate::types::{JobId, JobNumber, JobStatus, Price, Zone, ZoneCatalog};

/// Totals for one zone over every job that is not deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSummary {
    pub zone: Zone,
    pub job_count: usize,
    pub box_count: usize,
    pub value: Price,
}

/// One box in the recycle bin, with the deleted job it belongs to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinEntry<'a> {
    pub job_id: &'a JobId,
    pub job_number: &'a JobNumber,
    pub job_name: &'a str,
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(rename = "box")]
    pub storage_box: &'a StorageBox,
}

fn matches_any<'a>(term: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty()
        || fields
            .into_iter()
            .any(|field| field.to_lowercase().contains(&term))
}

impl SystemData {
    fn jobs_with_status(&self, status: JobStatus) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(move |j| j.status() == status)
    }

    fn customer_name(&self, job: &Job) -> &str {
        self.customer(job.customer_id())
            .map_or("", |c| c.name.as_str())
    }

    fn job_matches(&self, job: &Job, term: &str) -> bool {
        matches_any(
            term,
            [
                job.job_number().as_str(),
                job.job_name(),
                job.product_size(),
                self.customer_name(job),
            ],
        )
    }

    /// Stored jobs that can be pulled, optionally restricted to one zone.
    ///
    /// `search` matches job number, job name, product size or customer name.
    #[must_use]
    pub fn available_jobs(&self, search: &str, zone: Option<&Zone>) -> Vec<&Job> {
        self.jobs_with_status(JobStatus::Stored)
            .filter(|j| zone.is_none_or(|z| j.zone() == z))
            .filter(|j| self.job_matches(j, search))
            .collect()
    }

    /// Jobs currently on a production line.
    #[must_use]
    pub fn active_jobs(&self) -> Vec<&Job> {
        self.jobs_with_status(JobStatus::Pulled).collect()
    }

    /// Jobs that can still be edited, i.e. everything not deleted.
    #[must_use]
    pub fn editable_jobs(&self, search: &str) -> Vec<&Job> {
        self.jobs
            .iter()
            .filter(|j| j.status() != JobStatus::Deleted)
            .filter(|j| self.job_matches(j, search))
            .collect()
    }

    /// Per-zone totals in catalog order. Zones without jobs report zeros;
    /// jobs in zones outside the catalog are not counted.
    #[must_use]
    pub fn zone_summaries(&self, zones: &ZoneCatalog) -> Vec<ZoneSummary> {
        zones
            .zones()
            .iter()
            .map(|zone| {
                let jobs: Vec<&Job> = self
                    .jobs
                    .iter()
                    .filter(|j| j.status() != JobStatus::Deleted && j.zone() == zone)
                    .collect();
                ZoneSummary {
                    zone: zone.clone(),
                    job_count: jobs.len(),
                    box_count: jobs.iter().map(|j| j.boxes().len()).sum(),
                    value: jobs.iter().map(|j| j.total_value()).sum(),
                }
            })
            .collect()
    }

    /// Number of stored jobs per zone, in catalog order.
    #[must_use]
    pub fn stored_zone_counts(&self, zones: &ZoneCatalog) -> Vec<(Zone, usize)> {
        zones
            .zones()
            .iter()
            .map(|zone| {
                let count = self
                    .jobs_with_status(JobStatus::Stored)
                    .filter(|j| j.zone() == zone)
                    .count();
                (zone.clone(), count)
            })
            .collect()
    }

    /// Boxes of soft-deleted jobs.
    ///
    /// `search` matches box number, job number or box size.
    #[must_use]
    pub fn recycle_bin(&self, search: &str) -> Vec<BinEntry<'_>> {
        self.jobs_with_status(JobStatus::Deleted)
            .flat_map(|job| {
                job.boxes().iter().map(move |b| BinEntry {
                    job_id: job.id(),
                    job_number: job.job_number(),
                    job_name: job.job_name(),
                    deleted_at: job.deleted_at(),
                    storage_box: b,
                })
            })
            .filter(|entry| {
                matches_any(
                    search,
                    [
                        entry.storage_box.box_number(),
                        entry.job_number.as_str(),
                        entry.storage_box.box_size(),
                    ],
                )
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::lifecycle::tests::{job_draft, seeded, t0};
    use crate::types::ProductionLine;

    /// One customer with three jobs: stored in A, stored in C, pulled from B.
    fn warehouse() -> (SystemData, [JobId; 3]) {
        let (mut data, a) = seeded(2);
        let zones = ZoneCatalog::default();
        let customer = data.customers[0].id.clone();

        let mut draft = job_draft(&customer, "C", 1);
        draft.job_name = "Moon cakes".to_owned();
        draft.product_size = "XS".to_owned();
        let c = data.create_job(draft, &zones, t0()).unwrap().id;

        let b = data
            .create_job(job_draft(&customer, "B", 3), &zones, t0())
            .unwrap()
            .id;
        data.pull_job(&b, ProductionLine::new(2).unwrap(), t0())
            .unwrap();
        (data, [a, c, b])
    }

    fn ids(jobs: &[&Job]) -> Vec<JobId> {
        jobs.iter().map(|j| j.id().clone()).collect()
    }

    #[test]
    fn test_available_jobs_search_and_zone() {
        let (data, [a, c, _]) = warehouse();
        assert_eq!(ids(&data.available_jobs("", None)), vec![a.clone(), c.clone()]);
        assert_eq!(ids(&data.available_jobs("MOON", None)), vec![c.clone()]);
        assert_eq!(ids(&data.available_jobs("xs", None)), vec![c]);
        assert_eq!(ids(&data.available_jobs("siam", Some(&Zone::from("A")))), vec![a]);
        assert!(data.available_jobs("", Some(&Zone::from("G"))).is_empty());
    }

    #[test]
    fn test_pulled_job_moves_between_pools() {
        let (data, [a, c, b]) = warehouse();
        assert_eq!(ids(&data.active_jobs()), vec![b.clone()]);
        assert!(!ids(&data.available_jobs("", None)).contains(&b));
        assert_eq!(ids(&data.editable_jobs("")), vec![a, c, b]);
    }

    #[test]
    fn test_deleted_jobs_leave_editable_pool() {
        let (mut data, [a, c, b]) = warehouse();
        data.soft_delete_job(&a, t0()).unwrap();
        assert_eq!(ids(&data.editable_jobs("")), vec![c, b]);
    }

    #[test]
    fn test_zone_summaries() {
        let (mut data, [a, _, _]) = warehouse();
        let zones = ZoneCatalog::default();
        let summaries = data.zone_summaries(&zones);
        assert_eq!(summaries.len(), 7);
        assert_eq!(
            summaries[0],
            ZoneSummary {
                zone: Zone::from("A"),
                job_count: 1,
                box_count: 2,
                value: Price::new(Decimal::from(200)),
            }
        );
        assert_eq!(summaries[1].box_count, 3);
        assert_eq!(summaries[6].job_count, 0);

        data.soft_delete_job(&a, t0()).unwrap();
        assert_eq!(data.zone_summaries(&zones)[0].job_count, 0);
    }

    #[test]
    fn test_stored_zone_counts_skip_pulled() {
        let (data, _) = warehouse();
        let counts = data.stored_zone_counts(&ZoneCatalog::default());
        assert_eq!(counts[0], (Zone::from("A"), 1));
        assert_eq!(counts[1], (Zone::from("B"), 0));
        assert_eq!(counts[2], (Zone::from("C"), 1));
    }

    #[test]
    fn test_recycle_bin_lists_boxes_of_deleted_jobs() {
        let (mut data, [a, c, _]) = warehouse();
        assert!(data.recycle_bin("").is_empty());
        data.soft_delete_job(&a, t0()).unwrap();
        data.soft_delete_job(&c, t0()).unwrap();

        let bin = data.recycle_bin("");
        assert_eq!(bin.len(), 3);
        assert!(bin.iter().all(|e| e.deleted_at == Some(t0())));

        let hits = data.recycle_bin("bx-1001");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].job_id, &a);

        let value = serde_json::to_value(&hits[0]).unwrap();
        assert_eq!(value["box"]["boxNumber"], "BX-1001");
    }
}
