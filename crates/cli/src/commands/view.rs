//! Read-only views over the current system document.

use serde::Serialize;
use storage_hub::Warehouse;
use storage_hub_core::{Job, SystemData, Zone, ZoneSummary};

use super::print_json;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub async fn show(warehouse: &Warehouse) -> CommandResult {
    let data = warehouse.fetch_system_data().await;
    print_json(&data)?;
    Ok(())
}

/// Stored jobs matching `term`, optionally in one zone. With `all`, every job
/// that can still be edited (stored or pulled).
pub async fn search(
    warehouse: &Warehouse,
    term: &str,
    zone: Option<&str>,
    all: bool,
) -> CommandResult {
    let data = warehouse.fetch_system_data().await;
    let zone = zone.map(Zone::new);
    print_json(&search_jobs(&data, term, zone.as_ref(), all))?;
    Ok(())
}

fn search_jobs<'a>(
    data: &'a SystemData,
    term: &str,
    zone: Option<&Zone>,
    all: bool,
) -> Vec<&'a Job> {
    if !all {
        return data.available_jobs(term, zone);
    }
    data.editable_jobs(term)
        .into_iter()
        .filter(|job| zone.is_none_or(|z| job.zone() == z))
        .collect()
}

pub async fn active(warehouse: &Warehouse) -> CommandResult {
    let data = warehouse.fetch_system_data().await;
    print_json(&data.active_jobs())?;
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ZoneReport {
    summaries: Vec<ZoneSummary>,
    stored_jobs: Vec<StoredCount>,
}

#[derive(Serialize)]
struct StoredCount {
    zone: Zone,
    jobs: usize,
}

pub async fn zones(warehouse: &Warehouse) -> CommandResult {
    let data = warehouse.fetch_system_data().await;
    let catalog = warehouse.zones();
    let report = ZoneReport {
        summaries: data.zone_summaries(catalog),
        stored_jobs: data
            .stored_zone_counts(catalog)
            .into_iter()
            .map(|(zone, jobs)| StoredCount { zone, jobs })
            .collect(),
    };
    print_json(&report)?;
    Ok(())
}

pub async fn trash(warehouse: &Warehouse, term: &str) -> CommandResult {
    let data = warehouse.fetch_system_data().await;
    print_json(&data.recycle_bin(term))?;
    Ok(())
}
