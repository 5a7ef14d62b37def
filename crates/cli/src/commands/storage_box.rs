//! Box commands: issue flags and permanent deletion.

use serde_json::json;
use storage_hub::Warehouse;
use storage_hub_core::{BoxId, BoxRemoval, JobId};

use super::print_json;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub async fn flag(warehouse: &Warehouse, job: &str, box_id: &str, note: &str) -> CommandResult {
    let storage_box = warehouse
        .flag_box_issue(&JobId::new(job), &BoxId::new(box_id), note)
        .await?;
    print_json(&storage_box)?;
    Ok(())
}

pub async fn clear(warehouse: &Warehouse, job: &str, box_id: &str) -> CommandResult {
    let storage_box = warehouse
        .clear_box_issue(&JobId::new(job), &BoxId::new(box_id))
        .await?;
    print_json(&storage_box)?;
    Ok(())
}

pub async fn toggle(
    warehouse: &Warehouse,
    job: &str,
    box_id: &str,
    note: Option<&str>,
) -> CommandResult {
    let storage_box = warehouse
        .toggle_box_issue(&JobId::new(job), &BoxId::new(box_id), note)
        .await?;
    print_json(&storage_box)?;
    Ok(())
}

/// Permanently remove one box of a deleted job.
pub async fn purge(warehouse: &Warehouse, job: &str, box_id: &str) -> CommandResult {
    let removal = warehouse
        .permanently_delete_box(&JobId::new(job), &BoxId::new(box_id))
        .await?;
    print_json(&removal_json(job, box_id, removal))?;
    Ok(())
}

fn removal_json(job: &str, box_id: &str, removal: BoxRemoval) -> serde_json::Value {
    match removal {
        BoxRemoval::Removed { remaining } => json!({
            "jobId": job,
            "boxId": box_id,
            "jobRemoved": false,
            "remainingBoxes": remaining,
        }),
        BoxRemoval::JobRemoved => json!({
            "jobId": job,
            "boxId": box_id,
            "jobRemoved": true,
            "remainingBoxes": 0,
        }),
    }
}
