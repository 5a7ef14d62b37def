//! Job lifecycle commands.
//!
//! Every command prints the job as it was persisted.

use storage_hub::Warehouse;
use storage_hub_core::{JobDraft, JobId, Zone};

use super::print_json;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub async fn create(warehouse: &Warehouse, draft: JobDraft) -> CommandResult {
    let job = warehouse.create_job(draft).await?;
    print_json(&job)?;
    Ok(())
}

pub async fn edit(warehouse: &Warehouse, id: &str, draft: JobDraft) -> CommandResult {
    let job = warehouse.edit_job(&JobId::new(id), draft).await?;
    print_json(&job)?;
    Ok(())
}

pub async fn pull(warehouse: &Warehouse, id: &str, line: u8) -> CommandResult {
    let job = warehouse.pull_job(&JobId::new(id), line).await?;
    print_json(&job)?;
    Ok(())
}

pub async fn return_to_zone(warehouse: &Warehouse, id: &str, zone: &str) -> CommandResult {
    let job = warehouse.return_job(&JobId::new(id), Zone::new(zone)).await?;
    print_json(&job)?;
    Ok(())
}

pub async fn soft_delete(warehouse: &Warehouse, id: &str) -> CommandResult {
    let job = warehouse.soft_delete_job(&JobId::new(id)).await?;
    print_json(&job)?;
    Ok(())
}

/// Permanently remove a deleted job and print what was removed.
pub async fn purge(warehouse: &Warehouse, id: &str) -> CommandResult {
    let job = warehouse.permanently_delete_job(&JobId::new(id)).await?;
    print_json(&job)?;
    Ok(())
}
