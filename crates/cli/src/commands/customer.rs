//! Customer commands.

use storage_hub::Warehouse;
use storage_hub_core::{CustomerDraft, CustomerId};

use super::print_json;

/// Register a customer and print it.
pub async fn create(
    warehouse: &Warehouse,
    name: String,
    contact: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let customer = warehouse
        .create_customer(CustomerDraft { name, contact })
        .await?;
    print_json(&customer)?;
    Ok(())
}

pub async fn list(warehouse: &Warehouse) -> Result<(), Box<dyn std::error::Error>> {
    let data = warehouse.fetch_system_data().await;
    print_json(&data.customers)?;
    Ok(())
}

/// Delete a customer record. Jobs that reference it are left as they are.
pub async fn delete(warehouse: &Warehouse, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let customer = warehouse.delete_customer(&CustomerId::new(id)).await?;
    print_json(&customer)?;
    Ok(())
}
