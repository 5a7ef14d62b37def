//! Customer records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CustomerId;

/// A customer that owns storage jobs.
///
/// Customers are created once and never changed by the lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique ID (`CUST-XXXXX`).
    pub id: CustomerId,
    /// Display name. Never empty.
    pub name: String,
    /// Free-form contact details; empty when not given.
    #[serde(default)]
    pub contact: String,
    /// When the customer was registered.
    pub created_at: DateTime<Utc>,
}
