//! Unified error handling for the hub.

use std::time::Duration;

use storage_hub_core::{LifecycleError, ValidationError};
use thiserror::Error;

use crate::store::StoreError;

/// Writing the system document to the remote store failed.
///
/// The local fallback copy is not updated when this is returned; callers
/// must fetch again before retrying their operation.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The remote store rejected the write or could not be reached.
    #[error("remote write failed: {0}")]
    Remote(#[from] StoreError),

    /// The remote store did not answer in time.
    #[error("remote write timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Service-level error type for warehouse operations.
#[derive(Debug, Error)]
pub enum HubError {
    /// The operation was rejected before anything was written.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The change was computed but could not be stored.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl From<ValidationError> for HubError {
    fn from(err: ValidationError) -> Self {
        Self::Lifecycle(err.into())
    }
}

impl HubError {
    /// Whether the error came from input validation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Lifecycle(LifecycleError::Validation(_)))
    }
}
