//! Errors raised by the entity model and the lifecycle state machine.
//!
//! Both error types are produced before anything is written: a failed
//! operation leaves the aggregate it was given untouched.

use thiserror::Error;

use crate::types::{BoxId, CustomerId, JobId, JobStatus};

/// A required field is missing or a value is out of its allowed domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is empty or whitespace.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A job must contain at least one box.
    #[error("a job must contain at least one box")]
    NoBoxes,

    /// Box prices cannot be negative.
    #[error("box {box_number} has a negative price")]
    NegativePrice {
        /// Display label of the offending box.
        box_number: String,
    },

    /// Flagging a box requires a description of the problem.
    #[error("an issue note is required to flag a box")]
    EmptyIssueNote,

    /// The zone is not part of the configured catalog.
    #[error("unknown zone: {0}")]
    UnknownZone(String),

    /// Production lines are numbered 1 to 6.
    #[error("production line must be between 1 and 6 (got {0})")]
    InvalidLine(u8),

    /// Two boxes of one job claim the same existing box ID.
    #[error("box {0} appears more than once")]
    DuplicateBox(BoxId),

    /// The referenced customer does not exist.
    #[error("unknown customer: {0}")]
    UnknownCustomer(CustomerId),
}

/// Errors from applying a lifecycle operation to the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Input failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No job with this ID exists in the aggregate.
    #[error("job not found: {0}")]
    JobNotFound(JobId),

    /// The job exists but has no box with this ID.
    #[error("box {box_id} not found in job {job_id}")]
    BoxNotFound {
        /// Owning job.
        job_id: JobId,
        /// Missing box.
        box_id: BoxId,
    },

    /// No customer with this ID exists in the aggregate.
    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// The operation is not allowed from the job's current status.
    #[error("cannot {action} job {job_id} while it is {from}")]
    InvalidTransition {
        /// Job the operation targeted.
        job_id: JobId,
        /// Status at the time of the attempt.
        from: JobStatus,
        /// Operation name, e.g. `pull`.
        action: &'static str,
    },
}

impl LifecycleError {
    /// Returns `true` for input errors the caller can correct and resubmit.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
