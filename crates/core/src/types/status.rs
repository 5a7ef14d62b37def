//! Job status as it appears in the stored document.

use serde::{Deserialize, Serialize};

/// Flat job status value persisted under the `status` key.
///
/// In memory a job's status is carried by [`crate::JobState`], which also
/// holds the fields that are only valid in that state. This enum is the wire
/// form and the label used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// In a storage zone and available to be pulled.
    #[default]
    Stored,
    /// Out on a production line.
    Pulled,
    /// Declared by the document format but never written by any operation:
    /// returning a job sets it back to `stored`. Documents that still carry
    /// it are decoded as `stored`.
    Returned,
    /// Soft-deleted into the recycle bin.
    Deleted,
}

impl JobStatus {
    /// Statuses any operation can produce.
    pub const LIVE: [Self; 3] = [Self::Stored, Self::Pulled, Self::Deleted];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Pulled => "pulled",
            Self::Returned => "returned",
            Self::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stored" => Ok(Self::Stored),
            "pulled" => Ok(Self::Pulled),
            "returned" => Ok(Self::Returned),
            "deleted" => Ok(Self::Deleted),
            _ => Err(format!("invalid job status: {s}")),
        }
    }
}
