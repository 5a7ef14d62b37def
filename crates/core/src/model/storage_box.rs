//! Boxes: the smallest trackable unit inside a job.

use serde::{Deserialize, Serialize};

use crate::types::{BoxId, Price};

/// A physical box belonging to exactly one job.
///
/// The issue flag is held as `Option<note>`, so a note exists exactly when the
/// box is flagged. On disk this becomes the `hasIssue`/`issueNote` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BoxRecord", into = "BoxRecord")]
pub struct StorageBox {
    pub(crate) id: BoxId,
    pub(crate) box_number: String,
    pub(crate) color: String,
    pub(crate) box_size: String,
    pub(crate) price: Price,
    pub(crate) contents: String,
    pub(crate) issue: Option<String>,
}

impl StorageBox {
    #[must_use]
    pub const fn id(&self) -> &BoxId {
        &self.id
    }

    /// Display label, e.g. `BX-4821`. Not unique.
    #[must_use]
    pub fn box_number(&self) -> &str {
        &self.box_number
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn box_size(&self) -> &str {
        &self.box_size
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    #[must_use]
    pub const fn has_issue(&self) -> bool {
        self.issue.is_some()
    }

    /// The problem description, present only while the box is flagged.
    #[must_use]
    pub fn issue_note(&self) -> Option<&str> {
        self.issue.as_deref()
    }
}

/// Flat persisted form of a box.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoxRecord {
    id: BoxId,
    #[serde(default)]
    box_number: String,
    #[serde(default)]
    color: String,
    #[serde(default)]
    box_size: String,
    #[serde(default)]
    price: Price,
    #[serde(default)]
    contents: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    has_issue: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issue_note: Option<String>,
}

impl From<BoxRecord> for StorageBox {
    fn from(record: BoxRecord) -> Self {
        // A stray note without the flag is dropped; a flag without a note
        // keeps an empty note so the pair stays consistent.
        let issue = record
            .has_issue
            .then(|| record.issue_note.unwrap_or_default());
        Self {
            id: record.id,
            box_number: record.box_number,
            color: record.color,
            box_size: record.box_size,
            price: record.price,
            contents: record.contents,
            issue,
        }
    }
}

impl From<StorageBox> for BoxRecord {
    fn from(b: StorageBox) -> Self {
        Self {
            id: b.id,
            box_number: b.box_number,
            color: b.color,
            box_size: b.box_size,
            price: b.price,
            contents: b.contents,
            has_issue: b.issue.is_some(),
            issue_note: b.issue,
        }
    }
}
