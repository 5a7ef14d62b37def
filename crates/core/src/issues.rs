//! Box issue tracker: `clear` or `flagged(note)` per box.
//!
//! Operators flag problems while a job is on a production line, but any job
//! status is accepted here.

use crate::error::{LifecycleError, ValidationError};
use crate::model::{StorageBox, SystemData};
use crate::types::{BoxId, JobId};

impl SystemData {
    fn box_mut(
        &mut self,
        job_id: &JobId,
        box_id: &BoxId,
    ) -> Result<&mut StorageBox, LifecycleError> {
        self.job_mut(job_id)?
            .boxes
            .iter_mut()
            .find(|b| &b.id == box_id)
            .ok_or_else(|| LifecycleError::BoxNotFound {
                job_id: job_id.clone(),
                box_id: box_id.clone(),
            })
    }

    /// Flag a box with a problem description. Re-flagging replaces the note.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyIssueNote`] for a blank note, or a not-found
    /// error for an unknown job or box.
    pub fn flag_box_issue(
        &mut self,
        job_id: &JobId,
        box_id: &BoxId,
        note: &str,
    ) -> Result<&StorageBox, LifecycleError> {
        let note = note.trim();
        if note.is_empty() {
            return Err(ValidationError::EmptyIssueNote.into());
        }
        let b = self.box_mut(job_id, box_id)?;
        b.issue = Some(note.to_owned());
        Ok(b)
    }

    /// Clear a box's flag and discard its note.
    ///
    /// # Errors
    ///
    /// A not-found error for an unknown job or box.
    pub fn clear_box_issue(
        &mut self,
        job_id: &JobId,
        box_id: &BoxId,
    ) -> Result<&StorageBox, LifecycleError> {
        let b = self.box_mut(job_id, box_id)?;
        b.issue = None;
        Ok(b)
    }

    /// Clear a flagged box, or flag a clear one with `note`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyIssueNote`] when flagging without a note, or a
    /// not-found error for an unknown job or box.
    pub fn toggle_box_issue(
        &mut self,
        job_id: &JobId,
        box_id: &BoxId,
        note: Option<&str>,
    ) -> Result<&StorageBox, LifecycleError> {
        if self.box_mut(job_id, box_id)?.has_issue() {
            self.clear_box_issue(job_id, box_id)
        } else {
            self.flag_box_issue(job_id, box_id, note.unwrap_or_default())
        }
    }
}
