//! Naming job records and their lifecycle
//!
//! A job starts `Running` and ends in exactly one of `Success` or `Failed`.
//! Terminal states have no outgoing transitions.

use crate::error::JobStateError;
use crate::types::{JobId, PieceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Lifecycle status of a naming job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Work in progress
    Running,
    /// Finished without errors
    Success,
    /// Finished with an unrecovered error
    Failed,
}

impl JobStatus {
    /// Is this a terminal state
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// States reachable from this one
    #[must_use]
    pub fn allowed_transitions(&self) -> &'static [JobStatus] {
        match self {
            Self::Running => &[Self::Success, Self::Failed],
            Self::Success | Self::Failed => &[],
        }
    }

    /// Validate a transition
    ///
    /// # Errors
    /// `JobStateError::IllegalTransition` if `to` is not reachable from `self`
    pub fn transition(self, to: JobStatus) -> Result<JobStatus, JobStateError> {
        if self.allowed_transitions().contains(&to) {
            Ok(to)
        } else {
            Err(JobStateError::IllegalTransition { from: self, to })
        }
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A tracked unit of asynchronous naming work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingJob {
    /// Job ID
    pub id: JobId,
    /// Agenda or meeting the job was triggered for
    pub source: String,
    /// Current status
    pub status: JobStatus,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Completion time (set with the terminal status)
    #[serde(default)]
    pub ended: Option<DateTime<Utc>>,
    /// Failure reason
    #[serde(default)]
    pub error: Option<String>,
    /// Pieces touched by the job
    #[serde(default)]
    pub used_pieces: Vec<PieceId>,
}

impl NamingJob {
    /// Create a running job
    #[must_use]
    pub fn new(source: impl Into<String>, used_pieces: Vec<PieceId>) -> Self {
        Self {
            id: JobId::new(),
            source: source.into(),
            status: JobStatus::Running,
            created: Utc::now(),
            ended: None,
            error: None,
            used_pieces,
        }
    }

    /// Move to a new status, stamping the completion time on terminal states
    ///
    /// # Errors
    /// `JobStateError::IllegalTransition` when the job already finished
    pub fn finish(
        &mut self,
        status: JobStatus,
        error: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), JobStateError> {
        self.status = self.status.transition(status)?;
        if status.is_terminal() {
            self.ended = Some(at);
        }
        self.error = error;
        Ok(())
    }
}
