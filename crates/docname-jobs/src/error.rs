//! Error types for naming jobs
//!
//! - [`JobError`]: a run that cannot finish; its message ends up on the job
//! - [`RequestError`]: a submission rejected before any work is started
//! - [`ConfigError`]: configuration that cannot be loaded

use chrono::{DateTime, Utc};
use docname_core::{AgendaId, AgendaitemId, JobId, MeetingId, PieceId};
use docname_store::StoreError;
use std::path::PathBuf;

/// Fatal errors inside a job run
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// Store failed (after retries, where retrying applies)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Agenda does not exist
    #[error("agenda not found: {0}")]
    AgendaNotFound(AgendaId),

    /// Meeting does not exist
    #[error("meeting not found: {0}")]
    MeetingNotFound(MeetingId),

    /// Counters cannot be scoped without a planned start
    #[error("meeting {0} has no planned start date")]
    MissingPlannedStart(MeetingId),

    /// Another writer numbered the item while this run was in progress
    #[error("agenda item {0} was numbered concurrently")]
    NumberConflict(AgendaitemId),

    /// Approved name does not carry the number its item gets
    #[error("approved name for piece {piece} does not start with {expected}: {name}")]
    NameMismatch {
        piece: PieceId,
        expected: String,
        name: String,
    },
}

/// Reasons a request is refused
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Missing or malformed input
    #[error("invalid request: {0}")]
    Invalid(String),

    /// Referenced record does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Another job finished after the state the caller saw
    #[error("stale state: a naming job completed at {latest}, after {last_known}")]
    Stale {
        last_known: DateTime<Utc>,
        latest: DateTime<Utc>,
    },

    /// A job for this meeting is still running
    #[error("meeting {0} already has a running job")]
    MeetingBusy(MeetingId),

    /// Caller cannot see the job it just created
    #[error("not authorized to run job {0}")]
    Forbidden(JobId),

    /// Store failure while handling the request
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RequestError {
    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Invalid(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound { .. } | Self::Store(StoreError::NotFound { .. }) => 404,
            Self::Stale { .. } | Self::MeetingBusy(_) => 409,
            Self::Store(_) => 500,
        }
    }
}

impl From<JobError> for RequestError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::Store(e) => Self::Store(e),
            JobError::AgendaNotFound(id) => Self::NotFound {
                kind: "agenda",
                id: id.0,
            },
            JobError::MeetingNotFound(id) => Self::NotFound {
                kind: "meeting",
                id: id.0,
            },
            e @ (JobError::MissingPlannedStart(_) | JobError::NameMismatch { .. }) => {
                Self::Invalid(e.to_string())
            }
            e @ JobError::NumberConflict(_) => Self::Store(StoreError::Conflict(e.to_string())),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File exists but could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this configuration
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(RequestError::Invalid("x".into()).status_code(), 400);
        assert_eq!(RequestError::Forbidden(JobId::new()).status_code(), 403);
        assert_eq!(
            RequestError::NotFound {
                kind: "agenda",
                id: "a1".into()
            }
            .status_code(),
            404
        );
        assert_eq!(RequestError::MeetingBusy("m1".into()).status_code(), 409);
        assert_eq!(
            RequestError::Store(StoreError::Unavailable("down".into())).status_code(),
            500
        );
        assert_eq!(
            RequestError::Store(StoreError::not_found("job", "j1")).status_code(),
            404
        );
    }

    #[test]
    fn job_errors_map_to_request_errors() {
        let err: RequestError = JobError::AgendaNotFound("a1".into()).into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "agenda not found: a1");

        let err: RequestError = JobError::MissingPlannedStart("m1".into()).into();
        assert_eq!(err.status_code(), 400);

        let err: RequestError = JobError::NameMismatch {
            piece: "p1".into(),
            expected: "VR 2024 0703 DOC.0012".into(),
            name: "Budget".into(),
        }
        .into();
        assert_eq!(err.status_code(), 400);
    }
}
