//! Error types for docname core
//!
//! Naming and classification are total; only parsing an existing name and
//! moving a job between states can fail.

use crate::job::JobStatus;

/// A string does not follow the canonical naming grammar
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseNameError {
    /// No grammar match at all
    #[error("not a canonical document name: \"{0}\"")]
    NoMatch(String),

    /// Date token has the right shape but is not a calendar date
    #[error("invalid date \"{raw}\" in document name")]
    InvalidDate { raw: String },
}

/// Illegal job lifecycle change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum JobStateError {
    /// Transition not in the allowed set
    #[error("illegal job transition: {from} -> {to}")]
    IllegalTransition { from: JobStatus, to: JobStatus },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseNameError::NoMatch("foo".to_string());
        assert_eq!(err.to_string(), "not a canonical document name: \"foo\"");
    }

    #[test]
    fn transition_error_display() {
        let err = JobStateError::IllegalTransition {
            from: JobStatus::Success,
            to: JobStatus::Running,
        };
        assert_eq!(err.to_string(), "illegal job transition: success -> running");
    }
}
