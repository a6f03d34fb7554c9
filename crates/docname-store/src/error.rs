//! Error types for store access
//!
//! Distinguishes transient failures (worth retrying) from answers the store
//! will keep giving no matter how often it is asked.

/// Store operation errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store could not be reached or timed out
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Referenced record does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Write rejected by the store
    #[error("write conflict: {0}")]
    Conflict(String),

    /// Stored data could not be read
    #[error("corrupt data: {0}")]
    Corrupt(String),

    /// Transient failure persisted through every attempt
    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// Create not-found error
    #[inline]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Check if a fresh attempt may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
