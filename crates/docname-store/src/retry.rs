//! Bounded retries for store operations
//!
//! A failed operation is re-issued after a fixed delay until it succeeds, a
//! non-retryable error comes back, or the attempt budget is spent. There is
//! no backoff and no jitter.

use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docname_core::{
    Agenda, AgendaId, Agendaitem, AgendaitemId, JobId, JobStatus, Meeting, MeetingId, NamingJob,
    Piece, PieceId, Purpose, Track,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create policy; at least one attempt is always made
    #[inline]
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Single attempt, no delay
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Maximum number of attempts
    #[inline]
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay between attempts
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run an operation under this policy
    ///
    /// # Errors
    /// - the operation's own error if it is not retryable
    /// - `StoreError::RetriesExhausted` wrapping the last error once every
    ///   attempt failed
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut op: F) -> StoreResult<T>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = StoreResult<T>> + Send,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) if attempt >= self.max_attempts => {
                    tracing::error!(operation, attempt, %err, "giving up on store operation");
                    return Err(StoreError::RetriesExhausted {
                        operation,
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        %err,
                        "store operation failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    /// Five attempts, two seconds apart
    fn default() -> Self {
        Self::new(5, Duration::from_secs(2))
    }
}

/// Store decorator that puts every call under a [`RetryPolicy`]
#[derive(Clone)]
pub struct RetryingStore {
    inner: Arc<dyn DocumentStore>,
    policy: RetryPolicy,
}

impl RetryingStore {
    /// Wrap a store
    #[inline]
    #[must_use]
    pub fn new(inner: Arc<dyn DocumentStore>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Active retry policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

impl std::fmt::Debug for RetryingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingStore")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DocumentStore for RetryingStore {
    async fn fetch_meeting(&self, id: &MeetingId) -> StoreResult<Option<Meeting>> {
        self.policy
            .run("fetch_meeting", || self.inner.fetch_meeting(id))
            .await
    }

    async fn fetch_agenda(&self, id: &AgendaId) -> StoreResult<Option<Agenda>> {
        self.policy
            .run("fetch_agenda", || self.inner.fetch_agenda(id))
            .await
    }

    async fn fetch_sorted_agendaitems(&self, agenda: &AgendaId) -> StoreResult<Vec<Agendaitem>> {
        self.policy
            .run("fetch_sorted_agendaitems", || {
                self.inner.fetch_sorted_agendaitems(agenda)
            })
            .await
    }

    async fn fetch_pieces(&self, agendaitem: &AgendaitemId) -> StoreResult<Vec<Piece>> {
        self.policy
            .run("fetch_pieces", || self.inner.fetch_pieces(agendaitem))
            .await
    }

    async fn fetch_ratification(&self, agendaitem: &AgendaitemId) -> StoreResult<Option<Piece>> {
        self.policy
            .run("fetch_ratification", || self.inner.fetch_ratification(agendaitem))
            .await
    }

    async fn fetch_meeting_pieces(&self, meeting: &MeetingId) -> StoreResult<Vec<Piece>> {
        self.policy
            .run("fetch_meeting_pieces", || self.inner.fetch_meeting_pieces(meeting))
            .await
    }

    async fn max_activity_number(
        &self,
        year: i32,
        purpose: Purpose,
        track: Track,
    ) -> StoreResult<Option<u32>> {
        self.policy
            .run("max_activity_number", || {
                self.inner.max_activity_number(year, purpose, track)
            })
            .await
    }

    async fn write_piece_name(&self, piece: &PieceId, name: &str) -> StoreResult<()> {
        self.policy
            .run("write_piece_name", || self.inner.write_piece_name(piece, name))
            .await
    }

    async fn write_mirrored_names(&self, piece: &PieceId, name: &str) -> StoreResult<()> {
        self.policy
            .run("write_mirrored_names", || {
                self.inner.write_mirrored_names(piece, name)
            })
            .await
    }

    async fn write_original_name(&self, piece: &PieceId, name: &str) -> StoreResult<bool> {
        self.policy
            .run("write_original_name", || {
                self.inner.write_original_name(piece, name)
            })
            .await
    }

    async fn write_piece_position(&self, piece: &PieceId, position: u32) -> StoreResult<()> {
        self.policy
            .run("write_piece_position", || {
                self.inner.write_piece_position(piece, position)
            })
            .await
    }

    async fn write_activity_number(
        &self,
        agendaitem: &AgendaitemId,
        number: u32,
    ) -> StoreResult<bool> {
        self.policy
            .run("write_activity_number", || {
                self.inner.write_activity_number(agendaitem, number)
            })
            .await
    }

    async fn create_job(&self, source: &str, pieces: &[PieceId]) -> StoreResult<NamingJob> {
        self.policy
            .run("create_job", || self.inner.create_job(source, pieces))
            .await
    }

    async fn job_exists(&self, job: JobId) -> StoreResult<bool> {
        self.policy
            .run("job_exists", || self.inner.job_exists(job))
            .await
    }

    async fn fetch_job(&self, job: JobId) -> StoreResult<Option<NamingJob>> {
        self.policy
            .run("fetch_job", || self.inner.fetch_job(job))
            .await
    }

    async fn update_job_status(
        &self,
        job: JobId,
        status: JobStatus,
        error: Option<&str>,
    ) -> StoreResult<()> {
        self.policy
            .run("update_job_status", || {
                self.inner.update_job_status(job, status, error)
            })
            .await
    }

    async fn append_used_pieces(&self, job: JobId, pieces: &[PieceId]) -> StoreResult<()> {
        self.policy
            .run("append_used_pieces", || {
                self.inner.append_used_pieces(job, pieces)
            })
            .await
    }

    async fn latest_successful_job_completion(&self) -> StoreResult<Option<DateTime<Utc>>> {
        self.policy
            .run("latest_successful_job_completion", || {
                self.inner.latest_successful_job_completion()
            })
            .await
    }
}
