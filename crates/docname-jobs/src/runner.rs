//! Job submission and background execution
//!
//! [`JobRunner`] validates a request, creates the job record, checks the
//! caller may see it, and hands the work to a detached task. The job record
//! is the only channel back to the caller; its terminal status is written
//! once, when the task ends.

use crate::config::NamingConfig;
use crate::date_change::{run_date_change, DateChangeRequest};
use crate::error::{JobError, RequestError};
use crate::naming::{run_naming, CommitRequest};
use crate::preview::{preview_agenda, AgendaPreview};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use docname_core::{AgendaId, JobId, JobStatus, Meeting, MeetingId, NamingJob, PieceId};
use docname_store::{DocumentStore, RetryingStore};
use std::fmt::Display;
use std::sync::Arc;

/// Exclusive claim on a meeting, released on drop
#[derive(Debug)]
struct MeetingLease {
    leases: Arc<DashMap<MeetingId, ()>>,
    meeting: MeetingId,
}

impl MeetingLease {
    fn acquire(leases: &Arc<DashMap<MeetingId, ()>>, meeting: &MeetingId) -> Option<Self> {
        match leases.entry(meeting.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(Self {
                    leases: Arc::clone(leases),
                    meeting: meeting.clone(),
                })
            }
        }
    }
}

impl Drop for MeetingLease {
    fn drop(&mut self) {
        self.leases.remove(&self.meeting);
    }
}

/// Entry point for naming and date-change jobs
#[derive(Clone)]
pub struct JobRunner {
    store: Arc<dyn DocumentStore>,
    config: NamingConfig,
    leases: Arc<DashMap<MeetingId, ()>>,
}

impl JobRunner {
    /// Create runner; every store call goes through the configured retries
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, config: NamingConfig) -> Self {
        let store: Arc<dyn DocumentStore> =
            Arc::new(RetryingStore::new(store, config.retry.policy()));
        Self {
            store,
            config,
            leases: Arc::new(DashMap::new()),
        }
    }

    /// Store as seen by jobs (with retries)
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    /// Does the meeting have a job running in this process
    #[inline]
    #[must_use]
    pub fn is_busy(&self, meeting: &MeetingId) -> bool {
        self.leases.contains_key(meeting)
    }

    /// Preview names for an agenda
    ///
    /// # Errors
    /// 404 for unknown agenda or meeting, 500 on store failure
    pub async fn preview(&self, agenda: &AgendaId) -> Result<AgendaPreview, RequestError> {
        Ok(preview_agenda(self.store.as_ref(), agenda).await?)
    }

    /// Fetch a job
    ///
    /// # Errors
    /// 404 when the job does not exist or is not visible
    pub async fn job(&self, id: JobId) -> Result<NamingJob, RequestError> {
        self.store
            .fetch_job(id)
            .await?
            .ok_or_else(|| RequestError::NotFound {
                kind: "job",
                id: id.to_string(),
            })
    }

    /// Submit a commit for an agenda
    ///
    /// Returns the running job; naming continues in the background.
    ///
    /// # Errors
    /// - 400 for an empty mapping, missing `lastKnownUpdate` or a meeting
    ///   without planned start
    /// - 404 for unknown agenda or meeting
    /// - 409 when another job finished after `lastKnownUpdate` or the
    ///   meeting is busy
    /// - 403 when the caller cannot see the created job
    #[tracing::instrument(skip(self, request), fields(pieces = request.pieces.len()))]
    pub async fn submit_commit(
        &self,
        agenda: AgendaId,
        request: CommitRequest,
    ) -> Result<NamingJob, RequestError> {
        let last_known = request
            .last_known_update
            .ok_or_else(|| RequestError::Invalid("lastKnownUpdate is required".into()))?;
        if request.pieces.is_empty() {
            return Err(RequestError::Invalid("no pieces to rename".into()));
        }

        let agenda_record = self
            .store
            .fetch_agenda(&agenda)
            .await?
            .ok_or_else(|| JobError::AgendaNotFound(agenda.clone()))?;
        let meeting = self.meeting(&agenda_record.meeting).await?;
        if meeting.planned_start.is_none() {
            return Err(JobError::MissingPlannedStart(meeting.id).into());
        }

        if let Some(latest) = self.store.latest_successful_job_completion().await? {
            if latest > last_known {
                return Err(RequestError::Stale { last_known, latest });
            }
        }

        let lease = MeetingLease::acquire(&self.leases, &meeting.id)
            .ok_or_else(|| RequestError::MeetingBusy(meeting.id.clone()))?;
        let job = self.open_job(agenda.as_str(), &request.piece_ids()).await?;

        let store = Arc::clone(&self.store);
        let renames = request.renames();
        let job_id = job.id;
        tokio::spawn(async move {
            let outcome = run_naming(store.as_ref(), &meeting, &agenda, &renames).await;
            finish(store.as_ref(), job_id, outcome).await;
            drop(lease);
        });

        Ok(job)
    }

    /// Submit a date change for a meeting
    ///
    /// # Errors
    /// - 404 for an unknown meeting
    /// - 409 when the meeting is busy
    /// - 403 when the caller cannot see the created job
    #[tracing::instrument(skip(self), fields(from = %request.from, to = %request.to))]
    pub async fn submit_date_change(
        &self,
        meeting: MeetingId,
        request: DateChangeRequest,
    ) -> Result<NamingJob, RequestError> {
        let meeting = self.meeting(&meeting).await?.id;

        let lease = MeetingLease::acquire(&self.leases, &meeting)
            .ok_or_else(|| RequestError::MeetingBusy(meeting.clone()))?;
        let job = self.open_job(meeting.as_str(), &[]).await?;

        let store = Arc::clone(&self.store);
        let batch_size = self.config.used_piece_batch_size;
        let job_id = job.id;
        tokio::spawn(async move {
            let outcome = run_date_change(store.as_ref(), job_id, &meeting, request, batch_size).await;
            finish(store.as_ref(), job_id, outcome).await;
            drop(lease);
        });

        Ok(job)
    }

    async fn meeting(&self, id: &MeetingId) -> Result<Meeting, RequestError> {
        Ok(self
            .store
            .fetch_meeting(id)
            .await?
            .ok_or_else(|| JobError::MeetingNotFound(id.clone()))?)
    }

    /// Create the job and check the caller can see it
    async fn open_job(&self, source: &str, pieces: &[PieceId]) -> Result<NamingJob, RequestError> {
        let job = self.store.create_job(source, pieces).await?;
        tracing::info!(job = %job.id, source, "created naming job");

        if !self.store.job_exists(job.id).await? {
            tracing::warn!(job = %job.id, "caller cannot see its job, failing it");
            self.store
                .update_job_status(job.id, JobStatus::Failed, Some("not authorized"))
                .await?;
            return Err(RequestError::Forbidden(job.id));
        }
        Ok(job)
    }
}

impl std::fmt::Debug for JobRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRunner")
            .field("config", &self.config)
            .field("busy_meetings", &self.leases.len())
            .finish_non_exhaustive()
    }
}

/// Write the terminal status of a job
async fn finish<R: std::fmt::Debug>(
    store: &dyn DocumentStore,
    job: JobId,
    outcome: Result<R, impl Display>,
) {
    let (status, error) = match outcome {
        Ok(report) => {
            tracing::info!(%job, ?report, "job succeeded");
            (JobStatus::Success, None)
        }
        Err(err) => {
            tracing::error!(%job, %err, "job failed");
            (JobStatus::Failed, Some(err.to_string()))
        }
    };
    if let Err(err) = store.update_job_status(job, status, error.as_deref()).await {
        tracing::error!(%job, %err, "could not record job outcome");
    }
}
