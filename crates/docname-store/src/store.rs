//! Document store contract
//!
//! Everything the naming engine reads from or writes to persistent storage
//! goes through [`DocumentStore`]. Implementations answer in store order
//! where an order is documented (agenda items and pieces by position).

use crate::error::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docname_core::{
    Agenda, AgendaId, Agendaitem, AgendaitemId, JobId, JobStatus, Meeting,
    MeetingId, NamingJob, Piece, PieceId, Purpose, Track,
};

/// Persistent store of meetings, documents and naming jobs
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a meeting
    async fn fetch_meeting(&self, id: &MeetingId) -> StoreResult<Option<Meeting>>;

    /// Fetch an agenda
    async fn fetch_agenda(&self, id: &AgendaId) -> StoreResult<Option<Agenda>>;

    /// Formally approved agenda items of an agenda, ordered by position
    ///
    /// Items without formal approval are neither numbered nor named.
    async fn fetch_sorted_agendaitems(&self, agenda: &AgendaId) -> StoreResult<Vec<Agendaitem>>;

    /// Pieces of an agenda item, ordered by position
    async fn fetch_pieces(&self, agendaitem: &AgendaitemId) -> StoreResult<Vec<Piece>>;

    /// Ratification document of an agenda item's subcase, if any
    async fn fetch_ratification(&self, agendaitem: &AgendaitemId) -> StoreResult<Option<Piece>>;

    /// Every piece on any agenda of a meeting
    async fn fetch_meeting_pieces(&self, meeting: &MeetingId) -> StoreResult<Vec<Piece>>;

    /// Highest activity number used in a year for a track and purpose
    ///
    /// Only agendas approved during `year` count, next to any numbers the
    /// store keeps from outside its agendas.
    async fn max_activity_number(
        &self,
        year: i32,
        purpose: Purpose,
        track: Track,
    ) -> StoreResult<Option<u32>>;

    /// Replace the title of a piece
    async fn write_piece_name(&self, piece: &PieceId, name: &str) -> StoreResult<()>;

    /// Replace the titles of the signed and flattened copies of a piece
    async fn write_mirrored_names(&self, piece: &PieceId, name: &str) -> StoreResult<()>;

    /// Record the title a piece had before its first rename
    ///
    /// Returns `false` when an original name was already recorded.
    async fn write_original_name(&self, piece: &PieceId, name: &str) -> StoreResult<bool>;

    /// Store the position of a piece within its agenda item
    async fn write_piece_position(&self, piece: &PieceId, position: u32) -> StoreResult<()>;

    /// Attach an activity number to an agenda item
    ///
    /// Returns `false` when the item already carries a number; that number
    /// is left untouched.
    async fn write_activity_number(&self, agendaitem: &AgendaitemId, number: u32)
        -> StoreResult<bool>;

    /// Create a running naming job
    async fn create_job(&self, source: &str, pieces: &[PieceId]) -> StoreResult<NamingJob>;

    /// Is the job visible to the current caller
    async fn job_exists(&self, job: JobId) -> StoreResult<bool>;

    /// Fetch a job
    async fn fetch_job(&self, job: JobId) -> StoreResult<Option<NamingJob>>;

    /// Move a job to a new status
    async fn update_job_status(
        &self,
        job: JobId,
        status: JobStatus,
        error: Option<&str>,
    ) -> StoreResult<()>;

    /// Add pieces to the set a job touched
    async fn append_used_pieces(&self, job: JobId, pieces: &[PieceId]) -> StoreResult<()>;

    /// Completion time of the most recent successful job
    async fn latest_successful_job_completion(&self) -> StoreResult<Option<DateTime<Utc>>>;
}
