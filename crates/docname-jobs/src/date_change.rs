//! Date-change flow
//!
//! When a meeting moves, the date inside every canonical name carrying the
//! old date is rewritten. Only the date changes; numbers, positions and
//! subjects are kept as they are.

use crate::error::JobError;
use chrono::NaiveDate;
use docname_core::{date_prefix, replace_date, JobId, MeetingId, PieceId};
use docname_store::DocumentStore;
use serde::{Deserialize, Serialize};

/// Body of a date-change request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateChangeRequest {
    /// Date the names currently carry
    pub from: NaiveDate,
    /// New meeting date
    pub to: NaiveDate,
}

/// Outcome of a date-change run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateChangeReport {
    /// Pieces whose name starts with the old date prefix
    pub candidates: usize,
    /// Pieces actually rewritten
    pub renamed: usize,
}

/// Rewrite the names of a meeting's pieces to a new date
///
/// Touched pieces are added to the job's used-piece set in batches of
/// `batch_size`.
///
/// # Errors
/// `JobError::Store` on an unrecovered store failure
#[tracing::instrument(skip(store, request), fields(from = %request.from, to = %request.to))]
pub async fn run_date_change(
    store: &dyn DocumentStore,
    job: JobId,
    meeting: &MeetingId,
    request: DateChangeRequest,
    batch_size: usize,
) -> Result<DateChangeReport, JobError> {
    let prefix = date_prefix(request.from);
    let batch_size = batch_size.max(1);
    let mut report = DateChangeReport::default();
    let mut batch: Vec<PieceId> = Vec::with_capacity(batch_size);

    for piece in store.fetch_meeting_pieces(meeting).await? {
        if !piece.title.starts_with(&prefix) {
            continue;
        }
        report.candidates += 1;

        let renamed = replace_date(&piece.title, request.to);
        if renamed == piece.title {
            continue;
        }
        store.write_piece_name(&piece.id, &renamed).await?;
        store.write_mirrored_names(&piece.id, &renamed).await?;
        tracing::debug!(piece = %piece.id, name = %renamed, "rewrote date");
        report.renamed += 1;

        batch.push(piece.id);
        if batch.len() >= batch_size {
            store.append_used_pieces(job, &batch).await?;
            batch.clear();
        }
    }
    if !batch.is_empty() {
        store.append_used_pieces(job, &batch).await?;
    }

    tracing::info!(
        candidates = report.candidates,
        renamed = report.renamed,
        "date change finished"
    );
    Ok(report)
}
