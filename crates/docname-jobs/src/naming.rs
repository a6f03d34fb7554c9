//! Commit flow: number agenda items and rename their pieces
//!
//! Numbers are planned exactly as the preview plans them, then items are
//! handled in agenda order. An item's activity number is persisted before
//! any of its pieces is renamed. Only pieces in the approved mapping are
//! touched, and pieces named by an earlier run are skipped. Writes already
//! made are not undone when a later one fails.

use crate::allocator::{plan_agenda, seed_counters};
use crate::error::JobError;
use chrono::{DateTime, Utc};
use docname_core::{
    date_prefix, generate_name, parse_name, AgendaId, Meeting, Piece, PieceId, Purpose,
};
use docname_store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One approved rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRename {
    /// Piece to rename
    pub id: PieceId,
    /// Name to write
    pub name: String,
}

/// Body of a commit request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    /// When the caller last saw the naming state
    #[serde(default)]
    pub last_known_update: Option<DateTime<Utc>>,
    /// Approved piece names
    #[serde(default)]
    pub pieces: Vec<PieceRename>,
}

impl CommitRequest {
    /// IDs of the pieces in the mapping
    #[must_use]
    pub fn piece_ids(&self) -> Vec<PieceId> {
        self.pieces.iter().map(|p| p.id.clone()).collect()
    }

    /// Mapping from piece to approved name
    #[must_use]
    pub fn renames(&self) -> HashMap<PieceId, String> {
        self.pieces
            .iter()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect()
    }
}

/// Outcome of a commit run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamingReport {
    /// Items that got pieces renamed
    pub items: usize,
    /// Pieces renamed
    pub renamed: usize,
    /// Pieces left alone because an earlier run named them
    pub already_named: usize,
}

/// Run the commit flow for one agenda
///
/// Every approved name is checked against the number its item gets before
/// anything is written.
///
/// # Errors
/// - `JobError::MissingPlannedStart` before anything is written
/// - `JobError::NameMismatch` before anything is written, when an approved
///   name carries another date, track, purpose or number
/// - `JobError::NumberConflict` if an item got numbered behind this run's back
/// - `JobError::Store` on an unrecovered store failure
#[tracing::instrument(skip(store, meeting, renames), fields(meeting = %meeting.id))]
pub async fn run_naming(
    store: &dyn DocumentStore,
    meeting: &Meeting,
    agenda: &AgendaId,
    renames: &HashMap<PieceId, String>,
) -> Result<NamingReport, JobError> {
    let mut counters = seed_counters(store, meeting).await?;
    let plan = plan_agenda(store, meeting, agenda, Some(&mut counters)).await?;
    let mut report = NamingReport::default();

    let mut work = Vec::new();
    for planned in plan {
        let (named, pending): (Vec<Piece>, Vec<Piece>) =
            planned.pieces.iter().cloned().partition(Piece::is_named);
        report.already_named += named
            .iter()
            .filter(|p| renames.contains_key(&p.id))
            .count();
        let selected: Vec<(Piece, &str)> = pending
            .into_iter()
            .filter_map(|p| renames.get(&p.id).map(|name| (p, name.as_str())))
            .collect();
        if selected.is_empty() {
            tracing::debug!(agendaitem = %planned.item.id, "no approved pieces, skipping item");
            continue;
        }

        let number = planned
            .activity_number
            .ok_or_else(|| JobError::MissingPlannedStart(meeting.id.clone()))?;
        for (piece, name) in &selected {
            check_approved_name(meeting, planned.purpose, number, &piece.id, name)?;
        }
        work.push((planned, number, selected));
    }

    for (planned, number, selected) in work {
        let item = &planned.item;
        if planned.allocates_number() {
            if !store.write_activity_number(&item.id, number).await? {
                tracing::warn!(agendaitem = %item.id, number, "agenda item was numbered concurrently");
                return Err(JobError::NumberConflict(item.id.clone()));
            }
            tracing::debug!(agendaitem = %item.id, number, purpose = %planned.purpose, "assigned activity number");
        }

        for (piece, name) in &selected {
            let generated = generate_name(meeting, planned.purpose, number, piece);
            if generated != *name {
                tracing::debug!(
                    piece = %piece.id,
                    %generated,
                    approved = %name,
                    "approved name differs from generated name"
                );
            }

            if !store.write_original_name(&piece.id, &piece.title).await? {
                tracing::warn!(piece = %piece.id, "original name already recorded by another writer");
            }
            store.write_piece_name(&piece.id, name).await?;
            store.write_mirrored_names(&piece.id, name).await?;
            if let Some((_, position)) = planned.ratification.as_ref().filter(|(id, _)| id == &piece.id) {
                store.write_piece_position(&piece.id, *position).await?;
            }
            tracing::debug!(piece = %piece.id, %name, "renamed piece");
            report.renamed += 1;
        }
        report.items += 1;
    }

    tracing::info!(
        items = report.items,
        renamed = report.renamed,
        already_named = report.already_named,
        "naming run finished"
    );
    Ok(report)
}

/// An approved name must carry the item's date, track, purpose and number
fn check_approved_name(
    meeting: &Meeting,
    purpose: Purpose,
    number: u32,
    piece: &PieceId,
    name: &str,
) -> Result<(), JobError> {
    let matches = parse_name(name).is_ok_and(|parsed| {
        Some(parsed.date) == meeting.planned_start
            && parsed.special_track == meeting.track.is_special()
            && parsed.purpose == purpose
            && parsed.activity_number() == Some(number)
    });
    if matches {
        return Ok(());
    }

    let expected = match meeting.planned_start {
        Some(date) => format!(
            "{} {}{}.{number:04}",
            date_prefix(date),
            if meeting.track.is_special() { "VV " } else { "" },
            purpose.code()
        ),
        None => format!("{}.{number:04}", purpose.code()),
    };
    Err(JobError::NameMismatch {
        piece: piece.clone(),
        expected,
        name: name.to_string(),
    })
}
