//! Read-only naming preview
//!
//! Shows, for every agenda item, the activity number and piece names a
//! commit would produce from the current store state. Nothing is written.

use crate::allocator::{plan_agenda, seed_counters};
use crate::error::JobError;
use docname_core::{
    generate_name, AgendaId, AgendaitemId, Meeting, MeetingId, Piece, PieceId, Purpose,
};
use docname_store::DocumentStore;
use serde::{Deserialize, Serialize};

/// Proposed name for one piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiecePreview {
    /// Piece ID
    pub id: PieceId,
    /// Position within the agenda item
    pub position: u32,
    /// Current title
    pub title: String,
    /// Name a commit would write
    pub new_title: String,
    /// Named by an earlier run; a commit leaves it alone
    pub already_named: bool,
}

/// Proposed numbering for one agenda item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPreview {
    /// Agenda item ID
    pub id: AgendaitemId,
    /// Position on the agenda
    pub position: u32,
    /// Document purpose
    pub purpose: Purpose,
    /// Postponed flag
    pub postponed: bool,
    /// Existing or to-be-allocated activity number
    pub activity_number: Option<u32>,
    /// Pieces, ratification last
    pub pieces: Vec<PiecePreview>,
}

/// Preview of a whole agenda
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaPreview {
    /// Agenda ID
    pub agenda: AgendaId,
    /// Meeting the agenda belongs to
    pub meeting: MeetingId,
    /// Items in agenda order
    pub items: Vec<ItemPreview>,
}

impl AgendaPreview {
    /// Every piece that would get a new name, with that name
    pub fn proposed_renames(&self) -> impl Iterator<Item = (&PieceId, &str)> {
        self.items
            .iter()
            .flat_map(|item| item.pieces.iter())
            .filter(|p| !p.already_named)
            .map(|p| (&p.id, p.new_title.as_str()))
    }
}

/// Build the preview for an agenda
///
/// A meeting without planned start degrades: no numbers are allocated and
/// every piece keeps its title.
///
/// # Errors
/// - `JobError::AgendaNotFound` / `JobError::MeetingNotFound`
/// - `JobError::Store` when a read fails
#[tracing::instrument(skip(store))]
pub async fn preview_agenda(
    store: &dyn DocumentStore,
    agenda: &AgendaId,
) -> Result<AgendaPreview, JobError> {
    let agenda = store
        .fetch_agenda(agenda)
        .await?
        .ok_or_else(|| JobError::AgendaNotFound(agenda.clone()))?;
    let meeting = store
        .fetch_meeting(&agenda.meeting)
        .await?
        .ok_or_else(|| JobError::MeetingNotFound(agenda.meeting.clone()))?;

    let mut counters = if meeting.planned_start.is_some() {
        Some(seed_counters(store, &meeting).await?)
    } else {
        tracing::warn!(meeting = %meeting.id, "no planned start, preview keeps current titles");
        None
    };

    let items = plan_agenda(store, &meeting, &agenda.id, counters.as_mut())
        .await?
        .into_iter()
        .map(|planned| ItemPreview {
            pieces: planned
                .pieces
                .iter()
                .map(|piece| {
                    preview_piece(&meeting, planned.purpose, planned.activity_number, piece)
                })
                .collect(),
            id: planned.item.id,
            position: planned.item.position,
            purpose: planned.purpose,
            postponed: planned.item.postponed,
            activity_number: planned.activity_number,
        })
        .collect();

    Ok(AgendaPreview {
        agenda: agenda.id,
        meeting: meeting.id,
        items,
    })
}

fn preview_piece(
    meeting: &Meeting,
    purpose: Purpose,
    activity_number: Option<u32>,
    piece: &Piece,
) -> PiecePreview {
    let new_title = match activity_number {
        Some(number) if !piece.is_named() && meeting.planned_start.is_some() => {
            generate_name(meeting, purpose, number, piece)
        }
        _ => piece.title.clone(),
    };
    PiecePreview {
        id: piece.id.clone(),
        position: piece.position,
        title: piece.title.clone(),
        new_title,
        already_named: piece.is_named(),
    }
}
