//! Testing utilities for the docname workspace
//!
//! Shared fixtures and helpers.

#![allow(missing_docs)]

use chrono::NaiveDate;
use docname_core::{
    Agenda, Agendaitem, AgendaitemType, JobId, JobStatus, Meeting, NamingJob, Piece, Purpose,
    SubcaseType, Track,
};
use docname_store::{DocumentStore, InMemoryStore, PieceRecord, Snapshot};
use std::sync::Arc;
use std::time::Duration;

pub const MEETING: &str = "m1";
pub const AGENDA: &str = "a1";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Regular meeting planned on 2024-03-07
pub fn sample_meeting() -> Meeting {
    Meeting::new(MEETING, Track::Regular, Some(date(2024, 3, 7)))
}

/// One meeting, one agenda not yet approved, four formally approved items
///
/// - `i1` document: `p1` "Annual Budget", `p2` "Annex BIS" (revision 2, type "Nota")
/// - `i2` announcement, postponed: `p3` "Press release"
/// - `i3` decree: `p4` "Decree draft", ratification `r1`
/// - `i4` document, numbered 3, `p5` already named
/// - `i9` document without formal approval: `p9` "Draft note"
///
/// History: 2024 regular documents up to 11, decrees up to 2.
pub fn sample_snapshot() -> Snapshot {
    snapshot_for(sample_meeting())
}

/// [`sample_snapshot`] around a different meeting
pub fn snapshot_for(meeting: Meeting) -> Snapshot {
    let meeting_id = meeting.id.clone();
    Snapshot::new()
        .with_meeting(meeting)
        .with_agenda(Agenda::new(AGENDA, meeting_id))
        .with_agendaitem(
            AGENDA,
            Agendaitem::new("i1", 1, AgendaitemType::Note, SubcaseType::Other).formally_ok(),
        )
        .with_agendaitem(
            AGENDA,
            Agendaitem::new("i2", 2, AgendaitemType::Communication, SubcaseType::Other)
                .postponed()
                .formally_ok(),
        )
        .with_agendaitem(
            AGENDA,
            Agendaitem::new("i3", 3, AgendaitemType::Note, SubcaseType::Ratification)
                .formally_ok(),
        )
        .with_agendaitem(
            AGENDA,
            Agendaitem::new("i4", 4, AgendaitemType::Note, SubcaseType::Other)
                .with_activity_number(3)
                .formally_ok(),
        )
        .with_agendaitem(
            AGENDA,
            Agendaitem::new("i9", 9, AgendaitemType::Note, SubcaseType::Other),
        )
        .with_piece(PieceRecord::new("i1", Piece::new("p1", "Annual Budget", 1)).with_mirrors())
        .with_piece(PieceRecord::new(
            "i1",
            Piece::new("p2", "Annex BIS", 2).with_revision(2).with_type("Nota"),
        ))
        .with_piece(PieceRecord::new("i2", Piece::new("p3", "Press release", 1)))
        .with_piece(PieceRecord::new("i3", Piece::new("p4", "Decree draft", 1)))
        .with_ratification(PieceRecord::new("i3", Piece::new("r1", "Ratification decree", 0)))
        .with_piece(PieceRecord::new("i4", named_piece("p5", "VR 2024 0703 DOC.0003-1 Old", "Old")))
        .with_piece(PieceRecord::new("i9", Piece::new("p9", "Draft note", 1)))
        .with_history(2024, Track::Regular, Purpose::Document, 11)
        .with_history(2024, Track::Regular, Purpose::Decree, 2)
}

/// Piece that went through an earlier naming run
pub fn named_piece(id: &str, title: &str, original: &str) -> Piece {
    let mut piece = Piece::new(id, title, 1);
    piece.original_name = Some(original.to_string());
    piece
}

/// Names the sample agenda gets on its first commit
pub fn expected_sample_names() -> Vec<(&'static str, &'static str)> {
    vec![
        ("p1", "VR 2024 0703 DOC.0012-1 Annual Budget"),
        ("p2", "VR 2024 0703 DOC.0012-2 Annex - nota BIS"),
        ("p3", "VR 2024 0703 MED.0001-1 Press release"),
        ("p4", "VR 2024 0703 DEC.0003-1 Decree draft"),
        ("r1", "VR 2024 0703 DEC.0003-2 Ratification decree - ratification"),
    ]
}

/// Formally approved document item `id` at `position` with one unnamed piece
pub fn with_document_item(snapshot: Snapshot, id: &str, position: u32, piece: &str, title: &str) -> Snapshot {
    snapshot
        .with_agendaitem(
            AGENDA,
            Agendaitem::new(id, position, AgendaitemType::Note, SubcaseType::Other).formally_ok(),
        )
        .with_piece(PieceRecord::new(id, Piece::new(piece, title, 1)))
}

pub fn sample_store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::from_snapshot(sample_snapshot()))
}

/// Poll until a job reaches a terminal status
///
/// Panics after five seconds.
pub async fn wait_for_job(store: &dyn DocumentStore, id: JobId) -> NamingJob {
    for _ in 0..500 {
        if let Some(job) = store.fetch_job(id).await.unwrap() {
            if job.status != JobStatus::Running {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {id} did not finish");
}
