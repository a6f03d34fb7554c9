//! In-memory document store
//!
//! Backs the service binary (loaded from a JSON snapshot) and the test
//! suites. Supports per-operation fault injection so retry and failure paths
//! can be exercised without a real backend.

use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docname_core::{
    Agenda, AgendaId, Agendaitem, AgendaitemId, JobId, JobStatus, Meeting, MeetingId, NamingJob,
    Piece, PieceId, Purpose, Track,
};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Agenda item together with the agenda it sits on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaitemRecord {
    /// Owning agenda
    pub agenda: AgendaId,
    /// The item itself
    #[serde(flatten)]
    pub item: Agendaitem,
}

/// Piece together with its agenda item and mirrored copies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceRecord {
    /// Owning agenda item
    pub agendaitem: AgendaitemId,
    /// The piece itself
    #[serde(flatten)]
    pub piece: Piece,
    /// Title of the signed copy, if the piece has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_title: Option<String>,
    /// Title of the flattened copy, if the piece has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flattened_title: Option<String>,
}

impl PieceRecord {
    /// Piece without signed or flattened copies
    #[inline]
    #[must_use]
    pub fn new(agendaitem: impl Into<AgendaitemId>, piece: Piece) -> Self {
        Self {
            agendaitem: agendaitem.into(),
            piece,
            signed_title: None,
            flattened_title: None,
        }
    }

    /// With signed and flattened copies carrying the current title
    #[inline]
    #[must_use]
    pub fn with_mirrors(mut self) -> Self {
        self.signed_title = Some(self.piece.title.clone());
        self.flattened_title = Some(self.piece.title.clone());
        self
    }
}

/// Activity number used by a past meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Calendar year
    pub year: i32,
    /// Numbering track
    pub track: Track,
    /// Document purpose
    pub purpose: Purpose,
    /// Number used
    pub number: u32,
}

/// Serializable content of an [`InMemoryStore`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Meetings
    #[serde(default)]
    pub meetings: Vec<Meeting>,
    /// Agendas
    #[serde(default)]
    pub agendas: Vec<Agenda>,
    /// Agenda items
    #[serde(default)]
    pub agendaitems: Vec<AgendaitemRecord>,
    /// Regular pieces
    #[serde(default)]
    pub pieces: Vec<PieceRecord>,
    /// Ratification documents, keyed by the agenda item of their subcase
    #[serde(default)]
    pub ratifications: Vec<PieceRecord>,
    /// Numbers used outside the stored agendas
    #[serde(default)]
    pub activity_history: Vec<ActivityRecord>,
    /// Naming jobs
    #[serde(default)]
    pub jobs: Vec<NamingJob>,
}

impl Snapshot {
    /// Empty snapshot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a meeting
    #[must_use]
    pub fn with_meeting(mut self, meeting: Meeting) -> Self {
        self.meetings.push(meeting);
        self
    }

    /// Add an agenda
    #[must_use]
    pub fn with_agenda(mut self, agenda: Agenda) -> Self {
        self.agendas.push(agenda);
        self
    }

    /// Add an agenda item to an agenda
    #[must_use]
    pub fn with_agendaitem(mut self, agenda: impl Into<AgendaId>, item: Agendaitem) -> Self {
        self.agendaitems.push(AgendaitemRecord {
            agenda: agenda.into(),
            item,
        });
        self
    }

    /// Add a piece
    #[must_use]
    pub fn with_piece(mut self, record: PieceRecord) -> Self {
        self.pieces.push(record);
        self
    }

    /// Add a ratification document
    #[must_use]
    pub fn with_ratification(mut self, record: PieceRecord) -> Self {
        self.ratifications.push(record);
        self
    }

    /// Add a historical activity number
    #[must_use]
    pub fn with_history(mut self, year: i32, track: Track, purpose: Purpose, number: u32) -> Self {
        self.activity_history.push(ActivityRecord {
            year,
            track,
            purpose,
            number,
        });
        self
    }
}

/// Thread-safe in-memory [`DocumentStore`]
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<Snapshot>,
    faults: Mutex<HashMap<&'static str, u32>>,
    hide_jobs: AtomicBool,
}

impl InMemoryStore {
    /// Empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding a snapshot
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            data: RwLock::new(snapshot),
            ..Self::default()
        }
    }

    /// Load a JSON snapshot from disk
    ///
    /// # Errors
    /// `StoreError::Corrupt` if the file cannot be read or parsed
    pub fn from_json_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?;
        tracing::info!(
            path = %path.display(),
            meetings = snapshot.meetings.len(),
            agendas = snapshot.agendas.len(),
            pieces = snapshot.pieces.len(),
            "loaded store snapshot"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Copy of the current content
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.data.read().clone()
    }

    /// Make the next `times` calls of `operation` fail as unavailable
    pub fn fail_operation(&self, operation: &'static str, times: u32) {
        self.faults.lock().insert(operation, times);
    }

    /// Hide every job from the caller, as if it lacked access
    pub fn deny_job_access(&self) {
        self.hide_jobs.store(true, Ordering::SeqCst);
    }

    /// Current state of a piece
    #[must_use]
    pub fn piece(&self, id: &PieceId) -> Option<PieceRecord> {
        let data = self.data.read();
        data.pieces
            .iter()
            .chain(data.ratifications.iter())
            .find(|r| &r.piece.id == id)
            .cloned()
    }

    /// Current state of an agenda item
    #[must_use]
    pub fn agendaitem(&self, id: &AgendaitemId) -> Option<Agendaitem> {
        self.data
            .read()
            .agendaitems
            .iter()
            .find(|r| &r.item.id == id)
            .map(|r| r.item.clone())
    }

    fn check_fault(&self, operation: &'static str) -> StoreResult<()> {
        let mut faults = self.faults.lock();
        match faults.get_mut(operation) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(StoreError::Unavailable(format!("injected fault in {operation}")))
            }
            _ => Ok(()),
        }
    }

    fn jobs_visible(&self) -> bool {
        !self.hide_jobs.load(Ordering::SeqCst)
    }
}

fn piece_mut<'a>(data: &'a mut Snapshot, id: &PieceId) -> StoreResult<&'a mut PieceRecord> {
    data.pieces
        .iter_mut()
        .chain(data.ratifications.iter_mut())
        .find(|r| &r.piece.id == id)
        .ok_or_else(|| StoreError::not_found("piece", id.as_str()))
}

fn job_mut<'a>(data: &'a mut Snapshot, id: JobId) -> StoreResult<&'a mut NamingJob> {
    data.jobs
        .iter_mut()
        .find(|j| j.id == id)
        .ok_or_else(|| StoreError::not_found("job", id.to_string()))
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn fetch_meeting(&self, id: &MeetingId) -> StoreResult<Option<Meeting>> {
        self.check_fault("fetch_meeting")?;
        Ok(self.data.read().meetings.iter().find(|m| &m.id == id).cloned())
    }

    async fn fetch_agenda(&self, id: &AgendaId) -> StoreResult<Option<Agenda>> {
        self.check_fault("fetch_agenda")?;
        Ok(self.data.read().agendas.iter().find(|a| &a.id == id).cloned())
    }

    async fn fetch_sorted_agendaitems(&self, agenda: &AgendaId) -> StoreResult<Vec<Agendaitem>> {
        self.check_fault("fetch_sorted_agendaitems")?;
        let mut items: Vec<Agendaitem> = self
            .data
            .read()
            .agendaitems
            .iter()
            .filter(|r| &r.agenda == agenda && r.item.formally_ok)
            .map(|r| r.item.clone())
            .collect();
        items.sort_by_key(|i| i.position);
        Ok(items)
    }

    async fn fetch_pieces(&self, agendaitem: &AgendaitemId) -> StoreResult<Vec<Piece>> {
        self.check_fault("fetch_pieces")?;
        let mut pieces: Vec<Piece> = self
            .data
            .read()
            .pieces
            .iter()
            .filter(|r| &r.agendaitem == agendaitem)
            .map(|r| r.piece.clone())
            .collect();
        pieces.sort_by_key(|p| p.position);
        Ok(pieces)
    }

    async fn fetch_ratification(&self, agendaitem: &AgendaitemId) -> StoreResult<Option<Piece>> {
        self.check_fault("fetch_ratification")?;
        Ok(self
            .data
            .read()
            .ratifications
            .iter()
            .find(|r| &r.agendaitem == agendaitem)
            .map(|r| r.piece.clone()))
    }

    async fn fetch_meeting_pieces(&self, meeting: &MeetingId) -> StoreResult<Vec<Piece>> {
        self.check_fault("fetch_meeting_pieces")?;
        let data = self.data.read();
        let agendas: HashSet<&AgendaId> = data
            .agendas
            .iter()
            .filter(|a| &a.meeting == meeting)
            .map(|a| &a.id)
            .collect();
        let items: HashSet<&AgendaitemId> = data
            .agendaitems
            .iter()
            .filter(|r| agendas.contains(&r.agenda))
            .map(|r| &r.item.id)
            .collect();

        let mut seen = HashSet::new();
        Ok(data
            .pieces
            .iter()
            .chain(data.ratifications.iter())
            .filter(|r| items.contains(&r.agendaitem))
            .filter(|r| seen.insert(r.piece.id.clone()))
            .map(|r| r.piece.clone())
            .collect())
    }

    async fn max_activity_number(
        &self,
        year: i32,
        purpose: Purpose,
        track: Track,
    ) -> StoreResult<Option<u32>> {
        self.check_fault("max_activity_number")?;
        let data = self.data.read();

        let historical = data
            .activity_history
            .iter()
            .filter(|h| h.year == year && h.track == track && h.purpose == purpose)
            .map(|h| h.number);

        let meetings: HashMap<&MeetingId, &Meeting> =
            data.meetings.iter().map(|m| (&m.id, m)).collect();
        let approved: HashSet<&AgendaId> = data
            .agendas
            .iter()
            .filter(|a| a.approval_year() == Some(year))
            .filter(|a| meetings.get(&a.meeting).is_some_and(|m| m.track == track))
            .map(|a| &a.id)
            .collect();
        let stored = data
            .agendaitems
            .iter()
            .filter(|r| approved.contains(&r.agenda))
            .filter(|r| r.item.purpose() == purpose)
            .filter_map(|r| r.item.activity_number);

        Ok(historical.chain(stored).max())
    }

    async fn write_piece_name(&self, piece: &PieceId, name: &str) -> StoreResult<()> {
        self.check_fault("write_piece_name")?;
        let mut data = self.data.write();
        piece_mut(&mut data, piece)?.piece.title = name.to_string();
        Ok(())
    }

    async fn write_mirrored_names(&self, piece: &PieceId, name: &str) -> StoreResult<()> {
        self.check_fault("write_mirrored_names")?;
        let mut data = self.data.write();
        let record = piece_mut(&mut data, piece)?;
        for mirror in [&mut record.signed_title, &mut record.flattened_title] {
            if let Some(title) = mirror {
                *title = name.to_string();
            }
        }
        Ok(())
    }

    async fn write_original_name(&self, piece: &PieceId, name: &str) -> StoreResult<bool> {
        self.check_fault("write_original_name")?;
        let mut data = self.data.write();
        let record = piece_mut(&mut data, piece)?;
        if record.piece.original_name.is_some() {
            return Ok(false);
        }
        record.piece.original_name = Some(name.to_string());
        Ok(true)
    }

    async fn write_piece_position(&self, piece: &PieceId, position: u32) -> StoreResult<()> {
        self.check_fault("write_piece_position")?;
        let mut data = self.data.write();
        piece_mut(&mut data, piece)?.piece.position = position;
        Ok(())
    }

    async fn write_activity_number(
        &self,
        agendaitem: &AgendaitemId,
        number: u32,
    ) -> StoreResult<bool> {
        self.check_fault("write_activity_number")?;
        let mut data = self.data.write();
        let record = data
            .agendaitems
            .iter_mut()
            .find(|r| &r.item.id == agendaitem)
            .ok_or_else(|| StoreError::not_found("agendaitem", agendaitem.as_str()))?;
        if record.item.activity_number.is_some() {
            return Ok(false);
        }
        record.item.activity_number = Some(number);
        Ok(true)
    }

    async fn create_job(&self, source: &str, pieces: &[PieceId]) -> StoreResult<NamingJob> {
        self.check_fault("create_job")?;
        let job = NamingJob::new(source, pieces.to_vec());
        self.data.write().jobs.push(job.clone());
        Ok(job)
    }

    async fn job_exists(&self, job: JobId) -> StoreResult<bool> {
        self.check_fault("job_exists")?;
        Ok(self.jobs_visible() && self.data.read().jobs.iter().any(|j| j.id == job))
    }

    async fn fetch_job(&self, job: JobId) -> StoreResult<Option<NamingJob>> {
        self.check_fault("fetch_job")?;
        if !self.jobs_visible() {
            return Ok(None);
        }
        Ok(self.data.read().jobs.iter().find(|j| j.id == job).cloned())
    }

    async fn update_job_status(
        &self,
        job: JobId,
        status: JobStatus,
        error: Option<&str>,
    ) -> StoreResult<()> {
        self.check_fault("update_job_status")?;
        let mut data = self.data.write();
        job_mut(&mut data, job)?
            .finish(status, error.map(str::to_string), Utc::now())
            .map_err(|e| StoreError::Conflict(e.to_string()))
    }

    async fn append_used_pieces(&self, job: JobId, pieces: &[PieceId]) -> StoreResult<()> {
        self.check_fault("append_used_pieces")?;
        let mut data = self.data.write();
        let job = job_mut(&mut data, job)?;
        for piece in pieces {
            if !job.used_pieces.contains(piece) {
                job.used_pieces.push(piece.clone());
            }
        }
        Ok(())
    }

    async fn latest_successful_job_completion(&self) -> StoreResult<Option<DateTime<Utc>>> {
        self.check_fault("latest_successful_job_completion")?;
        Ok(self
            .data
            .read()
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::Success)
            .filter_map(|j| j.ended)
            .max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use docname_core::{AgendaitemType, SubcaseType};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn approved_at(year: i32) -> DateTime<Utc> {
        format!("{year}-03-10T09:00:00Z").parse().unwrap()
    }

    fn sample() -> Snapshot {
        Snapshot::new()
            .with_meeting(Meeting::new(
                "m1",
                Track::Regular,
                NaiveDate::from_ymd_opt(2024, 3, 7),
            ))
            .with_agenda(Agenda::new("a1", "m1").with_approved_at(approved_at(2024)))
            .with_agendaitem(
                "a1",
                Agendaitem::new("i2", 2, AgendaitemType::Note, SubcaseType::Ratification)
                    .formally_ok(),
            )
            .with_agendaitem(
                "a1",
                Agendaitem::new("i1", 1, AgendaitemType::Note, SubcaseType::Other)
                    .with_activity_number(7)
                    .formally_ok(),
            )
            .with_agendaitem(
                "a1",
                Agendaitem::new("i3", 3, AgendaitemType::Note, SubcaseType::Other)
                    .with_activity_number(8),
            )
            .with_piece(PieceRecord::new("i1", Piece::new("p2", "Second", 2)).with_mirrors())
            .with_piece(PieceRecord::new("i1", Piece::new("p1", "First", 1)))
            .with_ratification(PieceRecord::new("i2", Piece::new("r1", "Decree", 0)))
            .with_history(2024, Track::Regular, Purpose::Document, 4)
            .with_history(2024, Track::Regular, Purpose::Decree, 9)
    }

    #[tokio::test]
    async fn items_and_pieces_come_back_sorted() {
        let store = InMemoryStore::from_snapshot(sample());
        let items = store.fetch_sorted_agendaitems(&"a1".into()).await.unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "i2"]);

        let pieces = store.fetch_pieces(&"i1".into()).await.unwrap();
        let ids: Vec<_> = pieces.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn ratification_is_found_by_agendaitem() {
        let store = InMemoryStore::from_snapshot(sample());
        assert!(store.fetch_pieces(&"i2".into()).await.unwrap().is_empty());

        let ratification = store.fetch_ratification(&"i2".into()).await.unwrap().unwrap();
        assert_eq!(ratification.id.as_str(), "r1");
        assert!(store.fetch_ratification(&"i1".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn items_without_formal_approval_are_left_out() {
        let store = InMemoryStore::from_snapshot(sample());
        let items = store.fetch_sorted_agendaitems(&"a1".into()).await.unwrap();
        assert!(items.iter().all(|i| i.id.as_str() != "i3"));
        assert!(store.agendaitem(&"i3".into()).is_some());
    }

    #[tokio::test]
    async fn only_agendas_approved_in_the_year_count() {
        let store = InMemoryStore::from_snapshot(
            Snapshot::new()
                .with_meeting(Meeting::new("m1", Track::Regular, NaiveDate::from_ymd_opt(2024, 3, 7)))
                .with_meeting(Meeting::new("m2", Track::Regular, NaiveDate::from_ymd_opt(2024, 12, 20)))
                .with_meeting(Meeting::new("m3", Track::Special, NaiveDate::from_ymd_opt(2024, 4, 2)))
                .with_agenda(Agenda::new("draft", "m1"))
                .with_agenda(Agenda::new("late", "m2").with_approved_at(approved_at(2025)))
                .with_agenda(Agenda::new("special", "m3").with_approved_at(approved_at(2024)))
                .with_agendaitem(
                    "draft",
                    Agendaitem::new("i1", 1, AgendaitemType::Note, SubcaseType::Other)
                        .with_activity_number(40)
                        .formally_ok(),
                )
                .with_agendaitem(
                    "late",
                    Agendaitem::new("i2", 1, AgendaitemType::Note, SubcaseType::Other)
                        .with_activity_number(50)
                        .formally_ok(),
                )
                .with_agendaitem(
                    "special",
                    Agendaitem::new("i3", 1, AgendaitemType::Note, SubcaseType::Other)
                        .with_activity_number(60)
                        .formally_ok(),
                ),
        );

        let regular = store
            .max_activity_number(2024, Purpose::Document, Track::Regular)
            .await
            .unwrap();
        assert_eq!(regular, None);
        let next_year = store
            .max_activity_number(2025, Purpose::Document, Track::Regular)
            .await
            .unwrap();
        assert_eq!(next_year, Some(50));
        let special = store
            .max_activity_number(2024, Purpose::Document, Track::Special)
            .await
            .unwrap();
        assert_eq!(special, Some(60));
    }

    #[tokio::test]
    async fn max_activity_number_spans_history_and_agendas() {
        let store = InMemoryStore::from_snapshot(sample());
        let doc = store
            .max_activity_number(2024, Purpose::Document, Track::Regular)
            .await
            .unwrap();
        assert_eq!(doc, Some(8));
        let decree = store
            .max_activity_number(2024, Purpose::Decree, Track::Regular)
            .await
            .unwrap();
        assert_eq!(decree, Some(9));
        let none = store
            .max_activity_number(2024, Purpose::Announcement, Track::Special)
            .await
            .unwrap();
        assert_eq!(none, None);
    }

    #[tokio::test]
    async fn activity_number_is_write_once() {
        let store = InMemoryStore::from_snapshot(sample());
        assert!(!store.write_activity_number(&"i1".into(), 99).await.unwrap());
        assert!(store.write_activity_number(&"i2".into(), 10).await.unwrap());
        assert_eq!(store.agendaitem(&"i1".into()).unwrap().activity_number, Some(7));
        assert_eq!(store.agendaitem(&"i2".into()).unwrap().activity_number, Some(10));
    }

    #[tokio::test]
    async fn original_name_is_write_once() {
        let store = InMemoryStore::from_snapshot(sample());
        assert!(store.write_original_name(&"p1".into(), "First").await.unwrap());
        assert!(!store.write_original_name(&"p1".into(), "Other").await.unwrap());
        assert_eq!(
            store.piece(&"p1".into()).unwrap().piece.original_name.as_deref(),
            Some("First")
        );
    }

    #[tokio::test]
    async fn mirrors_follow_only_where_present() {
        let store = InMemoryStore::from_snapshot(sample());
        store.write_mirrored_names(&"p2".into(), "New").await.unwrap();
        store.write_mirrored_names(&"p1".into(), "New").await.unwrap();

        let p2 = store.piece(&"p2".into()).unwrap();
        assert_eq!(p2.signed_title.as_deref(), Some("New"));
        assert_eq!(p2.flattened_title.as_deref(), Some("New"));
        assert_eq!(store.piece(&"p1".into()).unwrap().signed_title, None);
    }

    #[tokio::test]
    async fn unknown_piece_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.write_piece_name(&"nope".into(), "x").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "piece", .. }));
    }

    #[tokio::test]
    async fn meeting_pieces_include_ratifications() {
        let store = InMemoryStore::from_snapshot(sample());
        let pieces = store.fetch_meeting_pieces(&"m1".into()).await.unwrap();
        let mut ids: Vec<_> = pieces.iter().map(|p| p.id.to_string()).collect();
        ids.sort();
        assert_eq!(ids, vec!["p1", "p2", "r1"]);
    }

    #[tokio::test]
    async fn job_lifecycle() {
        let store = InMemoryStore::new();
        let job = store.create_job("a1", &[]).await.unwrap();
        assert!(store.job_exists(job.id).await.unwrap());
        assert_eq!(store.latest_successful_job_completion().await.unwrap(), None);

        store
            .append_used_pieces(job.id, &[PieceId::new("p1"), PieceId::new("p1"), PieceId::new("p2")])
            .await
            .unwrap();
        store
            .update_job_status(job.id, JobStatus::Success, None)
            .await
            .unwrap();

        let stored = store.fetch_job(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Success);
        assert_eq!(stored.used_pieces.len(), 2);
        assert!(stored.ended.is_some());
        assert_eq!(
            store.latest_successful_job_completion().await.unwrap(),
            stored.ended
        );

        let err = store
            .update_job_status(job.id, JobStatus::Failed, Some("late"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn denied_job_access_hides_jobs() {
        let store = InMemoryStore::new();
        let job = store.create_job("a1", &[]).await.unwrap();
        store.deny_job_access();
        assert!(!store.job_exists(job.id).await.unwrap());
        store
            .update_job_status(job.id, JobStatus::Failed, Some("forbidden"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn injected_faults_run_out() {
        let store = InMemoryStore::new();
        store.fail_operation("fetch_agenda", 1);
        assert!(store.fetch_agenda(&"a1".into()).await.unwrap_err().is_retryable());
        assert!(store.fetch_agenda(&"a1".into()).await.unwrap().is_none());
    }

    #[test]
    fn loads_json_snapshot() {
        let json = r#"{
            "meetings": [{"id": "m1", "type": "special", "plannedStart": "2024-03-07"}],
            "agendas": [{"id": "a1", "meeting": "m1"}],
            "agendaitems": [{"agenda": "a1", "id": "i1", "position": 1, "type": "communication", "formallyOk": true}],
            "pieces": [{"agendaitem": "i1", "id": "p1", "title": "Budget", "position": 1, "revision": 2}]
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let store = InMemoryStore::from_json_file(file.path()).unwrap();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.meetings[0].track, Track::Special);
        assert_eq!(snapshot.agendaitems[0].item.purpose(), Purpose::Announcement);
        assert!(snapshot.agendaitems[0].item.formally_ok);
        assert_eq!(snapshot.pieces[0].piece.revision, 2);
    }

    #[test]
    fn unreadable_snapshot_is_corrupt() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(
            InMemoryStore::from_json_file(file.path()),
            Err(StoreError::Corrupt(_))
        ));
        assert!(matches!(
            InMemoryStore::from_json_file("/definitely/not/here.json"),
            Err(StoreError::Corrupt(_))
        ));
    }
}
