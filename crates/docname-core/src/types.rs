//! Core types for document naming
//!
//! Defines the records the naming rules read:
//! - Identifiers for meetings, agendas, agenda items, pieces and jobs
//! - Meetings, agendas and agenda items
//! - Pieces (documents) and the synthetic ratification piece

use crate::concepts::{AgendaitemType, SubcaseType, Track, RATIFICATION_TYPE_LABEL};
use crate::purpose::{classify, Purpose};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an identifier
            #[inline]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Meeting identifier
    MeetingId
);
string_id!(
    /// Agenda identifier
    AgendaId
);
string_id!(
    /// Agenda item identifier
    AgendaitemId
);
string_id!(
    /// Piece (document version) identifier
    PieceId
);

/// Unique naming job identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    /// Generate new job ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A government meeting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    /// Meeting ID
    pub id: MeetingId,
    /// Numbering track (derived from the meeting type)
    #[serde(default, alias = "type")]
    pub track: Track,
    /// Planned start date
    #[serde(default)]
    pub planned_start: Option<NaiveDate>,
}

impl Meeting {
    /// Create new meeting
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<MeetingId>, track: Track, planned_start: Option<NaiveDate>) -> Self {
        Self {
            id: id.into(),
            track,
            planned_start,
        }
    }

    /// Calendar year that scopes the activity counters
    #[inline]
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.planned_start.map(|d| d.year())
    }
}

/// An agenda of a meeting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agenda {
    /// Agenda ID
    pub id: AgendaId,
    /// Meeting this agenda belongs to
    pub meeting: MeetingId,
    /// When the agenda was approved; only approved agendas count towards
    /// the yearly high-water mark of activity numbers
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
}

impl Agenda {
    /// Create new agenda, not yet approved
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<AgendaId>, meeting: impl Into<MeetingId>) -> Self {
        Self {
            id: id.into(),
            meeting: meeting.into(),
            approved_at: None,
        }
    }

    /// With approval time
    #[inline]
    #[must_use]
    pub fn with_approved_at(mut self, approved_at: DateTime<Utc>) -> Self {
        self.approved_at = Some(approved_at);
        self
    }

    /// Calendar year of the approval
    #[inline]
    #[must_use]
    pub fn approval_year(&self) -> Option<i32> {
        self.approved_at.map(|at| at.year())
    }
}

/// An item on an agenda
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agendaitem {
    /// Agenda item ID
    pub id: AgendaitemId,
    /// Position within the agenda
    pub position: u32,
    /// Type classification
    #[serde(rename = "type", default)]
    pub item_type: AgendaitemType,
    /// Subcase classification
    #[serde(default)]
    pub subcase_type: SubcaseType,
    /// Previously assigned activity number
    #[serde(default)]
    pub activity_number: Option<u32>,
    /// Postponed flag (informational)
    #[serde(default)]
    pub postponed: bool,
    /// Formally approved for the agenda; only such items are numbered
    #[serde(default)]
    pub formally_ok: bool,
}

impl Agendaitem {
    /// Create new agenda item without an activity number
    #[inline]
    #[must_use]
    pub fn new(
        id: impl Into<AgendaitemId>,
        position: u32,
        item_type: AgendaitemType,
        subcase_type: SubcaseType,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            item_type,
            subcase_type,
            activity_number: None,
            postponed: false,
            formally_ok: false,
        }
    }

    /// With previously assigned activity number
    #[inline]
    #[must_use]
    pub fn with_activity_number(mut self, number: u32) -> Self {
        self.activity_number = Some(number);
        self
    }

    /// Mark as postponed
    #[inline]
    #[must_use]
    pub fn postponed(mut self) -> Self {
        self.postponed = true;
        self
    }

    /// Mark as formally approved
    #[inline]
    #[must_use]
    pub fn formally_ok(mut self) -> Self {
        self.formally_ok = true;
        self
    }

    /// Purpose of this item's documents
    #[inline]
    #[must_use]
    pub fn purpose(&self) -> Purpose {
        classify(self.item_type, self.subcase_type)
    }
}

/// A document version attached to an agenda item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    /// Piece ID
    pub id: PieceId,
    /// Current title
    pub title: String,
    /// Document type label
    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,
    /// Position within the agenda item
    pub position: u32,
    /// File extension of the attached file
    #[serde(default)]
    pub file_extension: String,
    /// Number of versions up to and including this one (1 = original)
    #[serde(default = "default_revision")]
    pub revision: u32,
    /// Title before the first rename
    #[serde(default)]
    pub original_name: Option<String>,
}

fn default_revision() -> u32 {
    1
}

impl Piece {
    /// Create new piece (first revision, no type label)
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<PieceId>, title: impl Into<String>, position: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            doc_type: None,
            position,
            file_extension: "pdf".to_string(),
            revision: 1,
            original_name: None,
        }
    }

    /// With document type label
    #[inline]
    #[must_use]
    pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// With revision number
    #[inline]
    #[must_use]
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    /// With file extension
    #[inline]
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    /// Has this piece been given a canonical name before
    #[inline]
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.original_name.is_some()
    }
}

/// Append the ratification piece after the last real piece
///
/// The ratification gets position `max + 1` (1 for an empty list), the
/// ratification type label when it has none, and is treated as an original
/// (revision 1). Returns the assigned position.
pub fn append_ratification(pieces: &mut Vec<Piece>, mut ratification: Piece) -> u32 {
    let position = pieces.iter().map(|p| p.position).max().unwrap_or(0) + 1;
    ratification.position = position;
    ratification.revision = 1;
    if ratification.doc_type.is_none() {
        ratification.doc_type = Some(RATIFICATION_TYPE_LABEL.to_string());
    }
    pieces.push(ratification);
    position
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_year() {
        let meeting = Meeting::new("m1", Track::Regular, NaiveDate::from_ymd_opt(2024, 3, 7));
        assert_eq!(meeting.year(), Some(2024));
        assert_eq!(Meeting::new("m2", Track::Regular, None).year(), None);
    }

    #[test]
    fn ratification_goes_after_last_piece() {
        let mut pieces = vec![Piece::new("p1", "A", 1), Piece::new("p2", "B", 4)];
        let pos = append_ratification(&mut pieces, Piece::new("r", "Decree", 0));
        assert_eq!(pos, 5);
        assert_eq!(pieces.last().unwrap().position, 5);
        assert_eq!(
            pieces.last().unwrap().doc_type.as_deref(),
            Some(RATIFICATION_TYPE_LABEL)
        );
    }

    #[test]
    fn ratification_on_empty_item() {
        let mut pieces = Vec::new();
        assert_eq!(append_ratification(&mut pieces, Piece::new("r", "Decree", 9)), 1);
    }

    #[test]
    fn agendaitem_deserializes_concepts() {
        let json = r#"{
            "id": "ai1",
            "position": 3,
            "type": "note",
            "subcaseType": "ratification",
            "activityNumber": 7
        }"#;
        let item: Agendaitem = serde_json::from_str(json).unwrap();
        assert_eq!(item.purpose(), Purpose::Decree);
        assert_eq!(item.activity_number, Some(7));
        assert!(!item.postponed);
        assert!(!item.formally_ok);
    }

    #[test]
    fn agenda_approval_year() {
        let agenda = Agenda::new("a1", "m1");
        assert_eq!(agenda.approval_year(), None);

        let approved_at = "2023-12-31T23:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(agenda.with_approved_at(approved_at).approval_year(), Some(2023));
    }

    #[test]
    fn job_id_parses() {
        let id = JobId::new();
        let parsed: JobId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
