//! Classification concepts used by the document store
//!
//! Store records identify agenda-item types, subcase types and meeting types
//! by concept URI. This module maps those URIs onto the closed enums the
//! naming rules operate on.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Agenda-item type concept for a note ("nota")
pub const AGENDAITEM_TYPE_NOTE: &str =
    "http://themis.vlaanderen.be/id/concept/agendapunt-type/dd47a8f8-3ad2-4d5a-8318-66fc02fe80fd";

/// Agenda-item type concept for a communication ("mededeling")
pub const AGENDAITEM_TYPE_COMMUNICATION: &str =
    "http://themis.vlaanderen.be/id/concept/agendapunt-type/8f8adcf0-58ef-4edc-9e36-0c9095fd76b0";

/// Subcase type concept for a ratification step ("bekrachtiging")
pub const SUBCASE_TYPE_RATIFICATION: &str =
    "http://themis.vlaanderen.be/id/concept/procedurestap-type/bdba2bbc-7af6-490b-98a8-433955cfe869";

/// Meeting type concept for the special fast-track meeting series
pub const MEETING_TYPE_SPECIAL: &str =
    "http://themis.vlaanderen.be/id/concept/vergaderactiviteit-type/9b4701f8-a136-4009-94c6-d64fdc96b9a2";

/// Type label given to the synthetic ratification piece
pub const RATIFICATION_TYPE_LABEL: &str = "Ratification";

/// Agenda-item type classification
///
/// Deserializes from either the short name (`"note"`) or the concept URI.
/// Anything unrecognised becomes [`AgendaitemType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgendaitemType {
    /// Regular note
    Note,
    /// Communication / announcement
    Communication,
    /// Any other classification
    #[default]
    Other,
}

impl AgendaitemType {
    /// Resolve a short name or concept URI
    #[must_use]
    pub fn from_concept(value: &str) -> Self {
        match value {
            AGENDAITEM_TYPE_NOTE | "note" => Self::Note,
            AGENDAITEM_TYPE_COMMUNICATION | "communication" => Self::Communication,
            _ => Self::Other,
        }
    }

    /// Short name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Communication => "communication",
            Self::Other => "other",
        }
    }
}

impl From<String> for AgendaitemType {
    fn from(value: String) -> Self {
        Self::from_concept(&value)
    }
}

impl From<AgendaitemType> for String {
    fn from(value: AgendaitemType) -> Self {
        value.as_str().to_string()
    }
}

impl Display for AgendaitemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subcase type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubcaseType {
    /// Ratification step
    Ratification,
    /// Any other (or missing) subcase type
    #[default]
    Other,
}

impl SubcaseType {
    /// Resolve a short name or concept URI
    #[must_use]
    pub fn from_concept(value: &str) -> Self {
        match value {
            SUBCASE_TYPE_RATIFICATION | "ratification" => Self::Ratification,
            _ => Self::Other,
        }
    }

    /// Short name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ratification => "ratification",
            Self::Other => "other",
        }
    }
}

impl From<String> for SubcaseType {
    fn from(value: String) -> Self {
        Self::from_concept(&value)
    }
}

impl From<SubcaseType> for String {
    fn from(value: SubcaseType) -> Self {
        value.as_str().to_string()
    }
}

/// Numbering track of a meeting
///
/// The special fast-track meeting series keeps its own activity numbers and
/// carries a `VV` marker in document names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Track {
    /// Regular meetings
    #[default]
    Regular,
    /// Special fast-track meetings
    Special,
}

impl Track {
    /// Both tracks, in counter order
    pub const ALL: [Track; 2] = [Track::Regular, Track::Special];

    /// Resolve a short name or meeting type concept URI
    #[must_use]
    pub fn from_concept(value: &str) -> Self {
        match value {
            MEETING_TYPE_SPECIAL | "special" => Self::Special,
            _ => Self::Regular,
        }
    }

    /// Short name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Special => "special",
        }
    }

    /// Is this the special fast-track series
    #[inline]
    #[must_use]
    pub fn is_special(&self) -> bool {
        matches!(self, Self::Special)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Regular => 0,
            Self::Special => 1,
        }
    }
}

impl From<String> for Track {
    fn from(value: String) -> Self {
        Self::from_concept(&value)
    }
}

impl From<Track> for String {
    fn from(value: Track) -> Self {
        value.as_str().to_string()
    }
}

impl Display for Track {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
