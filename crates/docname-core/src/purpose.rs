//! Document purpose classification
//!
//! Every agenda item is filed under exactly one [`Purpose`]. The purpose
//! selects both the activity counter bucket and the code embedded in the
//! canonical name.

use crate::concepts::{AgendaitemType, SubcaseType};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Purpose of the documents attached to an agenda item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// Ordinary document (`DOC`)
    Document,
    /// Announcement (`MED`)
    Announcement,
    /// Decree ratification (`DEC`)
    Decree,
}

impl Purpose {
    /// All purposes, in counter order
    pub const ALL: [Purpose; 3] = [Purpose::Document, Purpose::Announcement, Purpose::Decree];

    /// Code used inside canonical names
    #[inline]
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Document => "DOC",
            Self::Announcement => "MED",
            Self::Decree => "DEC",
        }
    }

    /// Inverse of [`Purpose::code`]
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DOC" => Some(Self::Document),
            "MED" => Some(Self::Announcement),
            "DEC" => Some(Self::Decree),
            _ => None,
        }
    }

    /// Items of this purpose get a ratification piece appended
    #[inline]
    #[must_use]
    pub fn has_ratification(&self) -> bool {
        matches!(self, Self::Decree)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Document => 0,
            Self::Announcement => 1,
            Self::Decree => 2,
        }
    }
}

impl Display for Purpose {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Classify an agenda item
///
/// Communications are announcements; a note on a ratification subcase is a
/// decree; everything else is a document.
#[must_use]
pub fn classify(agendaitem_type: AgendaitemType, subcase_type: SubcaseType) -> Purpose {
    match (agendaitem_type, subcase_type) {
        (AgendaitemType::Communication, _) => Purpose::Announcement,
        (AgendaitemType::Note, SubcaseType::Ratification) => Purpose::Decree,
        (AgendaitemType::Note | AgendaitemType::Other, _) => Purpose::Document,
    }
}
