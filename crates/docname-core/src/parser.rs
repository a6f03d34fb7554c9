//! Parsing canonical names back into their parts
//!
//! Only the date, track marker and purpose code are interpreted; the rest of
//! the name is carried verbatim so a date rewrite cannot disturb it.
//!
//! ```text
//! "VR " DATE CASEPREFIX " " DOCTYPE "." REMAINDER
//! ```

use crate::error::ParseNameError;
use crate::generator::format_date;
use crate::purpose::Purpose;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

static NAME_GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^VR (?P<date>[12][90][0-9]{2} [0-3][0-9][01][0-9])(?P<case_prefix> VV|) (?P<doc_type>DOC|DEC|MED)\.(?P<remainder>.*)$",
    )
    .expect("name grammar is a valid regex")
});

/// Structured parts of a canonical name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Meeting date
    pub date: NaiveDate,
    /// Special-track marker (`" VV"`) present
    pub special_track: bool,
    /// Purpose code
    pub purpose: Purpose,
    /// Everything after `DOC.` / `MED.` / `DEC.`
    pub remainder: String,
}

impl ParsedName {
    /// Track marker as it appears between date and purpose code
    #[inline]
    #[must_use]
    pub fn case_prefix(&self) -> &'static str {
        if self.special_track {
            " VV"
        } else {
            ""
        }
    }

    /// Activity number at the start of the remainder (`0012` in `0012-1 …`)
    #[must_use]
    pub fn activity_number(&self) -> Option<u32> {
        let digits = self
            .remainder
            .split_once('-')
            .map_or(self.remainder.as_str(), |(number, _)| number);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Same name, different date
    #[inline]
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

impl Display for ParsedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VR {}{} {}.{}",
            format_date(self.date),
            self.case_prefix(),
            self.purpose.code(),
            self.remainder
        )
    }
}

impl FromStr for ParsedName {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(s)
    }
}

/// Parse a canonical name
///
/// Surrounding whitespace is ignored.
///
/// # Errors
/// - `ParseNameError::NoMatch` if the string does not follow the grammar
/// - `ParseNameError::InvalidDate` if the date token is not a calendar date
pub fn parse_name(name: &str) -> Result<ParsedName, ParseNameError> {
    let name = name.trim();
    let caps = NAME_GRAMMAR
        .captures(name)
        .ok_or_else(|| ParseNameError::NoMatch(name.to_string()))?;

    let raw_date = &caps["date"];
    let date = NaiveDate::parse_from_str(raw_date, "%Y %d%m").map_err(|_| {
        ParseNameError::InvalidDate {
            raw: raw_date.to_string(),
        }
    })?;
    let purpose = Purpose::from_code(&caps["doc_type"])
        .ok_or_else(|| ParseNameError::NoMatch(name.to_string()))?;

    Ok(ParsedName {
        date,
        special_track: !caps["case_prefix"].is_empty(),
        purpose,
        remainder: caps["remainder"].to_string(),
    })
}

/// Rewrite the date of a canonical name
///
/// Names that do not parse are returned unchanged; compare the result with
/// the input to decide whether a write is needed.
#[must_use]
pub fn replace_date(name: &str, new_date: NaiveDate) -> String {
    match parse_name(name) {
        Ok(parsed) => parsed.with_date(new_date).to_string(),
        Err(err) => {
            tracing::debug!(%err, "leaving name untouched");
            name.to_string()
        }
    }
}
