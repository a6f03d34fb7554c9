//! Canonical name generation
//!
//! Produces names of the form
//!
//! ```text
//! VR {yyyy} {dd}{mm} {VV }{DOC|MED|DEC}.{nnnn}-{position} {subject}{ - type} {SUFFIX}
//! ```
//!
//! Generation is a pure function of its inputs: the same meeting, purpose,
//! number and piece always yield the same name.

use crate::numerals::{strip_version_suffix, version_suffix};
use crate::purpose::Purpose;
use crate::types::{Meeting, Piece};
use chrono::NaiveDate;

/// Name prefix shared by every document of a meeting date
///
/// `2024-03-07` → `"VR 2024 0703"`
#[must_use]
pub fn date_prefix(date: NaiveDate) -> String {
    format!("VR {}", format_date(date))
}

/// Date token as used in names: `yyyy ddMM`
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y %d%m").to_string()
}

/// Generate the canonical name of a piece
///
/// Without a planned start the piece keeps its current title; this is logged
/// as a warning so the rest of a run can continue.
#[must_use]
pub fn generate_name(meeting: &Meeting, purpose: Purpose, activity_number: u32, piece: &Piece) -> String {
    let Some(planned_start) = meeting.planned_start else {
        tracing::warn!(
            meeting = %meeting.id,
            piece = %piece.id,
            "meeting has no planned start, keeping current title"
        );
        return piece.title.clone();
    };

    let track_prefix = if meeting.track.is_special() { "VV " } else { "" };
    let subject = strip_version_suffix(&piece.title);

    let mut name = format!(
        "{} {}{}.{:04}-{} {}",
        date_prefix(planned_start),
        track_prefix,
        purpose.code(),
        activity_number,
        piece.position,
        subject,
    );

    if let Some(label) = piece.doc_type.as_deref().filter(|l| !l.trim().is_empty()) {
        name.push_str(" - ");
        name.push_str(&type_label(label));
    }

    match version_suffix(piece.revision) {
        Some(suffix) => {
            name.push(' ');
            name.push_str(&suffix);
        }
        None if piece.revision as usize > crate::numerals::LATIN_ADVERBIAL_NUMERALS.len() => {
            tracing::warn!(
                piece = %piece.id,
                revision = piece.revision,
                "revision has no version suffix"
            );
        }
        None => {}
    }

    name.trim_end().to_string()
}

/// Lowercase ordinary words, keep acronyms
///
/// A label whose last character is lowercase ("Nota") is an ordinary word
/// and is lowercased entirely; "BVR" stays as is.
fn type_label(label: &str) -> String {
    let label = label.trim();
    if label.chars().last().is_some_and(char::is_lowercase) {
        label.to_lowercase()
    } else {
        label.to_string()
    }
}
