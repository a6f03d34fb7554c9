//! Latin adverbial numerals used as version suffixes
//!
//! Revision `n` of a piece carries the numeral at index `n - 1`; the
//! original (index 0) carries none.

use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered version-suffix words; index 0 is the original version
pub const LATIN_ADVERBIAL_NUMERALS: [&str; 15] = [
    "",
    "bis",
    "ter",
    "quater",
    "quinquies",
    "sexies",
    "septies",
    "octies",
    "novies",
    "decies",
    "undecies",
    "duodecies",
    "ter decies",
    "quater decies",
    "qiundecies",
];

static TRAILING_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    let alternation = LATIN_ADVERBIAL_NUMERALS
        .iter()
        .skip(1)
        .map(|word| regex::escape(&word.to_uppercase()))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})$")).expect("numeral alternation is a valid regex")
});

/// Uppercased suffix for a revision, `None` for originals
///
/// Revisions beyond the table also yield `None`.
#[must_use]
pub fn version_suffix(revision: u32) -> Option<String> {
    if revision <= 1 {
        return None;
    }
    let index = usize::try_from(revision - 1).ok()?;
    LATIN_ADVERBIAL_NUMERALS
        .get(index)
        .map(|word| word.to_uppercase())
}

/// Remove one trailing uppercase version suffix and trim
///
/// Matching is case-sensitive: `"Budget Report BIS"` becomes
/// `"Budget Report"`, `"Budget Report bis"` is only trimmed.
#[must_use]
pub fn strip_version_suffix(title: &str) -> &str {
    let trimmed = title.trim_end();
    match TRAILING_SUFFIX.find(trimmed) {
        Some(m) => trimmed[..m.start()].trim(),
        None => trimmed.trim(),
    }
}
