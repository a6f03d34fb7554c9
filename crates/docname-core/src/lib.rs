//! Docname Core - canonical meeting-document names
//!
//! The pure rule engine behind document naming:
//! - Classifies agenda items into document purposes
//! - Tracks per-year, per-track, per-purpose activity counters
//! - Generates canonical names for pieces
//! - Parses canonical names back for date-only rewrites
//!
//! Nothing in this crate performs I/O; persistence and job orchestration live
//! in `docname-store` and `docname-jobs`.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use docname_core::{generate_name, replace_date, Meeting, Piece, Purpose, Track};
//!
//! let meeting = Meeting::new("m1", Track::Regular, NaiveDate::from_ymd_opt(2024, 3, 7));
//! let piece = Piece::new("p1", "Annual Budget", 1);
//!
//! let name = generate_name(&meeting, Purpose::Document, 12, &piece);
//! assert_eq!(name, "VR 2024 0703 DOC.0012-1 Annual Budget");
//!
//! let moved = replace_date(&name, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
//! assert_eq!(moved, "VR 2024 0104 DOC.0012-1 Annual Budget");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod concepts;
pub mod counter;
pub mod error;
pub mod generator;
pub mod job;
pub mod numerals;
pub mod parser;
pub mod purpose;
pub mod types;

// Re-exports for convenience
pub use concepts::{AgendaitemType, SubcaseType, Track};
pub use counter::CounterState;
pub use error::{JobStateError, ParseNameError};
pub use generator::{date_prefix, format_date, generate_name};
pub use job::{JobStatus, NamingJob};
pub use parser::{parse_name, replace_date, ParsedName};
pub use purpose::{classify, Purpose};
pub use types::{
    append_ratification, Agenda, AgendaId, Agendaitem, AgendaitemId, JobId, Meeting, MeetingId,
    Piece, PieceId,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
