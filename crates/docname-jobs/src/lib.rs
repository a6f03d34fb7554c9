//! Docname Jobs - tracked background naming runs
//!
//! - Seeds activity counters from the store ([`seed_counters`])
//! - Builds read-only previews ([`preview_agenda`])
//! - Runs the commit and date-change flows
//! - Submits runs as jobs with staleness, lease and access checks
//!   ([`JobRunner`])
//!
//! # Example
//!
//! ```rust,no_run
//! use docname_jobs::{JobRunner, NamingConfig};
//! use docname_store::InMemoryStore;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStore::from_json_file("snapshot.json")?);
//! let runner = JobRunner::new(store, NamingConfig::default());
//! let preview = runner.preview(&"agenda-1".into()).await?;
//! println!("{} items", preview.items.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod allocator;
pub mod config;
pub mod date_change;
pub mod error;
pub mod naming;
pub mod preview;
pub mod runner;

pub use allocator::seed_counters;
pub use config::{NamingConfig, RetryConfig};
pub use date_change::{run_date_change, DateChangeReport, DateChangeRequest};
pub use error::{ConfigError, JobError, RequestError};
pub use naming::{run_naming, CommitRequest, NamingReport, PieceRename};
pub use preview::{preview_agenda, AgendaPreview, ItemPreview, PiecePreview};
pub use runner::JobRunner;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
