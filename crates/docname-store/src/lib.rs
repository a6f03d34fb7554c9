//! Docname Store - persistence seam for document naming
//!
//! - [`DocumentStore`]: async contract for every read and write the naming
//!   engine performs
//! - [`RetryingStore`]: bounded fixed-delay retries around any store
//! - [`InMemoryStore`]: snapshot-backed implementation with fault injection

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod memory;
pub mod retry;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::{ActivityRecord, AgendaitemRecord, InMemoryStore, PieceRecord, Snapshot};
pub use retry::{RetryPolicy, RetryingStore};
pub use store::DocumentStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
