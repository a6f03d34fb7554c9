//! Docname Service - HTTP surface and CLI plumbing
//!
//! Exposes the naming jobs over HTTP ([`api::routes`]) and sets up logging
//! for the `docname` binary.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod api;
pub mod logging;

pub use api::{routes, ErrorBody};
pub use logging::init_tracing;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
