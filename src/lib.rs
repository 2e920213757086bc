//! # Photo Archive
//!
//! Sorts photos and videos into a date-based, content-addressed archive and
//! removes duplicates from it.
//!
//! ## Archive layout
//! - `YYYY/MM/YYYYMMDD_HHMMSS_<hash8>.<ext>` - the canonical copy of each file
//! - `all/` - one hard link per canonical file
//! - `origin/<source dir>/` - hard links mirroring where files came from
//!
//! ## Architecture
//! - `core` - The archive engine
//! - `events` - Progress reporting over channels
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{ArchiveError, Result};

/// Initialize tracing for the library
///
/// `RUST_LOG` wins over `default_directive` when set. Called once by the
/// application entry point.
pub fn init_tracing(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
