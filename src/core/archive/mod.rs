//! # Archive Module
//!
//! Stores each photo or video once, under its capture month, and indexes
//! it through hard links.
//!
//! ## Layout
//! - `YEAR/MM/<YYYYMMDD_HHMMSS>_<hash8><ext>` - the canonical copy
//! - `all/<name>` - flat view over every canonical file
//! - `origin/<source subdir>/<name>` - mirror of where the file came from
//!
//! The name is derived from the capture time and the content digest, so
//! sorting the same bytes twice lands on the same file.

mod algorithm;
mod layout;

pub use algorithm::ArchiveAlgorithm;
pub use layout::{ArchiveLayout, ALL_DIR, ORIGIN_DIR, TEMP_FILE_NAME, TIMESTAMP_FORMAT};
