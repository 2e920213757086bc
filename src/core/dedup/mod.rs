//! Duplicate removal inside an archive.
//!
//! Groups of equivalent files come from an external duplicate finder.
//! For each group one calendar-directory file is kept, index links are
//! recreated against it and every redundant copy is removed.

mod executor;
mod input;
mod planner;
mod types;

pub use executor::{deduplicate_all, deduplicate_all_with_events};
pub use input::{parse_delimiter, read_duplicate_groups};
pub use planner::{deduplicate, is_calendar_stored};
pub use types::*;
