//! Reading duplicate groups produced by an external duplicate finder.
//!
//! One group per line, paths separated by a single-character delimiter
//! (the output format of `findimagedupes`).

use crate::error::{ConfigError, DedupError};
use std::io::BufRead;
use std::path::PathBuf;

/// Parse a delimiter argument, which must be exactly one character
pub fn parse_delimiter(value: &str) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::InvalidDelimiter(value.to_string())),
    }
}

/// Read all duplicate groups from `reader`.
///
/// Blank lines and empty fields are skipped.
pub fn read_duplicate_groups<R: BufRead>(
    reader: R,
    delimiter: char,
) -> Result<Vec<Vec<PathBuf>>, DedupError> {
    let mut groups = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(DedupError::ReadInput)?;
        let group: Vec<PathBuf> = line
            .split(delimiter)
            .filter(|field| !field.is_empty())
            .map(PathBuf::from)
            .collect();

        if !group.is_empty() {
            groups.push(group);
        }
    }

    Ok(groups)
}
