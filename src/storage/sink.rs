//! Writers for search results and predictions.

use std::fs;
use std::io;
use std::path::Path;

use crate::schema::{Label, SearchResult};

/// Write the search result as pretty-printed JSON.
pub fn write_result<P: AsRef<Path>>(path: P, result: &SearchResult) -> io::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)
}

/// Read a result previously written by [`write_result`].
pub fn read_result<P: AsRef<Path>>(path: P) -> io::Result<SearchResult> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Write predicted labels, space separated, on a single line.
pub fn write_predictions<P: AsRef<Path>>(path: P, predictions: &[Label]) -> io::Result<()> {
    let line = predictions
        .iter()
        .map(Label::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    fs::write(path, line + "\n")
}
