// StashScope - platform/fs.rs
//
// Thin filesystem helpers for reading CSV sources and creating export
// targets.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Create (or truncate) an export file wrapped in a buffered writer.
pub fn create_export_file(path: &Path) -> io::Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}
