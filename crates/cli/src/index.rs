//! `slidespec_index.csv` writer.

use anyhow::{Context, Result};
use slidespec_core::{Error, IndexRow};
use std::path::Path;

/// Column order of the index.
pub const INDEX_HEADER: &[&str] = &["folder", "page_title", "source_url", "slidespec", "num_slides"];

/// Write index rows, sorted by folder name case-insensitively.
///
/// The header is always written, even for an empty corpus.
pub fn write_index(path: &Path, rows: &[IndexRow]) -> Result<()> {
    let mut rows: Vec<&IndexRow> = rows.iter().collect();
    rows.sort_by_key(|row| folder_name(&row.folder).to_lowercase());

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer
        .write_record(INDEX_HEADER)
        .map_err(|e| Error::IndexError(e.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| Error::IndexError(format!("{}: {}", row.folder, e)))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn folder_name(folder: &str) -> &str {
    Path::new(folder)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(folder)
}
