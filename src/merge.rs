//! Creating and amending the hourly CSV tables.
//!
//! A table is written fresh the first time its hour is seen. Later source files
//! for the same hour are merged in only if their Beijing time is not already in
//! the table's `Beijing_Time` column; if it is, the table is left untouched. The
//! check is per timestamp, not per row, so all rows from one source file go in
//! together or not at all.
use std::path::Path;

use error_stack::ResultExt;
use indexmap::IndexSet;

use crate::error::MergeError;
use crate::records::{HotspotRow, CSV_COLUMNS};

/// What happened to the hourly table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The table did not exist and was written
    Created,
    /// New rows were added and the table rewritten
    Updated,
    /// The timestamp was already present; nothing was written
    Unchanged,
}

/// Add `rows`, all stamped with `beijing_time`, to the table at `path`.
pub fn merge_rows(
    path: &Path,
    beijing_time: &str,
    rows: &[HotspotRow],
) -> error_stack::Result<MergeOutcome, MergeError> {
    if !path.is_file() {
        write_rows(path, rows.iter())?;
        log::info!("Create {}", path.display());
        return Ok(MergeOutcome::Created);
    }

    let existing = dedup_rows(read_rows(path)?);
    if existing.iter().any(|r| r.beijing_time == beijing_time) {
        log::debug!("{} already has rows for {beijing_time}", path.display());
        return Ok(MergeOutcome::Unchanged);
    }

    let merged = dedup_rows(existing.into_iter().chain(rows.iter().cloned()));
    write_rows(path, merged.iter())?;
    log::info!("Update {}", path.display());
    Ok(MergeOutcome::Updated)
}

/// Remove exact duplicate rows, keeping the first of each in order.
pub fn dedup_rows<I: IntoIterator<Item = HotspotRow>>(rows: I) -> IndexSet<HotspotRow> {
    rows.into_iter().collect()
}

/// Read every row of an existing hourly table.
pub fn read_rows(path: &Path) -> error_stack::Result<Vec<HotspotRow>, MergeError> {
    let mut rdr = csv::Reader::from_path(path)
        .change_context_lazy(|| MergeError::ReadExisting(path.to_path_buf()))?;

    let mut rows = vec![];
    for (i, res) in rdr.deserialize::<HotspotRow>().enumerate() {
        let row = res
            .change_context_lazy(|| MergeError::ReadExisting(path.to_path_buf()))
            .attach_printable_lazy(|| format!("at data row {}", i + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write a complete table, header included, replacing any existing file.
fn write_rows<'a, I: Iterator<Item = &'a HotspotRow>>(
    path: &Path,
    rows: I,
) -> error_stack::Result<(), MergeError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .change_context_lazy(|| MergeError::Write(path.to_path_buf()))?;

    wtr.write_record(CSV_COLUMNS)
        .change_context_lazy(|| MergeError::Write(path.to_path_buf()))?;
    for row in rows {
        wtr.serialize(row)
            .change_context_lazy(|| MergeError::Write(path.to_path_buf()))?;
    }
    wtr.flush()
        .change_context_lazy(|| MergeError::Write(path.to_path_buf()))?;
    Ok(())
}
