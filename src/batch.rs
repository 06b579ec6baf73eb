//! Converting a directory of FHS files.
//!
//! Each file goes through the same steps: read the `FPT` records, parse them,
//! work out the Beijing hour from the file name, and merge the rows into that
//! hour's table. A failure in any step skips that one file; the rest of the
//! directory is still processed.
use std::path::{Path, PathBuf};

use error_stack::ResultExt;

use crate::config::Config;
use crate::error::{BatchError, NcReadError, ProcessError};
use crate::merge::{merge_rows, MergeOutcome};
use crate::nc_utils::read_text_records;
use crate::partition::prepare_output_path;
use crate::records::{parse_records, HotspotRow};
use crate::timestamp::BeijingTime;

/// Name of the netCDF variable holding the detection records.
pub const FPT_VARNAME: &str = "FPT";

/// Result of successfully handling one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// A new hourly table was written at this path
    Created(PathBuf),
    /// The hourly table at this path gained rows
    Updated(PathBuf),
    /// The hourly table at this path already had this file's timestamp
    Unchanged(PathBuf),
    /// No detections after the header records
    Empty,
}

impl From<(MergeOutcome, PathBuf)> for FileOutcome {
    fn from(value: (MergeOutcome, PathBuf)) -> Self {
        match value {
            (MergeOutcome::Created, p) => Self::Created(p),
            (MergeOutcome::Updated, p) => Self::Updated(p),
            (MergeOutcome::Unchanged, p) => Self::Unchanged(p),
        }
    }
}

/// Tally of a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub empty: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Created(_) => self.created += 1,
            FileOutcome::Updated(_) => self.updated += 1,
            FileOutcome::Unchanged(_) => self.unchanged += 1,
            FileOutcome::Empty => self.empty += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged + self.empty + self.failed
    }
}

/// Convert one FHS file and merge it into its hourly table.
pub fn process_file(path: &Path, config: &Config) -> error_stack::Result<FileOutcome, ProcessError> {
    let lines = read_text_records(path, FPT_VARNAME).map_err(|e| {
        let ctx = match e.current_context() {
            NcReadError::MissingVariable(v) => ProcessError::MissingVariable {
                path: path.to_path_buf(),
                varname: v.clone(),
            },
            _ => ProcessError::FileOpen(path.to_path_buf()),
        };
        e.change_context(ctx)
    })?;

    let records = parse_records(&lines).change_context_lazy(|| ProcessError::Parse(path.to_path_buf()))?;
    if records.is_empty() {
        return Ok(FileOutcome::Empty);
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let time = BeijingTime::from_filename(&file_name)
        .change_context_lazy(|| ProcessError::FilenameFormat(path.to_path_buf()))?;
    let timestamp = time.timestamp_string();
    let rows = HotspotRow::from_records(&timestamp, &records);

    let out_path = prepare_output_path(config.out_dir(), config.prefix(), &time)
        .change_context_lazy(|| ProcessError::Output(path.to_path_buf()))?;
    let outcome = merge_rows(&out_path, &timestamp, &rows)
        .change_context_lazy(|| ProcessError::Output(path.to_path_buf()))?;
    Ok((outcome, out_path).into())
}

/// Convert every file in the configured source directory.
///
/// Files are taken in directory listing order, which is not sorted.
/// Subdirectories are not descended into.
pub fn process_folder(config: &Config) -> error_stack::Result<BatchSummary, BatchError> {
    let src = config.src_dir();
    let entries = std::fs::read_dir(src).change_context_lazy(|| BatchError::ListSource(src.to_path_buf()))?;
    let summary = process_paths(entries.map(|e| e.map(|e| e.path())), config);

    log::info!(
        "Processed {} files from {}: {} created, {} updated, {} unchanged, {} empty, {} failed",
        summary.total(),
        src.display(),
        summary.created,
        summary.updated,
        summary.unchanged,
        summary.empty,
        summary.failed
    );
    Ok(summary)
}

/// Convert each path in turn. An entry that could not be listed counts as a
/// failed file, the same as one that could not be converted.
pub fn process_paths<I>(paths: I, config: &Config) -> BatchSummary
where
    I: IntoIterator<Item = std::io::Result<PathBuf>>,
{
    let mut summary = BatchSummary::default();
    for entry in paths {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                log::error!("Could not read entry in {}: {e}", config.src_dir().display());
                summary.failed += 1;
                continue;
            }
        };
        if path.is_dir() {
            log::debug!("Skipping directory {}", path.display());
            continue;
        }

        match process_file(&path, config) {
            Ok(outcome) => {
                match &outcome {
                    FileOutcome::Empty => log::debug!("No hotspots in {}", path.display()),
                    FileOutcome::Unchanged(p) => {
                        log::debug!("{} already ingested into {}", path.display(), p.display())
                    }
                    _ => (),
                }
                summary.record(&outcome);
            }
            Err(e) => {
                log::error!("{e:?}");
                summary.failed += 1;
            }
        }
    }
    summary
}
