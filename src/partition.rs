//! Layout of the hourly CSV tree: `out/YYYY/YYYYMM/YYYYMMDD/{prefix}_YYYYMMDDHH.csv`
use std::path::{Path, PathBuf};

use crate::timestamp::BeijingTime;

/// The day directory for `time` under `root`.
pub fn output_dir(root: &Path, time: &BeijingTime) -> PathBuf {
    root.join(time.year())
        .join(time.year_month())
        .join(time.date())
}

/// File name of the hourly table for `time`.
pub fn output_file_name(prefix: &str, time: &BeijingTime) -> String {
    format!("{prefix}_{}.csv", time.date_hour())
}

/// Full path of the hourly table for `time`, without touching the file system.
pub fn output_path(root: &Path, prefix: &str, time: &BeijingTime) -> PathBuf {
    output_dir(root, time).join(output_file_name(prefix, time))
}

/// Create the day directory for `time` if needed and return the table's path.
pub fn prepare_output_path(root: &Path, prefix: &str, time: &BeijingTime) -> std::io::Result<PathBuf> {
    let dir = output_dir(root, time);
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(output_file_name(prefix, time)))
}
