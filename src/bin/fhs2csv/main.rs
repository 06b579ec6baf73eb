use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use error_stack::ResultExt;
use fhs_rs::{
    batch::process_folder,
    config::{Config, DEFAULT_CONFIG_FILE},
    logging::init_logging,
};

fn main() -> ExitCode {
    let clargs = Cli::parse();
    init_logging(clargs.verbosity.log_level_filter());
    if let Err(e) = driver(clargs) {
        eprintln!("fhs2csv did not complete successfully:\n{e:?}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn driver(clargs: Cli) -> error_stack::Result<(), CliError> {
    let config = Config::from_toml_file(&clargs.config).change_context(CliError::ReadingConfig)?;

    if clargs.check_config {
        println!("Loaded configuration:\n{config:#?}");
        return Ok(());
    }

    // Individual files that fail are logged and counted, but do not
    // change the exit status.
    process_folder(&config).change_context(CliError::ListingSource)?;
    Ok(())
}

/// Convert FHS fire hotspot netCDF files into hourly CSV tables.
///
/// Every file in the configured source directory is read, and its hotspot
/// records are merged into `out/YYYY/YYYYMM/YYYYMMDD/{prefix}_YYYYMMDDHH.csv`,
/// where the hour is Beijing time. Files whose time is already present in
/// their hourly table are skipped, so rerunning over the same directory is safe.
#[derive(Debug, Parser)]
struct Cli {
    /// Path to the TOML configuration file with [path] src/out and [str] prefix.
    /// Values must be quoted strings; an old INI-style config.cfg with bare
    /// values will not parse. See config.cfg.example.
    #[clap(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print the loaded configuration and stop without converting anything.
    #[clap(long)]
    check_config: bool,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("An error occurred while reading the configuration")]
    ReadingConfig,
    #[error("An error occurred while listing the source directory")]
    ListingSource,
}
