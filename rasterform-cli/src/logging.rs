// ============================================================================
// rasterform-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and per-run file logging
//
// The core library only logs through the `log` facade; this module installs
// the backend. Console-only runs use `env_logger`, so RUST_LOG keeps working.
// With a log directory, `fern` sends every record to stderr and to a
// timestamped log file.
//
// USAGE:
// - default: info level
// - -v/--verbose: debug level
// - RUST_LOG=trace: overrides both for console-only runs

use crate::error::{CliErrorContext, CliResult};
use log::LevelFilter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("rasterform_{}.log", rasterform_cli::logging::get_timestamp());
/// // Result: "rasterform_20240601_123045.log"
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

pub fn log_file_name() -> String {
    format!("rasterform_{}.log", get_timestamp())
}

pub fn level_filter(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger. Returns the log file path when one is written.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let level = level_filter(verbose);

    let Some(log_dir) = log_dir else {
        // A logger may already be installed when running inside tests.
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .format_timestamp(None)
            .format_target(false)
            .try_init();
        return Ok(None);
    };

    fs::create_dir_all(log_dir)
        .cli_with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join(log_file_name());
    let log_file = fern::log_file(&log_path)
        .cli_with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .chain(log_file)
        .apply()
        .map_err(|e| io::Error::other(e.to_string()))
        .cli_context("Failed to install logger")?;

    log::debug!("Logging to {}", log_path.display());
    Ok(Some(log_path))
}
