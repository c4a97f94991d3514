// rasterform-cli/src/lib.rs
//
// Library portion of the Rasterform CLI application.
// Contains argument definitions, logging setup and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::Cli;
pub use commands::convert::run_convert;
pub use error::{CliError, CliResult, FAILURE_EXIT_CODE};

/// Installs logging and runs the conversion described by `cli`.
pub fn run(cli: &Cli) -> CliResult<()> {
    if let Some(log_path) = logging::init_logging(cli.verbose, cli.log_dir.as_deref())? {
        log::info!("Writing run log to {}", log_path.display());
    }
    run_convert(cli)?;
    Ok(())
}
