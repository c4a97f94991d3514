// rasterform-cli/src/main.rs
//
// Entry point of the `rasterform` binary: parses the arguments, runs the
// conversion and maps failures to the process exit status.

use clap::Parser;
use console::style;
use rasterform_cli::{Cli, run};
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        process::exit(e.exit_code());
    }
}
