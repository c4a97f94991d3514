//! Implementation of the conversion command.
//!
//! Validates the arguments into a conversion request, checks that the GDAL
//! programs are available and hands the run to rasterform-core.

use crate::cli::Cli;
use crate::error::{CliErrorContext, CliResult};

use rasterform_core::{ConversionReport, ConversionRequest, GdalCliBackend, convert};

use console::style;
use log::{debug, info};
use std::time::Instant;

/// Builds the validated request from command-line arguments.
pub fn build_request(args: &Cli) -> CliResult<ConversionRequest> {
    ConversionRequest::builder()
        .input(&args.input)
        .output(&args.output)
        .sensor(args.sensor.as_str())
        .output_format(args.output_format.as_str())
        .maybe_projection(args.projection.clone())
        .local_execution(args.local_execution)
        .build()
        .cli_context("Invalid conversion request")
}

/// Runs a conversion with the GDAL command-line backend.
pub fn run_convert(args: &Cli) -> CliResult<ConversionReport> {
    let start_time = Instant::now();
    let request = build_request(args)?;
    debug!("Conversion request: {:?}", request);

    let backend = GdalCliBackend::from_env();
    backend
        .check_dependencies()
        .cli_context("GDAL command-line programs are required")?;

    let report = convert(&request, &backend)
        .cli_with_context(|| format!("Failed to convert {}", request.input().display()))?;

    info!(
        "Converted {} in {:.1}s",
        request.input().display(),
        start_time.elapsed().as_secs_f64()
    );
    print_summary(&report);
    Ok(report)
}

/// Prints a short summary of a finished run to stdout.
pub fn print_summary(report: &ConversionReport) {
    println!(
        "{} {}",
        style("Output:").bold(),
        style(report.output.raster_path.display()).green()
    );
    if let Some(metadata) = &report.output.metadata_path {
        println!("{} {}", style("Metadata:").bold(), metadata.display());
    }

    let bands = report
        .band_count()
        .map(|count| count.to_string())
        .unwrap_or_else(|| "as input".to_string());
    println!(
        "{} {}  {} {}",
        style("Tiles:").bold(),
        report.tiles.len(),
        style("Bands:").bold(),
        bands
    );
    if let Some(projection) = &report.projection {
        println!("{} {}", style("Projection:").bold(), projection);
    }

    for warning in &report.warnings {
        println!("{} {}", style("Warning:").yellow().bold(), warning);
    }
}
