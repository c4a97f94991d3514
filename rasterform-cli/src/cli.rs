// rasterform-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    name = "rasterform",
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Rasterform: Satellite raster product conversion",
    long_about = "Converts Sentinel-2, Landsat and SPOT products into a single mosaicked \
                  GeoTIFF or Erdas Imagine raster using GDAL."
)]
pub struct Cli {
    /// Input product: a directory, a single scene file or a .zip archive
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_PATH")]
    pub input: PathBuf,

    /// Output raster file, or a directory (existing or ending in '/') to name it automatically
    #[arg(short = 'o', long = "output", required = true, value_name = "OUTPUT_PATH")]
    pub output: PathBuf,

    /// Sensor that produced the input: sentinel_2, landsat or spot
    #[arg(short = 's', long = "sensor", required = true, value_name = "SENSOR")]
    pub sensor: String,

    /// Output raster format: GeoTIFF or ErdasImg
    #[arg(short = 'f', long = "outputformat", default_value = "GeoTIFF", value_name = "FORMAT")]
    pub output_format: String,

    /// Target projection (e.g. EPSG:4326); inherited from the product when omitted
    #[arg(short = 'p', long = "projection", value_name = "PROJECTION")]
    pub projection: Option<String>,

    /// Copy the input to a local temporary workspace before converting
    #[arg(long, default_value_t = false)]
    pub local_execution: bool,

    /// Enable debug logging
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,

    /// Optional: Directory where a per-run log file is written
    #[arg(long, value_name = "LOG_DIR", env = "RASTERFORM_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}
