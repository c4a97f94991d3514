//! Configuration structures for a conversion run.
//!
//! A run is driven by a single immutable [`ConversionRequest`], created through
//! [`ConversionRequestBuilder`] once all user supplied values have been
//! validated. The request is then passed by reference to every stage of the
//! pipeline.

mod builder;

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use builder::ConversionRequestBuilder;

/// Creation option enabling internal tiling for GeoTIFF output.
pub const GTIFF_TILED_OPTION: &str = "TILED=YES";

/// Sensor family of the input product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Sentinel2,
    Landsat,
    Spot,
}

impl SensorKind {
    pub const ALL: [SensorKind; 3] = [SensorKind::Sentinel2, SensorKind::Landsat, SensorKind::Spot];
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorKind::Sentinel2 => "Sentinel-2",
            SensorKind::Landsat => "Landsat",
            SensorKind::Spot => "SPOT",
        };
        f.write_str(name)
    }
}

impl FromStr for SensorKind {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentinel_2" | "sentinel-2" | "sentinel2" | "sentinel" | "s2" => Ok(SensorKind::Sentinel2),
            "landsat" => Ok(SensorKind::Landsat),
            "spot" => Ok(SensorKind::Spot),
            _ => Err(CoreError::InvalidInput(format!(
                "The specified sensor is not supported: {s}"
            ))),
        }
    }
}

/// Raster format of the materialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    GeoTiff,
    ErdasImagine,
}

impl OutputFormat {
    /// GDAL driver short name.
    pub fn driver(&self) -> &'static str {
        match self {
            OutputFormat::GeoTiff => "GTiff",
            OutputFormat::ErdasImagine => "HFA",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::GeoTiff => ".tif",
            OutputFormat::ErdasImagine => ".img",
        }
    }

    /// Driver creation options passed to the warp step.
    pub fn creation_options(&self) -> Vec<String> {
        match self {
            OutputFormat::GeoTiff => vec![GTIFF_TILED_OPTION.to_string()],
            OutputFormat::ErdasImagine => Vec::new(),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::GeoTiff => f.write_str("GeoTIFF"),
            OutputFormat::ErdasImagine => f.write_str("Erdas Imagine"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gtiff" | "geotiff" | "tiff" | "tif" => Ok(OutputFormat::GeoTiff),
            "hfa" | "img" | "erdas" | "erdasimg" => Ok(OutputFormat::ErdasImagine),
            _ => Err(CoreError::InvalidInput(format!(
                "The specified output format is not supported: {s}"
            ))),
        }
    }
}

/// A validated conversion request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub(crate) input: PathBuf,
    pub(crate) output: PathBuf,
    pub(crate) sensor: SensorKind,
    pub(crate) format: OutputFormat,
    pub(crate) projection: Option<String>,
    pub(crate) local_execution: bool,
}

impl ConversionRequest {
    pub fn builder() -> ConversionRequestBuilder {
        ConversionRequestBuilder::new()
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn sensor(&self) -> SensorKind {
        self.sensor
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Target projection explicitly requested by the user, if any.
    pub fn projection(&self) -> Option<&str> {
        self.projection.as_deref()
    }

    pub fn local_execution(&self) -> bool {
        self.local_execution
    }

    /// Returns a copy of this request reading from and writing to other locations.
    ///
    /// Used when the run is redirected into a staging workspace.
    pub fn relocated(&self, input: PathBuf, output: PathBuf) -> ConversionRequest {
        ConversionRequest {
            input,
            output,
            local_execution: false,
            ..self.clone()
        }
    }
}
