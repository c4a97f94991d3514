// ============================================================================
// rasterform-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for ConversionRequest
//
// Raw user supplied values (strings straight from the command line) are
// collected here and validated once in `build()`. Nothing downstream ever
// sees an unvalidated request.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{ConversionRequest, OutputFormat, SensorKind};
use crate::error::{CoreError, CoreResult};

/// Builder for creating [`ConversionRequest`] instances.
///
/// # Examples
///
/// ```rust,no_run
/// use rasterform_core::config::ConversionRequestBuilder;
///
/// let request = ConversionRequestBuilder::new()
///     .input("/data/LC8_20200101")
///     .output("/data/out/")
///     .sensor("landsat")
///     .output_format("GeoTIFF")
///     .projection("EPSG:4326")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConversionRequestBuilder {
    // Required fields
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    sensor: Option<String>,

    // Optional fields
    output_format: Option<String>,
    projection: Option<String>,
    local_execution: bool,
}

impl ConversionRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input file or directory.
    pub fn input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Sets the output file or directory. A trailing separator marks a directory.
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Sets the sensor name, e.g. `sentinel`, `landsat` or `spot`.
    pub fn sensor(mut self, sensor: impl Into<String>) -> Self {
        self.sensor = Some(sensor.into());
        self
    }

    /// Sets the output format name. Defaults to GeoTIFF when never called.
    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    /// Sets the target projection (anything `gdalwarp -t_srs` accepts).
    pub fn projection(mut self, projection: impl Into<String>) -> Self {
        self.projection = Some(projection.into());
        self
    }

    /// Same as [`projection`](Self::projection) for an optional value.
    pub fn maybe_projection(mut self, projection: Option<String>) -> Self {
        self.projection = projection;
        self
    }

    /// Enables staging of the run in a local temporary workspace.
    pub fn local_execution(mut self, enabled: bool) -> Self {
        self.local_execution = enabled;
        self
    }

    /// Validates all values and produces the immutable request.
    pub fn build(self) -> CoreResult<ConversionRequest> {
        let sensor: SensorKind = self
            .sensor
            .ok_or_else(|| CoreError::InvalidInput("No sensor was specified".to_string()))?
            .parse()?;

        let format = match self.output_format {
            Some(name) => name.parse()?,
            None => OutputFormat::default(),
        };

        let input = self
            .input
            .ok_or_else(|| CoreError::InvalidInput("No input was specified".to_string()))?;
        if !input.exists() {
            return Err(CoreError::InvalidInput(format!(
                "The specified input does not exist: {}",
                input.display()
            )));
        }

        let output = self
            .output
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| CoreError::InvalidInput("No output was specified".to_string()))?;

        let projection = match self.projection {
            Some(p) if p.trim().is_empty() => None,
            Some(p) => Some(p.trim().to_string()),
            None => None,
        };

        Ok(ConversionRequest {
            input,
            output,
            sensor,
            format,
            projection,
            local_execution: self.local_execution,
        })
    }
}
