// ============================================================================
// rasterform-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the Raster Processing Library
//
// Pixel work (mosaicking, reprojection, format encoding) is delegated to
// GDAL. The core only talks to it through the `RasterBackend` trait so the
// pipeline can be driven by the real command-line programs or by the
// in-memory `RecordingBackend` in tests.
//
// KEY COMPONENTS:
// - RasterBackend: open / build_virtual_mosaic / warp
// - GdalCliBackend: implementation using gdalinfo, gdalbuildvrt and gdalwarp
// - RecordingBackend: recording implementation for tests
// - Dependency checking

// ---- Internal crate imports ----
use crate::config::OutputFormat;
use crate::error::{CoreError, CoreResult, command_start_error};

// ---- Standard library imports ----
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Process execution helpers shared by the GDAL programs.
pub mod command;

/// Backend built on GDAL's command-line programs.
pub mod gdal_cli;

/// Parsing of `gdalinfo -json` output.
pub mod gdalinfo;

/// In-memory backend recording every call.
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use gdal_cli::{GdalCliBackend, GdalToolPaths};
#[cfg(any(test, feature = "test-mocks"))]
pub use mocks::RecordingBackend;

// ============================================================================
// BACKEND TYPES
// ============================================================================

/// One sub-dataset declared by a container dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubDataset {
    /// Identifier that can itself be opened.
    pub name: String,
    pub description: String,
}

/// What the core needs to know about an opened dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetInfo {
    pub sub_datasets: Vec<SubDataset>,
    /// Projection as WKT, empty when the dataset has none.
    pub projection: String,
}

/// An unmaterialized stacked dataset referencing its source files.
///
/// Backed by a `.vrt` file inside the run's scratch workspace; it disappears
/// with the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualMosaic {
    pub path: PathBuf,
    pub sources: Vec<PathBuf>,
    pub separate: bool,
}

impl VirtualMosaic {
    /// Number of output bands when known from the sources alone.
    pub fn band_count(&self) -> Option<usize> {
        self.separate.then_some(self.sources.len())
    }
}

/// Options of the final reproject / format conversion step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarpOptions {
    pub format: OutputFormat,
    pub creation_options: Vec<String>,
    pub dst_projection: Option<String>,
}

impl WarpOptions {
    pub fn new(format: OutputFormat, dst_projection: Option<String>) -> Self {
        Self {
            format,
            creation_options: format.creation_options(),
            dst_projection,
        }
    }
}

/// Boundary to the raster processing library.
pub trait RasterBackend {
    /// Opens a dataset. `Ok(None)` means the library cannot read it.
    fn open(&self, source: &Path) -> CoreResult<Option<DatasetInfo>>;

    /// Builds a virtual mosaic of `sources` at `destination`.
    ///
    /// With `separate` each source becomes its own band, in the given order.
    fn build_virtual_mosaic(
        &self,
        sources: &[PathBuf],
        separate: bool,
        destination: &Path,
    ) -> CoreResult<VirtualMosaic>;

    /// Merges and reprojects `sources` into `destination`.
    fn warp(&self, destination: &Path, sources: &[VirtualMosaic], options: &WarpOptions) -> CoreResult<()>;
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that an external program can be started.
///
/// Runs it with `--version` and discards all output.
pub fn check_dependency(program: &str) -> CoreResult<()> {
    let result = Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", program);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", program);
            Err(CoreError::DependencyNotFound(program.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", program, e);
            Err(command_start_error(program, e))
        }
    }
}
