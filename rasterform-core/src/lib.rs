//! Core library for converting satellite raster products.
//!
//! This crate turns Sentinel-2, Landsat and SPOT products from their native
//! multi-file layouts into a single mosaicked GeoTIFF or Erdas Imagine
//! raster. It locates the band files of each tile, checks them against the
//! sensor's band catalog, stacks them into virtual mosaics and warps those
//! into the final output, copying the product metadata alongside.
//!
//! Pixel work is delegated to GDAL through the [`external::RasterBackend`]
//! trait.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use rasterform_core::{ConversionRequest, GdalCliBackend, convert};
//!
//! let request = ConversionRequest::builder()
//!     .input("/data/LC08_L1TP_20200101")
//!     .output("/data/converted/")
//!     .sensor("landsat")
//!     .output_format("GeoTIFF")
//!     .build()
//!     .unwrap();
//!
//! let backend = GdalCliBackend::from_env();
//! backend.check_dependencies().unwrap();
//!
//! let report = convert(&request, &backend).unwrap();
//! for warning in &report.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! println!("wrote {}", report.output.raster_path.display());
//! ```

pub mod archive;
pub mod assembler;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod locator;
pub mod materializer;
pub mod naming;
pub mod pipeline;
pub mod resolver;
pub mod staging;
pub mod temp_files;

// Re-exports for public API
pub use catalog::{MissingBandPolicy, SensorProfile, bands_for, profile_for};
pub use config::{ConversionRequest, ConversionRequestBuilder, OutputFormat, SensorKind};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use external::{GdalCliBackend, RasterBackend, VirtualMosaic};
#[cfg(any(test, feature = "test-mocks"))]
pub use external::RecordingBackend;
pub use locator::{DatasetLocator, LocatedScene, locator_for};
pub use materializer::{OutputPaths, materialize, resolve_output_paths};
pub use naming::scene_base_name;
pub use pipeline::{ConversionReport, convert};
pub use resolver::{BandMatch, ResolvedTile, resolve};
pub use staging::convert_staged;
