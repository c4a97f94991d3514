//! Command implementations for the CLI.

/// Converts one satellite product into a mosaicked raster.
pub mod convert;
