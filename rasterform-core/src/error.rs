//! Error types for the rasterform-core library.
//!
//! Every fatal condition of a conversion run is a [`CoreError`]. Warnings are
//! not errors; they are logged and collected in the run report instead.

use crate::config::SensorKind;
use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// The broad category a [`CoreError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or unsupported input path, sensor or output format.
    InvalidInput,
    /// The sensor-specific directory structure is not what was expected.
    StructuralMismatch,
    /// Bands that are required could not be matched to exactly one file.
    BandResolutionFailure,
    /// Nothing usable was left after resolution.
    EmptyResult,
    /// File system or external tool failure.
    Environment,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unexpected input structure: {0}")]
    StructuralMismatch(String),

    #[error("Cannot find the appropriate file for {} band(s) of the {sensor} input", missing.join(", "))]
    BandResolution {
        sensor: SensorKind,
        missing: Vec<String>,
    },

    #[error("Nothing to convert: {0}")]
    EmptyResult(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Required GDAL program '{0}' was not found")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("'{0}' failed with {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("Failed to parse raster information: {0}")]
    RasterInfoParse(String),

    #[error("Failed to extract archive: {0}")]
    Archive(String),
}

impl CoreError {
    /// Maps the error onto its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_) | CoreError::Archive(_) => ErrorKind::InvalidInput,
            CoreError::StructuralMismatch(_) => ErrorKind::StructuralMismatch,
            CoreError::BandResolution { .. } => ErrorKind::BandResolutionFailure,
            CoreError::EmptyResult(_) => ErrorKind::EmptyResult,
            CoreError::Io(_)
            | CoreError::DependencyNotFound(_)
            | CoreError::CommandStart(..)
            | CoreError::CommandFailed(..)
            | CoreError::RasterInfoParse(_) => ErrorKind::Environment,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a [`CoreError::CommandStart`] for a program that could not be spawned.
pub fn command_start_error(program: impl Into<String>, error: io::Error) -> CoreError {
    CoreError::CommandStart(program.into(), error)
}

/// Builds a [`CoreError::CommandFailed`] from a finished process.
pub fn command_failed_error(
    program: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(program.into(), status, stderr.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_resolution_message_lists_bands() {
        let err = CoreError::BandResolution {
            sensor: SensorKind::Sentinel2,
            missing: vec!["B09".to_string(), "B12".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("B09, B12"));
        assert!(message.contains("Sentinel-2"));
        assert_eq!(err.kind(), ErrorKind::BandResolutionFailure);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CoreError::InvalidInput("x".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            CoreError::StructuralMismatch("x".into()).kind(),
            ErrorKind::StructuralMismatch
        );
        assert_eq!(CoreError::EmptyResult("x".into()).kind(), ErrorKind::EmptyResult);
        assert_eq!(
            CoreError::DependencyNotFound("gdalwarp".into()).kind(),
            ErrorKind::Environment
        );
    }
}
