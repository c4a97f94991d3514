// ============================================================================
// rasterform-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// Core failures are wrapped together with a short description of what the
// CLI was doing, and every fatal error maps to the same exit status.
//
// KEY COMPONENTS:
// - CliError / CliResult: Error type for CLI operations
// - CliErrorContext: Adds context to core results

// ---- Internal crate imports ----
use rasterform_core::{CoreError, ErrorKind};

// ---- Standard library imports ----
use std::error::Error;
use std::fmt;

/// Exit status for any fatal error.
pub const FAILURE_EXIT_CODE: i32 = 2;

// ============================================================================
// ERROR TYPE
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    context: Option<String>,
    source: CoreError,
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn new(context: impl Into<String>, source: CoreError) -> Self {
        Self {
            context: Some(context.into()),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    pub fn exit_code(&self) -> i32 {
        FAILURE_EXIT_CODE
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{}: {}", context, self.source),
            None => write!(f, "{}", self.source),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

impl From<CoreError> for CliError {
    fn from(source: CoreError) -> Self {
        Self {
            context: None,
            source,
        }
    }
}

// ============================================================================
// ERROR CONVERSION UTILITIES
// ============================================================================

/// Extension trait for adding context to errors in the CLI.
pub trait CliErrorContext<T> {
    /// Add context to an error.
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;

    /// Add context using a closure (for lazy evaluation).
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| CliError::new(context.to_string(), e.into()))
    }

    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| CliError::new(f().to_string(), e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_prefixed() {
        let result: Result<(), CoreError> = Err(CoreError::InvalidInput("no such sensor".into()));
        let err = result.cli_context("Invalid conversion request").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid conversion request: Invalid input: no such sensor"
        );
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.exit_code(), 2);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_plain_conversion_has_no_context() {
        let err = CliError::from(CoreError::EmptyResult("nothing left".into()));
        assert_eq!(err.to_string(), "Nothing to convert: nothing left");
    }

    #[test]
    fn test_lazy_context() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::other("denied"));
        let err = result.cli_with_context(|| format!("Failed to write {}", "out.tif")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to write out.tif: "));
        assert_eq!(err.kind(), ErrorKind::Environment);
    }
}
