//! Unified error types for the helios crates
//!
//! This module provides a common error type [`HeliosError`] that can represent
//! errors from any part of the system. Crate-local failures convert to
//! `HeliosError` for uniform handling at API boundaries.
//!
//! Non-convergence of the LCOE solver is deliberately *not* an error: the
//! solver returns its best estimate with a `converged = false` flag, and only
//! structurally impossible solves (e.g. a plant that serves no load at all)
//! surface as [`HeliosError::Solver`].

use thiserror::Error;

/// Unified error type for all helios operations.
#[derive(Error, Debug)]
pub enum HeliosError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Negative or nonsensical input caught before any simulation work
    #[error("Configuration error: {0}")]
    Config(String),

    /// PV-profile provider failure (unreachable service, site over water)
    #[error("Weather error: {0}")]
    Weather(String),

    /// Internal dispatch invariant violated mid-run; indicates a bug
    #[error("Dispatch invariant violated: {0}")]
    Dispatch(String),

    /// LCOE solve that cannot be posed (e.g. zero lifetime load served)
    #[error("Solver error: {0}")]
    Solver(String),

    /// No pre-baked simulation row matching the requested case
    #[error("No matching simulation data: {0}")]
    DataNotFound(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using HeliosError.
pub type HeliosResult<T> = Result<T, HeliosError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for HeliosError {
    fn from(err: anyhow::Error) -> Self {
        HeliosError::Other(err.to_string())
    }
}

// Conversion from string-like types for convenience
impl From<String> for HeliosError {
    fn from(s: String) -> Self {
        HeliosError::Other(s)
    }
}

impl From<&str> for HeliosError {
    fn from(s: &str) -> Self {
        HeliosError::Other(s.to_string())
    }
}

// JSON parsing errors
impl From<serde_json::Error> for HeliosError {
    fn from(err: serde_json::Error) -> Self {
        HeliosError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HeliosError::Config("leverage must be between 0 and 100".into());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("leverage"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HeliosError = io_err.into();
        assert!(matches!(err, HeliosError::Io(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> HeliosResult<()> {
            Err(HeliosError::DataNotFound("El Paso / 500MW".into()))
        }

        fn outer() -> HeliosResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
