//! Unified error types for the carbon intensity pipeline
//!
//! [`GciError`] carries the domain taxonomy (malformed input, missing curve
//! package, failed curve lookup) alongside the usual I/O and parsing
//! failures, so every crate in the workspace can return [`GciResult`].
//!
//! # Example
//!
//! ```
//! use gci_core::{CurveSet, FuelCategory, GciError, Megawatts};
//!
//! let curves = CurveSet::new(2019);
//! let err = curves.rate_at(FuelCategory::Hydro, Megawatts(10.0)).unwrap_err();
//! assert!(matches!(err, GciError::Lookup { .. }));
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::fuel::FuelCategory;

/// Unified error type for all GCI operations.
#[derive(Error, Debug)]
pub enum GciError {
    /// Malformed input or missing required columns. Fatal to the calling
    /// operation and never retried.
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// No curve package exists for the requested basis year.
    #[error("CO2 curves package for {year} not found at {}", path.display())]
    NotFound { year: u16, path: PathBuf },

    /// A fuel category could not be looked up in a curve set, either
    /// because it is absent or because its curve has no points.
    #[error("Lookup error for '{category}': {reason}")]
    Lookup {
        category: FuelCategory,
        reason: LookupFailure,
    },

    /// I/O errors (file access, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Why a curve lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    /// The curve set has no entry for the category.
    MissingCategory,
    /// The category's curve has no points.
    EmptyCurve,
}

impl std::fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupFailure::MissingCategory => write!(f, "category not present in curve set"),
            LookupFailure::EmptyCurve => write!(f, "curve has no points"),
        }
    }
}

/// Convenience type alias for Results using GciError.
pub type GciResult<T> = Result<T, GciError>;

impl From<anyhow::Error> for GciError {
    fn from(err: anyhow::Error) -> Self {
        GciError::Other(err.to_string())
    }
}

impl From<String> for GciError {
    fn from(s: String) -> Self {
        GciError::Other(s)
    }
}

impl From<&str> for GciError {
    fn from(s: &str) -> Self {
        GciError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for GciError {
    fn from(err: serde_json::Error) -> Self {
        GciError::Parse(err.to_string())
    }
}
