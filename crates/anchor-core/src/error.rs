//! Error types for anchor-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// Anchor core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid image or region extent
    #[error("invalid dimensions: {0:?}")]
    InvalidDimension(Vec<usize>),

    /// Image extent mismatch between two operands
    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Index out of bounds
    #[error("index out of bounds: {index:?} not inside {size:?}")]
    IndexOutOfBounds { index: Vec<isize>, size: Vec<usize> },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
