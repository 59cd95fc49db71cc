//! Error types for anchor-morph

use thiserror::Error;

/// Errors that can occur during morphological operations
#[derive(Debug, Error)]
pub enum MorphError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] anchor_core::Error),

    /// Malformed or unsupported structuring element request
    #[error("invalid structuring element: {0}")]
    InvalidStructuringElement(String),

    /// Direct-indexed histogram requested for a pixel type whose value
    /// range cannot be bounded
    #[error("unsupported pixel domain: {pixel} has no bounded level range")]
    UnsupportedPixelDomain { pixel: &'static str },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Invalid sequence format
    #[error("invalid sequence: {0}")]
    InvalidSequence(String),
}

/// Result type for morphological operations
pub type MorphResult<T> = Result<T, MorphError>;
