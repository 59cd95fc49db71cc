//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building test data
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to build an image
    #[error("failed to build image {size:?}: {source}")]
    ImageBuild {
        size: Vec<usize>,
        source: anchor_core::Error,
    },

    /// Mask and image have different numbers of axes
    #[error("mask has {mask} axes but image has {image}")]
    MaskDimension { mask: usize, image: usize },

    /// Mask has no center pixel
    #[error("mask extent {0:?} must be odd along every axis")]
    MaskNotCentered(Vec<usize>),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
