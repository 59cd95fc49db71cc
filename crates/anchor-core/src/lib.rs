//! Anchor Core - Basic data structures for N-dimensional morphology
//!
//! This crate provides the fundamental data structures used throughout
//! the anchor morphology library:
//!
//! - [`Image`] - Dense N-dimensional pixel container
//! - [`Region`] - N-dimensional box of indices (start + extent)
//! - [`Pixel`] - Scalar pixel types with a total order
//! - [`Error`] / [`Result`] - Core error handling

pub mod error;
pub mod image;
pub mod pixel;
pub mod region;

pub use error::{Error, Result};
pub use image::Image;
pub use pixel::Pixel;
pub use region::{Region, RegionIndices};
