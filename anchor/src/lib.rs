//! Anchor - Fast flat grayscale morphology for N-dimensional images
//!
//! # Overview
//!
//! Erosion, dilation, opening and closing with large flat structuring
//! elements, in time independent of the element size:
//!
//! - N-dimensional images of any scalar pixel type
//! - Bricks, polygons and single lines decomposed into line segments
//! - Derived transforms (gradient, top-hats) and a sequence interpreter
//!
//! # Example
//!
//! ```
//! use anchor::Image;
//! use anchor::morph::{AnchorConfig, StructuringElement, dilate_gray};
//!
//! let mut image = Image::<u8>::new(&[64, 64]).unwrap();
//! image.set(&[32, 32], 255).unwrap();
//!
//! let se = StructuringElement::polygon(&[5, 5], 4).unwrap();
//! let dilated = dilate_gray(&image, &se, &AnchorConfig::default()).unwrap();
//! assert_eq!(dilated.get(&[32, 32]), Some(255));
//! assert_eq!(dilated.get(&[0, 0]), Some(0));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use anchor_core::*;

// Re-export the morphology crate as a module to avoid name conflicts
pub use anchor_morph as morph;
