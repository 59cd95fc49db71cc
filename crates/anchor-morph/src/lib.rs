//! anchor-morph - Grayscale morphology with the anchor method
//!
//! This crate provides flat grayscale morphology on N-dimensional images
//! whose cost does not grow with the size of the structuring element:
//!
//! - Structuring elements decomposed into line segments (bricks, polygons,
//!   single lines)
//! - Digital line rasterization
//! - Sliding-window extreme histograms (direct-indexed and ordered-map)
//! - The 1-D anchor scanner for erosion, dilation, opening and closing
//! - Face splitting so every line of a direction is processed once
//! - Grayscale erosion, dilation, opening, closing, gradient and top-hats
//! - Morphological sequence operations for chaining multiple operations

pub mod anchor;
mod error;
pub mod face;
pub mod grayscale;
pub mod histogram;
pub mod line;
pub mod order;
pub mod sel;
pub mod sequence;

pub use error::{MorphError, MorphResult};
pub use order::Extremum;
pub use sel::{LineSegment, PolygonGeometry, StructuringElement};

// Re-export the line scanner and its histograms
pub use anchor::AnchorLine;
pub use histogram::{
    Histogram, HistogramStrategy, MapHistogram, SlidingHistogram, VectorHistogram,
};

// Re-export line traversal
pub use face::{
    Face, FaceSide, LineCursor, copy_line_to_image, do_face, fill_line_buffer, make_face_list,
    need_to_do_face,
};
pub use line::{OffsetArray, build_line, build_ray, dominant_axis, line_pixels};

// Re-export commonly used grayscale morphology functions
pub use grayscale::{
    AnchorConfig, apply_along_decomposition, bottom_hat_gray, close_gray, dilate_gray, erode_gray,
    gradient_gray, open_gray, top_hat_gray,
};

// Re-export sequence functions
pub use sequence::{MorphOp, MorphSequence, gray_morph_sequence};
