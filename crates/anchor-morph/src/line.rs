//! Digital line rasterization
//!
//! Turns a real direction vector into the integer grid offsets that the
//! line passes gather and scatter pixels along. The same [`OffsetArray`]
//! is used for reading and writing a line, so the output depends only on
//! the direction and the step count.
//!
//! # Algorithm
//!
//! Error-accumulation DDA. The dominant axis (largest `|component|`)
//! advances one unit per step. Every other axis `j` accumulates
//! `|d_j / d_dominant|` per step and advances one unit whenever the
//! accumulator reaches one half. Consecutive offsets therefore differ by
//! exactly one along the dominant axis and by at most one along the others,
//! and every axis moves monotonically.

use crate::{MorphError, MorphResult};

/// A sequence of N-dimensional integer offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetArray {
    dimension: usize,
    coords: Vec<isize>,
}

impl OffsetArray {
    /// Number of axes per offset
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of offsets
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len() / self.dimension
    }

    /// Check if there are no offsets
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Offset at position `i`
    #[inline]
    pub fn get(&self, i: usize) -> &[isize] {
        &self.coords[i * self.dimension..(i + 1) * self.dimension]
    }

    /// Iterate over offsets
    pub fn iter(&self) -> impl Iterator<Item = &[isize]> + '_ {
        self.coords.chunks_exact(self.dimension)
    }
}

/// Index of the largest `|component|`; the lowest index wins ties
pub fn dominant_axis(direction: &[f64]) -> usize {
    let mut best = 0;
    for (axis, d) in direction.iter().enumerate() {
        if d.abs() > direction[best].abs() {
            best = axis;
        }
    }
    best
}

fn validate_direction(direction: &[f64]) -> MorphResult<()> {
    if direction.is_empty() {
        return Err(MorphError::InvalidParameters(
            "line direction has no components".to_string(),
        ));
    }
    if direction.iter().any(|d| !d.is_finite()) {
        return Err(MorphError::InvalidParameters(format!(
            "line direction {:?} is not finite",
            direction
        )));
    }
    if direction.iter().all(|&d| d == 0.0) {
        return Err(MorphError::InvalidParameters(
            "line direction is the zero vector".to_string(),
        ));
    }
    Ok(())
}

/// Rasterize a ray of `steps` offsets starting at the origin
///
/// # Errors
///
/// Returns `MorphError::InvalidParameters` if the direction is empty,
/// non-finite, or zero.
pub fn build_ray(direction: &[f64], steps: usize) -> MorphResult<OffsetArray> {
    validate_direction(direction)?;

    let dimension = direction.len();
    let dominant = dominant_axis(direction);
    let scale = direction[dominant].abs();
    let slopes: Vec<f64> = direction.iter().map(|d| (d / scale).abs()).collect();
    let signs: Vec<isize> = direction
        .iter()
        .map(|&d| if d < 0.0 { -1 } else { 1 })
        .collect();

    let mut error = vec![0.0f64; dimension];
    let mut point = vec![0isize; dimension];
    let mut coords = Vec::with_capacity(steps * dimension);

    for step in 0..steps {
        if step > 0 {
            for axis in 0..dimension {
                if axis == dominant {
                    point[axis] += signs[axis];
                    continue;
                }
                error[axis] += slopes[axis];
                if error[axis] >= 0.5 {
                    point[axis] += signs[axis];
                    error[axis] -= 1.0;
                }
            }
        }
        coords.extend_from_slice(&point);
    }

    Ok(OffsetArray { dimension, coords })
}

/// Rasterize a centered line of `2 * reach + 1` offsets
///
/// The result is symmetric: `offset[i] == -offset[2 * reach - i]`.
///
/// # Errors
///
/// Returns `MorphError::InvalidParameters` if the direction is empty,
/// non-finite, or zero.
pub fn build_line(direction: &[f64], reach: usize) -> MorphResult<OffsetArray> {
    let ray = build_ray(direction, reach + 1)?;
    let dimension = ray.dimension;
    let mut coords = Vec::with_capacity((2 * reach + 1) * dimension);

    for i in (1..=reach).rev() {
        coords.extend(ray.get(i).iter().map(|&c| -c));
    }
    coords.extend_from_slice(&ray.coords);

    Ok(OffsetArray { dimension, coords })
}

/// Number of pixels a line vector covers along its dominant axis
pub fn line_pixels(vector: &[f64]) -> usize {
    let extent = vector.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    extent.round() as usize
}
