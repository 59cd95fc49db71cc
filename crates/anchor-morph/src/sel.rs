//! Flat structuring elements decomposed into line segments
//!
//! A structuring element is never stored as a mask. It is kept as the list
//! of straight line segments whose Minkowski sum it is, which is what the
//! anchor filters consume. [`StructuringElement::mask`] renders the sum on
//! demand for inspection and testing.

use std::f64::consts::PI;

use anchor_core::{Image, Region};
use log::debug;

use crate::line::{build_line, build_ray, line_pixels};
use crate::{MorphError, MorphResult};

/// Two unit directions are parallel when `1 - |cos|` is below this
pub const PARALLEL_TOLERANCE: f64 = 1e-6;

/// One line of a decomposition
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    vector: Vec<f64>,
    direction: Vec<f64>,
    half_length: usize,
}

impl LineSegment {
    /// Create a segment along `vector` covering `2 * half_length + 1` pixels
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidStructuringElement` if the vector is
    /// empty, non-finite, or zero.
    pub fn new(vector: &[f64], half_length: usize) -> MorphResult<Self> {
        let direction = unit_vector(vector).ok_or_else(|| {
            MorphError::InvalidStructuringElement(format!(
                "line vector {:?} has no direction",
                vector
            ))
        })?;
        Ok(Self {
            vector: vector.to_vec(),
            direction,
            half_length,
        })
    }

    /// Create a segment whose window is the vector's dominant-axis pixel
    /// count made odd
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidStructuringElement` if the vector is
    /// empty, non-finite, or zero.
    pub fn from_vector(vector: &[f64]) -> MorphResult<Self> {
        Self::new(vector, line_pixels(vector) / 2)
    }

    /// The vector the segment was built from
    #[inline]
    pub fn vector(&self) -> &[f64] {
        &self.vector
    }

    /// Unit direction
    #[inline]
    pub fn direction(&self) -> &[f64] {
        &self.direction
    }

    /// Pixels on each side of the center
    #[inline]
    pub fn half_length(&self) -> usize {
        self.half_length
    }

    /// Window length in pixels along the digital line
    #[inline]
    pub fn window(&self) -> usize {
        2 * self.half_length + 1
    }

    /// Check if the segment is parallel to a unit direction
    pub fn is_parallel(&self, direction: &[f64]) -> bool {
        is_parallel(&self.direction, direction)
    }
}

fn unit_vector(vector: &[f64]) -> Option<Vec<f64>> {
    if vector.is_empty() || vector.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm == 0.0 {
        return None;
    }
    Some(vector.iter().map(|v| v / norm).collect())
}

fn is_parallel(a: &[f64], b: &[f64]) -> bool {
    let cos: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    1.0 - cos.abs() < PARALLEL_TOLERANCE
}

/// Check if any segment of a decomposition is parallel to `direction`
///
/// `direction` must be a unit vector.
pub fn check_parallel(segments: &[LineSegment], direction: &[f64]) -> bool {
    segments.iter().any(|s| s.is_parallel(direction))
}

/// How a polygon is decomposed, chosen by dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonGeometry {
    /// 2-D radial decomposition
    Planar,
    /// 3-D zonohedra from axis, face and body diagonals
    Spatial,
    /// Any other dimension: falls back to a brick
    Generic,
}

/// Line counts accepted by the 3-D decomposition
pub const SPATIAL_LINE_COUNTS: [usize; 6] = [3, 4, 6, 7, 9, 13];

impl PolygonGeometry {
    /// Geometry used for images with `dimension` axes
    pub fn for_dimension(dimension: usize) -> Self {
        match dimension {
            2 => PolygonGeometry::Planar,
            3 => PolygonGeometry::Spatial,
            _ => PolygonGeometry::Generic,
        }
    }

    /// Line count used when the caller asks for zero lines
    pub fn default_lines(self, radius: &[usize]) -> usize {
        let largest = radius.iter().copied().max().unwrap_or(0);
        match self {
            PolygonGeometry::Planar => match largest {
                0..=3 => 2,
                4..=8 => 4,
                _ => 6,
            },
            PolygonGeometry::Spatial => match largest {
                0..=3 => 3,
                4..=8 => 9,
                _ => 13,
            },
            PolygonGeometry::Generic => radius.len(),
        }
    }

    /// Line vectors of the decomposition, in insertion order
    fn vectors(self, radius: &[usize], lines: usize) -> MorphResult<Vec<Vec<f64>>> {
        match self {
            PolygonGeometry::Planar => Ok(planar_vectors(radius, lines)),
            PolygonGeometry::Spatial => spatial_vectors(radius, lines),
            PolygonGeometry::Generic => Ok(Vec::new()),
        }
    }
}

fn planar_vectors(radius: &[usize], lines: usize) -> Vec<Vec<f64>> {
    let k0 = PI * radius[0] as f64 / lines as f64;
    let k1 = PI * radius[1] as f64 / lines as f64;
    let step = PI / lines as f64;

    let mut vectors = Vec::with_capacity(lines + 2);
    let mut theta = 0.0f64;
    while theta <= PI / 2.0 + 1e-4 {
        vectors.push(vec![k0 * theta.cos(), k1 * theta.sin()]);
        vectors.push(vec![k0 * (-theta).cos(), k1 * (-theta).sin()]);
        theta += step;
    }
    vectors
}

fn spatial_vectors(radius: &[usize], lines: usize) -> MorphResult<Vec<Vec<f64>>> {
    const AXES: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    const BODY: [[f64; 3]; 4] = [
        [1.0, 1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, -1.0, 1.0],
        [-1.0, 1.0, 1.0],
    ];
    const FACE: [[f64; 3]; 6] = [
        [1.0, 1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 0.0, 1.0],
        [1.0, 0.0, -1.0],
        [0.0, 1.0, 1.0],
        [0.0, 1.0, -1.0],
    ];

    let families: Vec<&[[f64; 3]]> = match lines {
        3 => vec![&AXES[..]],
        4 => vec![&BODY[..]],
        6 => vec![&FACE[..]],
        7 => vec![&AXES[..], &BODY[..]],
        9 => vec![&AXES[..], &FACE[..]],
        13 => vec![&AXES[..], &FACE[..], &BODY[..]],
        _ => {
            return Err(MorphError::InvalidStructuringElement(format!(
                "3-D polygon needs one of {:?} lines, got {}",
                SPATIAL_LINE_COUNTS, lines
            )));
        }
    };

    let scale = 4.0 / lines as f64;
    let mut vectors = Vec::with_capacity(lines);
    for family in families {
        for raw in family {
            let norm = raw.iter().map(|v| v * v).sum::<f64>().sqrt();
            vectors.push(
                raw.iter()
                    .zip(radius)
                    .map(|(u, &r)| scale * r as f64 * u / norm)
                    .collect(),
            );
        }
    }
    Ok(vectors)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Brick,
    Polygon { lines: usize },
    Line,
}

/// A flat structuring element held as its line decomposition
#[derive(Debug, Clone)]
pub struct StructuringElement {
    kind: ElementKind,
    radius: Vec<usize>,
    segments: Vec<LineSegment>,
}

fn validate_radius(radius: &[usize]) -> MorphResult<()> {
    if radius.is_empty() {
        return Err(MorphError::InvalidStructuringElement(
            "radius has no axes".to_string(),
        ));
    }
    Ok(())
}

fn axis_vector(dimension: usize, axis: usize) -> Vec<f64> {
    let mut v = vec![0.0; dimension];
    v[axis] = 1.0;
    v
}

impl StructuringElement {
    /// Create a box of side `2 * radius + 1` along each axis
    ///
    /// One segment per axis, zero radii included. The decomposition is
    /// exact.
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidStructuringElement` if `radius` is empty.
    pub fn brick(radius: &[usize]) -> MorphResult<Self> {
        validate_radius(radius)?;
        let segments = brick_segments(radius)?;
        debug!("brick {:?}: {} segments", radius, segments.len());
        Ok(Self {
            kind: ElementKind::Brick,
            radius: radius.to_vec(),
            segments,
        })
    }

    /// Create a convex polygon approximating an ellipse or ellipsoid
    ///
    /// `lines == 0` picks a line count from the largest radius. Images with
    /// neither 2 nor 3 axes get a brick.
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidStructuringElement` if `radius` is empty
    /// or a 3-D line count is not one of [`SPATIAL_LINE_COUNTS`].
    pub fn polygon(radius: &[usize], lines: usize) -> MorphResult<Self> {
        validate_radius(radius)?;
        let geometry = PolygonGeometry::for_dimension(radius.len());
        let lines = if lines == 0 {
            geometry.default_lines(radius)
        } else {
            lines
        };

        if geometry == PolygonGeometry::Generic {
            debug!(
                "polygon {:?}: no decomposition for {} axes, using brick",
                radius,
                radius.len()
            );
            return Ok(Self {
                kind: ElementKind::Polygon { lines },
                radius: radius.to_vec(),
                segments: brick_segments(radius)?,
            });
        }

        let mut segments: Vec<LineSegment> = Vec::with_capacity(lines);
        for vector in geometry.vectors(radius, lines)? {
            let Some(direction) = unit_vector(&vector) else {
                continue;
            };
            let half_length = line_pixels(&vector) / 2;
            if half_length == 0 || check_parallel(&segments, &direction) {
                continue;
            }
            segments.push(LineSegment {
                vector,
                direction,
                half_length,
            });
        }

        debug!(
            "polygon {:?} with {} lines ({:?}): {} segments",
            radius,
            lines,
            geometry,
            segments.len()
        );
        Ok(Self {
            kind: ElementKind::Polygon { lines },
            radius: radius.to_vec(),
            segments,
        })
    }

    /// Create a single line along `vector`, `length` pixels along its
    /// dominant axis (rounded up to odd)
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidStructuringElement` if the vector has no
    /// direction or `length` is zero.
    pub fn line(vector: &[f64], length: usize) -> MorphResult<Self> {
        if length == 0 {
            return Err(MorphError::InvalidStructuringElement(
                "line length must be positive".to_string(),
            ));
        }
        let segment = LineSegment::new(vector, length / 2)?;
        let radius = build_ray(segment.direction(), segment.half_length + 1)?
            .iter()
            .last()
            .map(|o| o.iter().map(|c| c.unsigned_abs()).collect())
            .unwrap_or_else(|| vec![0; vector.len()]);
        debug!("line {:?}: window {}", vector, segment.window());
        Ok(Self {
            kind: ElementKind::Line,
            radius,
            segments: vec![segment],
        })
    }

    /// Number of axes
    #[inline]
    pub fn dimension(&self) -> usize {
        self.radius.len()
    }

    /// Requested radius per axis
    #[inline]
    pub fn radius(&self) -> &[usize] {
        &self.radius
    }

    /// Line segments, in application order
    #[inline]
    pub fn decomposition(&self) -> &[LineSegment] {
        &self.segments
    }

    /// Check if the element is a single line
    pub fn is_line(&self) -> bool {
        self.segments.len() == 1
    }

    /// Check if the element was built as a brick
    pub fn is_brick(&self) -> bool {
        self.kind == ElementKind::Brick
    }

    /// Line count requested for a polygon, after defaulting
    pub fn polygon_lines(&self) -> Option<usize> {
        match self.kind {
            ElementKind::Polygon { lines } => Some(lines),
            _ => None,
        }
    }

    /// Extent of the element on each side of the center, per axis
    pub fn reach(&self) -> MorphResult<Vec<usize>> {
        let mut reach = vec![0usize; self.dimension()];
        for segment in &self.segments {
            if segment.half_length == 0 {
                continue;
            }
            let ray = build_ray(&segment.direction, segment.half_length + 1)?;
            let tip = ray.get(segment.half_length);
            for (r, c) in reach.iter_mut().zip(tip) {
                *r += c.unsigned_abs();
            }
        }
        Ok(reach)
    }

    /// Render the element as a mask of side `2 * reach + 1`, center at
    /// `reach`
    pub fn mask(&self) -> MorphResult<Image<bool>> {
        let reach = self.reach()?;
        let size: Vec<usize> = reach.iter().map(|r| 2 * r + 1).collect();
        let mut mask = Image::new(&size)?;
        let center: Vec<isize> = reach.iter().map(|&r| r as isize).collect();
        mask.set(&center, true)?;

        let domain = Region::from_size(&size);
        for segment in &self.segments {
            if segment.half_length == 0 {
                continue;
            }
            let offsets = build_line(&segment.direction, segment.half_length)?;
            let mut next = Image::new(&size)?;
            for index in domain.indices() {
                if mask.get(&index) != Some(true) {
                    continue;
                }
                for offset in offsets.iter() {
                    let target: Vec<isize> = index.iter().zip(offset).map(|(i, o)| i + o).collect();
                    next.set(&target, true)?;
                }
            }
            mask = next;
        }
        Ok(mask)
    }

    /// Number of pixels in the rendered mask
    pub fn hit_count(&self) -> MorphResult<usize> {
        Ok(self.mask()?.data().iter().filter(|&&v| v).count())
    }
}

fn brick_segments(radius: &[usize]) -> MorphResult<Vec<LineSegment>> {
    radius
        .iter()
        .enumerate()
        .map(|(axis, &r)| LineSegment::new(&axis_vector(radius.len(), axis), r))
        .collect()
}
