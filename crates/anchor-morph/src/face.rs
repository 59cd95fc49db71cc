//! Domain faces and line traversal
//!
//! Applying a 1-D filter along a direction means visiting every line of
//! that direction through the image exactly once. Every such line enters
//! the domain through a face on the side the direction points away from.
//! [`make_face_list`] splits those sides into disjoint faces, and a
//! [`LineCursor`] decides which face pixels start a line and traces the
//! line through the domain.
//!
//! Lines are rasterized with one shared ray whose phase is the distance
//! along the dominant axis from the entry side. Every pixel therefore lies
//! on exactly one digital line, and a face pixel starts a line only when
//! the pixel before it on that line falls outside the domain.

use anchor_core::{Image, Pixel, Region};

use crate::anchor::AnchorLine;
use crate::line::{OffsetArray, build_ray, dominant_axis};
use crate::MorphResult;

/// Components below this magnitude never move a line off its axis
pub const AXIS_TOLERANCE: f64 = 1e-6;

/// Side of the domain a face lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSide {
    /// First coordinate of the axis
    Low,
    /// Last coordinate of the axis
    High,
}

/// A one-pixel-thick slab on the boundary of the domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    region: Region,
    axis: usize,
    side: FaceSide,
}

impl Face {
    /// Pixels of the face
    #[inline]
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Axis the face is perpendicular to
    #[inline]
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Side of the domain along `axis`
    #[inline]
    pub fn side(&self) -> FaceSide {
        self.side
    }
}

/// Peel a face off `remaining` along `axis` and narrow `remaining`
fn peel(remaining: &mut Region, axis: usize, side: FaceSide) -> Face {
    let size = remaining.size()[axis];
    let thickness = size.min(1);
    let (face_start, rest_start) = match side {
        FaceSide::Low => (remaining.start()[axis], remaining.start()[axis] + thickness as isize),
        FaceSide::High => (remaining.end(axis) - thickness as isize, remaining.start()[axis]),
    };
    let face = Face {
        region: remaining.with_axis(axis, face_start, thickness),
        axis,
        side,
    };
    *remaining = remaining.with_axis(axis, rest_start, size - thickness);
    face
}

/// Split the entry sides of `domain` for `direction` into disjoint faces
///
/// The face on the dominant axis comes first. Each other axis with a
/// significant component follows in order, minus the pixels already
/// claimed.
pub fn make_face_list(domain: &Region, direction: &[f64]) -> Vec<Face> {
    let dominant = dominant_axis(direction);
    let side_of = |d: f64| if d > 0.0 { FaceSide::Low } else { FaceSide::High };

    let mut remaining = domain.clone();
    let mut faces = Vec::with_capacity(direction.len());
    faces.push(peel(&mut remaining, dominant, side_of(direction[dominant])));

    for (axis, &d) in direction.iter().enumerate() {
        if axis == dominant || d.abs() < AXIS_TOLERANCE {
            continue;
        }
        faces.push(peel(&mut remaining, axis, side_of(d)));
    }
    faces
}

/// Check if any line of `direction` enters `domain` through `face`
pub fn need_to_do_face(domain: &Region, face: &Face, direction: &[f64]) -> bool {
    if face.region.is_empty() || !domain.contains_region(&face.region) {
        return false;
    }
    let d = direction[face.axis];
    if d.abs() < AXIS_TOLERANCE {
        return false;
    }
    match face.side {
        FaceSide::Low => d > 0.0,
        FaceSide::High => d < 0.0,
    }
}

/// Traces the lines of one direction through a domain
#[derive(Debug, Clone)]
pub struct LineCursor {
    domain: Region,
    offsets: OffsetArray,
    dominant: usize,
    /// Dominant-axis coordinate of the entry side
    entry: isize,
}

impl LineCursor {
    /// Create a cursor for `direction` over `domain`
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidParameters` if the direction is zero or
    /// non-finite.
    pub fn new(domain: &Region, direction: &[f64]) -> MorphResult<Self> {
        let dominant = dominant_axis(direction);
        let steps = domain.size().get(dominant).copied().unwrap_or(0);
        let offsets = build_ray(direction, steps)?;
        let entry = if direction[dominant] > 0.0 {
            domain.start()[dominant]
        } else {
            domain.last(dominant)
        };
        Ok(Self {
            domain: domain.clone(),
            offsets,
            dominant,
            entry,
        })
    }

    /// Longest possible line, in pixels
    #[inline]
    pub fn max_length(&self) -> usize {
        self.offsets.len()
    }

    /// Position of `index` along the shared ray
    #[inline]
    pub fn phase(&self, index: &[isize]) -> usize {
        (index[self.dominant] - self.entry).unsigned_abs()
    }

    /// Check if the line through `index` enters the domain at `index`
    pub fn starts_line(&self, index: &[isize]) -> bool {
        let t = self.phase(index);
        if t == 0 {
            return true;
        }
        let (prev, cur) = (self.offsets.get(t - 1), self.offsets.get(t));
        let start = self.domain.start();
        !index
            .iter()
            .zip(prev.iter().zip(cur))
            .enumerate()
            .all(|(axis, (&i, (&p, &c)))| {
                let before = i - (c - p);
                before >= start[axis] && before < self.domain.end(axis)
            })
    }

    /// Linear positions of the line starting at `start`, for an image with
    /// `strides` covering the domain
    ///
    /// Returns the line length.
    pub fn trace(&self, start: &[isize], strides: &[usize], positions: &mut Vec<usize>) -> usize {
        positions.clear();
        let t0 = self.phase(start);
        let mut index = start.to_vec();
        for t in t0..self.offsets.len() {
            if t > t0 {
                let (prev, cur) = (self.offsets.get(t - 1), self.offsets.get(t));
                for (i, (&p, &c)) in index.iter_mut().zip(prev.iter().zip(cur)) {
                    *i += c - p;
                }
            }
            if !self.domain.contains(&index) {
                break;
            }
            let pos = index
                .iter()
                .zip(self.domain.start())
                .zip(strides)
                .map(|((&i, &s), &stride)| (i - s) as usize * stride)
                .sum();
            positions.push(pos);
        }
        positions.len()
    }
}

/// Gather the pixels at `positions` into `buffer`
pub fn fill_line_buffer<T: Pixel>(image: &Image<T>, positions: &[usize], buffer: &mut [T]) {
    let data = image.data();
    for (slot, &pos) in buffer.iter_mut().zip(positions) {
        *slot = data[pos];
    }
}

/// Scatter `buffer` back to the pixels at `positions`
pub fn copy_line_to_image<T: Pixel>(image: &mut Image<T>, positions: &[usize], buffer: &[T]) {
    let data = image.data_mut();
    for (&value, &pos) in buffer.iter().zip(positions) {
        data[pos] = value;
    }
}

/// What to run on each line of a face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePass {
    /// [`AnchorLine::erode_dilate`]
    ErodeDilate,
    /// [`AnchorLine::open_close`]
    OpenClose,
}

/// Scratch space reused by every line of a segment pass
#[derive(Debug, Clone)]
pub struct LineBuffers<T: Pixel> {
    line: Vec<T>,
    scratch: Vec<T>,
    positions: Vec<usize>,
}

impl<T: Pixel> LineBuffers<T> {
    /// Buffers for lines of at most `length` pixels
    pub fn new(length: usize) -> Self {
        Self {
            line: vec![T::default(); length],
            scratch: vec![T::default(); length],
            positions: Vec::with_capacity(length),
        }
    }
}

/// Filter every line entering through `face`, in place
///
/// Lines are disjoint and each is gathered before it is written back, so
/// the image can be read and written by the same pass. Returns the number
/// of lines processed.
///
/// # Errors
///
/// Returns `MorphError::UnsupportedPixelDomain` if an open/close pass
/// cannot build its second histogram.
pub fn do_face<T: Pixel>(
    image: &mut Image<T>,
    face: &Face,
    cursor: &LineCursor,
    line: &mut AnchorLine<T>,
    pass: LinePass,
    buffers: &mut LineBuffers<T>,
) -> MorphResult<usize> {
    let mut lines = 0;
    for start in face.region.indices() {
        if !cursor.starts_line(&start) {
            continue;
        }
        let n = cursor.trace(&start, image.strides(), &mut buffers.positions);
        let positions = &buffers.positions[..n];
        let (input, scratch) = (&mut buffers.line[..n], &mut buffers.scratch[..n]);
        fill_line_buffer(image, positions, input);
        match pass {
            LinePass::ErodeDilate => {
                line.erode_dilate(input, scratch);
                copy_line_to_image(image, positions, scratch);
            }
            LinePass::OpenClose => {
                line.open_close(input, scratch)?;
                copy_line_to_image(image, positions, input);
            }
        }
        lines += 1;
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::HistogramStrategy;
    use crate::order::Extremum;

    /// Count how many traced lines visit each pixel
    fn coverage(size: &[usize], direction: &[f64]) -> Vec<usize> {
        let domain = Region::from_size(size);
        let image = Image::<u8>::new(size).unwrap();
        let cursor = LineCursor::new(&domain, direction).unwrap();
        let mut hits = vec![0usize; domain.num_pixels()];
        let mut positions = Vec::new();
        for face in make_face_list(&domain, direction) {
            if !need_to_do_face(&domain, &face, direction) {
                continue;
            }
            for start in face.region().indices() {
                if cursor.starts_line(&start) {
                    cursor.trace(&start, image.strides(), &mut positions);
                    for &pos in &positions {
                        hits[pos] += 1;
                    }
                }
            }
        }
        hits
    }

    #[test]
    fn test_lines_cover_every_pixel_once() {
        let cases: Vec<(Vec<usize>, Vec<f64>)> = vec![
            (vec![13, 9], vec![1.0, 0.0]),
            (vec![13, 9], vec![0.0, -1.0]),
            (vec![13, 9], vec![1.0, 1.0]),
            (vec![13, 9], vec![0.3, -1.0]),
            (vec![7, 20], vec![-2.0, 0.7]),
            (vec![1, 5], vec![0.5, 0.5]),
            (vec![9, 8, 7], vec![1.0, 0.6, -0.3]),
            (vec![6, 11, 5], vec![-0.2, 1.0, 1.0]),
            (vec![5, 5, 5], vec![-1.0, -1.0, -1.0]),
        ];
        for (size, direction) in cases {
            let hits = coverage(&size, &direction);
            assert!(
                hits.iter().all(|&h| h == 1),
                "{:?} {:?}: {:?}",
                size,
                direction,
                hits
            );
        }
    }

    #[test]
    fn test_faces_are_disjoint() {
        let domain = Region::from_size(&[10, 8, 6]);
        let faces = make_face_list(&domain, &[0.4, -1.0, 0.2]);
        assert_eq!(faces.len(), 3);
        assert_eq!(faces[0].axis(), 1);
        assert_eq!(faces[0].side(), FaceSide::High);
        for (i, a) in faces.iter().enumerate() {
            assert_eq!(a.region().size()[a.axis()], 1);
            for b in &faces[i + 1..] {
                assert!(a.region().intersect(b.region()).is_none());
            }
        }
    }

    #[test]
    fn test_need_to_do_face() {
        let domain = Region::from_size(&[10, 10]);
        let faces = make_face_list(&domain, &[1.0, 0.0]);
        assert_eq!(faces.len(), 1);
        assert!(need_to_do_face(&domain, &faces[0], &[1.0, 0.0]));

        let outward = Face {
            region: Region::new(vec![9, 0], vec![1, 10]).unwrap(),
            axis: 0,
            side: FaceSide::High,
        };
        assert!(!need_to_do_face(&domain, &outward, &[1.0, 0.0]));
        assert!(!need_to_do_face(&domain, &outward, &[0.0, 1.0]));
        assert!(need_to_do_face(&domain, &outward, &[-1.0, 0.2]));

        let empty = Face {
            region: Region::new(vec![0, 0], vec![0, 10]).unwrap(),
            axis: 0,
            side: FaceSide::Low,
        };
        assert!(!need_to_do_face(&domain, &empty, &[1.0, 0.0]));
    }

    #[test]
    fn test_gather_scatter_inverse() {
        let size = [12, 7];
        let data: Vec<u8> = (0..84).collect();
        let source = Image::from_data(&size, data).unwrap();
        let mut target = Image::<u8>::new(&size).unwrap();
        let domain = source.region();
        let direction = [1.0, 0.5];
        let cursor = LineCursor::new(&domain, &direction).unwrap();

        let mut positions = Vec::new();
        let mut buffer = vec![0u8; cursor.max_length()];
        for face in make_face_list(&domain, &direction) {
            for start in face.region().indices() {
                if !cursor.starts_line(&start) {
                    continue;
                }
                let n = cursor.trace(&start, source.strides(), &mut positions);
                fill_line_buffer(&source, &positions, &mut buffer[..n]);
                copy_line_to_image(&mut target, &positions, &buffer[..n]);
            }
        }
        assert!(target.equals(&source));
    }

    #[test]
    fn test_do_face_dilates_rows() {
        let mut image = Image::from_data(&[5, 2], vec![0u8, 0, 9, 0, 0, 1, 0, 0, 0, 0]).unwrap();
        let domain = image.region();
        let direction = [1.0, 0.0];
        let cursor = LineCursor::new(&domain, &direction).unwrap();
        let mut line = AnchorLine::new(1, Extremum::Max, 0, HistogramStrategy::Auto).unwrap();
        let mut buffers = LineBuffers::new(cursor.max_length());

        let faces = make_face_list(&domain, &direction);
        let lines = do_face(
            &mut image,
            &faces[0],
            &cursor,
            &mut line,
            LinePass::ErodeDilate,
            &mut buffers,
        )
        .unwrap();
        assert_eq!(lines, 2);
        assert_eq!(image.data(), &[0, 9, 9, 9, 0, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_starts_line_checks_predecessor() {
        let cases: Vec<(Vec<usize>, Vec<f64>)> = vec![
            (vec![11, 7], vec![1.0, 0.35]),
            (vec![11, 7], vec![-0.6, -1.0]),
            (vec![6, 5, 4], vec![1.0, -0.5, 0.25]),
        ];
        for (size, direction) in cases {
            let domain = Region::new(vec![-3; size.len()], size).unwrap();
            let cursor = LineCursor::new(&domain, &direction).unwrap();
            for index in domain.indices() {
                let t = cursor.phase(&index);
                let expected = t == 0 || {
                    let (prev, cur) = (cursor.offsets.get(t - 1), cursor.offsets.get(t));
                    let before: Vec<isize> = index
                        .iter()
                        .zip(prev.iter().zip(cur))
                        .map(|(&i, (&p, &c))| i - (c - p))
                        .collect();
                    !domain.contains(&before)
                };
                assert_eq!(cursor.starts_line(&index), expected, "{:?}", index);
            }
        }
    }

    #[test]
    fn test_do_face_open_close() {
        let mut image = Image::from_data(&[7, 1], vec![5u8, 5, 9, 5, 5, 1, 5]).unwrap();
        let domain = image.region();
        let direction = [1.0, 0.0];
        let cursor = LineCursor::new(&domain, &direction).unwrap();
        let mut line = AnchorLine::new(1, Extremum::Min, u8::MAX, HistogramStrategy::Auto).unwrap();
        let mut buffers = LineBuffers::new(cursor.max_length());

        let faces = make_face_list(&domain, &direction);
        let lines = do_face(
            &mut image,
            &faces[0],
            &cursor,
            &mut line,
            LinePass::OpenClose,
            &mut buffers,
        )
        .unwrap();
        assert_eq!(lines, 1);
        // the bright peak is removed; every window over the last pixel also
        // covers the dark one
        assert_eq!(image.data(), &[5, 5, 5, 5, 5, 1, 1]);
    }
}
