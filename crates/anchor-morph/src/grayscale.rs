//! Grayscale morphological operations
//!
//! Erosion, dilation, opening and closing of N-dimensional images with
//! flat structuring elements.
//!
//! # Algorithm
//!
//! The structuring element is applied one line segment at a time. For each
//! segment the 1-D anchor filter runs along every digital line of that
//! direction through the image; the Minkowski sum of the segments gives the
//! full element. The cost per pixel does not depend on the segment length.
//!
//! - **Dilation**: maximum over the element
//! - **Erosion**: minimum over the element
//! - **Opening**: erosion followed by dilation (removes small bright features)
//! - **Closing**: dilation followed by erosion (fills small dark features)
//!
//! Elements with a single segment are opened and closed line by line in one
//! pass.

use anchor_core::{Error, Image, Pixel, Region};
use log::{debug, trace};

use crate::anchor::AnchorLine;
use crate::face::{
    Face, LineBuffers, LineCursor, LinePass, do_face, make_face_list, need_to_do_face,
};
use crate::histogram::HistogramStrategy;
use crate::order::Extremum;
use crate::sel::{LineSegment, StructuringElement};
use crate::MorphResult;

/// Filter settings shared by the grayscale operations
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorConfig<T: Pixel> {
    /// Histogram used when an anchor is lost
    pub histogram: HistogramStrategy,
    /// Padding past the image edge; the identity of the ordering if unset
    ///
    /// In opening and closing only the first pass uses it.
    pub boundary: Option<T>,
}

impl<T: Pixel> AnchorConfig<T> {
    /// Default settings
    pub fn new() -> Self {
        Self {
            histogram: HistogramStrategy::Auto,
            boundary: None,
        }
    }

    /// Set the histogram strategy
    pub fn with_histogram(mut self, histogram: HistogramStrategy) -> Self {
        self.histogram = histogram;
        self
    }

    /// Set the boundary value
    pub fn with_boundary(mut self, boundary: T) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Padding used by a pass keeping `extremum`
    pub fn boundary_for(&self, extremum: Extremum) -> T {
        self.boundary.unwrap_or_else(|| extremum.identity())
    }

    /// Settings for the second pass of an opening or closing
    fn second_pass(&self) -> Self {
        Self {
            histogram: self.histogram,
            boundary: None,
        }
    }
}

fn check_dimension<T: Pixel>(image: &Image<T>, se: &StructuringElement) -> MorphResult<()> {
    if image.dimension() != se.dimension() {
        return Err(Error::DimensionMismatch {
            expected: vec![image.dimension()],
            actual: vec![se.dimension()],
        }
        .into());
    }
    Ok(())
}

/// Line geometry of one segment over a domain
///
/// Built once per operation and shared by both passes of an opening or
/// closing.
#[derive(Debug)]
struct SegmentPlan<'s> {
    segment: &'s LineSegment,
    cursor: LineCursor,
    /// Faces some line enters through
    faces: Vec<Face>,
}

/// Plan every segment with a nonzero half-length
fn plan_segments<'s>(
    domain: &Region,
    segments: &'s [LineSegment],
) -> MorphResult<Vec<SegmentPlan<'s>>> {
    let mut plans = Vec::with_capacity(segments.len());
    for segment in segments {
        if segment.half_length() == 0 {
            continue;
        }
        let direction = segment.direction();
        let cursor = LineCursor::new(domain, direction)?;
        let mut faces = make_face_list(domain, direction);
        faces.retain(|face| {
            let needed = need_to_do_face(domain, face, direction);
            if !needed {
                trace!("skipping face on axis {} ({:?})", face.axis(), face.side());
            }
            needed
        });
        plans.push(SegmentPlan {
            segment,
            cursor,
            faces,
        });
    }
    Ok(plans)
}

/// Buffers long enough for the longest line of any plan
fn buffers_for<T: Pixel>(plans: &[SegmentPlan<'_>]) -> LineBuffers<T> {
    let length = plans.iter().map(|plan| plan.cursor.max_length()).max().unwrap_or(0);
    LineBuffers::new(length)
}

/// Run each planned segment over every line of `image`, in place
fn run_plans<'p, 's: 'p, T: Pixel>(
    image: &mut Image<T>,
    plans: impl Iterator<Item = &'p SegmentPlan<'s>>,
    extremum: Extremum,
    boundary: T,
    strategy: HistogramStrategy,
    pass: LinePass,
    buffers: &mut LineBuffers<T>,
) -> MorphResult<()> {
    for plan in plans {
        let half_length = plan.segment.half_length();
        let mut line = AnchorLine::new(half_length, extremum, boundary, strategy)?;
        let mut lines = 0;
        for face in &plan.faces {
            lines += do_face(image, face, &plan.cursor, &mut line, pass, buffers)?;
        }
        debug!(
            "{:?} {:?} along {:?}, half-length {}: {} faces, {} lines",
            pass,
            extremum,
            plan.segment.direction(),
            half_length,
            plan.faces.len(),
            lines
        );
    }
    Ok(())
}

fn filter_in_place<T: Pixel>(
    image: &mut Image<T>,
    segments: &[LineSegment],
    extremum: Extremum,
    config: &AnchorConfig<T>,
) -> MorphResult<()> {
    let strategy = config.histogram.resolve::<T>()?;
    let plans = plan_segments(&image.region(), segments)?;
    let mut buffers = buffers_for(&plans);
    run_plans(
        image,
        plans.iter(),
        extremum,
        config.boundary_for(extremum),
        strategy,
        LinePass::ErodeDilate,
        &mut buffers,
    )
}

/// Erode (`Min`) or dilate (`Max`) `input` into `output` along every
/// segment of `se`
///
/// Segments with zero half-length are skipped; if none is left the input
/// is copied unchanged.
///
/// # Errors
///
/// Returns `MorphError::Core` with `DimensionMismatch` if the images differ
/// in extent or `se` has a different number of axes, and
/// `MorphError::UnsupportedPixelDomain` if `config` forces the vector
/// histogram for an unbounded pixel type.
pub fn apply_along_decomposition<T: Pixel>(
    input: &Image<T>,
    output: &mut Image<T>,
    se: &StructuringElement,
    extremum: Extremum,
    config: &AnchorConfig<T>,
) -> MorphResult<()> {
    check_dimension(input, se)?;
    input.check_same_size(output)?;
    config.histogram.resolve::<T>()?;

    output.data_mut().copy_from_slice(input.data());
    filter_in_place(output, se.decomposition(), extremum, config)
}

fn morph<T: Pixel>(
    image: &Image<T>,
    se: &StructuringElement,
    extremum: Extremum,
    config: &AnchorConfig<T>,
) -> MorphResult<Image<T>> {
    check_dimension(image, se)?;
    let mut result = image.clone();
    filter_in_place(&mut result, se.decomposition(), extremum, config)?;
    Ok(result)
}

/// Erosion followed by dilation (`first == Min`), or the reverse
fn open_close<T: Pixel>(
    image: &Image<T>,
    se: &StructuringElement,
    first: Extremum,
    config: &AnchorConfig<T>,
) -> MorphResult<Image<T>> {
    check_dimension(image, se)?;
    let strategy = config.histogram.resolve::<T>()?;
    let mut result = image.clone();
    let plans = plan_segments(&image.region(), se.decomposition())?;
    let mut buffers = buffers_for(&plans);
    let boundary = config.boundary_for(first);

    if se.is_line() {
        run_plans(
            &mut result,
            plans.iter(),
            first,
            boundary,
            strategy,
            LinePass::OpenClose,
            &mut buffers,
        )?;
        return Ok(result);
    }

    // The second pass runs the segments in reverse so it is the adjoint of
    // the first.
    let second = first.opposite();
    run_plans(
        &mut result,
        plans.iter(),
        first,
        boundary,
        strategy,
        LinePass::ErodeDilate,
        &mut buffers,
    )?;
    run_plans(
        &mut result,
        plans.iter().rev(),
        second,
        config.second_pass().boundary_for(second),
        strategy,
        LinePass::ErodeDilate,
        &mut buffers,
    )?;
    Ok(result)
}

/// Erode an image
///
/// Each output pixel is the minimum over the structuring element centered
/// on it, shrinking bright regions and expanding dark ones.
pub fn erode_gray<T: Pixel>(
    image: &Image<T>,
    se: &StructuringElement,
    config: &AnchorConfig<T>,
) -> MorphResult<Image<T>> {
    morph(image, se, Extremum::Min, config)
}

/// Dilate an image
///
/// Each output pixel is the maximum over the structuring element centered
/// on it, expanding bright regions and shrinking dark ones.
pub fn dilate_gray<T: Pixel>(
    image: &Image<T>,
    se: &StructuringElement,
    config: &AnchorConfig<T>,
) -> MorphResult<Image<T>> {
    morph(image, se, Extremum::Max, config)
}

/// Open an image (erosion followed by dilation)
///
/// Opening removes bright features the element does not fit into.
pub fn open_gray<T: Pixel>(
    image: &Image<T>,
    se: &StructuringElement,
    config: &AnchorConfig<T>,
) -> MorphResult<Image<T>> {
    open_close(image, se, Extremum::Min, config)
}

/// Close an image (dilation followed by erosion)
///
/// Closing fills dark features the element does not fit into.
pub fn close_gray<T: Pixel>(
    image: &Image<T>,
    se: &StructuringElement,
    config: &AnchorConfig<T>,
) -> MorphResult<Image<T>> {
    open_close(image, se, Extremum::Max, config)
}

/// Morphological gradient (dilation - erosion)
pub fn gradient_gray<T: Pixel>(
    image: &Image<T>,
    se: &StructuringElement,
    config: &AnchorConfig<T>,
) -> MorphResult<Image<T>> {
    let dilated = dilate_gray(image, se, config)?;
    let eroded = erode_gray(image, se, config)?;
    Ok(dilated.zip_map(&eroded, Pixel::difference)?)
}

/// White top-hat (original - opening)
///
/// Extracts bright features smaller than the structuring element.
pub fn top_hat_gray<T: Pixel>(
    image: &Image<T>,
    se: &StructuringElement,
    config: &AnchorConfig<T>,
) -> MorphResult<Image<T>> {
    let opened = open_gray(image, se, config)?;
    Ok(image.zip_map(&opened, Pixel::difference)?)
}

/// Black top-hat (closing - original)
///
/// Extracts dark features smaller than the structuring element.
pub fn bottom_hat_gray<T: Pixel>(
    image: &Image<T>,
    se: &StructuringElement,
    config: &AnchorConfig<T>,
) -> MorphResult<Image<T>> {
    let closed = close_gray(image, se, config)?;
    Ok(closed.zip_map(image, Pixel::difference)?)
}
