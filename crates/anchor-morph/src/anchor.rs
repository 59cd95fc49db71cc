//! Anchor line scanner
//!
//! 1-D erosion and dilation along a line of any length in amortized
//! near-constant time per pixel.
//!
//! # Algorithm
//!
//! The scanner keeps the current window extreme and the position where it
//! last occurred (the anchor). While the anchor stays inside the window, an
//! incoming value either replaces it or leaves the extreme unchanged, with
//! no bookkeeping at all. Only when the anchor slides out of the window is
//! a histogram of the window built, and it is slid along until an incoming
//! value becomes the next anchor.
//!
//! A line is processed in three phases that share one line state: the
//! start phase scans the first window, the steady phase slides over
//! real pixels, and the finish phase slides the window out past the end of
//! the line, feeding boundary values.

use anchor_core::Pixel;

use crate::histogram::{Histogram, HistogramStrategy, SlidingHistogram};
use crate::order::Extremum;
use crate::MorphResult;

/// 1-D windowed extreme filter
#[derive(Debug, Clone)]
pub struct AnchorLine<T: Pixel> {
    half_length: usize,
    extremum: Extremum,
    boundary: T,
    strategy: HistogramStrategy,
    histogram: Histogram<T>,
    /// Histogram for the second half of an open/close, built on first use
    reverse: Option<Histogram<T>>,
}

impl<T: Pixel> AnchorLine<T> {
    /// Create a scanner with window `2 * half_length + 1`
    ///
    /// # Errors
    ///
    /// Returns `MorphError::UnsupportedPixelDomain` if the vector strategy
    /// is forced for a type with no bounded level range.
    pub fn new(
        half_length: usize,
        extremum: Extremum,
        boundary: T,
        strategy: HistogramStrategy,
    ) -> MorphResult<Self> {
        Ok(Self {
            half_length,
            extremum,
            boundary,
            strategy,
            histogram: Histogram::new(strategy, extremum, boundary)?,
            reverse: None,
        })
    }

    /// Pixels on each side of the window center
    #[inline]
    pub fn half_length(&self) -> usize {
        self.half_length
    }

    /// Ordering kept by the scanner
    #[inline]
    pub fn extremum(&self) -> Extremum {
        self.extremum
    }

    /// Padding value past both ends of a line
    #[inline]
    pub fn boundary(&self) -> T {
        self.boundary
    }

    /// Erode (`Min`) or dilate (`Max`) one line
    ///
    /// `output[i]` becomes the extreme of `input[i - h ..= i + h]`, with
    /// positions outside `input` reading the boundary value.
    ///
    /// # Panics
    ///
    /// Panics if `input` and `output` differ in length.
    pub fn erode_dilate(&mut self, input: &[T], output: &mut [T]) {
        let pass = Pass {
            half_length: self.half_length,
            extremum: self.extremum,
            boundary: self.boundary,
            input,
        };
        pass.run(&mut self.histogram, output);
    }

    /// Open (`Min`) or close (`Max`) one line in place
    ///
    /// Runs the scanner's ordering from `buffer` into `scratch`, then the
    /// opposite ordering, padded with its own identity, back into `buffer`.
    ///
    /// # Errors
    ///
    /// Returns `MorphError::UnsupportedPixelDomain` if the histogram for the
    /// opposite ordering cannot be built.
    ///
    /// # Panics
    ///
    /// Panics if `scratch` is shorter than `buffer`.
    pub fn open_close(&mut self, buffer: &mut [T], scratch: &mut [T]) -> MorphResult<()> {
        let opposite = self.extremum.opposite();
        let mut reverse = match self.reverse.take() {
            Some(reverse) => reverse,
            None => Histogram::new(self.strategy, opposite, opposite.identity())?,
        };

        let n = buffer.len();
        let scratch = &mut scratch[..n];
        self.erode_dilate(buffer, scratch);

        let pass = Pass {
            half_length: self.half_length,
            extremum: opposite,
            boundary: opposite.identity(),
            input: scratch,
        };
        pass.run(&mut reverse, buffer);
        self.reverse = Some(reverse);
        Ok(())
    }
}

/// Progress through one line
///
/// Moves by value from the start phase through the steady phase to the
/// finish phase; dropped when the line is done.
#[derive(Debug)]
struct LineState<'h, T: Pixel> {
    /// Extreme of the current window
    extreme: T,
    /// Last position of `extreme`, in line coordinates (padding is negative
    /// or past the end)
    anchor: isize,
    /// Set while the histogram mirrors the window
    tracking: bool,
    histogram: &'h mut Histogram<T>,
}

/// One scan of one line
struct Pass<'a, T: Pixel> {
    half_length: usize,
    extremum: Extremum,
    boundary: T,
    input: &'a [T],
}

impl<T: Pixel> Pass<'_, T> {
    fn run(&self, histogram: &mut Histogram<T>, output: &mut [T]) {
        let n = self.input.len();
        assert_eq!(n, output.len(), "line input and output lengths differ");
        if n == 0 {
            return;
        }
        if self.half_length == 0 {
            output.copy_from_slice(self.input);
            return;
        }
        if n <= self.half_length + 1 {
            // every window spans the whole line plus padding
            let extreme = self
                .input
                .iter()
                .fold(self.boundary, |acc, &v| {
                    if self.extremum.prefers(v, acc) { v } else { acc }
                });
            output.fill(extreme);
            return;
        }

        let state = self.start(histogram, output);
        let state = self.steady(state, output);
        self.finish(state, output);
    }

    #[inline]
    fn value_at(&self, pos: isize) -> T {
        if pos >= 0 && (pos as usize) < self.input.len() {
            self.input[pos as usize]
        } else {
            self.boundary
        }
    }

    #[inline]
    fn add_at(&self, histogram: &mut Histogram<T>, pos: isize) {
        if pos >= 0 && (pos as usize) < self.input.len() {
            histogram.add(self.input[pos as usize]);
        } else {
            histogram.add_boundary();
        }
    }

    #[inline]
    fn remove_at(&self, histogram: &mut Histogram<T>, pos: isize) {
        if pos >= 0 && (pos as usize) < self.input.len() {
            histogram.remove(self.input[pos as usize]);
        } else {
            histogram.remove_boundary();
        }
    }

    /// Scan the first window and emit `output[0]`
    fn start<'h>(&self, histogram: &'h mut Histogram<T>, output: &mut [T]) -> LineState<'h, T> {
        let mut extreme = self.boundary;
        let mut anchor = -1isize;
        for (pos, &v) in self.input[..=self.half_length].iter().enumerate() {
            if self.extremum.prefers_or_equal(v, extreme) {
                extreme = v;
                anchor = pos as isize;
            }
        }
        output[0] = extreme;
        LineState {
            extreme,
            anchor,
            tracking: false,
            histogram,
        }
    }

    /// Slide while the incoming pixel is inside the line
    fn steady<'h>(&self, mut state: LineState<'h, T>, output: &mut [T]) -> LineState<'h, T> {
        let last = self.input.len() - self.half_length;
        for i in 1..last {
            self.slide(&mut state, i as isize);
            output[i] = state.extreme;
        }
        state
    }

    /// Slide the window out past the end of the line
    fn finish(&self, mut state: LineState<'_, T>, output: &mut [T]) {
        let first = self.input.len() - self.half_length;
        for i in first..self.input.len() {
            self.slide(&mut state, i as isize);
            output[i] = state.extreme;
        }
    }

    /// Move the window from `i - 1` to `i`
    #[inline]
    fn slide(&self, state: &mut LineState<'_, T>, i: isize) {
        let h = self.half_length as isize;
        let incoming_pos = i + h;
        let incoming = self.value_at(incoming_pos);

        if state.tracking {
            self.remove_at(state.histogram, i - h - 1);
            self.add_at(state.histogram, incoming_pos);
        }

        if self.extremum.prefers_or_equal(incoming, state.extreme) {
            state.extreme = incoming;
            state.anchor = incoming_pos;
            state.tracking = false;
        } else if state.anchor >= i - h {
            // anchor still inside the window
        } else {
            if !state.tracking {
                state.histogram.init();
                for pos in i - h..=i + h {
                    self.add_at(state.histogram, pos);
                }
                state.tracking = true;
            }
            state.extreme = state.histogram.extreme();
        }
    }
}
