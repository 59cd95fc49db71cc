//! Sliding-window extreme histograms
//!
//! The anchor scanner falls back to a histogram when its anchor leaves the
//! window. Two strategies implement the same [`SlidingHistogram`] contract:
//!
//! - [`VectorHistogram`] - one counter per level, for pixel types with a
//!   small bounded range (`Pixel::LEVELS`)
//! - [`MapHistogram`] - an ordered map from value to count, for any type
//!
//! Both report the boundary value when the window is empty, so they produce
//! identical results on the same stream of operations.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anchor_core::Pixel;

use crate::order::Extremum;
use crate::{MorphError, MorphResult};

/// Multiset of window values able to report its extreme
pub trait SlidingHistogram<T: Pixel> {
    /// Empty the window
    fn init(&mut self);

    /// Add a value entering the window
    fn add(&mut self, value: T);

    /// Remove a value leaving the window
    ///
    /// The value must have been added before.
    fn remove(&mut self, value: T);

    /// Add a padding pixel
    fn add_boundary(&mut self);

    /// Remove a padding pixel
    fn remove_boundary(&mut self);

    /// Most extreme value in the window, or the boundary value if empty
    fn extreme(&mut self) -> T;

    /// Number of pixels in the window
    fn len(&self) -> usize;

    /// Check if the window holds no pixel
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Direct-indexed histogram for bounded pixel types
#[derive(Debug, Clone)]
pub struct VectorHistogram<T: Pixel> {
    counts: Vec<usize>,
    extremum: Extremum,
    boundary: T,
    /// Level of the current extreme
    current: usize,
    live: usize,
}

impl<T: Pixel> VectorHistogram<T> {
    /// Create an empty histogram
    ///
    /// # Errors
    ///
    /// Returns `MorphError::UnsupportedPixelDomain` if `T` has no bounded
    /// level range.
    pub fn new(extremum: Extremum, boundary: T) -> MorphResult<Self> {
        let levels = T::LEVELS.ok_or(MorphError::UnsupportedPixelDomain { pixel: T::NAME })?;
        let mut histogram = Self {
            counts: vec![0; levels],
            extremum,
            boundary,
            current: 0,
            live: 0,
        };
        histogram.current = histogram.far_end();
        Ok(histogram)
    }

    /// The least extreme level, where walks stop
    #[inline]
    fn far_end(&self) -> usize {
        match self.extremum {
            Extremum::Max => 0,
            Extremum::Min => self.counts.len() - 1,
        }
    }

    #[inline]
    fn more_extreme(&self, a: usize, b: usize) -> bool {
        match self.extremum {
            Extremum::Max => a > b,
            Extremum::Min => a < b,
        }
    }

    /// Move the tracked level away from the extreme to the next live one
    fn walk(&mut self) {
        let far = self.far_end();
        while self.counts[self.current] == 0 && self.current != far {
            match self.extremum {
                Extremum::Max => self.current -= 1,
                Extremum::Min => self.current += 1,
            }
        }
    }
}

impl<T: Pixel> SlidingHistogram<T> for VectorHistogram<T> {
    fn init(&mut self) {
        self.counts.fill(0);
        self.live = 0;
        self.current = self.far_end();
    }

    #[inline]
    fn add(&mut self, value: T) {
        let level = value.level();
        self.counts[level] += 1;
        if self.live == 0 || self.more_extreme(level, self.current) {
            self.current = level;
        }
        self.live += 1;
    }

    #[inline]
    fn remove(&mut self, value: T) {
        let level = value.level();
        debug_assert!(self.counts[level] > 0, "removing {:?} not in window", value);
        self.counts[level] = self.counts[level].saturating_sub(1);
        self.live = self.live.saturating_sub(1);
        if self.live > 0 && level == self.current && self.counts[level] == 0 {
            self.walk();
        }
    }

    fn add_boundary(&mut self) {
        self.add(self.boundary);
    }

    fn remove_boundary(&mut self) {
        self.remove(self.boundary);
    }

    fn extreme(&mut self) -> T {
        if self.live == 0 {
            self.boundary
        } else {
            T::from_level(self.current)
        }
    }

    fn len(&self) -> usize {
        self.live
    }
}

/// Pixel value ordered by `Pixel::total_cmp`, usable as a map key
#[derive(Debug, Clone, Copy)]
pub struct Key<T: Pixel>(pub T);

impl<T: Pixel> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl<T: Pixel> Eq for Key<T> {}

impl<T: Pixel> PartialOrd for Key<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Pixel> Ord for Key<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Ordered-map histogram for any pixel type
///
/// Removing a value only decrements its count. Entries whose count reached
/// zero are popped from the extreme end when [`SlidingHistogram::extreme`]
/// would otherwise report them; dead entries elsewhere stay until then.
#[derive(Debug, Clone)]
pub struct MapHistogram<T: Pixel> {
    counts: BTreeMap<Key<T>, usize>,
    extremum: Extremum,
    boundary: T,
    live: usize,
}

impl<T: Pixel> MapHistogram<T> {
    /// Create an empty histogram
    pub fn new(extremum: Extremum, boundary: T) -> Self {
        Self {
            counts: BTreeMap::new(),
            extremum,
            boundary,
            live: 0,
        }
    }

    /// Number of entries held, dead ones included
    pub fn entries(&self) -> usize {
        self.counts.len()
    }
}

impl<T: Pixel> SlidingHistogram<T> for MapHistogram<T> {
    fn init(&mut self) {
        self.counts.clear();
        self.live = 0;
    }

    #[inline]
    fn add(&mut self, value: T) {
        *self.counts.entry(Key(value)).or_insert(0) += 1;
        self.live += 1;
    }

    #[inline]
    fn remove(&mut self, value: T) {
        match self.counts.get_mut(&Key(value)) {
            Some(count) if *count > 0 => {
                *count -= 1;
                self.live = self.live.saturating_sub(1);
            }
            _ => debug_assert!(false, "removing {:?} not in window", value),
        }
    }

    fn add_boundary(&mut self) {
        self.add(self.boundary);
    }

    fn remove_boundary(&mut self) {
        self.remove(self.boundary);
    }

    fn extreme(&mut self) -> T {
        if self.live == 0 {
            return self.boundary;
        }
        loop {
            let entry = match self.extremum {
                Extremum::Max => self.counts.last_key_value(),
                Extremum::Min => self.counts.first_key_value(),
            };
            match entry {
                Some((key, &count)) if count > 0 => return key.0,
                Some(_) => {
                    match self.extremum {
                        Extremum::Max => self.counts.pop_last(),
                        Extremum::Min => self.counts.pop_first(),
                    };
                }
                None => return self.boundary,
            }
        }
    }

    fn len(&self) -> usize {
        self.live
    }
}

/// Which histogram the anchor scanner uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistogramStrategy {
    /// Vector for bounded pixel types, map otherwise
    #[default]
    Auto,
    /// Always [`VectorHistogram`]
    Vector,
    /// Always [`MapHistogram`]
    Map,
}

impl HistogramStrategy {
    /// Concrete strategy for pixel type `T`
    ///
    /// # Errors
    ///
    /// Returns `MorphError::UnsupportedPixelDomain` if `Vector` is forced
    /// for a type with no bounded level range.
    pub fn resolve<T: Pixel>(self) -> MorphResult<HistogramStrategy> {
        match self {
            HistogramStrategy::Auto if T::LEVELS.is_some() => Ok(HistogramStrategy::Vector),
            HistogramStrategy::Auto => Ok(HistogramStrategy::Map),
            HistogramStrategy::Vector if T::LEVELS.is_none() => {
                Err(MorphError::UnsupportedPixelDomain { pixel: T::NAME })
            }
            other => Ok(other),
        }
    }
}

/// A histogram of either strategy
#[derive(Debug, Clone)]
pub enum Histogram<T: Pixel> {
    Vector(VectorHistogram<T>),
    Map(MapHistogram<T>),
}

impl<T: Pixel> Histogram<T> {
    /// Create an empty histogram of the given strategy
    ///
    /// # Errors
    ///
    /// Returns `MorphError::UnsupportedPixelDomain` if the vector strategy
    /// is requested for a type with no bounded level range.
    pub fn new(strategy: HistogramStrategy, extremum: Extremum, boundary: T) -> MorphResult<Self> {
        match strategy.resolve::<T>()? {
            HistogramStrategy::Vector => Ok(Histogram::Vector(VectorHistogram::new(
                extremum, boundary,
            )?)),
            _ => Ok(Histogram::Map(MapHistogram::new(extremum, boundary))),
        }
    }

    /// Strategy in use
    pub fn strategy(&self) -> HistogramStrategy {
        match self {
            Histogram::Vector(_) => HistogramStrategy::Vector,
            Histogram::Map(_) => HistogramStrategy::Map,
        }
    }
}

impl<T: Pixel> SlidingHistogram<T> for Histogram<T> {
    fn init(&mut self) {
        match self {
            Histogram::Vector(h) => h.init(),
            Histogram::Map(h) => h.init(),
        }
    }

    #[inline]
    fn add(&mut self, value: T) {
        match self {
            Histogram::Vector(h) => h.add(value),
            Histogram::Map(h) => h.add(value),
        }
    }

    #[inline]
    fn remove(&mut self, value: T) {
        match self {
            Histogram::Vector(h) => h.remove(value),
            Histogram::Map(h) => h.remove(value),
        }
    }

    fn add_boundary(&mut self) {
        match self {
            Histogram::Vector(h) => h.add_boundary(),
            Histogram::Map(h) => h.add_boundary(),
        }
    }

    fn remove_boundary(&mut self) {
        match self {
            Histogram::Vector(h) => h.remove_boundary(),
            Histogram::Map(h) => h.remove_boundary(),
        }
    }

    fn extreme(&mut self) -> T {
        match self {
            Histogram::Vector(h) => h.extreme(),
            Histogram::Map(h) => h.extreme(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Histogram::Vector(h) => h.len(),
            Histogram::Map(h) => h.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_vector_histogram_max() {
        let mut h = VectorHistogram::<u8>::new(Extremum::Max, 0).unwrap();
        assert_eq!(h.extreme(), 0);
        h.add(10);
        h.add(200);
        h.add(200);
        h.add(50);
        assert_eq!(h.extreme(), 200);
        h.remove(200);
        assert_eq!(h.extreme(), 200);
        h.remove(200);
        assert_eq!(h.extreme(), 50);
        h.remove(10);
        h.remove(50);
        assert!(h.is_empty());
        assert_eq!(h.extreme(), 0);
        h.add(3);
        assert_eq!(h.extreme(), 3);
    }

    #[test]
    fn test_vector_histogram_min_signed() {
        let mut h = VectorHistogram::<i8>::new(Extremum::Min, i8::MAX).unwrap();
        h.add(-5);
        h.add(-128);
        h.add(7);
        assert_eq!(h.extreme(), -128);
        h.remove(-128);
        assert_eq!(h.extreme(), -5);
        h.init();
        assert_eq!(h.len(), 0);
        assert_eq!(h.extreme(), i8::MAX);
    }

    #[test]
    fn test_vector_histogram_rejects_unbounded() {
        assert!(matches!(
            VectorHistogram::<f32>::new(Extremum::Min, 0.0),
            Err(MorphError::UnsupportedPixelDomain { pixel: "f32" })
        ));
        assert!(Histogram::<u16>::new(HistogramStrategy::Vector, Extremum::Max, 0).is_err());
    }

    #[test]
    fn test_boundary_counts_as_pixel() {
        let mut h = MapHistogram::<f64>::new(Extremum::Max, 9.5);
        h.add(1.0);
        h.add_boundary();
        assert_eq!(h.len(), 2);
        assert_eq!(h.extreme(), 9.5);
        h.remove_boundary();
        assert_eq!(h.extreme(), 1.0);
    }

    #[test]
    fn test_map_histogram_lazy_cleanup() {
        let mut h = MapHistogram::<i32>::new(Extremum::Min, i32::MAX);
        for v in [5, 1, 9, 3] {
            h.add(v);
        }
        h.remove(9);
        h.remove(1);
        // neither dead entry has been cleaned yet
        assert_eq!(h.entries(), 4);
        assert_eq!(h.extreme(), 3);
        // only the dead minimum was popped
        assert_eq!(h.entries(), 3);
    }

    #[test]
    fn test_strategy_resolve() {
        assert_eq!(
            HistogramStrategy::Auto.resolve::<u8>().unwrap(),
            HistogramStrategy::Vector
        );
        assert_eq!(
            HistogramStrategy::Auto.resolve::<f32>().unwrap(),
            HistogramStrategy::Map
        );
        assert_eq!(
            HistogramStrategy::Map.resolve::<bool>().unwrap(),
            HistogramStrategy::Map
        );
        assert!(HistogramStrategy::Vector.resolve::<i64>().is_err());
        let h = Histogram::<u8>::new(HistogramStrategy::Auto, Extremum::Min, 255).unwrap();
        assert_eq!(h.strategy(), HistogramStrategy::Vector);
    }

    #[test]
    fn test_strategies_agree() {
        let mut rng = StdRng::seed_from_u64(17);
        for extremum in [Extremum::Min, Extremum::Max] {
            let boundary = extremum.identity::<u8>();
            let mut vector = Histogram::new(HistogramStrategy::Vector, extremum, boundary).unwrap();
            let mut map = Histogram::new(HistogramStrategy::Map, extremum, boundary).unwrap();
            let mut window: Vec<u8> = Vec::new();

            for _ in 0..5000 {
                if window.is_empty() || rng.random_range(0..3) > 0 {
                    // a narrow range forces repeated values
                    let v: u8 = rng.random_range(100..140);
                    vector.add(v);
                    map.add(v);
                    window.push(v);
                } else {
                    let v = window.remove(rng.random_range(0..window.len()));
                    vector.remove(v);
                    map.remove(v);
                }
                if window.len() > 30 {
                    let v = window.remove(0);
                    vector.remove(v);
                    map.remove(v);
                }
                let expected = extremum.select(&window).unwrap_or(boundary);
                assert_eq!(vector.extreme(), expected);
                assert_eq!(map.extreme(), expected);
                assert_eq!(vector.len(), map.len());
            }

            vector.init();
            map.init();
            assert_eq!(vector.extreme(), map.extreme());
        }
    }
}
