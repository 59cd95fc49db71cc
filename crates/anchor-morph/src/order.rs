//! Extremum ordering
//!
//! Erosion and dilation run the same code and differ only in which end of
//! the pixel order they keep. [`Extremum`] carries that choice.

use anchor_core::Pixel;

/// Which extreme a morphological pass keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extremum {
    /// Keep the smallest value (erosion)
    Min,
    /// Keep the largest value (dilation)
    Max,
}

impl Extremum {
    /// `true` when `a` is strictly more extreme than `b`
    #[inline]
    pub fn prefers<T: Pixel>(self, a: T, b: T) -> bool {
        match self {
            Extremum::Min => a.total_cmp(&b).is_lt(),
            Extremum::Max => a.total_cmp(&b).is_gt(),
        }
    }

    /// `true` when `a` is at least as extreme as `b`
    #[inline]
    pub fn prefers_or_equal<T: Pixel>(self, a: T, b: T) -> bool {
        !self.prefers(b, a)
    }

    /// The value that never wins: `T::MAX` for `Min`, `T::MIN` for `Max`
    #[inline]
    pub fn identity<T: Pixel>(self) -> T {
        match self {
            Extremum::Min => T::MAX,
            Extremum::Max => T::MIN,
        }
    }

    /// The other ordering
    #[inline]
    pub fn opposite(self) -> Extremum {
        match self {
            Extremum::Min => Extremum::Max,
            Extremum::Max => Extremum::Min,
        }
    }

    /// Extreme of a non-empty slice under this ordering
    pub fn select<T: Pixel>(self, values: &[T]) -> Option<T> {
        let (&first, rest) = values.split_first()?;
        Some(
            rest.iter()
                .fold(first, |acc, &v| if self.prefers(v, acc) { v } else { acc }),
        )
    }
}
