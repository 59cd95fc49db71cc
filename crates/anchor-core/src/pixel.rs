//! Pixel value trait
//!
//! Morphology only needs a scalar with a total order. Everything the
//! algorithms know about a pixel type goes through [`Pixel`]: its order,
//! its extremes, and whether its value range is small enough to be
//! indexed directly.

use std::cmp::Ordering;
use std::fmt::Debug;

/// A scalar pixel type with a total order.
///
/// `LEVELS` is `Some(n)` only for types whose whole value range fits a
/// small direct-indexed table (byte-width integers and `bool`). For those
/// types `level` maps a value to `0..n` preserving order and `from_level`
/// is its inverse. The default implementations are never called for types
/// with `LEVELS == None`.
pub trait Pixel: Copy + PartialEq + Default + Debug + Send + Sync + 'static {
    /// Smallest value in the total order
    const MIN: Self;
    /// Largest value in the total order
    const MAX: Self;
    /// Number of distinct values, when small enough to index directly
    const LEVELS: Option<usize> = None;
    /// Type name used in diagnostics
    const NAME: &'static str;

    /// Total order on pixel values.
    ///
    /// Floating-point types use IEEE 754 `totalOrder`.
    fn total_cmp(&self, other: &Self) -> Ordering;

    /// Order-reversing involution (`invert(invert(v)) == v`).
    fn invert(self) -> Self;

    /// `self - lower`, for `self >= lower`, saturating where the
    /// difference does not fit the type.
    fn difference(self, lower: Self) -> Self;

    /// Direct-index level of this value.
    #[inline]
    fn level(self) -> usize {
        0
    }

    /// Value at a direct-index level.
    #[inline]
    fn from_level(_level: usize) -> Self {
        Self::MIN
    }
}

macro_rules! impl_unsigned_pixel {
    ($($t:ty),*) => {$(
        impl Pixel for $t {
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const NAME: &'static str = stringify!($t);

            #[inline]
            fn total_cmp(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }

            #[inline]
            fn invert(self) -> Self {
                <$t>::MAX - self
            }

            #[inline]
            fn difference(self, lower: Self) -> Self {
                self.saturating_sub(lower)
            }
        }
    )*};
}

macro_rules! impl_signed_pixel {
    ($($t:ty),*) => {$(
        impl Pixel for $t {
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const NAME: &'static str = stringify!($t);

            #[inline]
            fn total_cmp(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }

            // !v == -v - 1 maps MIN <-> MAX
            #[inline]
            fn invert(self) -> Self {
                !self
            }

            #[inline]
            fn difference(self, lower: Self) -> Self {
                self.saturating_sub(lower)
            }
        }
    )*};
}

macro_rules! impl_float_pixel {
    ($($t:ty),*) => {$(
        impl Pixel for $t {
            const MIN: Self = <$t>::NEG_INFINITY;
            const MAX: Self = <$t>::INFINITY;
            const NAME: &'static str = stringify!($t);

            #[inline]
            fn total_cmp(&self, other: &Self) -> Ordering {
                <$t>::total_cmp(self, other)
            }

            #[inline]
            fn invert(self) -> Self {
                -self
            }

            #[inline]
            fn difference(self, lower: Self) -> Self {
                self - lower
            }
        }
    )*};
}

impl_unsigned_pixel!(u16, u32, u64);
impl_signed_pixel!(i16, i32, i64);
impl_float_pixel!(f32, f64);

impl Pixel for u8 {
    const MIN: Self = u8::MIN;
    const MAX: Self = u8::MAX;
    const LEVELS: Option<usize> = Some(256);
    const NAME: &'static str = "u8";

    #[inline]
    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    #[inline]
    fn invert(self) -> Self {
        u8::MAX - self
    }

    #[inline]
    fn difference(self, lower: Self) -> Self {
        self.saturating_sub(lower)
    }

    #[inline]
    fn level(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_level(level: usize) -> Self {
        level as u8
    }
}

impl Pixel for i8 {
    const MIN: Self = i8::MIN;
    const MAX: Self = i8::MAX;
    const LEVELS: Option<usize> = Some(256);
    const NAME: &'static str = "i8";

    #[inline]
    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    #[inline]
    fn invert(self) -> Self {
        !self
    }

    #[inline]
    fn difference(self, lower: Self) -> Self {
        self.saturating_sub(lower)
    }

    #[inline]
    fn level(self) -> usize {
        (self as i16 - i8::MIN as i16) as usize
    }

    #[inline]
    fn from_level(level: usize) -> Self {
        (level as i16 + i8::MIN as i16) as i8
    }
}

impl Pixel for bool {
    const MIN: Self = false;
    const MAX: Self = true;
    const LEVELS: Option<usize> = Some(2);
    const NAME: &'static str = "bool";

    #[inline]
    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    #[inline]
    fn invert(self) -> Self {
        !self
    }

    #[inline]
    fn difference(self, lower: Self) -> Self {
        self && !lower
    }

    #[inline]
    fn level(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_level(level: usize) -> Self {
        level != 0
    }
}
