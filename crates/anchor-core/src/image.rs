//! Image - N-dimensional pixel container
//!
//! `Image<T>` is a dense array of [`Pixel`] values with any number of axes.
//!
//! # Memory Layout
//!
//! Axis 0 varies fastest. The pixel at index `(i0, i1, ..)` lives at
//! `i0 * stride[0] + i1 * stride[1] + ..` with `stride[0] == 1`.
//!
//! # Examples
//!
//! ```
//! use anchor_core::Image;
//!
//! let mut image = Image::<u8>::new(&[64, 48]).unwrap();
//! image.set(&[10, 20], 200).unwrap();
//! assert_eq!(image.get(&[10, 20]), Some(200));
//! assert_eq!(image.get(&[64, 0]), None);
//! ```

use crate::error::{Error, Result};
use crate::pixel::Pixel;
use crate::region::Region;

/// N-dimensional image
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T: Pixel> {
    /// Extent per axis
    size: Vec<usize>,
    /// Linear distance between neighbours along each axis
    strides: Vec<usize>,
    /// Pixel data, axis 0 fastest
    data: Vec<T>,
}

fn validate_size(size: &[usize]) -> Result<()> {
    if size.is_empty() || size.contains(&0) {
        return Err(Error::InvalidDimension(size.to_vec()));
    }
    Ok(())
}

fn strides_for(size: &[usize]) -> Vec<usize> {
    let mut strides = Vec::with_capacity(size.len());
    let mut acc = 1usize;
    for &s in size {
        strides.push(acc);
        acc *= s;
    }
    strides
}

impl<T: Pixel> Image<T> {
    /// Create a new image with all pixels set to `T::default()`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if `size` is empty or any axis is 0.
    pub fn new(size: &[usize]) -> Result<Self> {
        Self::new_with_value(size, T::default())
    }

    /// Create a new image with all pixels set to `value`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if `size` is empty or any axis is 0.
    pub fn new_with_value(size: &[usize], value: T) -> Result<Self> {
        validate_size(size)?;
        let count = size.iter().product();
        Ok(Image {
            size: size.to_vec(),
            strides: strides_for(size),
            data: vec![value; count],
        })
    }

    /// Create an image from raw data laid out axis 0 fastest
    ///
    /// # Errors
    ///
    /// Returns an error if the extent is invalid or the data length doesn't
    /// match it.
    pub fn from_data(size: &[usize], data: Vec<T>) -> Result<Self> {
        validate_size(size)?;
        let expected: usize = size.iter().product();
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {:?} = {}",
                data.len(),
                size,
                expected
            )));
        }
        Ok(Image {
            size: size.to_vec(),
            strides: strides_for(size),
            data,
        })
    }

    /// Number of axes
    #[inline]
    pub fn dimension(&self) -> usize {
        self.size.len()
    }

    /// Extent per axis
    #[inline]
    pub fn size(&self) -> &[usize] {
        &self.size
    }

    /// Linear strides per axis
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// The full index domain
    pub fn region(&self) -> Region {
        Region::from_size(&self.size)
    }

    /// Total number of pixels
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: images have at least one pixel
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw pixel data
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw pixel data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Linear position of an index, or `None` if it lies outside the image
    #[inline]
    pub fn linear_index(&self, index: &[isize]) -> Option<usize> {
        if index.len() != self.size.len() {
            return None;
        }
        let mut pos = 0usize;
        for ((&i, &s), &stride) in index.iter().zip(&self.size).zip(&self.strides) {
            if i < 0 || i as usize >= s {
                return None;
            }
            pos += i as usize * stride;
        }
        Some(pos)
    }

    /// Linear distance covered by an index offset
    ///
    /// Only meaningful when both ends of the offset are inside the image.
    #[inline]
    pub fn linear_offset(&self, offset: &[isize]) -> isize {
        offset
            .iter()
            .zip(&self.strides)
            .map(|(&o, &stride)| o * stride as isize)
            .sum()
    }

    /// Get the pixel at `index`, or `None` outside the image
    #[inline]
    pub fn get(&self, index: &[isize]) -> Option<T> {
        self.linear_index(index).map(|pos| self.data[pos])
    }

    /// Set the pixel at `index`
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if `index` lies outside the image.
    pub fn set(&mut self, index: &[isize], value: T) -> Result<()> {
        let pos = self
            .linear_index(index)
            .ok_or_else(|| Error::IndexOutOfBounds {
                index: index.to_vec(),
                size: self.size.clone(),
            })?;
        self.data[pos] = value;
        Ok(())
    }

    /// Set every pixel to `value`
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Apply a function to every pixel, producing a new image
    pub fn map<U: Pixel>(&self, f: impl Fn(T) -> U) -> Image<U> {
        Image {
            size: self.size.clone(),
            strides: self.strides.clone(),
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two images of equal extent pixel by pixel
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the extents differ.
    pub fn zip_map(&self, other: &Image<T>, f: impl Fn(T, T) -> T) -> Result<Image<T>> {
        self.check_same_size(other)?;
        Ok(Image {
            size: self.size.clone(),
            strides: self.strides.clone(),
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Order-reversed image (`Pixel::invert` applied to every pixel)
    pub fn invert(&self) -> Image<T> {
        self.map(Pixel::invert)
    }

    /// Check if two images have the same extent and identical pixels
    pub fn equals(&self, other: &Image<T>) -> bool {
        self.size == other.size
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.total_cmp(b).is_eq())
    }

    /// Smallest and largest pixel values
    pub fn min_max(&self) -> (T, T) {
        let mut lo = self.data[0];
        let mut hi = self.data[0];
        for v in &self.data[1..] {
            if v.total_cmp(&lo).is_lt() {
                lo = *v;
            }
            if v.total_cmp(&hi).is_gt() {
                hi = *v;
            }
        }
        (lo, hi)
    }

    /// Fail unless `other` has the same extent
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the extents differ.
    pub fn check_same_size<U: Pixel>(&self, other: &Image<U>) -> Result<()> {
        if self.size != other.size {
            return Err(Error::DimensionMismatch {
                expected: self.size.clone(),
                actual: other.size.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_creation() {
        let image = Image::<u16>::new(&[4, 3, 2]).unwrap();
        assert_eq!(image.dimension(), 3);
        assert_eq!(image.len(), 24);
        assert_eq!(image.strides(), &[1, 4, 12]);
        assert!(image.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_image_invalid_size() {
        assert!(Image::<u8>::new(&[]).is_err());
        assert!(Image::<u8>::new(&[5, 0]).is_err());
        assert!(Image::<u8>::from_data(&[2, 2], vec![0; 3]).is_err());
    }

    #[test]
    fn test_get_set() {
        let mut image = Image::<f32>::new_with_value(&[5, 5], 1.0).unwrap();
        image.set(&[2, 3], 7.5).unwrap();
        assert_eq!(image.get(&[2, 3]), Some(7.5));
        assert_eq!(image.data()[3 * 5 + 2], 7.5);
        assert_eq!(image.get(&[-1, 0]), None);
        assert!(image.set(&[5, 0], 0.0).is_err());
    }

    #[test]
    fn test_linear_offset() {
        let image = Image::<u8>::new(&[10, 20, 30]).unwrap();
        assert_eq!(image.linear_offset(&[1, -1, 2]), 1 - 10 + 400);
        let a = image.linear_index(&[3, 4, 5]).unwrap() as isize;
        let b = image.linear_index(&[4, 3, 7]).unwrap() as isize;
        assert_eq!(b - a, image.linear_offset(&[1, -1, 2]));
    }

    #[test]
    fn test_invert_and_equals() {
        let image = Image::from_data(&[3], vec![0u8, 100, 255]).unwrap();
        let inv = image.invert();
        assert_eq!(inv.data(), &[255, 155, 0]);
        assert!(inv.invert().equals(&image));
        assert!(!inv.equals(&image));
    }

    #[test]
    fn test_min_max_and_zip() {
        let a = Image::from_data(&[2, 2], vec![3i32, -4, 9, 0]).unwrap();
        assert_eq!(a.min_max(), (-4, 9));
        let b = Image::from_data(&[2, 2], vec![1i32, 1, 1, 1]).unwrap();
        let c = a.zip_map(&b, |x, y| x - y).unwrap();
        assert_eq!(c.data(), &[2, -5, 8, -1]);

        let d = Image::<i32>::new(&[4]).unwrap();
        assert!(a.zip_map(&d, |x, _| x).is_err());
    }
}
