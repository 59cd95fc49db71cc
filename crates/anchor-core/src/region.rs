//! Region - N-dimensional box of indices
//!
//! A `Region` is a start index plus an extent per axis. Images, faces and
//! kernel masks are all described by regions.

use crate::error::{Error, Result};

/// An axis-aligned box of indices
///
/// Axis 0 varies fastest when iterating, matching the image memory layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Region {
    start: Vec<isize>,
    size: Vec<usize>,
}

impl Region {
    /// Create a new region
    ///
    /// # Errors
    ///
    /// Returns an error if `start` and `size` have different lengths or are
    /// empty.
    pub fn new(start: Vec<isize>, size: Vec<usize>) -> Result<Self> {
        if start.is_empty() || start.len() != size.len() {
            return Err(Error::InvalidParameter(format!(
                "region start has {} axes but size has {}",
                start.len(),
                size.len()
            )));
        }
        Ok(Self { start, size })
    }

    /// Create a region starting at the origin
    pub fn from_size(size: &[usize]) -> Self {
        Self {
            start: vec![0; size.len()],
            size: size.to_vec(),
        }
    }

    /// Number of axes
    #[inline]
    pub fn dimension(&self) -> usize {
        self.size.len()
    }

    /// Start index
    #[inline]
    pub fn start(&self) -> &[isize] {
        &self.start
    }

    /// Extent per axis
    #[inline]
    pub fn size(&self) -> &[usize] {
        &self.size
    }

    /// Exclusive end coordinate along `axis`
    #[inline]
    pub fn end(&self, axis: usize) -> isize {
        self.start[axis] + self.size[axis] as isize
    }

    /// Last valid coordinate along `axis`
    #[inline]
    pub fn last(&self, axis: usize) -> isize {
        self.end(axis) - 1
    }

    /// Total number of indices
    pub fn num_pixels(&self) -> usize {
        self.size.iter().product()
    }

    /// Check if the region holds no index
    pub fn is_empty(&self) -> bool {
        self.size.iter().any(|&s| s == 0)
    }

    /// Check if an index lies inside the region
    #[inline]
    pub fn contains(&self, index: &[isize]) -> bool {
        index.len() == self.dimension()
            && index
                .iter()
                .enumerate()
                .all(|(axis, &i)| i >= self.start[axis] && i < self.end(axis))
    }

    /// Check if this region contains another region
    pub fn contains_region(&self, other: &Region) -> bool {
        other.dimension() == self.dimension()
            && (0..self.dimension())
                .all(|axis| other.start[axis] >= self.start[axis] && other.end(axis) <= self.end(axis))
    }

    /// Compute the intersection of two regions
    pub fn intersect(&self, other: &Region) -> Option<Region> {
        if other.dimension() != self.dimension() {
            return None;
        }
        let mut start = Vec::with_capacity(self.dimension());
        let mut size = Vec::with_capacity(self.dimension());
        for axis in 0..self.dimension() {
            let lo = self.start[axis].max(other.start[axis]);
            let hi = self.end(axis).min(other.end(axis));
            if hi <= lo {
                return None;
            }
            start.push(lo);
            size.push((hi - lo) as usize);
        }
        Some(Region { start, size })
    }

    /// Replace the extent along one axis
    pub fn with_axis(&self, axis: usize, start: isize, size: usize) -> Region {
        let mut region = self.clone();
        region.start[axis] = start;
        region.size[axis] = size;
        region
    }

    /// Iterate over all indices, axis 0 fastest
    pub fn indices(&self) -> RegionIndices<'_> {
        RegionIndices {
            region: self,
            next: if self.is_empty() {
                None
            } else {
                Some(self.start.clone())
            },
        }
    }
}

/// Iterator over the indices of a [`Region`]
pub struct RegionIndices<'a> {
    region: &'a Region,
    next: Option<Vec<isize>>,
}

impl Iterator for RegionIndices<'_> {
    type Item = Vec<isize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let mut following = current.clone();
        for axis in 0..self.region.dimension() {
            following[axis] += 1;
            if following[axis] < self.region.end(axis) {
                self.next = Some(following);
                return Some(current);
            }
            following[axis] = self.region.start[axis];
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_basic() {
        let r = Region::new(vec![1, -2], vec![3, 4]).unwrap();
        assert_eq!(r.dimension(), 2);
        assert_eq!(r.end(0), 4);
        assert_eq!(r.last(1), 1);
        assert_eq!(r.num_pixels(), 12);
        assert!(r.contains(&[1, -2]));
        assert!(r.contains(&[3, 1]));
        assert!(!r.contains(&[4, 0]));
        assert!(!r.contains(&[1]));
    }

    #[test]
    fn test_region_invalid() {
        assert!(Region::new(vec![], vec![]).is_err());
        assert!(Region::new(vec![0, 0], vec![1]).is_err());
    }

    #[test]
    fn test_region_intersect() {
        let a = Region::from_size(&[10, 10]);
        let b = Region::new(vec![5, -3], vec![10, 5]).unwrap();
        let c = a.intersect(&b).unwrap();
        assert_eq!(c.start(), &[5, 0]);
        assert_eq!(c.size(), &[5, 2]);
        assert!(a.contains_region(&c));

        let far = Region::new(vec![20, 20], vec![2, 2]).unwrap();
        assert!(a.intersect(&far).is_none());
    }

    #[test]
    fn test_region_indices_order() {
        let r = Region::new(vec![0, 5], vec![2, 2]).unwrap();
        let all: Vec<Vec<isize>> = r.indices().collect();
        assert_eq!(all, vec![vec![0, 5], vec![1, 5], vec![0, 6], vec![1, 6]]);
    }

    #[test]
    fn test_empty_region_has_no_indices() {
        let r = Region::from_size(&[3, 0, 2]);
        assert!(r.is_empty());
        assert_eq!(r.indices().count(), 0);
    }
}
