//! anchor-test - Regression test framework for the anchor morphology library
//!
//! This crate provides a regression test framework, plus the reference
//! implementations and synthetic images the regression tests compare
//! against:
//!
//! - [`RegParams`] - Indexed comparisons with a success report
//! - [`brute_force_morph`] - Direct windowed extreme over a mask
//! - [`random_image`], [`single_point_image`] - Synthetic inputs
//! - [`render_mask`] - Text rendering of a kernel
//!
//! # Usage
//!
//! ```ignore
//! use anchor_test::RegParams;
//!
//! let mut rp = RegParams::new("graymorph");
//! rp.compare_images(&fast, &reference);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use anchor_core::{Image, Pixel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn build<T: Pixel>(size: &[usize], data: Vec<T>) -> TestResult<Image<T>> {
    Image::from_data(size, data).map_err(|source| TestError::ImageBuild {
        size: size.to_vec(),
        source,
    })
}

/// Reference flat morphology by direct evaluation
///
/// Each output pixel is the maximum (`take_max`) or minimum of the input
/// over the set pixels of `mask`, centered on it. Mask pixels falling
/// outside the image are ignored.
///
/// # Errors
///
/// Returns an error if the mask has a different number of axes or an even
/// extent.
pub fn brute_force_morph<T: Pixel>(
    image: &Image<T>,
    mask: &Image<bool>,
    take_max: bool,
) -> TestResult<Image<T>> {
    if mask.dimension() != image.dimension() {
        return Err(TestError::MaskDimension {
            mask: mask.dimension(),
            image: image.dimension(),
        });
    }
    if mask.size().iter().any(|s| s % 2 == 0) {
        return Err(TestError::MaskNotCentered(mask.size().to_vec()));
    }

    let center: Vec<isize> = mask.size().iter().map(|&s| (s / 2) as isize).collect();
    let offsets: Vec<Vec<isize>> = mask
        .region()
        .indices()
        .filter(|q| mask.get(q) == Some(true))
        .map(|q| q.iter().zip(&center).map(|(a, c)| a - c).collect())
        .collect();

    let mut data = Vec::with_capacity(image.len());
    let mut neighbor = vec![0isize; image.dimension()];
    for index in image.region().indices() {
        let mut best: Option<T> = None;
        for offset in &offsets {
            for (n, (i, o)) in neighbor.iter_mut().zip(index.iter().zip(offset)) {
                *n = i + o;
            }
            let Some(v) = image.get(&neighbor) else {
                continue;
            };
            best = match best {
                None => Some(v),
                Some(b) => {
                    let better = if take_max {
                        v.total_cmp(&b).is_gt()
                    } else {
                        v.total_cmp(&b).is_lt()
                    };
                    Some(if better { v } else { b })
                }
            };
        }
        data.push(best.unwrap_or(if take_max { T::MIN } else { T::MAX }));
    }
    build(image.size(), data)
}

/// Image of `u8` noise from a fixed seed
pub fn random_image(size: &[usize], seed: u64) -> TestResult<Image<u8>> {
    random_image_with(size, seed, |rng| rng.random())
}

/// Image whose pixels are drawn by `sample` from a generator seeded with
/// `seed`
pub fn random_image_with<T: Pixel>(
    size: &[usize],
    seed: u64,
    mut sample: impl FnMut(&mut StdRng) -> T,
) -> TestResult<Image<T>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let count = size.iter().product();
    let data = (0..count).map(|_| sample(&mut rng)).collect();
    build(size, data)
}

/// Image filled with `background` except for `value` at `at`
pub fn single_point_image<T: Pixel>(
    size: &[usize],
    at: &[isize],
    background: T,
    value: T,
) -> TestResult<Image<T>> {
    let mut image = Image::new_with_value(size, background).map_err(|source| {
        TestError::ImageBuild {
            size: size.to_vec(),
            source,
        }
    })?;
    image.set(at, value).map_err(|source| TestError::ImageBuild {
        size: size.to_vec(),
        source,
    })?;
    Ok(image)
}

/// Render a mask as text, `x` for set pixels and `.` otherwise
///
/// Axis 0 runs along a row, axis 1 down the rows; higher axes are separated
/// by blank lines.
pub fn render_mask(mask: &Image<bool>) -> String {
    let mut out = String::new();
    let region = mask.region();
    let width = mask.size()[0] as isize;
    let height = mask.size().get(1).copied().unwrap_or(1) as isize;
    for index in region.indices() {
        out.push(if mask.get(&index) == Some(true) { 'x' } else { '.' });
        if index[0] == width - 1 {
            out.push('\n');
            if index.len() > 2 && index[1] == height - 1 {
                out.push('\n');
            }
        }
    }
    out
}
