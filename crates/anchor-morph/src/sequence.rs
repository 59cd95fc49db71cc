//! Morphological sequence operations
//!
//! Runs a sequence of grayscale operations given as a string, so that
//! compositions can be written down and compared in one line.
//!
//! # Sequence String Format
//!
//! Operations are separated by `+` and whitespace is ignored.
//! Each operation begins with a case-insensitive character followed by one
//! window size per image axis, separated by dots:
//!
//! - `d<s0>.<s1>...` - Dilation with a brick of the given sizes
//! - `e<s0>.<s1>...` - Erosion
//! - `o<s0>.<s1>...` - Opening
//! - `c<s0>.<s1>...` - Closing
//! - `tw<s0>.<s1>...` - White tophat (original - opening)
//! - `tb<s0>.<s1>...` - Black tophat (closing - original)
//! - `g<s0>.<s1>...` - Gradient (dilation - erosion)
//!
//! Sizes must be odd; a size `s` is a brick radius of `(s - 1) / 2`.
//!
//! # Examples
//!
//! ```
//! use anchor_core::Image;
//! use anchor_morph::sequence::{MorphSequence, gray_morph_sequence};
//!
//! let seq = MorphSequence::parse("o5.5 + e3.3").unwrap();
//! assert_eq!(seq.ops().len(), 2);
//!
//! let image = Image::<u8>::new(&[100, 100]).unwrap();
//! let result = gray_morph_sequence(&image, "o5.5 + c3.3").unwrap();
//! assert_eq!(result.size(), &[100, 100]);
//! ```

use anchor_core::{Image, Pixel};

use crate::grayscale::{
    AnchorConfig, bottom_hat_gray, close_gray, dilate_gray, erode_gray, gradient_gray, open_gray,
    top_hat_gray,
};
use crate::sel::StructuringElement;
use crate::{MorphError, MorphResult};

/// A parsed morphological operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MorphOp {
    /// Dilation with a brick structuring element
    Dilate {
        /// Window size per axis
        sizes: Vec<usize>,
    },
    /// Erosion with a brick structuring element
    Erode {
        /// Window size per axis
        sizes: Vec<usize>,
    },
    /// Opening (erosion followed by dilation)
    Open {
        /// Window size per axis
        sizes: Vec<usize>,
    },
    /// Closing (dilation followed by erosion)
    Close {
        /// Window size per axis
        sizes: Vec<usize>,
    },
    /// Tophat transform
    Tophat {
        /// true for white tophat (original - opening), false for black (closing - original)
        white: bool,
        /// Window size per axis
        sizes: Vec<usize>,
    },
    /// Gradient (dilation - erosion)
    Gradient {
        /// Window size per axis
        sizes: Vec<usize>,
    },
}

impl MorphOp {
    /// Window sizes of the operation's structuring element
    pub fn sizes(&self) -> &[usize] {
        match self {
            MorphOp::Dilate { sizes }
            | MorphOp::Erode { sizes }
            | MorphOp::Open { sizes }
            | MorphOp::Close { sizes }
            | MorphOp::Tophat { sizes, .. }
            | MorphOp::Gradient { sizes } => sizes,
        }
    }

    /// Brick radius per axis
    pub fn radius(&self) -> Vec<usize> {
        self.sizes().iter().map(|s| s / 2).collect()
    }
}

/// A parsed morphological sequence
#[derive(Debug, Clone)]
pub struct MorphSequence {
    /// The operations in the sequence
    ops: Vec<MorphOp>,
}

impl MorphSequence {
    /// Parse a sequence string into a MorphSequence
    ///
    /// # Examples
    ///
    /// ```
    /// use anchor_morph::sequence::MorphSequence;
    ///
    /// let seq = MorphSequence::parse("d3.3 + e5.5.1").unwrap();
    /// assert_eq!(seq.ops().len(), 2);
    /// ```
    pub fn parse(sequence: &str) -> MorphResult<Self> {
        if sequence.trim().is_empty() {
            return Err(MorphError::InvalidSequence("empty sequence".to_string()));
        }

        let mut ops = Vec::new();
        for (i, part) in sequence.split('+').enumerate() {
            let op_str = part.trim();
            if op_str.is_empty() {
                return Err(MorphError::InvalidSequence(format!(
                    "empty operation at position {}",
                    i + 1
                )));
            }
            ops.push(Self::parse_operation(op_str)?);
        }

        Ok(MorphSequence { ops })
    }

    /// Parse a single operation string
    fn parse_operation(op_str: &str) -> MorphResult<MorphOp> {
        let op_str: String = op_str
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let mut chars = op_str.chars();
        let Some(first) = chars.next() else {
            return Err(MorphError::InvalidSequence("empty operation".to_string()));
        };

        match first {
            'd' | 'e' | 'o' | 'c' | 'g' => {
                let sizes = Self::parse_sizes(chars.as_str())?;
                Ok(match first {
                    'd' => MorphOp::Dilate { sizes },
                    'e' => MorphOp::Erode { sizes },
                    'o' => MorphOp::Open { sizes },
                    'c' => MorphOp::Close { sizes },
                    _ => MorphOp::Gradient { sizes },
                })
            }
            't' => {
                let white = match chars.next() {
                    Some('w') => true,
                    Some('b') => false,
                    _ => {
                        return Err(MorphError::InvalidSequence(format!(
                            "invalid tophat '{}', expected 'tw' or 'tb'",
                            op_str
                        )));
                    }
                };
                let sizes = Self::parse_sizes(chars.as_str())?;
                Ok(MorphOp::Tophat { white, sizes })
            }
            _ => Err(MorphError::InvalidSequence(format!(
                "unknown operation '{}' in '{}'",
                first, op_str
            ))),
        }
    }

    /// Parse window sizes from a string like "3.5.1" -> [3, 5, 1]
    fn parse_sizes(size_str: &str) -> MorphResult<Vec<usize>> {
        if size_str.is_empty() {
            return Err(MorphError::InvalidSequence(
                "missing window sizes".to_string(),
            ));
        }

        let mut sizes = Vec::new();
        for part in size_str.split('.') {
            let size: usize = part.parse().map_err(|_| {
                MorphError::InvalidSequence(format!("invalid size '{}' in '{}'", part, size_str))
            })?;
            if size % 2 == 0 {
                return Err(MorphError::InvalidSequence(format!(
                    "sizes must be odd, got {} in '{}'",
                    size, size_str
                )));
            }
            sizes.push(size);
        }
        Ok(sizes)
    }

    /// Get the operations in this sequence
    pub fn ops(&self) -> &[MorphOp] {
        &self.ops
    }

    /// Check that every operation has one size per axis of an image with
    /// `dimension` axes
    pub fn verify(&self, dimension: usize) -> MorphResult<()> {
        for (i, op) in self.ops.iter().enumerate() {
            if op.sizes().len() != dimension {
                return Err(MorphError::InvalidSequence(format!(
                    "operation {} has {} sizes for a {}-axis image",
                    i + 1,
                    op.sizes().len(),
                    dimension
                )));
            }
        }
        Ok(())
    }

    /// Get the number of operations in the sequence
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Execute a grayscale morphological sequence on an image
///
/// # Arguments
///
/// * `image` - An image of any pixel type and dimension
/// * `sequence` - A sequence string (e.g., "o5.5 + c3.3")
///
/// # Returns
///
/// A new image with all operations applied, or an error.
pub fn gray_morph_sequence<T: Pixel>(image: &Image<T>, sequence: &str) -> MorphResult<Image<T>> {
    let seq = MorphSequence::parse(sequence)?;
    seq.verify(image.dimension())?;

    let config = AnchorConfig::default();
    let mut result = image.clone();
    for op in seq.ops() {
        result = execute_gray_op(&result, op, &config)?;
    }
    Ok(result)
}

/// Execute a single grayscale morphological operation
fn execute_gray_op<T: Pixel>(
    image: &Image<T>,
    op: &MorphOp,
    config: &AnchorConfig<T>,
) -> MorphResult<Image<T>> {
    let se = StructuringElement::brick(&op.radius())?;
    match op {
        MorphOp::Dilate { .. } => dilate_gray(image, &se, config),
        MorphOp::Erode { .. } => erode_gray(image, &se, config),
        MorphOp::Open { .. } => open_gray(image, &se, config),
        MorphOp::Close { .. } => close_gray(image, &se, config),
        MorphOp::Tophat { white: true, .. } => top_hat_gray(image, &se, config),
        MorphOp::Tophat { white: false, .. } => bottom_hat_gray(image, &se, config),
        MorphOp::Gradient { .. } => gradient_gray(image, &se, config),
    }
}
