//! Quantization parameter types

use std::fmt;

use crate::image_pipeline::common::error::{ProcessingError, Result};

/// Mode code selecting uniform quantization on the command surface.
pub const UNIFORM_MODE_CODE: i32 = -1;

/// Bits kept per channel, always within 1..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitDepth(u8);

impl BitDepth {
    /// Full 8-bit depth: quantization is a no-op.
    pub const FULL: BitDepth = BitDepth(8);

    pub fn new(bits: u8) -> Result<Self> {
        if (1..=8).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(ProcessingError::InvalidParameter(format!(
                "bits per channel must be within 1..=8, got {bits}"
            )))
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Number of reconstruction levels, `2^bits`.
    pub fn levels(self) -> usize {
        1usize << self.0
    }

    pub fn is_full(self) -> bool {
        self.0 == 8
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.0)
    }
}

/// How channel values are mapped onto reconstruction levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantizationMode {
    /// Equal-width intervals across [0, 255].
    Uniform,
    /// Geometrically growing intervals across [0, 255].
    Logarithmic,
    /// Level budget split between [0, pivot] and [pivot + 1, 255], each
    /// quantized uniformly.
    Piecewise { pivot: u8 },
}

impl QuantizationMode {
    /// Decodes the command-surface mode code: `-1` uniform, `0` pure
    /// logarithmic, `1..=255` piecewise with that pivot.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            UNIFORM_MODE_CODE => Ok(Self::Uniform),
            0 => Ok(Self::Logarithmic),
            1..=255 => Ok(Self::Piecewise { pivot: code as u8 }),
            other => Err(ProcessingError::InvalidParameter(format!(
                "mode must be -1, 0 or a pivot within 1..=255, got {other}"
            ))),
        }
    }
}

impl fmt::Display for QuantizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Logarithmic => write!(f, "logarithmic"),
            Self::Piecewise { pivot } => write!(f, "piecewise logarithmic (pivot {pivot})"),
        }
    }
}

/// Whether the mode is fixed up front or derived from the resampled image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeSelection {
    Fixed(QuantizationMode),
    /// Quantization is deferred until a pivot has been estimated from the
    /// resampled raster.
    #[default]
    AutoPivot,
}

impl ModeSelection {
    /// `None` selects the automatic pivot.
    pub fn from_code(code: Option<i32>) -> Result<Self> {
        match code {
            Some(code) => QuantizationMode::from_code(code).map(Self::Fixed),
            None => Ok(Self::AutoPivot),
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, Self::AutoPivot)
    }
}
