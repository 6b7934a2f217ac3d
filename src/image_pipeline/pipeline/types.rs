//! Pipeline configuration and result types

use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::common::timing::PipelineTimings;
use crate::image_pipeline::planar::{SOURCE_HEIGHT, SOURCE_WIDTH};
use crate::image_pipeline::present::TiffCompression;
use crate::image_pipeline::quantize::{BitDepth, ModeSelection};
use crate::image_pipeline::raster::Raster;

/// Configuration for a resample-and-quantize run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Resampling factor applied to both axes
    pub scale: f64,
    /// Bits kept per channel (8 disables quantization)
    pub bits: BitDepth,
    /// Fixed quantization mode, or a pivot estimated after resampling
    pub mode: ModeSelection,
    /// Expected source width in pixels
    pub source_width: usize,
    /// Expected source height in pixels
    pub source_height: usize,
    /// Whether to reject sources whose size differs from the expected one
    pub validate_dimensions: bool,
    /// Whether to spread per-row work over the rayon pool
    pub parallel: bool,
    /// Compression used by the TIFF presenter
    pub compression: TiffCompression,
    /// Horizontal differencing before compression
    pub horizontal_predictor: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            bits: BitDepth::FULL,
            mode: ModeSelection::AutoPivot,
            source_width: SOURCE_WIDTH,
            source_height: SOURCE_HEIGHT,
            validate_dimensions: true,
            parallel: true,
            compression: TiffCompression::None,
            horizontal_predictor: false,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    pub fn source_dimensions(&self) -> (usize, usize) {
        (self.source_width, self.source_height)
    }

    /// Checks that the scale is a positive finite number and the expected
    /// source size is non-empty.
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ProcessingError::InvalidParameter(format!(
                "scale must be a positive finite number, got {}",
                self.scale
            )));
        }
        if self.source_width == 0 || self.source_height == 0 {
            return Err(ProcessingError::InvalidDimensions(
                self.source_width,
                self.source_height,
            ));
        }
        Ok(())
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    scale: Option<f64>,
    bits: Option<BitDepth>,
    mode: Option<ModeSelection>,
    source_dimensions: Option<(usize, usize)>,
    validate_dimensions: Option<bool>,
    parallel: Option<bool>,
    compression: Option<TiffCompression>,
    horizontal_predictor: Option<bool>,
}

impl PipelineConfigBuilder {
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn bits(mut self, bits: BitDepth) -> Self {
        self.bits = Some(bits);
        self
    }

    pub fn mode(mut self, mode: ModeSelection) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn source_dimensions(mut self, width: usize, height: usize) -> Self {
        self.source_dimensions = Some((width, height));
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn horizontal_predictor(mut self, enable: bool) -> Self {
        self.horizontal_predictor = Some(enable);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        let (source_width, source_height) = self
            .source_dimensions
            .unwrap_or(default.source_dimensions());
        PipelineConfig {
            scale: self.scale.unwrap_or(default.scale),
            bits: self.bits.unwrap_or(default.bits),
            mode: self.mode.unwrap_or(default.mode),
            source_width,
            source_height,
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            parallel: self.parallel.unwrap_or(default.parallel),
            compression: self.compression.unwrap_or(default.compression),
            horizontal_predictor: self.horizontal_predictor.unwrap_or(default.horizontal_predictor),
        }
    }
}

/// Raster produced by a run before presentation.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub raster: Raster,
    /// Pivot estimated in auto-pivot mode, `None` otherwise
    pub pivot: Option<u8>,
    pub timings: PipelineTimings,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub width: usize,
    pub height: usize,
    /// Pivot estimated in auto-pivot mode, `None` otherwise
    pub pivot: Option<u8>,
    pub timings: PipelineTimings,
}
