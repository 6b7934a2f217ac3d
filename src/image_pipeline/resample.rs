//! Box-filtered nearest-source-pixel resampling
//!
//! Each output pixel is mapped back into source space, snapped to the nearest
//! source pixel, and replaced by the mean of the 3x3 window around it. The
//! window shrinks at the raster border and the mean divides by the number of
//! cells actually covered.

use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::quantize::Quantizer;
use crate::image_pipeline::raster::{Raster, Rgb};

/// Largest output raster the resampler will allocate, in pixels.
pub const MAX_OUTPUT_PIXELS: usize = 1 << 26;

#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    scale: f64,
    parallel: bool,
}

impl Resampler {
    pub fn new(scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ProcessingError::InvalidParameter(format!(
                "scale must be a positive finite number, got {scale}"
            )));
        }
        Ok(Self {
            scale,
            parallel: false,
        })
    }

    /// Computes output rows on the rayon pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Output size for a `width` x `height` source, truncating toward zero.
    pub fn output_dimensions(&self, width: usize, height: usize) -> (usize, usize) {
        (
            (width as f64 * self.scale) as usize,
            (height as f64 * self.scale) as usize,
        )
    }

    /// Resamples `source` into a newly allocated raster, quantizing each
    /// averaged pixel with `quantizer` when one is given.
    pub fn resample(&self, source: &Raster, quantizer: Option<Quantizer>) -> Result<Raster> {
        let (out_width, out_height) = self.output_dimensions(source.width(), source.height());
        debug!(
            "Resampling {}x{} -> {}x{} (scale {})",
            source.width(),
            source.height(),
            out_width,
            out_height,
            self.scale
        );
        let within_budget = out_width
            .checked_mul(out_height)
            .is_some_and(|pixels| pixels <= MAX_OUTPUT_PIXELS);
        if !within_budget {
            return Err(ProcessingError::InvalidDimensions(out_width, out_height));
        }
        let mut output = Raster::filled(out_width, out_height, Rgb::default())?;

        let quantizer = quantizer.filter(|q| !q.is_identity());
        let fill_row = |(out_y, row): (usize, &mut [Rgb])| {
            let center_y = source_center(out_y, self.scale, source.height());
            for (out_x, pixel) in row.iter_mut().enumerate() {
                let center_x = source_center(out_x, self.scale, source.width());
                let averaged = window_average(source, center_x, center_y);
                *pixel = match quantizer {
                    Some(q) => q.quantize_pixel(averaged),
                    None => averaged,
                };
            }
        };

        if self.parallel {
            output
                .pixels_mut()
                .par_chunks_mut(out_width)
                .enumerate()
                .for_each(fill_row);
        } else {
            output
                .pixels_mut()
                .chunks_mut(out_width)
                .enumerate()
                .for_each(fill_row);
        }

        Ok(output)
    }
}

/// Resamples `source` by `scale` on the current thread.
pub fn resample(source: &Raster, scale: f64, quantizer: Option<Quantizer>) -> Result<Raster> {
    Resampler::new(scale)?.resample(source, quantizer)
}

/// Nearest source coordinate for output coordinate `out`, clamped to
/// `[0, extent - 1]`.
#[inline]
fn source_center(out: usize, scale: f64, extent: usize) -> usize {
    let mapped = (out as f64 / scale).round();
    (mapped as usize).min(extent - 1)
}

/// Mean of the in-bounds cells of the 3x3 window centred on `(cx, cy)`,
/// rounded half up per channel.
#[inline]
fn window_average(source: &Raster, cx: usize, cy: usize) -> Rgb {
    let x0 = cx.saturating_sub(1);
    let x1 = (cx + 1).min(source.width() - 1);
    let y0 = cy.saturating_sub(1);
    let y1 = (cy + 1).min(source.height() - 1);

    let (mut sum_r, mut sum_g, mut sum_b) = (0u32, 0u32, 0u32);
    for y in y0..=y1 {
        for pixel in &source.row(y)[x0..=x1] {
            sum_r += pixel.r as u32;
            sum_g += pixel.g as u32;
            sum_b += pixel.b as u32;
        }
    }
    let count = ((x1 - x0 + 1) * (y1 - y0 + 1)) as u32;
    let mean = |sum: u32| ((2 * sum + count) / (2 * count)) as u8;

    Rgb::new(mean(sum_r), mean(sum_g), mean(sum_b))
}
