//! Quantization schemes.
//!
//! Every scheme finds the interval containing a value and returns that
//! interval's midpoint. Interval division is done in `f64`, so each index is
//! clamped: at the top of a range the quotient can land one past the last
//! level.

use rayon::prelude::*;

use crate::image_pipeline::quantize::types::{BitDepth, QuantizationMode};
use crate::image_pipeline::raster::{Raster, Rgb};

/// Width of the full 8-bit intensity range.
const INTENSITY_SPAN: f64 = 256.0;

/// Quantizes one channel value. Identity when `bits` is 8.
pub fn quantize(value: u8, bits: BitDepth, mode: QuantizationMode) -> u8 {
    if bits.is_full() {
        return value;
    }
    let levels = bits.levels();
    match mode {
        QuantizationMode::Uniform => quantize_uniform(value, levels),
        QuantizationMode::Logarithmic => quantize_logarithmic(value, levels),
        QuantizationMode::Piecewise { pivot } => quantize_piecewise(value, levels, pivot),
    }
}

/// A bit depth and scheme bound together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    bits: BitDepth,
    mode: QuantizationMode,
}

impl Quantizer {
    pub fn new(bits: BitDepth, mode: QuantizationMode) -> Self {
        Self { bits, mode }
    }

    /// True when every value maps to itself (8 bits per channel).
    pub fn is_identity(&self) -> bool {
        self.bits.is_full()
    }

    #[inline]
    pub fn quantize(&self, value: u8) -> u8 {
        quantize(value, self.bits, self.mode)
    }

    #[inline]
    pub fn quantize_pixel(&self, pixel: Rgb) -> Rgb {
        pixel.map(|channel| self.quantize(channel))
    }
}

/// Re-quantizes every channel of `raster` in place.
pub fn quantize_in_place(raster: &mut Raster, quantizer: Quantizer, parallel: bool) {
    if quantizer.is_identity() {
        return;
    }
    let width = raster.width();
    let apply = |row: &mut [Rgb]| {
        for pixel in row {
            *pixel = quantizer.quantize_pixel(*pixel);
        }
    };
    if parallel {
        raster.pixels_mut().par_chunks_mut(width).for_each(apply);
    } else {
        raster.pixels_mut().chunks_mut(width).for_each(apply);
    }
}

/// Nearest integer to the midpoint of `[lower, upper]`; ties go to the
/// lower side.
#[inline]
fn midpoint(lower: f64, upper: f64) -> u8 {
    let mid = (lower + upper) / 2.0;
    (mid - 0.5).ceil().clamp(0.0, 255.0) as u8
}

/// Index of the interval of width `interval` holding `offset_value`,
/// clamped to `levels - 1`.
#[inline]
fn interval_index(offset_value: f64, interval: f64, levels: usize) -> usize {
    let index = (offset_value / interval) as usize;
    index.min(levels - 1)
}

/// Midpoint of interval `index` in a uniform partition starting at `origin`.
#[inline]
fn interval_midpoint(origin: f64, index: usize, interval: f64) -> u8 {
    let lower = origin + index as f64 * interval;
    let upper = origin + (index + 1) as f64 * interval - 1.0;
    midpoint(lower, upper)
}

fn quantize_uniform(value: u8, levels: usize) -> u8 {
    let interval = INTENSITY_SPAN / levels as f64;
    let index = interval_index(value as f64, interval, levels);
    interval_midpoint(0.0, index, interval)
}

/// Upper edge of logarithmic level `i`, `exp(ln(256) * i / levels) - 1`.
#[inline]
fn log_boundary(i: usize, levels: usize) -> f64 {
    (INTENSITY_SPAN.ln() * i as f64 / levels as f64).exp() - 1.0
}

pub(crate) fn logarithmic_index(value: u8, levels: usize) -> usize {
    (1..=levels)
        .find(|&i| value as f64 <= log_boundary(i, levels))
        .map_or(levels - 1, |i| i - 1)
}

fn quantize_logarithmic(value: u8, levels: usize) -> u8 {
    let index = logarithmic_index(value, levels);
    let lower = if index == 0 {
        0.0
    } else {
        log_boundary(index, levels)
    };
    let upper = log_boundary(index + 1, levels);
    midpoint(lower, upper)
}

/// Which side of the pivot a value falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Band {
    Lower,
    Upper,
}

/// Splits `levels` into the budgets for `[0, pivot]` and `[pivot + 1, 255]`.
/// Each side keeps at least one level.
pub(crate) fn piecewise_split(levels: usize, pivot: u8) -> (usize, usize) {
    let share = (pivot as f64 + 1.0) / INTENSITY_SPAN;
    let lower = ((levels as f64 * share).round() as usize).clamp(1, levels - 1);
    (lower, levels - lower)
}

#[inline]
fn lower_interval(pivot: u8, lower_levels: usize) -> f64 {
    (pivot as f64 + 1.0) / lower_levels as f64
}

#[inline]
fn upper_interval(pivot: u8, upper_levels: usize) -> f64 {
    (255.0 - pivot as f64) / upper_levels as f64
}

/// Band and in-band interval index for `value`.
pub(crate) fn piecewise_index(value: u8, levels: usize, pivot: u8) -> (Band, usize) {
    let (lower_levels, upper_levels) = piecewise_split(levels, pivot);
    if value <= pivot {
        let interval = lower_interval(pivot, lower_levels);
        (Band::Lower, interval_index(value as f64, interval, lower_levels))
    } else {
        let interval = upper_interval(pivot, upper_levels);
        let offset = (value - pivot - 1) as f64;
        (Band::Upper, interval_index(offset, interval, upper_levels))
    }
}

fn quantize_piecewise(value: u8, levels: usize, pivot: u8) -> u8 {
    let (lower_levels, upper_levels) = piecewise_split(levels, pivot);
    match piecewise_index(value, levels, pivot) {
        (Band::Lower, index) => interval_midpoint(0.0, index, lower_interval(pivot, lower_levels)),
        (Band::Upper, index) => interval_midpoint(
            pivot as f64 + 1.0,
            index,
            upper_interval(pivot, upper_levels),
        ),
    }
}
