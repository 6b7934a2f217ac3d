use crate::image_pipeline::raster::Raster;

/// Estimates a logarithmic-quantization pivot from image content.
///
/// Each pixel contributes the truncated mean of its three channels; the pivot
/// is the average of those means over the whole raster, rounded to nearest
/// with halves rounding up.
pub fn estimate_pivot(raster: &Raster) -> u8 {
    let count = raster.pixels().len();
    if count == 0 {
        return 0;
    }
    let sum: u64 = raster
        .pixels()
        .iter()
        .map(|pixel| pixel.channel_mean() as u64)
        .sum();
    let mean = sum as f64 / count as f64;
    mean.round().clamp(0.0, 255.0) as u8
}
