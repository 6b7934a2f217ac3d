//! Raster types

use crate::image_pipeline::common::error::{ProcessingError, Result};

/// One 8-bit-per-channel RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Applies `f` to each channel independently.
    #[inline]
    pub fn map(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Integer mean of the three channels, truncated.
    #[inline]
    pub fn channel_mean(self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// A `width` x `height` grid of pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Raster {
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ProcessingError::InvalidDimensions(width, height));
        }
        let expected = width
            .checked_mul(height)
            .ok_or(ProcessingError::InvalidDimensions(width, height))?;
        if pixels.len() != expected {
            return Err(ProcessingError::InvalidDimensions(width, height));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn filled(width: usize, height: usize, value: Rgb) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(ProcessingError::InvalidDimensions(width, height))?;
        Self::from_pixels(width, height, vec![value; len])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[Rgb] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    /// Interleaved `R, G, B, R, G, B, ...` bytes.
    pub fn to_interleaved(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimensions() {
        let result = Raster::from_pixels(0, 4, Vec::new());
        assert!(matches!(result, Err(ProcessingError::InvalidDimensions(0, 4))));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let result = Raster::from_pixels(2, 2, vec![Rgb::default(); 3]);
        assert!(matches!(result, Err(ProcessingError::InvalidDimensions(2, 2))));
    }

    #[test]
    fn test_row_major_access() {
        let pixels = (0..6u8).map(Rgb::gray).collect();
        let raster = Raster::from_pixels(3, 2, pixels).unwrap();

        assert_eq!(raster.get(2, 0), Some(Rgb::gray(2)));
        assert_eq!(raster.get(0, 1), Some(Rgb::gray(3)));
        assert_eq!(raster.get(3, 0), None);
        assert_eq!(raster.row(1), &[Rgb::gray(3), Rgb::gray(4), Rgb::gray(5)]);
    }

    #[test]
    fn test_channel_mean_truncates() {
        assert_eq!(Rgb::new(1, 1, 2).channel_mean(), 1);
        assert_eq!(Rgb::new(255, 255, 255).channel_mean(), 255);
        assert_eq!(Rgb::new(10, 20, 31).channel_mean(), 20);
    }

    #[test]
    fn test_interleaved_layout() {
        let raster = Raster::from_pixels(2, 1, vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]).unwrap();
        assert_eq!(raster.to_interleaved(), vec![1, 2, 3, 4, 5, 6]);
    }
}
