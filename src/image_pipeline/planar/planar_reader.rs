//! Reader for planar 8-bit RGB buffers.
//!
//! The buffer holds the full red plane, then the full green plane, then the
//! full blue plane. Each plane is `width * height` bytes in scan-line order.

use tracing::debug;

use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::planar::reader::RasterReader;
use crate::image_pipeline::raster::{Raster, Rgb};

/// Default source width in pixels.
pub const SOURCE_WIDTH: usize = 512;

/// Default source height in pixels.
pub const SOURCE_HEIGHT: usize = 512;

/// Number of channel planes in the container.
const PLANES: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct PlanarRgbReader {
    width: usize,
    height: usize,
}

impl Default for PlanarRgbReader {
    fn default() -> Self {
        Self {
            width: SOURCE_WIDTH,
            height: SOURCE_HEIGHT,
        }
    }
}

impl PlanarRgbReader {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Exact byte length a buffer must have.
    pub fn frame_length(&self) -> usize {
        self.width * self.height * PLANES
    }
}

impl RasterReader for PlanarRgbReader {
    /// Decodes a planar buffer.
    ///
    /// # Errors
    ///
    /// * `FormatError` - the buffer is not exactly `width * height * 3` bytes
    /// * `InvalidDimensions` - the reader was configured with a zero dimension
    fn read_raster(&self, data: &[u8]) -> Result<Raster> {
        debug!("Decoding planar RGB buffer, {} bytes", data.len());

        let expected = self.frame_length();
        if data.len() != expected {
            return Err(ProcessingError::FormatError {
                expected,
                actual: data.len(),
            });
        }

        let plane = self.width * self.height;
        let (red, rest) = data.split_at(plane);
        let (green, blue) = rest.split_at(plane);
        let pixels = red
            .iter()
            .zip(green)
            .zip(blue)
            .map(|((&r, &g), &b)| Rgb::new(r, g, b))
            .collect();

        Raster::from_pixels(self.width, self.height, pixels)
    }
}
