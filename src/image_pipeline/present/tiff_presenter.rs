use std::io::Write;

use tiff::encoder::{Compression, TiffEncoder, colortype, compression::DeflateLevel};
use tracing::debug;

use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::pipeline::PipelineConfig;
use crate::image_pipeline::present::presenter::RasterPresenter;
use crate::image_pipeline::present::types::TiffCompression;
use crate::image_pipeline::raster::Raster;

/// Encodes the raster 1:1 as an 8-bit-per-channel RGB TIFF.
pub struct TiffPresenter;

impl RasterPresenter for TiffPresenter {
    fn present(&self, raster: &Raster, output: &mut dyn Write, config: &PipelineConfig) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", raster.width(), raster.height());

        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::Deflate => Compression::Deflate(DeflateLevel::Balanced),
        };

        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| ProcessingError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if config.horizontal_predictor {
            encoder = encoder.with_predictor(tiff::tags::Predictor::Horizontal);
        }

        encoder
            .write_image::<colortype::RGB8>(
                raster.width() as u32,
                raster.height() as u32,
                &raster.to_interleaved(),
            )
            .map_err(|e| ProcessingError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
