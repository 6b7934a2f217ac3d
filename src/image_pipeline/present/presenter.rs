use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::pipeline::PipelineConfig;
use crate::image_pipeline::raster::Raster;

pub trait RasterPresenter {
    fn present(&self, raster: &Raster, output: &mut dyn Write, config: &PipelineConfig) -> Result<()>;
}
