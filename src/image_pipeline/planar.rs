//! Planar RGB input module
//!
//! Decodes byte buffers holding three full channel planes into a `Raster`.

mod reader;
mod planar_reader;

pub use reader::RasterReader;
pub use planar_reader::{PlanarRgbReader, SOURCE_HEIGHT, SOURCE_WIDTH};
