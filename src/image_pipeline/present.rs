//! Presentation module
//!
//! Hands the finished raster to a sink that shows it pixel for pixel. The
//! bundled sink encodes an 8-bit RGB TIFF.

mod presenter;
mod tiff_presenter;
pub mod types;

pub use presenter::RasterPresenter;
pub use tiff_presenter::TiffPresenter;
pub use types::TiffCompression;
