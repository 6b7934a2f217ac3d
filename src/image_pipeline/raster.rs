//! In-memory RGB raster
//!
//! Pixels are fixed-width `Rgb` records stored row-major in a single buffer.

pub mod types;

pub use types::{Raster, Rgb};
