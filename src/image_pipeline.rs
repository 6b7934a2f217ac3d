//! Image processing pipeline module
//!
//! Planar RGB decoding, box-filtered resampling, per-channel quantization and
//! presentation, with an orchestrator tying the steps together.

pub mod common;
pub mod raster;
pub mod planar;
pub mod quantize;
pub mod resample;
pub mod present;
pub mod pipeline;

pub use common::{
    PipelineTimings,
    ProcessingError,
    Result,
};

pub use raster::{
    Raster,
    Rgb,
};

pub use planar::{
    PlanarRgbReader,
    RasterReader,
    SOURCE_HEIGHT,
    SOURCE_WIDTH,
};

pub use quantize::{
    BitDepth,
    ModeSelection,
    QuantizationMode,
    Quantizer,
    estimate_pivot,
    quantize,
    quantize_in_place,
};

pub use resample::{
    Resampler,
    resample,
};

pub use present::{
    RasterPresenter,
    TiffCompression,
    TiffPresenter,
};

pub use pipeline::{
    DisplayPipeline,
    PipelineConfig,
    PipelineConfigBuilder,
    PipelineReport,
    ProcessedImage,
};
