//! Pipeline orchestration module
//!
//! Sequences decode, resample, optional pivot estimation with re-quantization,
//! and presentation.

mod display_pipeline;
pub mod types;

#[cfg(test)]
mod tests;

pub use display_pipeline::DisplayPipeline;
pub use types::{PipelineConfig, PipelineConfigBuilder, PipelineReport, ProcessedImage};
