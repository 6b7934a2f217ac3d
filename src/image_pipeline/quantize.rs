//! Per-channel bit-depth reduction
//!
//! Maps 8-bit channel values onto `2^Q` reconstruction levels using a
//! uniform, logarithmic or pivot-split logarithmic scheme, and estimates a
//! pivot from image content for the automatic mode.

pub mod types;
mod quantizer;
mod pivot;

pub use types::{BitDepth, ModeSelection, QuantizationMode, UNIFORM_MODE_CODE};
pub use quantizer::{Quantizer, quantize, quantize_in_place};
pub use pivot::estimate_pivot;
