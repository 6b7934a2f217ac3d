use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::pipeline::display_pipeline::DisplayPipeline;
use crate::image_pipeline::pipeline::types::{PipelineConfig, PipelineConfigBuilder};
use crate::image_pipeline::planar::RasterReader;
use crate::image_pipeline::present::{RasterPresenter, TiffCompression};
use crate::image_pipeline::quantize::{
    BitDepth, ModeSelection, QuantizationMode, Quantizer, estimate_pivot, quantize_in_place,
};
use crate::image_pipeline::raster::{Raster, Rgb};
use crate::image_pipeline::resample::resample;

struct MockReader {
    should_fail: bool,
    mock_data: Option<Raster>,
}

impl RasterReader for MockReader {
    fn read_raster(&self, _data: &[u8]) -> Result<Raster> {
        if self.should_fail {
            return Err(ProcessingError::FormatError {
                expected: 48,
                actual: 0,
            });
        }
        match &self.mock_data {
            Some(raster) => Ok(raster.clone()),
            None => Raster::filled(4, 4, Rgb::gray(200)),
        }
    }
}

struct MockPresenter {
    should_fail: bool,
    presented: Arc<Mutex<Vec<Raster>>>,
}

impl RasterPresenter for MockPresenter {
    fn present(&self, raster: &Raster, _output: &mut dyn Write, _config: &PipelineConfig) -> Result<()> {
        if self.should_fail {
            return Err(ProcessingError::EncodeError("Mock encode error".to_string()));
        }
        self.presented.lock().unwrap().push(raster.clone());
        Ok(())
    }
}

fn small_config() -> PipelineConfigBuilder {
    PipelineConfig::builder().source_dimensions(4, 4).parallel(false)
}

fn pipeline_with(
    source: Option<Raster>,
    config: PipelineConfig,
) -> (DisplayPipeline<MockReader, MockPresenter>, Arc<Mutex<Vec<Raster>>>) {
    let presented = Arc::new(Mutex::new(Vec::new()));
    let reader = MockReader {
        should_fail: false,
        mock_data: source,
    };
    let presenter = MockPresenter {
        should_fail: false,
        presented: presented.clone(),
    };
    let pipeline = DisplayPipeline::with_custom(reader, presenter, config).unwrap();
    (pipeline, presented)
}

/// 4x4 black raster with a single white pixel in the bottom-right corner.
fn corner_highlight() -> Raster {
    let mut pixels = vec![Rgb::gray(0); 16];
    pixels[15] = Rgb::gray(255);
    Raster::from_pixels(4, 4, pixels).unwrap()
}

#[test]
fn test_config_builder() {
    let config = PipelineConfig::builder()
        .scale(0.25)
        .bits(BitDepth::new(3).unwrap())
        .mode(ModeSelection::Fixed(QuantizationMode::Uniform))
        .source_dimensions(64, 32)
        .validate_dimensions(false)
        .parallel(false)
        .compression(TiffCompression::Lzw)
        .horizontal_predictor(true)
        .build();

    assert_eq!(config.scale, 0.25);
    assert_eq!(config.bits.bits(), 3);
    assert_eq!(config.mode, ModeSelection::Fixed(QuantizationMode::Uniform));
    assert_eq!(config.source_dimensions(), (64, 32));
    assert!(!config.validate_dimensions);
    assert!(!config.parallel);
    assert_eq!(config.compression, TiffCompression::Lzw);
    assert!(config.horizontal_predictor);
}

#[test]
fn test_config_defaults() {
    let config = PipelineConfig::default();
    assert_eq!(config.scale, 1.0);
    assert!(config.bits.is_full());
    assert!(config.mode.is_auto());
    assert_eq!(config.source_dimensions(), (512, 512));
    assert!(config.validate_dimensions);
}

#[test]
fn test_invalid_scale_is_rejected_up_front() {
    let reader = MockReader {
        should_fail: false,
        mock_data: None,
    };
    let presenter = MockPresenter {
        should_fail: false,
        presented: Arc::new(Mutex::new(Vec::new())),
    };
    let result = DisplayPipeline::with_custom(reader, presenter, small_config().scale(0.0).build());
    assert!(matches!(result, Err(ProcessingError::InvalidParameter(_))));
}

#[test]
fn test_validate_rejects_bad_scale() {
    for scale in [0.0, -0.5, f64::NAN, f64::INFINITY] {
        let config = small_config().scale(scale).build();
        assert!(
            matches!(config.validate(), Err(ProcessingError::InvalidParameter(_))),
            "scale {scale} should be rejected"
        );
    }
    assert!(small_config().scale(0.25).build().validate().is_ok());
}

#[test]
fn test_validate_rejects_empty_source() {
    let config = PipelineConfig::builder().source_dimensions(0, 4).build();
    assert!(matches!(
        config.validate(),
        Err(ProcessingError::InvalidDimensions(0, 4))
    ));

    let reader = MockReader {
        should_fail: false,
        mock_data: None,
    };
    let presenter = MockPresenter {
        should_fail: false,
        presented: Arc::new(Mutex::new(Vec::new())),
    };
    let result = DisplayPipeline::with_custom(reader, presenter, config);
    assert!(matches!(result, Err(ProcessingError::InvalidDimensions(0, 4))));
}

#[test]
fn test_set_config_keeps_previous_on_error() {
    let (mut pipeline, presented) = pipeline_with(None, small_config().scale(0.5).build());

    let result = pipeline.set_config(small_config().scale(0.0).build());
    assert!(matches!(result, Err(ProcessingError::InvalidParameter(_))));
    assert_eq!(pipeline.config().scale, 0.5);

    let result = pipeline.set_config(small_config().source_dimensions(4, 0).build());
    assert!(matches!(result, Err(ProcessingError::InvalidDimensions(4, 0))));
    assert_eq!(pipeline.config().source_dimensions(), (4, 4));

    // The old resampler is still in place.
    let processed = pipeline.process(&[]).unwrap();
    assert_eq!(processed.raster.dimensions(), (2, 2));
    assert!(presented.lock().unwrap().is_empty());
}

#[test]
fn test_set_config_applies_new_scale() {
    let (mut pipeline, _) = pipeline_with(None, small_config().scale(0.5).build());

    pipeline.set_config(small_config().scale(0.25).build()).unwrap();
    assert_eq!(pipeline.config().scale, 0.25);

    let processed = pipeline.process(&[]).unwrap();
    assert_eq!(processed.raster.dimensions(), (1, 1));
}

#[test]
fn test_constant_source_halved_at_full_depth() {
    let config = small_config().scale(0.5).bits(BitDepth::FULL).build();
    let (pipeline, presented) = pipeline_with(None, config);

    let mut output = Vec::new();
    let report = pipeline.run(b"ignored", &mut output).unwrap();

    assert_eq!((report.width, report.height), (2, 2));
    assert_eq!(report.pivot, None);
    let presented = presented.lock().unwrap();
    assert_eq!(presented.len(), 1);
    assert!(presented[0].pixels().iter().all(|&p| p == Rgb::gray(200)));
}

#[test]
fn test_reader_failure_presents_nothing() {
    let presented = Arc::new(Mutex::new(Vec::new()));
    let reader = MockReader {
        should_fail: true,
        mock_data: None,
    };
    let presenter = MockPresenter {
        should_fail: false,
        presented: presented.clone(),
    };
    let pipeline = DisplayPipeline::with_custom(reader, presenter, small_config().build()).unwrap();

    let mut output = Vec::new();
    let result = pipeline.run(b"ignored", &mut output);

    assert!(matches!(result, Err(ProcessingError::FormatError { .. })));
    assert!(presented.lock().unwrap().is_empty());
}

#[test]
fn test_presenter_failure() {
    let reader = MockReader {
        should_fail: false,
        mock_data: None,
    };
    let presenter = MockPresenter {
        should_fail: true,
        presented: Arc::new(Mutex::new(Vec::new())),
    };
    let pipeline = DisplayPipeline::with_custom(reader, presenter, small_config().build()).unwrap();

    let mut output = Vec::new();
    let result = pipeline.run(b"ignored", &mut output);

    assert!(matches!(result, Err(ProcessingError::EncodeError(_))));
}

#[test]
fn test_dimension_validation_failure() {
    let source = Raster::filled(8, 8, Rgb::gray(1)).unwrap();
    let (pipeline, presented) = pipeline_with(Some(source), small_config().build());

    let mut output = Vec::new();
    let result = pipeline.run(b"ignored", &mut output);

    assert!(matches!(result, Err(ProcessingError::InvalidDimensions(8, 8))));
    assert!(presented.lock().unwrap().is_empty());
}

#[test]
fn test_dimension_validation_disabled() {
    let source = Raster::filled(8, 8, Rgb::gray(1)).unwrap();
    let config = small_config().validate_dimensions(false).build();
    let (pipeline, _presented) = pipeline_with(Some(source), config);

    let mut output = Vec::new();
    let report = pipeline.run(b"ignored", &mut output).unwrap();
    assert_eq!((report.width, report.height), (8, 8));
}

#[test]
fn test_fixed_mode_quantizes_while_resampling() {
    let source = corner_highlight();
    let bits = BitDepth::new(2).unwrap();
    let mode = QuantizationMode::Uniform;
    let config = small_config()
        .scale(0.5)
        .bits(bits)
        .mode(ModeSelection::Fixed(mode))
        .build();
    let (pipeline, _presented) = pipeline_with(Some(source.clone()), config);

    let processed = pipeline.process(b"ignored").unwrap();

    let expected = resample(&source, 0.5, Some(Quantizer::new(bits, mode))).unwrap();
    assert_eq!(processed.raster, expected);
    assert_eq!(processed.pivot, None);
}

#[test]
fn test_auto_pivot_is_estimated_from_resampled_raster() {
    let source = corner_highlight();
    let bits = BitDepth::new(3).unwrap();
    let config = small_config()
        .scale(0.5)
        .bits(bits)
        .mode(ModeSelection::AutoPivot)
        .build();
    let (pipeline, presented) = pipeline_with(Some(source.clone()), config);

    let mut output = Vec::new();
    let report = pipeline.run(b"ignored", &mut output).unwrap();

    let mut resampled = resample(&source, 0.5, None).unwrap();
    let expected_pivot = estimate_pivot(&resampled);
    // Only the bottom-right output pixel sees the highlight: 255 / 9 -> 28,
    // and 28 / 4 -> 7. The full source would give 16.
    assert_eq!(expected_pivot, 7);
    assert_eq!(estimate_pivot(&source), 16);
    assert_eq!(report.pivot, Some(expected_pivot));

    quantize_in_place(
        &mut resampled,
        Quantizer::new(bits, QuantizationMode::Piecewise { pivot: expected_pivot }),
        false,
    );
    assert_eq!(presented.lock().unwrap()[0], resampled);
}

#[test]
fn test_auto_pivot_settled_before_presentation() {
    let reader = MockReader {
        should_fail: false,
        mock_data: Some(corner_highlight()),
    };
    let presenter = MockPresenter {
        should_fail: true,
        presented: Arc::new(Mutex::new(Vec::new())),
    };
    let config = small_config()
        .scale(0.5)
        .bits(BitDepth::new(3).unwrap())
        .mode(ModeSelection::AutoPivot)
        .build();
    let pipeline = DisplayPipeline::with_custom(reader, presenter, config).unwrap();

    // The pivot comes out of processing even though presenting fails.
    let processed = pipeline.process(b"ignored").unwrap();
    assert_eq!(processed.pivot, Some(7));

    let mut output = Vec::new();
    let result = pipeline.run(b"ignored", &mut output);
    assert!(matches!(result, Err(ProcessingError::EncodeError(_))));
}

#[test]
fn test_auto_pivot_skipped_at_full_depth() {
    let source = corner_highlight();
    let config = small_config().bits(BitDepth::FULL).mode(ModeSelection::AutoPivot).build();
    let (pipeline, _presented) = pipeline_with(Some(source.clone()), config);

    let processed = pipeline.process(b"ignored").unwrap();

    assert_eq!(processed.pivot, None);
    assert_eq!(processed.raster, resample(&source, 1.0, None).unwrap());
    assert!(processed.timings.get_step("requantize").is_none());
}

#[test]
fn test_zero_pivot_still_uses_piecewise_scheme() {
    let source = Raster::filled(4, 4, Rgb::gray(0)).unwrap();
    let config = small_config()
        .bits(BitDepth::new(2).unwrap())
        .mode(ModeSelection::AutoPivot)
        .build();
    let (pipeline, _presented) = pipeline_with(Some(source), config);

    let processed = pipeline.process(b"ignored").unwrap();

    assert_eq!(processed.pivot, Some(0));
    // Piecewise with pivot 0 keeps [0, 0] as its own level; pure
    // logarithmic would lift black to the middle of [0, 3].
    assert!(processed.raster.pixels().iter().all(|&p| p == Rgb::gray(0)));
}

#[test]
fn test_parallel_run_matches_sequential() {
    let pixels = (0..16u8).map(|i| Rgb::new(i * 16, 255 - i * 16, i * 9)).collect();
    let source = Raster::from_pixels(4, 4, pixels).unwrap();
    let config = || small_config().bits(BitDepth::new(4).unwrap()).mode(ModeSelection::AutoPivot);

    let (sequential, _) = pipeline_with(Some(source.clone()), config().build());
    let (parallel, _) = pipeline_with(Some(source), config().parallel(true).build());

    let a = sequential.process(b"ignored").unwrap();
    let b = parallel.process(b"ignored").unwrap();
    assert_eq!(a.raster, b.raster);
    assert_eq!(a.pivot, b.pivot);
}

#[test]
fn test_timings_cover_each_step() {
    let config = small_config().bits(BitDepth::new(1).unwrap()).build();
    let (pipeline, _presented) = pipeline_with(None, config);

    let mut output = Vec::new();
    let report = pipeline.run(b"ignored", &mut output).unwrap();

    for step in ["decode_planar", "resample", "estimate_pivot", "requantize", "present"] {
        assert!(report.timings.get_step(step).is_some(), "missing step {step}");
    }
}
