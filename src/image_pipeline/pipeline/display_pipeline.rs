use std::io::Write;
use std::path::Path;

use tracing::{info, info_span, instrument};

use crate::image_pipeline::{
    common::{
        error::{ProcessingError, Result},
        timing::PipelineTimings,
    },
    pipeline::types::{PipelineConfig, PipelineReport, ProcessedImage},
    planar::{PlanarRgbReader, RasterReader},
    present::{RasterPresenter, TiffPresenter},
    quantize::{ModeSelection, QuantizationMode, Quantizer, estimate_pivot, quantize_in_place},
    resample::Resampler,
};

pub struct DisplayPipeline<R: RasterReader, P: RasterPresenter> {
    reader: R,
    presenter: P,
    config: PipelineConfig,
    resampler: Resampler,
}

impl DisplayPipeline<PlanarRgbReader, TiffPresenter> {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let reader = PlanarRgbReader::new(config.source_width, config.source_height);
        Self::with_custom(reader, TiffPresenter, config)
    }
}

impl<R: RasterReader, P: RasterPresenter> DisplayPipeline<R, P> {
    pub fn with_custom(reader: R, presenter: P, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let resampler = Resampler::new(config.scale)?.parallel(config.parallel);
        Ok(Self {
            reader,
            presenter,
            config,
            resampler,
        })
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 || (width, height) != self.config.source_dimensions() {
            return Err(ProcessingError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    /// Quantizer applied while resampling. Auto-pivot defers quantization
    /// until the pivot is known.
    fn inline_quantizer(&self) -> Option<Quantizer> {
        match self.config.mode {
            ModeSelection::Fixed(mode) => Some(Quantizer::new(self.config.bits, mode)),
            ModeSelection::AutoPivot => None,
        }
    }

    /// Decodes and processes `input_data` without presenting the result.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn process(&self, input_data: &[u8]) -> Result<ProcessedImage> {
        let mut timings = PipelineTimings::new();

        let source = {
            let _span = info_span!("decode_planar").entered();
            timings.record("decode_planar", || self.reader.read_raster(input_data))?
        };

        {
            let _span = info_span!(
                "validate_dimensions",
                width = source.width(),
                height = source.height()
            )
            .entered();
            self.validate_dimensions(source.width(), source.height())?;
        }

        let mut raster = {
            let _span = info_span!("resample", scale = self.config.scale).entered();
            let quantizer = self.inline_quantizer();
            timings.record("resample", || self.resampler.resample(&source, quantizer))?
        };

        let pivot = if self.config.mode.is_auto() && !self.config.bits.is_full() {
            let _span = info_span!("auto_pivot").entered();
            let pivot = timings.record("estimate_pivot", || estimate_pivot(&raster));
            info!("Computed optimal pivot: {}", pivot);

            // Piecewise even for pivot 0, where a fixed mode code would mean
            // pure logarithmic.
            let quantizer = Quantizer::new(self.config.bits, QuantizationMode::Piecewise { pivot });
            timings.record("requantize", || {
                quantize_in_place(&mut raster, quantizer, self.config.parallel)
            });
            Some(pivot)
        } else {
            None
        };

        Ok(ProcessedImage {
            raster,
            pivot,
            timings,
        })
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn run(&self, input_data: &[u8], output: &mut dyn Write) -> Result<PipelineReport> {
        info!(
            scale = self.config.scale,
            bits = self.config.bits.bits(),
            "Starting resample and quantize"
        );

        let processed = self.process(input_data)?;
        self.present_processed(processed, output)
    }

    /// Reads `input_path`, processes it and presents into a new file at
    /// `output_path`. The output file is only created once processing has
    /// succeeded.
    #[instrument(skip(self, input_path, output_path))]
    pub fn run_file<I: AsRef<Path>, O: AsRef<Path>>(
        &self,
        input_path: I,
        output_path: O,
    ) -> Result<PipelineReport> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Processing file"
        );

        let input_data = {
            let _span = info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ProcessingError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let processed = self.process(&input_data)?;

        let mut output_file = {
            let _span = info_span!("create_output_file").entered();
            std::fs::File::create(output_path).map_err(|e| {
                ProcessingError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?
        };

        self.present_processed(processed, &mut output_file)
    }

    /// Hands a processed raster to the presenter and summarises the run.
    fn present_processed(&self, processed: ProcessedImage, output: &mut dyn Write) -> Result<PipelineReport> {
        let ProcessedImage {
            raster,
            pivot,
            mut timings,
        } = processed;

        {
            let _span = info_span!("present").entered();
            timings.record("present", || {
                self.presenter.present(&raster, output, &self.config)
            })?;
        }

        info!(
            width = raster.width(),
            height = raster.height(),
            "Processing complete"
        );
        Ok(PipelineReport {
            width: raster.width(),
            height: raster.height(),
            pivot,
            timings,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replaces the configuration. On error the current one is kept.
    pub fn set_config(&mut self, config: PipelineConfig) -> Result<()> {
        config.validate()?;
        self.resampler = Resampler::new(config.scale)?.parallel(config.parallel);
        self.config = config;
        Ok(())
    }
}
