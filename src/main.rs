use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use rgbscale::image_pipeline::{
    BitDepth, DisplayPipeline, ModeSelection, PipelineConfig, TiffCompression,
};
use rgbscale::logger;

/// Resample a 512x512 planar RGB image and reduce its bit depth.
#[derive(Parser, Debug)]
#[command(name = "rgbscale", version)]
#[command(after_help = "If mode is omitted, the pivot for logarithmic quantization is computed automatically.")]
struct Cli {
    /// Planar RGB source file (red plane, green plane, blue plane)
    source: PathBuf,

    /// Scale factor applied to both axes, e.g. 0.5
    scale: f64,

    /// Bits per channel, 1-8 (8 disables quantization)
    #[arg(value_name = "Q")]
    bits: u8,

    /// -1 uniform, 0 logarithmic, 1-255 logarithmic with that pivot
    #[arg(allow_negative_numbers = true)]
    mode: Option<i32>,

    /// Where to write the processed image
    #[arg(short, long, default_value = "output.tiff")]
    output: PathBuf,

    /// TIFF compression: none, lzw or deflate
    #[arg(long, default_value = "none")]
    compression: TiffCompression,

    /// Process on a single thread
    #[arg(long)]
    sequential: bool,

    /// Print a per-step timing summary
    #[arg(long)]
    timings: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage problems are reported but are not a failed run.
            e.print().context("failed to print usage")?;
            return Ok(());
        }
    };

    logger::init(if cli.verbose { "debug" } else { "info" });

    let config = PipelineConfig::builder()
        .scale(cli.scale)
        .bits(BitDepth::new(cli.bits)?)
        .mode(ModeSelection::from_code(cli.mode)?)
        .compression(cli.compression)
        .parallel(!cli.sequential)
        .build();
    let pipeline = DisplayPipeline::new(config)?;

    info!("Quantization: {}", pipeline.config().bits);
    match pipeline.config().mode {
        ModeSelection::Fixed(mode) => info!("Mode: {}", mode),
        ModeSelection::AutoPivot => info!("Mode: logarithmic with automatic pivot"),
    }

    let report = pipeline
        .run_file(&cli.source, &cli.output)
        .with_context(|| format!("processing {} failed", cli.source.display()))?;

    info!(
        "Wrote {}x{} image to {}",
        report.width,
        report.height,
        cli.output.display()
    );
    if cli.timings {
        println!("{}", report.timings);
    }

    Ok(())
}
