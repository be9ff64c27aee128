//! irodori: CLI for converting raster images into filled SVG vector art.
//!
//! Runs the tracing pipeline on a given image file and writes an SVG
//! with one filled `<path>` per traced shape. Optionally prints
//! per-stage diagnostics for parameter tuning:
//!
//! - Comparing upscale factors and color counts
//! - Tuning dilation passes, smoothing, and simplification tolerance
//! - Measuring per-stage durations to identify bottlenecks
//!
//! # Usage
//!
//! ```text
//! irodori input.png -o output.svg [OPTIONS]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use irodori_pipeline::PipelineConfig;

/// Convert a raster image into layered, filled SVG vector art.
#[derive(Parser)]
#[command(name = "irodori", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// Path to write the SVG output.
    #[arg(short, long)]
    output: PathBuf,

    /// Integer upscale factor applied after decoding.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_UPSCALE, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    upscale: u32,

    /// Target color count for quantization.
    #[arg(long = "colors", default_value_t = PipelineConfig::DEFAULT_COLOR_COUNT, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    colors: usize,

    /// Minimum shape area in square pixels.
    #[arg(long = "min-area", default_value_t = PipelineConfig::DEFAULT_MIN_SHAPE_AREA)]
    min_area: f64,

    /// Boundary smoothing iterations.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_SMOOTH_ITERATIONS)]
    smooth_iterations: usize,

    /// Simplification tolerance in pixels.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_SIMPLIFY_TOLERANCE)]
    tolerance: f64,

    /// Dilation passes that ignore the coverage mask.
    #[arg(long = "pre-dilation", default_value_t = PipelineConfig::DEFAULT_UNCONDITIONAL_DILATION_PASSES)]
    pre_dilation: usize,

    /// Dilation passes bounded by the coverage mask.
    #[arg(long = "bounded-dilation", default_value_t = PipelineConfig::DEFAULT_BOUNDED_DILATION_PASSES)]
    bounded_dilation: usize,

    /// Seed for the quantizer's cluster initialization.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_SEED)]
    seed: u64,

    /// Print per-stage diagnostics as a human-readable report.
    #[arg(long)]
    report: bool,

    /// Print per-stage diagnostics as JSON.
    #[arg(long)]
    json: bool,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, all other pipeline parameter flags are ignored.
    /// The JSON must be a valid `PipelineConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Build a [`PipelineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.  Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<PipelineConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(PipelineConfig {
        upscale: cli.upscale,
        color_count: cli.colors,
        min_shape_area: cli.min_area,
        smooth_iterations: cli.smooth_iterations,
        simplify_tolerance: cli.tolerance,
        unconditional_dilation_passes: cli.pre_dilation,
        bounded_dilation_passes: cli.bounded_dilation,
        seed: cli.seed,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&cli.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    let result = match irodori_pipeline::process(&image_bytes, &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Pipeline error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Embed the full config so exported files carry machine-parseable
    // settings for reproducibility.
    let config_json = match serde_json::to_string(&config) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let title = cli
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("irodori");
    let desc = format!(
        "upscale={} colors={} min_area={} smooth={} tolerance={} dilation={}+{} seed={}",
        config.upscale,
        config.color_count,
        config.min_shape_area,
        config.smooth_iterations,
        config.simplify_tolerance,
        config.unconditional_dilation_passes,
        config.bounded_dilation_passes,
        config.seed,
    );
    let metadata = irodori_export::SvgMetadata {
        title: Some(title),
        description: Some(&desc),
        config_json: Some(&config_json),
    };

    let svg = irodori_export::to_svg(&result.shapes, result.dimensions, &metadata);
    if let Err(e) = std::fs::write(&cli.output, &svg) {
        eprintln!("Error writing SVG to {}: {e}", cli.output.display());
        return ExitCode::FAILURE;
    }
    eprintln!(
        "SVG written to {} ({} shapes, {} bytes)",
        cli.output.display(),
        result.shapes.len(),
        svg.len(),
    );

    if cli.json {
        match serde_json::to_string_pretty(&result.diagnostics) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing diagnostics: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else if cli.report {
        println!("{}", result.diagnostics.report());
    }

    ExitCode::SUCCESS
}
