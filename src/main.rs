use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crowdwatch::detect::{BgsAlgorithm, DetectorConfig, Pipeline};
use crowdwatch::display::{DisplaySink, NullDisplay, WindowDisplay};
use crowdwatch::driver;
use crowdwatch::source::{FrameSource, ImageSequenceSource, VideoFileSource};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video file to monitor, or a directory of numbered image frames
    #[arg(short, long)]
    source: PathBuf,

    /// Background subtraction algorithm
    #[arg(long, value_enum, ignore_case = true, default_value_t = BgsAlgorithm::Mog2)]
    algorithm: BgsAlgorithm,

    /// Contour area at which a region is tracked
    #[arg(long, default_value_t = 1000.0)]
    min_area: f64,

    /// Contour area at which a tracked region raises a warning
    #[arg(long, default_value_t = 3000.0)]
    max_area: f64,

    /// Scale applied to both axes of every frame before processing
    #[arg(long, default_value_t = 0.5)]
    resize_scale: f32,

    /// Run without display windows
    #[arg(long)]
    headless: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("Crowdwatch starting");
    tracing::info!("Source: {}", args.source.display());
    tracing::info!("Algorithm: {}", args.algorithm);
    tracing::info!(
        "Area bands: tracked >= {}, warning >= {}",
        args.min_area,
        args.max_area
    );

    let config = DetectorConfig {
        algorithm: args.algorithm,
        min_area: args.min_area,
        max_area: args.max_area,
        resize_scale: args.resize_scale,
    };
    let pipeline = Pipeline::new(config).context("invalid pipeline configuration")?;

    // Initialize the frame source
    let mut source: Box<dyn FrameSource> = if args.source.is_dir() {
        Box::new(
            ImageSequenceSource::new(&args.source)
                .context("failed to open image sequence source")?,
        )
    } else {
        Box::new(VideoFileSource::open(&args.source).context("failed to open video source")?)
    };

    // Initialize the display
    let mut display: Box<dyn DisplaySink> = if args.headless {
        tracing::info!("running headless, frames will not be displayed");
        Box::new(NullDisplay::new())
    } else {
        Box::new(WindowDisplay::new())
    };

    // Main loop
    let summary = driver::run(source.as_mut(), display.as_mut(), pipeline)?;
    tracing::info!("Processed {} frames", summary.frames);

    Ok(())
}
