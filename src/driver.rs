use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::detect::Pipeline;
use crate::display::DisplaySink;
use crate::source::FrameSource;

/// What a completed run looked like.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub frames: u64,
}

/// Pull frames from the source, run each through the pipeline, present
/// the two surfaces and poll for a quit request. Fully sequential; one
/// frame is finished before the next is read.
pub fn run<S, D>(source: &mut S, display: &mut D, mut pipeline: Pipeline) -> Result<RunSummary>
where
    S: FrameSource + ?Sized,
    D: DisplaySink + ?Sized,
{
    let mut frames = 0u64;
    let mut total_read_time = Duration::ZERO;
    let mut total_detect_time = Duration::ZERO;
    let mut total_present_time = Duration::ZERO;

    tracing::info!("starting main pipeline loop");

    loop {
        let read_start = Instant::now();
        let Some(frame) = source
            .next_frame()
            .context("failed to read frame from source")?
        else {
            tracing::info!("finished processing: source exhausted after {frames} frames");
            break;
        };
        total_read_time += read_start.elapsed();

        let detect_start = Instant::now();
        let output = pipeline.process_frame(&frame);
        total_detect_time += detect_start.elapsed();

        if output.stats.warnings > 0 {
            tracing::debug!(
                warnings = output.stats.warnings,
                tracked = output.stats.tracked,
                "crowding warning raised"
            );
        }

        let present_start = Instant::now();
        display
            .present(&output.frame, &output.composite)
            .context("failed to present frame")?;
        total_present_time += present_start.elapsed();

        frames += 1;

        // Log stats every 30 frames
        if frames % 30 == 0 {
            let avg_read_ms = total_read_time.as_secs_f64() * 1000.0 / frames as f64;
            let avg_detect_ms = total_detect_time.as_secs_f64() * 1000.0 / frames as f64;
            let avg_present_ms = total_present_time.as_secs_f64() * 1000.0 / frames as f64;
            let total_ms = avg_read_ms + avg_detect_ms + avg_present_ms;
            tracing::info!(
                "Frame {}: read={:.1}ms, detect={:.1}ms, present={:.1}ms, total={:.1}ms, fps={:.1}",
                frames,
                avg_read_ms,
                avg_detect_ms,
                avg_present_ms,
                total_ms,
                1000.0 / total_ms
            );
        }

        if display.quit_requested() {
            tracing::info!("quit requested after {frames} frames");
            break;
        }
    }

    Ok(RunSummary { frames })
}
