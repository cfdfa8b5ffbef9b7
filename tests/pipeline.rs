//! End-to-end scenarios: synthetic frame sequences through the full
//! pipeline, from background learning to annotated output.

use anyhow::Result;
use image::{Rgb, RgbImage};

use crowdwatch::detect::{annotate, regions, BgsAlgorithm, DetectorConfig, Pipeline};
use crowdwatch::display::NullDisplay;
use crowdwatch::driver;
use crowdwatch::source::FrameSource;

const SCENE: [u8; 3] = [100, 100, 100];
const INTRUDER: [u8; 3] = [210, 60, 60];

fn static_frame() -> RgbImage {
    RgbImage::from_pixel(200, 200, Rgb(SCENE))
}

fn frame_with_block(x0: u32, y0: u32, side: u32) -> RgbImage {
    let mut frame = static_frame();
    for y in y0..y0 + side {
        for x in x0..x0 + side {
            frame.put_pixel(x, y, Rgb(INTRUDER));
        }
    }
    frame
}

fn full_resolution_pipeline() -> Pipeline {
    Pipeline::new(DetectorConfig {
        algorithm: BgsAlgorithm::Mog2,
        resize_scale: 1.0,
        ..DetectorConfig::default()
    })
    .unwrap()
}

#[test]
fn medium_block_is_tracked_not_warned() {
    let mut pipeline = full_resolution_pipeline();

    // frames 1-10: static scene, the model learns, masks stay empty
    for _ in 0..10 {
        let output = pipeline.process_frame(&static_frame());
        assert_eq!(output.stats.tracked, 0);
        assert_eq!(output.stats.warnings, 0);
    }

    // frame 11: a 50x50 block moves in
    let output = pipeline.process_frame(&frame_with_block(60, 60, 50));
    assert_eq!(output.stats.tracked, 1);
    assert_eq!(output.stats.warnings, 0);

    let found: Vec<_> = regions::regions(&output.mask).collect();
    assert_eq!(found.len(), 1);
    let area = found[0].area;
    assert!(
        (2250.0..=2750.0).contains(&area),
        "expected area near 2500, got {area}"
    );

    // tracked drawing sequence only: no warning label anywhere
    assert!(output
        .frame
        .pixels()
        .any(|p| *p == annotate::TRACKER_COLOR));
    assert!(!output
        .frame
        .pixels()
        .any(|p| *p == annotate::LABEL_BACKGROUND));
    assert!(!output
        .frame
        .pixels()
        .any(|p| *p == annotate::WARNING_COLOR));
}

#[test]
fn large_block_raises_a_warning_with_anchored_label() {
    let mut pipeline = full_resolution_pipeline();
    for _ in 0..10 {
        pipeline.process_frame(&static_frame());
    }

    let output = pipeline.process_frame(&frame_with_block(60, 60, 60));
    assert_eq!(output.stats.warnings, 1);
    assert_eq!(output.stats.tracked, 0);
    assert!(output
        .frame
        .pixels()
        .any(|p| *p == annotate::WARNING_COLOR));

    // the label background sits just above the detected top-left corner
    let label_pixels: Vec<(u32, u32)> = output
        .frame
        .enumerate_pixels()
        .filter(|(_, _, p)| **p == annotate::LABEL_BACKGROUND)
        .map(|(x, y, _)| (x, y))
        .collect();
    assert!(!label_pixels.is_empty());
    let min_x = label_pixels.iter().map(|&(x, _)| x).min().unwrap();
    let min_y = label_pixels.iter().map(|&(_, y)| y).min().unwrap();
    assert!((57..=63).contains(&min_x), "label min x = {min_x}");
    assert!((44..=50).contains(&min_y), "label min y = {min_y}");
}

#[test]
fn composite_is_masked_and_captioned() {
    let mut pipeline = full_resolution_pipeline();
    for _ in 0..10 {
        pipeline.process_frame(&static_frame());
    }
    let output = pipeline.process_frame(&frame_with_block(60, 60, 50));

    // background pixels are blacked out, block pixels keep their color
    assert_eq!(*output.composite.get_pixel(190, 190), Rgb([0, 0, 0]));
    assert_eq!(*output.composite.get_pixel(85, 85), Rgb(INTRUDER));

    // the caption names the active algorithm
    assert!(output
        .composite
        .pixels()
        .any(|p| *p == annotate::TEXT_COLOR));
}

struct VecSource {
    frames: Vec<RgbImage>,
}

impl FrameSource for VecSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        if self.frames.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.frames.remove(0)))
        }
    }
}

#[test]
fn five_frame_source_runs_five_iterations_then_stops() {
    let mut source = VecSource {
        frames: (0..5).map(|_| static_frame()).collect(),
    };
    let mut display = NullDisplay::new();
    let summary = driver::run(&mut source, &mut display, full_resolution_pipeline()).unwrap();
    assert_eq!(summary.frames, 5);
    assert_eq!(display.frames_presented, 5);
}
