use image::{imageops, GrayImage, RgbImage};
use imageproc::filter::median_filter;

use super::annotate;
use super::background::{self, BackgroundSubtractor};
use super::config::DetectorConfig;
use super::filter::{self, FilterMode};
use super::regions::{self, Band};
use crate::error::PipelineError;

/// Everything produced for one frame.
pub struct FrameOutput {
    /// The resized frame with region overlays drawn onto it.
    pub frame: RgbImage,
    /// The cleaned foreground mask the classifier ran on.
    pub mask: GrayImage,
    /// Masked composite with the algorithm caption.
    pub composite: RgbImage,
    pub stats: RegionStats,
}

/// Per-frame region counts. `warnings` is the hook a future alerting
/// integration would consume; none exists today.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionStats {
    pub tracked: usize,
    pub warnings: usize,
}

/// The frame-processing pipeline. Owns the background model; the model's
/// statistics are reachable only through `process_frame`.
pub struct Pipeline {
    config: DetectorConfig,
    subtractor: Box<dyn BackgroundSubtractor>,
    algorithm_label: String,
}

impl Pipeline {
    pub fn new(config: DetectorConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            subtractor: background::create_subtractor(config.algorithm),
            algorithm_label: config.algorithm.to_string(),
        })
    }

    /// Run one frame through the full chain: resize, background
    /// subtraction, morphological cleanup, median blur, region
    /// classification, annotation, composite.
    pub fn process_frame(&mut self, frame: &RgbImage) -> FrameOutput {
        let mut frame = self.resize(frame);

        let raw_mask = self.subtractor.apply(&frame);
        let cleaned = filter::apply(&raw_mask, FilterMode::Combine);
        let mask = median_filter(&cleaned, 2, 2);

        let mut stats = RegionStats::default();
        for region in regions::regions(&mask) {
            let band = regions::classify(region.area, self.config.min_area, self.config.max_area);
            match band {
                Band::Ignored => continue,
                Band::Tracked => stats.tracked += 1,
                Band::Warning => stats.warnings += 1,
            }
            tracing::debug!(
                area = region.area,
                x = region.bounding_box.left(),
                y = region.bounding_box.top(),
                "region classified as {band:?}"
            );
            annotate::draw_region(&mut frame, &region, band);
        }

        let mut composite = annotate::composite(&frame, &mask);
        annotate::draw_caption(&mut composite, &self.algorithm_label);

        FrameOutput {
            frame,
            mask,
            composite,
            stats,
        }
    }

    fn resize(&self, frame: &RgbImage) -> RgbImage {
        let scale = self.config.resize_scale;
        let (width, height) = frame.dimensions();
        let target_w = ((width as f32 * scale) as u32).max(1);
        let target_h = ((height as f32 * scale) as u32).max(1);
        if (target_w, target_h) == (width, height) {
            frame.clone()
        } else {
            imageops::resize(frame, target_w, target_h, imageops::FilterType::Triangle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::background::BgsAlgorithm;
    use image::Rgb;

    #[test]
    fn frames_are_resized_by_the_configured_scale() {
        let mut pipeline = Pipeline::new(DetectorConfig::default()).unwrap();
        let frame = RgbImage::from_pixel(64, 48, Rgb([100, 100, 100]));
        let output = pipeline.process_frame(&frame);
        assert_eq!(output.frame.dimensions(), (32, 24));
        assert_eq!(output.mask.dimensions(), (32, 24));
        assert_eq!(output.composite.dimensions(), (32, 24));
    }

    #[test]
    fn invalid_configuration_is_rejected_at_construction() {
        let config = DetectorConfig {
            resize_scale: -1.0,
            ..DetectorConfig::default()
        };
        assert!(Pipeline::new(config).is_err());
    }

    #[test]
    fn static_scene_produces_no_regions() {
        let config = DetectorConfig {
            algorithm: BgsAlgorithm::Mog2,
            resize_scale: 1.0,
            ..DetectorConfig::default()
        };
        let mut pipeline = Pipeline::new(config).unwrap();
        let frame = RgbImage::from_pixel(120, 120, Rgb([100, 100, 100]));
        let mut last = pipeline.process_frame(&frame);
        for _ in 0..9 {
            last = pipeline.process_frame(&frame);
        }
        assert_eq!(last.stats.tracked, 0);
        assert_eq!(last.stats.warnings, 0);
        assert!(last.mask.pixels().all(|p| p[0] == 0));
    }
}
