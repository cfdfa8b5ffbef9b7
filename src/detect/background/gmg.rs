use image::{GrayImage, Luma, RgbImage};

use super::BackgroundSubtractor;

/// Two bits per channel gives 64 color bins per pixel.
const BINS: usize = 64;
const DEFAULT_INIT_FRAMES: u32 = 120;
const DEFAULT_DECISION_THRESHOLD: f32 = 0.8;
/// Halve all counts once a pixel's total reaches this, so old evidence decays.
const COUNT_CEILING: u32 = 60_000;

/// Histogram model: each pixel accumulates a quantized-color histogram
/// during an initialization window, then flags colors that were rarely
/// part of the scene. Outputs an empty mask until initialized.
pub struct GmgModel {
    dimensions: (u32, u32),
    init_frames: u32,
    decision_threshold: f32,
    histograms: Vec<[u16; BINS]>,
    total: u32,
    frames_seen: u32,
}

impl GmgModel {
    pub fn new() -> Self {
        Self::with_params(DEFAULT_INIT_FRAMES, DEFAULT_DECISION_THRESHOLD)
    }

    pub fn with_params(init_frames: u32, decision_threshold: f32) -> Self {
        Self {
            dimensions: (0, 0),
            init_frames,
            decision_threshold,
            histograms: Vec::new(),
            total: 0,
            frames_seen: 0,
        }
    }

    fn ensure_dimensions(&mut self, dimensions: (u32, u32)) {
        if self.dimensions != dimensions {
            let pixels = (dimensions.0 * dimensions.1) as usize;
            self.dimensions = dimensions;
            self.histograms = vec![[0; BINS]; pixels];
            self.total = 0;
            self.frames_seen = 0;
        }
    }
}

impl Default for GmgModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundSubtractor for GmgModel {
    fn apply(&mut self, frame: &RgbImage) -> GrayImage {
        self.ensure_dimensions(frame.dimensions());
        self.frames_seen = self.frames_seen.saturating_add(1);
        let initialized = self.frames_seen > self.init_frames;

        if self.total >= COUNT_CEILING {
            for histogram in &mut self.histograms {
                for count in histogram.iter_mut() {
                    *count /= 2;
                }
            }
            self.total /= 2;
        }

        let (width, height) = frame.dimensions();
        let mut mask = GrayImage::new(width, height);
        let rare = (1.0 - self.decision_threshold) * self.total as f32;
        for (x, y, pixel) in frame.enumerate_pixels() {
            let index = (y * width + x) as usize;
            let bin = quantize(pixel.0);
            let histogram = &mut self.histograms[index];
            if initialized && (histogram[bin] as f32) < rare {
                mask.put_pixel(x, y, Luma([255]));
            }
            histogram[bin] = histogram[bin].saturating_add(1);
        }
        self.total += 1;
        mask
    }
}

fn quantize(rgb: [u8; 3]) -> usize {
    let [r, g, b] = rgb;
    (((r >> 6) as usize) << 4) | (((g >> 6) as usize) << 2) | ((b >> 6) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::background::testutil::{flat_frame, frame_with_block};

    #[test]
    fn mask_is_empty_during_initialization() {
        let mut model = GmgModel::with_params(5, 0.8);
        let frame = frame_with_block(8, 8, [60, 60, 60], [250, 10, 10], 2, 2, 3);
        for _ in 0..5 {
            let mask = model.apply(&frame);
            assert!(mask.pixels().all(|p| p[0] == 0));
        }
    }

    #[test]
    fn rare_colors_are_foreground_after_initialization() {
        let mut model = GmgModel::with_params(5, 0.8);
        let scene = flat_frame(8, 8, [60, 60, 60]);
        for _ in 0..10 {
            model.apply(&scene);
        }
        let intruder = frame_with_block(8, 8, [60, 60, 60], [250, 10, 10], 2, 2, 3);
        let mask = model.apply(&intruder);
        assert_eq!(mask.get_pixel(3, 3)[0], 255);
        assert_eq!(mask.get_pixel(7, 7)[0], 0);
    }
}
