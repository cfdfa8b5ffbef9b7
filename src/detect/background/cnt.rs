use image::{GrayImage, Luma, RgbImage};

use super::BackgroundSubtractor;

/// Frames a value must hold steady before it becomes the background.
const MIN_STABILITY: u16 = 15;
/// Gray-level slack when comparing against the stable value.
const VALUE_SLACK: u8 = 10;

#[derive(Debug, Clone, Copy, Default)]
struct PixelState {
    candidate: u8,
    stable_for: u16,
    background: u8,
    learned: bool,
}

/// Counting model: tracks how long each pixel's gray level has been
/// stable and promotes long-stable values to the background.
pub struct CntModel {
    dimensions: (u32, u32),
    state: Vec<PixelState>,
}

impl CntModel {
    pub fn new() -> Self {
        Self {
            dimensions: (0, 0),
            state: Vec::new(),
        }
    }

    fn ensure_dimensions(&mut self, dimensions: (u32, u32)) {
        if self.dimensions != dimensions {
            let pixels = (dimensions.0 * dimensions.1) as usize;
            self.dimensions = dimensions;
            self.state = vec![PixelState::default(); pixels];
        }
    }
}

impl Default for CntModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundSubtractor for CntModel {
    fn apply(&mut self, frame: &RgbImage) -> GrayImage {
        self.ensure_dimensions(frame.dimensions());

        let (width, height) = frame.dimensions();
        let mut mask = GrayImage::new(width, height);
        for (x, y, pixel) in frame.enumerate_pixels() {
            let index = (y * width + x) as usize;
            let gray = luma(pixel.0);
            let state = &mut self.state[index];

            if gray.abs_diff(state.candidate) <= VALUE_SLACK {
                state.stable_for = state.stable_for.saturating_add(1);
            } else {
                state.candidate = gray;
                state.stable_for = 0;
            }
            if state.stable_for >= MIN_STABILITY {
                state.background = state.candidate;
                state.learned = true;
            }

            if state.learned && gray.abs_diff(state.background) > VALUE_SLACK {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask
    }
}

fn luma(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb;
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
}
