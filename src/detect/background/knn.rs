use image::{GrayImage, Luma, RgbImage};

use super::BackgroundSubtractor;

const SAMPLES_PER_PIXEL: usize = 7;
const REQUIRED_MATCHES: u32 = 2;
const DIST2_THRESHOLD: f32 = 400.0;
/// Frames between reservoir refreshes once a pixel's reservoir is full.
const UPDATE_STRIDE: u64 = 25;

/// Sample-based model: a pixel is background when at least
/// `REQUIRED_MATCHES` of its stored samples sit within the squared color
/// distance threshold.
pub struct KnnModel {
    dimensions: (u32, u32),
    samples: Vec<[u8; 3]>,
    filled: Vec<u8>,
    frames_seen: u64,
}

impl KnnModel {
    pub fn new() -> Self {
        Self {
            dimensions: (0, 0),
            samples: Vec::new(),
            filled: Vec::new(),
            frames_seen: 0,
        }
    }

    fn ensure_dimensions(&mut self, dimensions: (u32, u32)) {
        if self.dimensions != dimensions {
            let pixels = (dimensions.0 * dimensions.1) as usize;
            self.dimensions = dimensions;
            self.samples = vec![[0; 3]; pixels * SAMPLES_PER_PIXEL];
            self.filled = vec![0; pixels];
            self.frames_seen = 0;
        }
    }
}

impl Default for KnnModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundSubtractor for KnnModel {
    fn apply(&mut self, frame: &RgbImage) -> GrayImage {
        self.ensure_dimensions(frame.dimensions());
        self.frames_seen += 1;

        let (width, height) = frame.dimensions();
        let mut mask = GrayImage::new(width, height);
        let refresh = self.frames_seen % UPDATE_STRIDE == 0;
        let slot = ((self.frames_seen / UPDATE_STRIDE) % SAMPLES_PER_PIXEL as u64) as usize;

        for (x, y, pixel) in frame.enumerate_pixels() {
            let index = (y * width + x) as usize;
            let data = [pixel[0], pixel[1], pixel[2]];
            let filled = self.filled[index] as usize;
            let reservoir = &mut self.samples[index * SAMPLES_PER_PIXEL..][..SAMPLES_PER_PIXEL];

            let mut matches = 0;
            for sample in &reservoir[..filled] {
                if sq_dist(data, *sample) <= DIST2_THRESHOLD {
                    matches += 1;
                    if matches >= REQUIRED_MATCHES {
                        break;
                    }
                }
            }

            if filled > 0 && matches < REQUIRED_MATCHES {
                mask.put_pixel(x, y, Luma([255]));
            }

            if filled < SAMPLES_PER_PIXEL {
                reservoir[filled] = data;
                self.filled[index] = filled as u8 + 1;
            } else if refresh {
                reservoir[slot] = data;
            }
        }
        mask
    }
}

fn sq_dist(a: [u8; 3], b: [u8; 3]) -> f32 {
    let d0 = a[0] as f32 - b[0] as f32;
    let d1 = a[1] as f32 - b[1] as f32;
    let d2 = a[2] as f32 - b[2] as f32;
    d0 * d0 + d1 * d1 + d2 * d2
}
