use image::{GrayImage, Luma, RgbImage};

use super::BackgroundSubtractor;

/// Tuning for the adaptive Gaussian-mixture models.
#[derive(Debug, Clone, Copy)]
pub struct MixtureParams {
    /// Frames over which the learning rate settles (alpha = 1/history).
    pub history: u32,
    /// Maximum Gaussian modes kept per pixel.
    pub max_modes: usize,
    /// Squared-distance multiplier for the background decision.
    pub var_threshold: f32,
    /// Squared-distance multiplier for assigning a sample to a mode.
    pub var_threshold_gen: f32,
    /// Cumulative weight that counts as "the background".
    pub background_ratio: f32,
    pub var_init: f32,
    pub var_min: f32,
    pub var_max: f32,
    /// Complexity-reduction term; starved modes decay below zero and drop.
    pub prune: f32,
}

impl MixtureParams {
    /// Zivkovic adaptive mixture, shadow detection off, variance threshold 80.
    pub fn mog2() -> Self {
        Self {
            history: 500,
            max_modes: 5,
            var_threshold: 80.0,
            var_threshold_gen: 9.0,
            background_ratio: 0.9,
            var_init: 15.0,
            var_min: 4.0,
            var_max: 75.0,
            prune: 0.05,
        }
    }

    /// Classic KaewTraKulPong mixture parameters.
    pub fn mog() -> Self {
        Self {
            history: 200,
            max_modes: 5,
            var_threshold: 6.25,
            var_threshold_gen: 6.25,
            background_ratio: 0.7,
            var_init: 900.0,
            var_min: 100.0,
            var_max: 4500.0,
            prune: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct GaussMode {
    weight: f32,
    var: f32,
    mean: [f32; 3],
}

/// Per-pixel mixture of Gaussians over RGB, kept sorted by weight.
pub struct MixtureModel {
    params: MixtureParams,
    dimensions: (u32, u32),
    modes: Vec<GaussMode>,
    mode_counts: Vec<u8>,
    frames_seen: u32,
}

impl MixtureModel {
    pub fn new(params: MixtureParams) -> Self {
        Self {
            params,
            dimensions: (0, 0),
            modes: Vec::new(),
            mode_counts: Vec::new(),
            frames_seen: 0,
        }
    }

    fn ensure_dimensions(&mut self, dimensions: (u32, u32)) {
        if self.dimensions != dimensions {
            let pixels = (dimensions.0 * dimensions.1) as usize;
            self.dimensions = dimensions;
            self.modes = vec![GaussMode::default(); pixels * self.params.max_modes];
            self.mode_counts = vec![0; pixels];
            self.frames_seen = 0;
        }
    }

    /// Update one pixel's mixture and report whether it is foreground.
    fn update_pixel(&mut self, index: usize, data: [f32; 3], alpha: f32) -> bool {
        let params = self.params;
        let modes = &mut self.modes[index * params.max_modes..(index + 1) * params.max_modes];
        let mut count = self.mode_counts[index] as usize;
        let prune = -alpha * params.prune;

        // decay all weights, let the first matching mode absorb the sample
        let mut matched: Option<usize> = None;
        for m in 0..count {
            let mode = &mut modes[m];
            mode.weight = (1.0 - alpha) * mode.weight + prune;
            if matched.is_none() {
                let dist2 = sq_dist(data, mode.mean);
                if dist2 < params.var_threshold_gen * mode.var {
                    matched = Some(m);
                    mode.weight += alpha;
                    let k = alpha / mode.weight;
                    for c in 0..3 {
                        mode.mean[c] += k * (data[c] - mode.mean[c]);
                    }
                    mode.var = (mode.var + k * (dist2 - mode.var))
                        .clamp(params.var_min, params.var_max);
                }
            }
        }

        // drop starved modes
        let mut keep = 0;
        for m in 0..count {
            if modes[m].weight > 0.0 {
                if keep != m {
                    modes[keep] = modes[m];
                    if matched == Some(m) {
                        matched = Some(keep);
                    }
                }
                keep += 1;
            }
        }
        count = keep;

        // no mode fits: spawn one, replacing the weakest when full
        if matched.is_none() {
            if count < params.max_modes {
                count += 1;
            }
            let last = count - 1;
            modes[last] = GaussMode {
                weight: alpha,
                var: params.var_init,
                mean: data,
            };
            matched = Some(last);
        }

        // keep descending weight order; the touched mode is the only stray
        let mut m = matched.unwrap_or(0);
        while m > 0 && modes[m].weight > modes[m - 1].weight {
            modes.swap(m, m - 1);
            m -= 1;
        }
        let matched = m;

        let total: f32 = modes[..count].iter().map(|mode| mode.weight).sum();
        if total > 0.0 {
            for mode in &mut modes[..count] {
                mode.weight /= total;
            }
        }
        self.mode_counts[index] = count as u8;

        // background iff the sample landed in a strong-enough mode, close enough
        let mut cumulative = 0.0;
        for m in 0..count {
            if m == matched {
                let dist2 = sq_dist(data, modes[m].mean);
                return dist2 >= params.var_threshold * modes[m].var;
            }
            cumulative += modes[m].weight;
            if cumulative > params.background_ratio {
                break;
            }
        }
        true
    }
}

fn sq_dist(a: [f32; 3], b: [f32; 3]) -> f32 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    d0 * d0 + d1 * d1 + d2 * d2
}

impl BackgroundSubtractor for MixtureModel {
    fn apply(&mut self, frame: &RgbImage) -> GrayImage {
        self.ensure_dimensions(frame.dimensions());
        self.frames_seen = self.frames_seen.saturating_add(1);
        let alpha = 1.0 / self.frames_seen.min(self.params.history).max(1) as f32;

        let (width, height) = frame.dimensions();
        let mut mask = GrayImage::new(width, height);
        for (x, y, pixel) in frame.enumerate_pixels() {
            let index = (y * width + x) as usize;
            let data = [pixel[0] as f32, pixel[1] as f32, pixel[2] as f32];
            if self.update_pixel(index, data, alpha) {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::background::testutil::{flat_frame, frame_with_block};

    #[test]
    fn static_scene_settles_to_empty_mask() {
        let mut model = MixtureModel::new(MixtureParams::mog2());
        let frame = flat_frame(32, 32, [100, 100, 100]);
        let mut mask = model.apply(&frame);
        for _ in 0..10 {
            mask = model.apply(&frame);
        }
        assert!(mask.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn new_object_is_flagged_as_foreground() {
        let mut model = MixtureModel::new(MixtureParams::mog2());
        let scene = flat_frame(32, 32, [100, 100, 100]);
        for _ in 0..10 {
            model.apply(&scene);
        }
        let intruder = frame_with_block(32, 32, [100, 100, 100], [220, 40, 40], 8, 8, 10);
        let mask = model.apply(&intruder);
        assert_eq!(mask.get_pixel(12, 12)[0], 255);
        assert_eq!(mask.get_pixel(2, 2)[0], 0);
        assert_eq!(mask.get_pixel(30, 30)[0], 0);
    }

    #[test]
    fn stale_object_is_absorbed_into_the_background() {
        let mut model = MixtureModel::new(MixtureParams::mog2());
        let scene = flat_frame(16, 16, [100, 100, 100]);
        for _ in 0..5 {
            model.apply(&scene);
        }
        // a parked object eventually outweighs the old background mode
        let parked = flat_frame(16, 16, [30, 200, 30]);
        let mut mask = model.apply(&parked);
        assert!(mask.pixels().any(|p| p[0] == 255));
        for _ in 0..400 {
            mask = model.apply(&parked);
        }
        assert!(mask.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn dimension_change_resets_the_model() {
        let mut model = MixtureModel::new(MixtureParams::mog2());
        model.apply(&flat_frame(16, 16, [100, 100, 100]));
        let mask = model.apply(&flat_frame(8, 8, [100, 100, 100]));
        assert_eq!(mask.dimensions(), (8, 8));
    }
}
