use super::background::BgsAlgorithm;
use crate::error::PipelineError;

/// Everything the pipeline needs decided up front. Built once from the
/// CLI and handed to `Pipeline::new`; nothing here is global state.
#[derive(Debug, Clone, Copy)]
pub struct DetectorConfig {
    pub algorithm: BgsAlgorithm,
    /// Contour area (inclusive) at which a region becomes tracked.
    pub min_area: f64,
    /// Contour area (inclusive) at which a tracked region becomes a warning.
    pub max_area: f64,
    /// Scale applied to both axes of every frame before processing.
    pub resize_scale: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            algorithm: BgsAlgorithm::Mog2,
            min_area: 1000.0,
            max_area: 3000.0,
            resize_scale: 0.5,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(self.resize_scale > 0.0 && self.resize_scale.is_finite()) {
            return Err(PipelineError::InvalidConfiguration(format!(
                "resize scale must be positive, got {}",
                self.resize_scale
            )));
        }
        if self.min_area < 0.0 || self.max_area < self.min_area {
            return Err(PipelineError::InvalidConfiguration(format!(
                "area thresholds must satisfy 0 <= min ({}) <= max ({})",
                self.min_area, self.max_area
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_scale_and_inverted_thresholds_are_rejected() {
        let mut config = DetectorConfig {
            resize_scale: 0.0,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());

        config.resize_scale = 0.5;
        config.min_area = 5000.0;
        assert!(config.validate().is_err());
    }
}
