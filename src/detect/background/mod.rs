mod cnt;
mod gmg;
mod knn;
mod mixture;

pub use cnt::CntModel;
pub use gmg::GmgModel;
pub use knn::KnnModel;
pub use mixture::{MixtureModel, MixtureParams};

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use image::{GrayImage, RgbImage};

use crate::error::PipelineError;

/// The supported background-subtraction family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BgsAlgorithm {
    Gmg,
    Mog,
    Mog2,
    Knn,
    Cnt,
}

impl fmt::Display for BgsAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BgsAlgorithm::Gmg => "GMG",
            BgsAlgorithm::Mog => "MOG",
            BgsAlgorithm::Mog2 => "MOG2",
            BgsAlgorithm::Knn => "KNN",
            BgsAlgorithm::Cnt => "CNT",
        };
        f.write_str(name)
    }
}

impl FromStr for BgsAlgorithm {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GMG" => Ok(BgsAlgorithm::Gmg),
            "MOG" => Ok(BgsAlgorithm::Mog),
            "MOG2" => Ok(BgsAlgorithm::Mog2),
            "KNN" => Ok(BgsAlgorithm::Knn),
            "CNT" => Ok(BgsAlgorithm::Cnt),
            other => Err(PipelineError::InvalidAlgorithm(other.to_string())),
        }
    }
}

/// A per-pixel statistical model of the static scene.
///
/// `apply` is the single operation: it updates the model with the frame
/// and returns the foreground estimate for that same frame, atomically.
/// Early frames produce noisier masks while the model learns the scene.
pub trait BackgroundSubtractor {
    /// Update the model with `frame` and return its foreground mask
    /// (0 = background, 255 = foreground candidate).
    fn apply(&mut self, frame: &RgbImage) -> GrayImage;
}

/// Construct the model for the selected algorithm.
pub fn create_subtractor(algorithm: BgsAlgorithm) -> Box<dyn BackgroundSubtractor> {
    match algorithm {
        BgsAlgorithm::Gmg => Box::new(GmgModel::new()),
        BgsAlgorithm::Mog => Box::new(MixtureModel::new(MixtureParams::mog())),
        BgsAlgorithm::Mog2 => Box::new(MixtureModel::new(MixtureParams::mog2())),
        BgsAlgorithm::Knn => Box::new(KnnModel::new()),
        BgsAlgorithm::Cnt => Box::new(CntModel::new()),
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use image::{Rgb, RgbImage};

    pub(crate) fn flat_frame(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(color))
    }

    pub(crate) fn frame_with_block(
        width: u32,
        height: u32,
        scene: [u8; 3],
        block: [u8; 3],
        x0: u32,
        y0: u32,
        side: u32,
    ) -> RgbImage {
        let mut frame = flat_frame(width, height, scene);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                frame.put_pixel(x, y, Rgb(block));
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::flat_frame;
    use super::*;

    #[test]
    fn algorithm_names_round_trip() {
        for (name, algorithm) in [
            ("GMG", BgsAlgorithm::Gmg),
            ("MOG", BgsAlgorithm::Mog),
            ("MOG2", BgsAlgorithm::Mog2),
            ("KNN", BgsAlgorithm::Knn),
            ("CNT", BgsAlgorithm::Cnt),
        ] {
            assert_eq!(name.parse::<BgsAlgorithm>().unwrap(), algorithm);
            assert_eq!(algorithm.to_string(), name);
        }
    }

    #[test]
    fn unknown_algorithm_is_a_configuration_error() {
        assert!(matches!(
            "MOG3".parse::<BgsAlgorithm>(),
            Err(PipelineError::InvalidAlgorithm(name)) if name == "MOG3"
        ));
    }

    #[test]
    fn every_family_member_learns_a_static_scene() {
        for algorithm in [
            BgsAlgorithm::Gmg,
            BgsAlgorithm::Mog,
            BgsAlgorithm::Mog2,
            BgsAlgorithm::Knn,
            BgsAlgorithm::Cnt,
        ] {
            let mut model = create_subtractor(algorithm);
            let frame = flat_frame(24, 24, [90, 90, 90]);
            let mut mask = model.apply(&frame);
            for _ in 0..40 {
                mask = model.apply(&frame);
            }
            assert!(
                mask.pixels().all(|p| p[0] == 0),
                "{algorithm} still reports foreground on a static scene"
            );
        }
    }
}
