use std::str::FromStr;

use image::{GrayImage, Luma};

use crate::error::PipelineError;

/// The three structuring elements used by the filter chain.
///
/// Each variant maps to a fixed element; nothing is ever derived from
/// frame content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelVariant {
    Opening,
    Closing,
    Dilation,
}

impl FromStr for KernelVariant {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opening" => Ok(KernelVariant::Opening),
            "closing" => Ok(KernelVariant::Closing),
            "dilation" => Ok(KernelVariant::Dilation),
            other => Err(PipelineError::InvalidKernelVariant(other.to_string())),
        }
    }
}

/// A structuring element plus its anchor point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    pub element: GrayImage,
    pub anchor: (u32, u32),
}

impl Kernel {
    /// Build the fixed structuring element for a variant.
    ///
    /// The dilation element is nominally a 2x2 ellipse, which at that
    /// size degenerates to a filled square.
    pub fn of(variant: KernelVariant) -> Self {
        match variant {
            KernelVariant::Dilation => Self::rectangle(2, 2),
            KernelVariant::Opening => Self::rectangle(5, 3),
            KernelVariant::Closing => Self::rectangle(11, 11),
        }
    }

    fn rectangle(width: u32, height: u32) -> Self {
        Self {
            element: GrayImage::from_pixel(width, height, Luma([255])),
            anchor: (width / 2, height / 2),
        }
    }
}
