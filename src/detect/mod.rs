pub mod annotate;
pub mod background;
pub mod config;
pub mod filter;
mod font;
pub mod kernel;
pub mod pipeline;
pub mod regions;

pub use background::{BackgroundSubtractor, BgsAlgorithm};
pub use config::DetectorConfig;
pub use pipeline::{FrameOutput, Pipeline, RegionStats};
