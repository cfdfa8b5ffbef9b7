mod headless;
mod window;

pub use headless::NullDisplay;
pub use window::WindowDisplay;

use anyhow::Result;
use image::RgbImage;

/// Where processed frames go: the annotated frame and the masked
/// composite, presented once per pipeline iteration.
pub trait DisplaySink {
    fn present(&mut self, frame: &RgbImage, composite: &RgbImage) -> Result<()>;

    /// Cooperative quit check, polled once per frame by the driver.
    fn quit_requested(&mut self) -> bool;
}
