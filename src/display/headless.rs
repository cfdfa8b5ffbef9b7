use anyhow::Result;
use image::RgbImage;

use super::DisplaySink;

/// Discards every frame. Used for `--headless` runs and in tests.
#[derive(Debug, Default)]
pub struct NullDisplay {
    pub frames_presented: u64,
}

impl NullDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for NullDisplay {
    fn present(&mut self, _frame: &RgbImage, _composite: &RgbImage) -> Result<()> {
        self.frames_presented += 1;
        Ok(())
    }

    fn quit_requested(&mut self) -> bool {
        false
    }
}
