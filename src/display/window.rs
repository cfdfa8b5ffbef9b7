use anyhow::{anyhow, Result};
use image::RgbImage;
use minifb::{Key, Window, WindowOptions};

use super::DisplaySink;

/// Two live windows, "Frame" and "Mask", refreshed once per processed
/// frame. Created lazily at the first present, when the frame size is
/// known; Q or closing either window requests a quit.
pub struct WindowDisplay {
    windows: Option<Windows>,
}

struct Windows {
    frame: Window,
    mask: Window,
    size: (usize, usize),
}

impl WindowDisplay {
    pub fn new() -> Self {
        Self { windows: None }
    }

    fn ensure_windows(&mut self, size: (usize, usize)) -> Result<&mut Windows> {
        let stale = self
            .windows
            .as_ref()
            .map(|w| w.size != size)
            .unwrap_or(true);
        if stale {
            tracing::info!("opening display windows at {}x{}", size.0, size.1);
            let frame = Window::new("Frame", size.0, size.1, WindowOptions::default())
                .map_err(|e| anyhow!("failed to open frame window: {e}"))?;
            let mask = Window::new("Mask", size.0, size.1, WindowOptions::default())
                .map_err(|e| anyhow!("failed to open mask window: {e}"))?;
            self.windows = Some(Windows { frame, mask, size });
        }
        Ok(self.windows.as_mut().expect("windows just created"))
    }
}

impl Default for WindowDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for WindowDisplay {
    fn present(&mut self, frame: &RgbImage, composite: &RgbImage) -> Result<()> {
        let size = (frame.width() as usize, frame.height() as usize);
        let windows = self.ensure_windows(size)?;

        let frame_buf = rgb_to_argb(frame);
        windows
            .frame
            .update_with_buffer(&frame_buf, size.0, size.1)
            .map_err(|e| anyhow!("failed to update frame window: {e}"))?;

        let mask_buf = rgb_to_argb(composite);
        windows
            .mask
            .update_with_buffer(&mask_buf, size.0, size.1)
            .map_err(|e| anyhow!("failed to update mask window: {e}"))?;
        Ok(())
    }

    fn quit_requested(&mut self) -> bool {
        match &self.windows {
            Some(w) => {
                !w.frame.is_open()
                    || !w.mask.is_open()
                    || w.frame.is_key_down(Key::Q)
                    || w.mask.is_key_down(Key::Q)
            }
            None => false,
        }
    }
}

/// Pack RGB pixels into the 0RGB u32 layout minifb expects.
fn rgb_to_argb(image: &RgbImage) -> Vec<u32> {
    image
        .pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect()
}
