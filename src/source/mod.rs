mod image_sequence;
mod video_file;

pub use image_sequence::ImageSequenceSource;
pub use video_file::VideoFileSource;

use anyhow::Result;
use image::RgbImage;

/// A sequence of raster frames.
///
/// `Ok(None)` signals normal exhaustion and is how a run ends; a decode
/// failure mid-stream is an `Err`, kept distinct from exhaustion.
pub trait FrameSource {
    /// Block until the next frame is available, or report end of stream.
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}
