use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbImage;

use super::FrameSource;
use crate::error::PipelineError;

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Frames read from a directory of image files, in filename order.
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageSequenceSource {
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(directory)
            .with_context(|| format!("failed to list frames in {}", directory.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            tracing::warn!("no image frames found in {}", directory.display());
        } else {
            tracing::info!("found {} frames in {}", paths.len(), directory.display());
        }

        Ok(Self { paths, next: 0 })
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        let frame = image::open(path)
            .map_err(|e| PipelineError::SourceRead(format!("{}: {e}", path.display())))?
            .to_rgb8();
        Ok(Some(frame))
    }
}
