use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::{bail, Context, Result};
use image::RgbImage;

use super::FrameSource;
use crate::error::PipelineError;

/// Frames decoded from a video file by an `ffmpeg` child process writing
/// raw rgb24 to a pipe. Decoding stays an external collaborator; this
/// type only moves bytes.
pub struct VideoFileSource {
    child: Child,
    stdout: ChildStdout,
    width: u32,
    height: u32,
}

impl VideoFileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (width, height) = probe_dimensions(path)?;
        tracing::info!("opened {} at {}x{}", path.display(), width, height);

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to start ffmpeg (is it installed?)")?;
        let stdout = child
            .stdout
            .take()
            .context("ffmpeg child has no stdout pipe")?;

        Ok(Self {
            child,
            stdout,
            width,
            height,
        })
    }
}

impl FrameSource for VideoFileSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let frame_len = (self.width * self.height * 3) as usize;
        let mut buf = vec![0u8; frame_len];
        let mut filled = 0;
        while filled < frame_len {
            let n = self
                .stdout
                .read(&mut buf[filled..])
                .map_err(|e| PipelineError::SourceRead(e.to_string()))?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(PipelineError::SourceRead(format!(
                    "decoder stopped mid-frame after {filled} of {frame_len} bytes"
                ))
                .into());
            }
            filled += n;
        }
        let frame = RgbImage::from_raw(self.width, self.height, buf)
            .ok_or_else(|| PipelineError::SourceRead("frame buffer size mismatch".into()))?;
        Ok(Some(frame))
    }
}

impl Drop for VideoFileSource {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn probe_dimensions(path: &Path) -> Result<(u32, u32)> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=s=x:p=0",
        ])
        .arg(path)
        .output()
        .context("failed to run ffprobe (is it installed?)")?;
    if !output.status.success() {
        bail!(
            "ffprobe failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    let text = String::from_utf8_lossy(&output.stdout);
    let line = text.trim().lines().next().unwrap_or("");
    let (w, h) = line
        .split_once('x')
        .with_context(|| format!("unexpected ffprobe output {line:?}"))?;
    Ok((
        w.trim().parse().context("bad width from ffprobe")?,
        h.trim().parse().context("bad height from ffprobe")?,
    ))
}
