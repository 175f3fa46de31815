use std::path::PathBuf;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DelayError, DelayResult};
use crate::render::frame::Frame;

/// Writes each frame as `<prefix><index:06>.png` inside a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    prefix: String,
    cfg: Option<SinkConfig>,
    written: u64,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "frame_".to_owned(),
            cfg: None,
            written: 0,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn path_for(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("{}{:06}.png", self.prefix, idx.0))
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> DelayResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create frames directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> DelayResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| DelayError::sink_unavailable("png sink not started"))?;
        cfg.check_frame(frame)?;
        let path = self.path_for(idx);
        frame
            .to_rgb_image()
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> DelayResult<()> {
        tracing::info!(
            frames = self.written,
            dir = %self.dir.display(),
            "png sequence written"
        );
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
