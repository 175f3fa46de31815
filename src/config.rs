use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::capture::source::CaptureSpec;
use crate::foundation::core::{Fps, FrameSize};
use crate::foundation::error::{DelayError, DelayResult};
use crate::present::post::PostConfig;
use crate::session::state::{CompositionParams, RuntimeControls};

/// How acquisition, composition and presentation are scheduled within a cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concurrency {
    /// One thread, acquire then compose then present.
    Sequential,
    /// Acquisition and composition joined on a worker pool, then presentation.
    #[default]
    Parallel,
}

/// Where presented frames go.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum OutputSpec {
    /// An `ffplay` window.
    Display { title: String, fullscreen: bool },
    /// An encoded video file.
    File { path: PathBuf, codec: String },
    /// Numbered PNG files in a directory.
    Frames { dir: PathBuf },
    /// Discard output.
    Discard,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self::Display {
            title: "webcam-delays".to_owned(),
            fullscreen: true,
        }
    }
}

/// Engine configuration, read from JSON and then overridden from the command line.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub source: CaptureSpec,
    /// Deepest look-back; the ring holds `max_delay + 2` frames.
    pub max_delay: u32,
    pub initial_delay: u32,
    /// Requested capture size (cameras only; files keep their own size).
    pub frame_size: FrameSize,
    pub capture_fps: u32,
    /// Seconds between automatic orientation switches; 0 disables them.
    pub switching_interval_secs: f64,
    /// Let scheduled switches cycle through the symmetric variants.
    pub use_symmetric: bool,
    pub black_screen: bool,
    pub heterogeneous: bool,
    pub vertical: bool,
    pub reverse: bool,
    pub symmetric: bool,
    pub concurrency: Concurrency,
    /// Worker pool size; `None` lets rayon decide.
    pub threads: Option<usize>,
    pub post: PostConfig,
    pub output: OutputSpec,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            source: CaptureSpec::default(),
            max_delay: 150,
            initial_delay: 120,
            frame_size: FrameSize {
                width: 1280,
                height: 720,
            },
            capture_fps: 60,
            switching_interval_secs: 0.0,
            use_symmetric: false,
            black_screen: false,
            heterogeneous: true,
            vertical: false,
            reverse: false,
            symmetric: false,
            concurrency: Concurrency::default(),
            threads: None,
            post: PostConfig::default(),
            output: OutputSpec::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> DelayResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| DelayError::validation(format!("parse config JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> DelayResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DelayError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> DelayResult<()> {
        if self.max_delay == 0 {
            return Err(DelayError::validation("max_delay must be at least 1"));
        }
        FrameSize::new(self.frame_size.width, self.frame_size.height)?;
        Fps::new(self.capture_fps, 1)?;
        if !self.switching_interval_secs.is_finite() || self.switching_interval_secs < 0.0 {
            return Err(DelayError::validation(format!(
                "switching_interval_secs must be a finite value >= 0, got {}",
                self.switching_interval_secs
            )));
        }
        if self.threads == Some(0) {
            return Err(DelayError::validation("threads must be at least 1"));
        }
        if let Some(out) = self.post.output_size {
            FrameSize::new(out.width, out.height)?;
        }
        self.post.validate()
    }

    pub fn fps(&self) -> DelayResult<Fps> {
        Fps::new(self.capture_fps, 1)
    }

    /// Delay the engine starts with: clamped into `[1, max_delay]`, or `max_delay` for files.
    pub fn effective_initial_delay(&self) -> u32 {
        if self.source.is_file() {
            return self.max_delay;
        }
        self.initial_delay.clamp(1, self.max_delay.max(1))
    }

    pub fn initial_controls(&self) -> RuntimeControls {
        let delay = self.effective_initial_delay();
        RuntimeControls {
            params: CompositionParams {
                delay,
                start_delay: delay,
                vertical: self.vertical,
                reverse: self.reverse,
                symmetric: self.symmetric,
                heterogeneous: self.heterogeneous,
                black_screen: self.black_screen,
            },
            fade: 0.0,
            fade_rate: 0.0,
            crop: self.post.crop_frame,
            quit: false,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
