use std::collections::VecDeque;
use std::path::PathBuf;

use crate::foundation::core::{Fps, FrameSize};
use crate::foundation::error::{DelayError, DelayResult};
use crate::render::frame::Frame;

/// Where frames come from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CaptureSpec {
    /// Live camera, selected by its device number.
    Camera {
        /// Device number (`/dev/video<id>` on Linux).
        id: u32,
    },
    /// A video file read as a frame sequence.
    File {
        /// Path to the video file.
        path: PathBuf,
    },
}

impl CaptureSpec {
    /// Interpret a command-line selector: a single character is a camera id, anything longer is a
    /// file path.
    pub fn parse_selector(selector: &str) -> DelayResult<Self> {
        if selector.chars().count() == 1 {
            let id = selector.parse::<u32>().map_err(|_| {
                DelayError::validation(format!(
                    "single-character source '{selector}' must be a camera number"
                ))
            })?;
            return Ok(Self::Camera { id });
        }
        if selector.is_empty() {
            return Err(DelayError::validation("capture source must not be empty"));
        }
        Ok(Self::File {
            path: PathBuf::from(selector),
        })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

impl Default for CaptureSpec {
    fn default() -> Self {
        Self::Camera { id: 0 }
    }
}

impl std::fmt::Display for CaptureSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Camera { id } => write!(f, "camera {id}"),
            Self::File { path } => write!(f, "file '{}'", path.display()),
        }
    }
}

/// A producer of frames for the ring buffer.
///
/// `read_into` fills `dst` with the next frame and returns `Ok(true)`, or returns `Ok(false)` once
/// the stream has ended. On `Ok(false)` the contents of `dst` are unspecified.
pub trait CaptureSource: Send {
    /// Size of every frame this source produces.
    fn frame_size(&self) -> FrameSize;

    /// Native frame rate, when known.
    fn fps(&self) -> Option<Fps> {
        None
    }

    /// Read the next frame into `dst`.
    fn read_into(&mut self, dst: &mut Frame) -> DelayResult<bool>;
}

/// Stand-in for a source that failed to open: every read reports end of stream.
#[derive(Debug)]
pub struct UnavailableSource {
    size: FrameSize,
}

impl UnavailableSource {
    pub fn new(size: FrameSize) -> Self {
        Self { size }
    }
}

impl CaptureSource for UnavailableSource {
    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn read_into(&mut self, _dst: &mut Frame) -> DelayResult<bool> {
        Ok(false)
    }
}

/// In-memory source replaying a fixed list of frames, for tests and demos.
#[derive(Debug)]
pub struct ScriptedSource {
    size: FrameSize,
    fps: Option<Fps>,
    frames: VecDeque<Frame>,
    looped: Option<Vec<Frame>>,
    reads: u64,
}

impl ScriptedSource {
    /// Replay `frames` once, then end the stream. All frames must share one size.
    pub fn new(frames: Vec<Frame>) -> DelayResult<Self> {
        let size = frames
            .first()
            .map(Frame::size)
            .ok_or_else(|| DelayError::validation("scripted source needs at least one frame"))?;
        if let Some(bad) = frames.iter().find(|f| f.size() != size) {
            return Err(DelayError::validation(format!(
                "scripted source frames must share one size: {size} vs {}",
                bad.size()
            )));
        }
        Ok(Self {
            size,
            fps: None,
            frames: frames.into(),
            looped: None,
            reads: 0,
        })
    }

    /// Replay `frames` forever.
    pub fn looping(frames: Vec<Frame>) -> DelayResult<Self> {
        let mut s = Self::new(frames)?;
        s.looped = Some(s.frames.iter().cloned().collect());
        Ok(s)
    }

    /// `count` solid frames whose red channel is the frame number (mod 256).
    pub fn numbered(size: FrameSize, count: usize) -> DelayResult<Self> {
        Self::new(
            (0..count)
                .map(|i| Frame::solid(size, [(i % 256) as u8, 0, 0]))
                .collect(),
        )
    }

    pub fn with_fps(mut self, fps: Fps) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Frames handed out so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl CaptureSource for ScriptedSource {
    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn fps(&self) -> Option<Fps> {
        self.fps
    }

    fn read_into(&mut self, dst: &mut Frame) -> DelayResult<bool> {
        if self.frames.is_empty()
            && let Some(all) = self.looped.as_ref()
        {
            self.frames.extend(all.iter().cloned());
        }
        let Some(next) = self.frames.pop_front() else {
            return Ok(false);
        };
        if dst.size() != next.size() {
            return Err(DelayError::validation(format!(
                "capture target is {}, source produces {}",
                dst.size(),
                next.size()
            )));
        }
        *dst = next;
        self.reads += 1;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/source.rs"]
mod tests;
