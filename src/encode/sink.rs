use std::sync::{Arc, Mutex, MutexGuard};

use crate::foundation::core::{Fps, FrameIndex, FrameSize};
use crate::foundation::error::{DelayError, DelayResult};
use crate::render::frame::Frame;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

impl SinkConfig {
    pub fn new(size: FrameSize, fps: Fps) -> Self {
        Self {
            width: size.width,
            height: size.height,
            fps,
        }
    }

    pub(crate) fn check_frame(&self, frame: &Frame) -> DelayResult<()> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(DelayError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

/// Consumer of presented frames (display surface or file).
///
/// `push_frame` is called with strictly increasing `FrameIndex` values.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> DelayResult<()>;
    /// Push one finished frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> DelayResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> DelayResult<()>;
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn begin(&mut self, _cfg: SinkConfig) -> DelayResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &Frame) -> DelayResult<()> {
        Ok(())
    }

    fn end(&mut self) -> DelayResult<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Recorded {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Frame)>,
    ended: bool,
}

/// In-memory sink for tests and debugging.
///
/// Clones share storage, so a test can keep one handle while the engine owns another.
#[derive(Debug, Default, Clone)]
pub struct InMemorySink {
    inner: Arc<Mutex<Recorded>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        // A panicking pusher leaves nothing half-written worth discarding.
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.lock().cfg
    }

    /// Copy of the captured frames.
    pub fn frames(&self) -> Vec<(FrameIndex, Frame)> {
        self.lock().frames.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<Frame> {
        self.lock().frames.last().map(|(_, f)| f.clone())
    }

    pub fn is_ended(&self) -> bool {
        self.lock().ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> DelayResult<()> {
        let mut rec = self.lock();
        rec.cfg = Some(cfg);
        rec.frames.clear();
        rec.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> DelayResult<()> {
        let mut rec = self.lock();
        let cfg = rec
            .cfg
            .ok_or_else(|| DelayError::sink_unavailable("in-memory sink not started"))?;
        cfg.check_frame(frame)?;
        rec.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> DelayResult<()> {
        self.lock().ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
