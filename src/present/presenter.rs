use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::DelayResult;
use crate::present::controls::{KeyCommand, handle_key};
use crate::present::input::KeySource;
use crate::present::post::PostProcessor;
use crate::render::frame::Frame;
use crate::session::state::RuntimeControls;

/// Counters kept by the presenter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PresentStats {
    pub presented: u64,
    pub sink_errors: u64,
    pub keys: u64,
}

/// The presentation stage: post-processing, output, and key handling.
///
/// Sink failures never stop the engine. The first one is logged as an error, later ones at debug
/// level, and every following frame is still offered to the sink.
pub struct Presenter {
    post: PostProcessor,
    sink: Box<dyn FrameSink>,
    input: Box<dyn KeySource>,
    fps: Fps,
    max_delay: u32,
    started: bool,
    next_index: u64,
    stats: PresentStats,
}

impl std::fmt::Debug for Presenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("post", &self.post)
            .field("fps", &self.fps)
            .field("max_delay", &self.max_delay)
            .field("started", &self.started)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Presenter {
    pub fn new(
        post: PostProcessor,
        sink: Box<dyn FrameSink>,
        input: Box<dyn KeySource>,
        fps: Fps,
        max_delay: u32,
    ) -> Self {
        Self {
            post,
            sink,
            input,
            fps,
            max_delay,
            started: false,
            next_index: 0,
            stats: PresentStats::default(),
        }
    }

    pub fn stats(&self) -> PresentStats {
        self.stats
    }

    pub(crate) fn set_fps(&mut self, fps: Fps) {
        if !self.started {
            self.fps = fps;
        }
    }

    /// Post-process and emit `frame`, then apply at most one pending key.
    pub fn present(&mut self, frame: Frame, controls: &mut RuntimeControls) -> Option<KeyCommand> {
        match self.post.apply(frame, controls.crop, controls.fade) {
            Ok(out) => self.emit(&out),
            Err(e) => self.sink_failed("post-processing failed", &e),
        }

        let key = self.input.poll_key()?;
        self.stats.keys += 1;
        handle_key(key, controls, self.max_delay)
    }

    fn emit(&mut self, frame: &Frame) {
        if !self.started {
            self.started = true;
            let cfg = SinkConfig::new(frame.size(), self.fps);
            match self.sink.begin(cfg) {
                Ok(()) => tracing::info!(size = %frame.size(), "output opened"),
                Err(e) => self.sink_failed("cannot open output", &e),
            }
        }

        let idx = FrameIndex(self.next_index);
        self.next_index += 1;
        match self.sink.push_frame(idx, frame) {
            Ok(()) => self.stats.presented += 1,
            Err(e) => self.sink_failed("cannot present frame", &e),
        }
    }

    fn sink_failed(&mut self, what: &str, e: &dyn std::error::Error) {
        if self.stats.sink_errors == 0 {
            tracing::error!("{what}: {e}");
        } else {
            tracing::debug!("{what}: {e}");
        }
        self.stats.sink_errors += 1;
    }

    /// Finalize the sink if it was ever started.
    pub fn finish(&mut self) -> DelayResult<()> {
        if !self.started {
            return Ok(());
        }
        self.started = false;
        self.sink.end()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/presenter.rs"]
mod tests;
