use std::time::Duration;

use crate::capture::ffmpeg::open_or_unavailable;
use crate::capture::source::CaptureSource;
use crate::composite;
use crate::config::{Concurrency, EngineConfig, OutputSpec};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, FfplaySink};
use crate::encode::png::PngSequenceSink;
use crate::encode::sink::{FrameSink, NullSink};
use crate::foundation::error::{DelayError, DelayResult};
use crate::present::input::KeySource;
use crate::present::post::PostProcessor;
use crate::present::presenter::{PresentStats, Presenter};
use crate::render::frame::Frame;
use crate::render::ring::{FrameRing, RingView};
use crate::session::clock::{FrameClock, advance_fade};
use crate::session::state::{
    CompositionParams, CycleIndices, EngineState, Phase, RuntimeControls, StopReason,
};

/// Outcome of [`Engine::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RunSummary {
    /// Running cycles completed.
    pub frames: u64,
    pub stop_reason: Option<StopReason>,
    pub present: PresentStats,
}

/// The frame cycle coordinator.
///
/// Owns the ring, the capture source and the presenter. Each `Running` cycle captures into the
/// write slot while the compositor reads the others, then presents the composed frame.
pub struct Engine {
    state: EngineState,
    source: Box<dyn CaptureSource>,
    presenter: Presenter,
    clock: FrameClock,
    pool: Option<rayon::ThreadPool>,
    switching_interval_secs: f64,
    use_symmetric: bool,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("presenter", &self.presenter)
            .field("parallel", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(
        cfg: &EngineConfig,
        source: Box<dyn CaptureSource>,
        mut presenter: Presenter,
    ) -> DelayResult<Self> {
        cfg.validate()?;
        let size = source.frame_size();
        let ring = FrameRing::new(cfg.max_delay as usize, size)?;
        presenter.set_fps(match source.fps() {
            Some(fps) => fps,
            None => cfg.fps()?,
        });

        let pool = match cfg.concurrency {
            Concurrency::Parallel => Some(build_thread_pool(cfg.threads)?),
            Concurrency::Sequential => None,
        };

        let controls = cfg.initial_controls();
        tracing::info!(
            size = %size,
            capacity = ring.capacity(),
            delay = controls.params.delay,
            concurrency = ?cfg.concurrency,
            "engine ready"
        );
        Ok(Self {
            state: EngineState::new(ring, controls),
            source,
            presenter,
            clock: FrameClock::new(),
            pool,
            switching_interval_secs: cfg.switching_interval_secs,
            use_symmetric: cfg.use_symmetric,
        })
    }

    /// Open the configured capture source and output and build an engine around them.
    ///
    /// A source or output that cannot be opened is logged, and the engine is still built: an
    /// unavailable source ends the run at the first read, a broken output keeps being retried.
    pub fn open(cfg: &EngineConfig, input: Box<dyn KeySource>) -> DelayResult<Self> {
        cfg.validate()?;
        let fps = cfg.fps()?;
        let source = open_or_unavailable(&cfg.source, cfg.frame_size, fps);
        let sink = open_sink(&cfg.output);
        let presenter = Presenter::new(
            PostProcessor::new(cfg.post.clone()),
            sink,
            input,
            fps,
            cfg.max_delay,
        );
        Self::new(cfg, source, presenter)
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EngineState {
        &mut self.state
    }

    pub fn controls(&self) -> &RuntimeControls {
        &self.state.controls
    }

    /// Fill every ring slot before the first cycle.
    pub fn prime(&mut self) {
        if self.state.phase != Phase::Priming {
            return;
        }
        let capacity = self.state.ring.capacity();
        let mut last_decile = 0;
        for index in 0..capacity {
            if !acquire(self.source.as_mut(), self.state.ring.write(index)) {
                tracing::warn!(filled = index, capacity, "stream ended during warm-up");
                self.state.stop(StopReason::StreamEnded);
                return;
            }
            let percent = ((index + 1) as f64 / capacity as f64 * 100.0).round() as u32;
            tracing::trace!(percent, "warm-up");
            if percent / 10 > last_decile {
                last_decile = percent / 10;
                tracing::info!("warm-up: {percent}%");
            }
        }
        self.state.new_delay = capacity;
        self.state.phase = Phase::Running;
    }

    /// Run one cycle, measuring elapsed time from the wall clock.
    pub fn step(&mut self) -> Phase {
        let dt = self.clock.measure();
        self.step_with(dt)
    }

    pub(crate) fn step_with(&mut self, dt: Duration) -> Phase {
        if self.state.phase == Phase::Priming {
            self.prime();
        }
        if self.state.is_stopped() {
            return Phase::Stopped;
        }

        if let Some(fps) = self.clock.tick(dt) {
            tracing::info!("capture rate: {} fps", fps as u32);
        }
        advance_fade(&mut self.state.controls, dt);

        let indices = self.state.begin_cycle();
        let params = self.state.controls.params;
        let mut finished = if params.black_screen {
            Frame::black(self.state.ring.frame_size())
        } else {
            self.state.ring.read(indices.origin).clone()
        };
        tracing::trace!(
            write = indices.write,
            origin = indices.origin,
            delay = params.delay,
            "cycle"
        );

        let (slot, view) = self.state.ring.split_for_write(indices.write);
        let source = self.source.as_mut();
        let captured = match self.pool.as_ref() {
            Some(pool) => {
                pool.install(|| {
                    rayon::join(
                        || acquire(source, slot),
                        || compose_cycle(params, &mut finished, &view, indices),
                    )
                })
                .0
            }
            None => {
                let captured = acquire(source, slot);
                compose_cycle(params, &mut finished, &view, indices);
                captured
            }
        };

        let presenter = &mut self.presenter;
        let controls = &mut self.state.controls;
        match self.pool.as_ref() {
            Some(pool) => pool.install(|| presenter.present(finished, controls)),
            None => presenter.present(finished, controls),
        };

        self.state.new_delay += 1;
        self.state.frames += 1;

        if !captured {
            self.state.stop(StopReason::StreamEnded);
        }
        if self.state.controls.quit {
            self.state.stop(StopReason::Quit);
        }
        if self.clock.switch_due(self.switching_interval_secs) {
            switch_orientation(&mut self.state.controls.params, self.use_symmetric);
        }
        self.state.phase
    }

    /// Prime, cycle until stopped, then close the output.
    pub fn run(&mut self) -> RunSummary {
        self.prime();
        while self.step() != Phase::Stopped {}
        if let Err(e) = self.presenter.finish() {
            tracing::error!("closing output failed: {e}");
        }
        let summary = RunSummary {
            frames: self.state.frames,
            stop_reason: self.state.stop_reason,
            present: self.presenter.stats(),
        };
        tracing::info!(
            frames = summary.frames,
            reason = ?summary.stop_reason,
            "run finished"
        );
        summary
    }
}

/// Fill `slot` from `source`; `false` when the stream is over or the read failed.
fn acquire(source: &mut dyn CaptureSource, slot: &mut Frame) -> bool {
    match source.read_into(slot) {
        Ok(true) => true,
        Ok(false) => {
            tracing::info!("capture stream ended");
            false
        }
        Err(e) => {
            tracing::error!("capture failed: {e}");
            false
        }
    }
}

fn compose_cycle(
    params: CompositionParams,
    finished: &mut Frame,
    ring: &RingView<'_>,
    indices: CycleIndices,
) {
    if !params.composites() {
        return;
    }
    let stats = composite::compose(
        params.algorithm(),
        params.delay,
        finished,
        ring,
        indices.origin,
    );
    tracing::trace!(
        applied = stats.bands_applied,
        skipped = stats.bands_skipped,
        "composed"
    );
}

/// Scheduled orientation switch. Reverse flips on every other switch, and with symmetric variants
/// enabled only on every fourth.
pub fn switch_orientation(params: &mut CompositionParams, use_symmetric: bool) {
    params.vertical = !params.vertical;
    if use_symmetric && params.vertical {
        params.symmetric = !params.symmetric;
    }
    if (use_symmetric && params.vertical && params.symmetric) || (!use_symmetric && params.vertical)
    {
        params.reverse = !params.reverse;
    }
    tracing::info!(
        vertical = params.vertical,
        reverse = params.reverse,
        symmetric = params.symmetric,
        "orientation switched"
    );
}

fn build_thread_pool(threads: Option<usize>) -> DelayResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(DelayError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("delay-worker-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

/// Build the sink for `output`.
pub fn open_sink(output: &OutputSpec) -> Box<dyn FrameSink> {
    match output {
        OutputSpec::Display { title, fullscreen } => {
            Box::new(FfplaySink::new(title.clone(), *fullscreen))
        }
        OutputSpec::File { path, codec } => Box::new(FfmpegSink::new(
            FfmpegSinkOpts::new(path.clone()).with_codec(codec.clone()),
        )),
        OutputSpec::Frames { dir } => Box::new(PngSequenceSink::new(dir.clone())),
        OutputSpec::Discard => Box::new(NullSink),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
