use crate::composite::algorithm::{Algorithm, Direction, Orientation, Symmetry};
use crate::render::ring::FrameRing;

/// The mutable effect parameters. Written only by the presentation stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompositionParams {
    /// Number of look-back bands, `1..=max_delay`.
    pub delay: u32,
    /// Delay locked in when it was last set; fixes the read origin.
    pub start_delay: u32,
    pub vertical: bool,
    pub reverse: bool,
    pub symmetric: bool,
    pub heterogeneous: bool,
    pub black_screen: bool,
}

impl CompositionParams {
    /// Set both the active and the locked delay.
    pub fn set_delay(&mut self, delay: u32) {
        self.delay = delay;
        self.start_delay = delay;
    }

    /// Whether this cycle runs the band compositor at all.
    pub fn composites(&self) -> bool {
        !self.black_screen && self.heterogeneous
    }

    pub fn algorithm(&self) -> Algorithm {
        Algorithm::select(
            Orientation::from_vertical(self.vertical),
            Direction::from_reverse(self.reverse),
            Symmetry::from_symmetric(self.symmetric),
        )
    }
}

impl Default for CompositionParams {
    fn default() -> Self {
        Self {
            delay: 1,
            start_delay: 1,
            vertical: false,
            reverse: false,
            symmetric: false,
            heterogeneous: true,
            black_screen: false,
        }
    }
}

/// Everything key input can change.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RuntimeControls {
    pub params: CompositionParams,
    /// Fade-out amount in `[0, 1]`; 1 is fully black.
    pub fade: f64,
    /// Fade change per second; 0 when no fade is running.
    pub fade_rate: f64,
    pub crop: bool,
    pub quit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Priming,
    Running,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The capture source returned no frame.
    StreamEnded,
    /// The operator pressed the quit key.
    Quit,
}

/// Ring indices used by one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleIndices {
    /// Slot acquisition writes this cycle.
    pub write: usize,
    pub display: usize,
    /// Read origin: base frame and step 0 of the compositor.
    pub origin: usize,
}

/// Derive this cycle's indices from the write cursor.
///
/// `display = (write + 1 + (max_delay - start_delay)) mod capacity`, `origin = display + 1`.
pub fn cycle_indices(
    new_delay: usize,
    max_delay: usize,
    start_delay: usize,
    capacity: usize,
) -> CycleIndices {
    let write = new_delay % capacity;
    let display = (write + 1 + max_delay.saturating_sub(start_delay)) % capacity;
    let origin = (display + 1) % capacity;
    CycleIndices {
        write,
        display,
        origin,
    }
}

/// State owned by the frame cycle coordinator.
#[derive(Debug)]
pub struct EngineState {
    pub ring: FrameRing,
    /// Next slot to be written.
    pub new_delay: usize,
    pub controls: RuntimeControls,
    pub phase: Phase,
    pub stop_reason: Option<StopReason>,
    /// Frames presented since the first `Running` cycle.
    pub frames: u64,
}

impl EngineState {
    pub fn new(ring: FrameRing, controls: RuntimeControls) -> Self {
        Self {
            ring,
            new_delay: 0,
            controls,
            phase: Phase::Priming,
            stop_reason: None,
            frames: 0,
        }
    }

    /// Wrap the cursor and compute this cycle's indices.
    pub fn begin_cycle(&mut self) -> CycleIndices {
        self.new_delay = self.ring.wrap(self.new_delay);
        cycle_indices(
            self.new_delay,
            self.ring.max_delay(),
            self.controls.params.start_delay as usize,
            self.ring.capacity(),
        )
    }

    pub fn stop(&mut self, reason: StopReason) {
        if self.phase != Phase::Stopped {
            tracing::info!(reason = ?reason, frames = self.frames, "stopping");
        }
        self.phase = Phase::Stopped;
        self.stop_reason.get_or_insert(reason);
    }

    pub fn is_stopped(&self) -> bool {
        self.phase == Phase::Stopped
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
