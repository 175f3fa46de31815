use std::time::{Duration, Instant};

use crate::session::state::RuntimeControls;

const FPS_WINDOW_SECS: f64 = 3.0;

/// Session timing: the orientation-switch timer and the periodic fps report.
#[derive(Debug)]
pub struct FrameClock {
    last: Option<Instant>,
    /// Seconds since the last scheduled orientation switch.
    pub session_secs: f64,
    window_secs: f64,
    window_frames: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: None,
            session_secs: 0.0,
            window_secs: 0.0,
            window_frames: 0,
        }
    }

    /// Wall-clock time since the previous call (zero on the first call).
    pub fn measure(&mut self) -> Duration {
        let now = Instant::now();
        let dt = self.last.map(|t| now.duration_since(t)).unwrap_or_default();
        self.last = Some(now);
        dt
    }

    /// Account one cycle lasting `dt`. Returns the measured fps when a report window closes.
    pub fn tick(&mut self, dt: Duration) -> Option<f64> {
        let secs = dt.as_secs_f64();
        self.session_secs += secs;
        self.window_secs += secs;
        self.window_frames += 1;
        if self.window_secs < FPS_WINDOW_SECS {
            return None;
        }
        let fps = f64::from(self.window_frames) / self.window_secs;
        self.window_secs = 0.0;
        self.window_frames = 0;
        Some(fps)
    }

    /// True once more than `interval_secs` have passed; resets the timer when it fires.
    pub fn switch_due(&mut self, interval_secs: f64) -> bool {
        if interval_secs > 0.0 && self.session_secs > interval_secs {
            self.session_secs = 0.0;
            true
        } else {
            false
        }
    }
}

/// Move `fade` by `fade_rate * dt`, stopping the fade when it reaches 0 or 1.
pub fn advance_fade(controls: &mut RuntimeControls, dt: Duration) {
    if controls.fade_rate == 0.0 {
        return;
    }
    controls.fade += controls.fade_rate * dt.as_secs_f64();
    if controls.fade > 1.0 {
        controls.fade = 1.0;
        controls.fade_rate = 0.0;
    }
    if controls.fade < 0.0 {
        controls.fade = 0.0;
        controls.fade_rate = 0.0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/clock.rs"]
mod tests;
