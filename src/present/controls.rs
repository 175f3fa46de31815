use crate::session::state::RuntimeControls;

/// Delay selected by the Enter key.
pub const HETEROGENEOUS_TOGGLE_DELAY: u32 = 120;

/// Operator command decoded from a key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    /// Digit `n` sets the delay to `n * 15 + 1`.
    Digit(u32),
    Quit,
    ToggleBlackout,
    StartFade,
    ToggleHeterogeneous,
    ToggleReverse,
    ToggleSymmetric,
    Horizontal,
    Vertical,
    CropOn,
    CropOff,
    IncreaseDelay,
    DecreaseDelay,
}

impl KeyCommand {
    /// Decode a key code; only the low 8 bits are significant.
    pub fn from_key(key: u32) -> Option<Self> {
        let key = key & 0xFF;
        Some(match key {
            48..=57 => Self::Digit(key - 48),
            176..=185 => Self::Digit(key - 176),
            27 => Self::Quit,
            32 => Self::ToggleBlackout,
            8 | 127 => Self::StartFade,
            13 | 141 => Self::ToggleHeterogeneous,
            114 => Self::ToggleReverse,
            115 => Self::ToggleSymmetric,
            104 => Self::Horizontal,
            118 => Self::Vertical,
            99 => Self::CropOn,
            102 => Self::CropOff,
            43 | 171 => Self::IncreaseDelay,
            45 | 173 => Self::DecreaseDelay,
            _ => return None,
        })
    }

    /// Apply the command to `controls`.
    pub fn apply(self, controls: &mut RuntimeControls, max_delay: u32) {
        let params = &mut controls.params;
        match self {
            Self::Digit(n) => set_delay(controls, (n * 15 + 1).min(max_delay)),
            Self::Quit => controls.quit = true,
            Self::ToggleBlackout => params.black_screen = !params.black_screen,
            Self::StartFade => {
                if controls.fade == 0.0 {
                    controls.fade_rate = 0.2;
                } else if controls.fade == 1.0 {
                    controls.fade_rate = -0.2;
                }
            }
            Self::ToggleHeterogeneous => {
                params.heterogeneous = !params.heterogeneous;
                set_delay(controls, HETEROGENEOUS_TOGGLE_DELAY.min(max_delay));
            }
            Self::ToggleReverse => params.reverse = !params.reverse,
            Self::ToggleSymmetric => params.symmetric = !params.symmetric,
            Self::Horizontal => params.vertical = false,
            Self::Vertical => params.vertical = true,
            Self::CropOn => controls.crop = true,
            Self::CropOff => controls.crop = false,
            Self::IncreaseDelay => {
                let d = (params.delay + 1).min(max_delay);
                set_delay(controls, d);
            }
            Self::DecreaseDelay => {
                let d = params.delay.saturating_sub(1).max(1);
                set_delay(controls, d);
            }
        }
    }
}

fn set_delay(controls: &mut RuntimeControls, delay: u32) {
    controls.params.set_delay(delay.max(1));
    tracing::info!(delay = controls.params.delay, "delay changed");
}

/// Decode and apply one key. Returns the command, if the key maps to one.
pub fn handle_key(key: u32, controls: &mut RuntimeControls, max_delay: u32) -> Option<KeyCommand> {
    let cmd = KeyCommand::from_key(key);
    match cmd {
        Some(cmd) => {
            tracing::debug!(key = key & 0xFF, ?cmd, "key");
            cmd.apply(controls, max_delay);
        }
        None => tracing::trace!(key = key & 0xFF, "unmapped key"),
    }
    cmd
}

#[cfg(test)]
#[path = "../../tests/unit/present/controls.rs"]
mod tests;
