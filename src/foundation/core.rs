use crate::foundation::error::{DelayError, DelayResult};

/// One RGB8 pixel, channel order as delivered by the capture source.
pub type Rgb8 = [u8; 3];

/// Bytes per pixel of every frame handled by the engine.
pub const CHANNELS: usize = 3;

/// Monotonic index of a presented frame (0-based, counted from the first `Running` cycle).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameSize {
    /// Create a validated, non-empty size.
    pub fn new(width: u32, height: u32) -> DelayResult<Self> {
        if width == 0 || height == 0 {
            return Err(DelayError::validation(format!(
                "frame size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of RGB8 bytes.
    pub fn byte_len(self) -> usize {
        self.pixel_count() * CHANNELS
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for FrameSize {
    type Err = DelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| DelayError::validation(format!("expected WIDTHxHEIGHT, got '{s}'")))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|e| DelayError::validation(format!("invalid width '{w}': {e}")))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|e| DelayError::validation(format!("invalid height '{h}': {e}")))?;
        Self::new(width, height)
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> DelayResult<Self> {
        if den == 0 {
            return Err(DelayError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(DelayError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Parse the `num/den` notation used by `ffprobe` (`"30000/1001"`), or a plain integer.
    pub fn parse_ratio(s: &str) -> DelayResult<Self> {
        let s = s.trim();
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s, "1"),
        };
        let num = num
            .parse::<u32>()
            .map_err(|e| DelayError::validation(format!("invalid fps numerator '{num}': {e}")))?;
        let den = den
            .parse::<u32>()
            .map_err(|e| DelayError::validation(format!("invalid fps denominator '{den}': {e}")))?;
        Self::new(num, den)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
