use std::ops::Range;

use smallvec::SmallVec;

use crate::foundation::core::FrameSize;
use crate::render::frame::Frame;
use crate::render::ring::RingView;

/// Width of one band along an axis of `axis_len` pixels split `delay` ways.
pub fn band_width(axis_len: u32, delay: u32) -> f32 {
    axis_len as f32 / delay as f32
}

/// Pixel coordinate of boundary `k`: `k * (axis_len / delay)` in `f32`, truncated.
///
/// Boundaries are not evenly spaced unless `delay` divides `axis_len`; the one-pixel seams that
/// truncation produces are part of the output.
pub fn boundary(k: u32, axis_len: u32, delay: u32) -> u32 {
    (k as f32 * band_width(axis_len, delay)) as u32
}

/// Like [`boundary`] for a signed multiplier. Negative multipliers have no boundary.
pub(crate) fn signed_boundary(k: i64, axis_len: u32, delay: u32) -> Option<u32> {
    if k < 0 {
        return None;
    }
    Some((k as f32 * band_width(axis_len, delay)) as u32)
}

/// A rectangle copied verbatim from one historical frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    /// Columns `[start, end)`.
    pub xs: Range<u32>,
    /// Rows `[start, end)`.
    pub ys: Range<u32>,
}

impl Span {
    fn clipped(self, size: FrameSize) -> Option<Self> {
        let xs = self.xs.start.min(size.width)..self.xs.end.min(size.width);
        let ys = self.ys.start.min(size.height)..self.ys.end.min(size.height);
        if xs.is_empty() || ys.is_empty() {
            return None;
        }
        Some(Self { xs, ys })
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.xs.contains(&x) && self.ys.contains(&y)
    }
}

/// All rectangles sourced from the same ring step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Band {
    /// Offset from the read origin (`currentDelay`), in ring slots.
    pub step: usize,
    /// One rectangle, or two when the band is mirrored.
    pub spans: SmallVec<[Span; 2]>,
}

/// Ordered list of band copies making up one heterogeneous-delay composite.
///
/// Later bands overwrite earlier ones where they overlap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BandPlan {
    size: Option<FrameSize>,
    bands: Vec<Band>,
}

/// Outcome of [`BandPlan::apply`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Bands copied into the destination frame.
    pub bands_applied: usize,
    /// Bands whose source slot was unavailable (the in-flight write slot).
    pub bands_skipped: usize,
}

impl BandPlan {
    pub(crate) fn new(size: FrameSize) -> Self {
        Self {
            size: Some(size),
            bands: Vec::new(),
        }
    }

    /// Append a band; spans are clipped to the frame, and empty bands are dropped.
    pub(crate) fn push(&mut self, step: usize, spans: impl IntoIterator<Item = Span>) {
        let Some(size) = self.size else {
            return;
        };
        let spans: SmallVec<[Span; 2]> =
            spans.into_iter().filter_map(|s| s.clipped(size)).collect();
        if spans.is_empty() {
            return;
        }
        self.bands.push(Band { step, spans });
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Ring steps read by this plan, in application order.
    pub fn read_steps(&self) -> impl Iterator<Item = usize> + '_ {
        self.bands.iter().map(|b| b.step)
    }

    /// Ring slots read by this plan for read origin `origin`.
    pub fn read_indices(&self, origin: usize, capacity: usize) -> Vec<usize> {
        self.read_steps()
            .map(|step| (origin + step) % capacity)
            .collect()
    }

    /// Step of the band that last writes pixel `(x, y)`, if any band covers it.
    pub fn step_at(&self, x: u32, y: u32) -> Option<usize> {
        self.bands
            .iter()
            .rev()
            .find(|b| b.spans.iter().any(|s| s.contains(x, y)))
            .map(|b| b.step)
    }

    /// Copy every band into `dst` from slot `(origin + step) % capacity` of `ring`.
    pub fn apply(&self, dst: &mut Frame, ring: &RingView<'_>, origin: usize) -> ApplyStats {
        let capacity = ring.capacity();
        let mut stats = ApplyStats::default();
        for band in &self.bands {
            let index = (origin + band.step) % capacity;
            let Some(src) = ring.get(index) else {
                tracing::error!(
                    index,
                    step = band.step,
                    "band source is the slot being captured; band skipped"
                );
                stats.bands_skipped += 1;
                continue;
            };
            for span in &band.spans {
                dst.copy_rect_from(src, span.xs.clone(), span.ys.clone());
            }
            stats.bands_applied += 1;
        }
        stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/band.rs"]
mod tests;
