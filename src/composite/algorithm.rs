use std::ops::Range;

use crate::composite::band::{BandPlan, Span, boundary, signed_boundary};
use crate::foundation::core::FrameSize;

/// Axis along which bands are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Bands are column ranges.
    Vertical,
    /// Bands are row ranges.
    Horizontal,
}

/// Which end of the axis holds the least-delayed band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Band 1 sits next to the near edge (left/top).
    Forward,
    /// Band 1 sits next to the far edge (right/bottom).
    Reverse,
}

/// Whether bands are mirrored about the centre axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symmetry {
    Plain,
    Symmetric,
}

impl Orientation {
    pub fn from_vertical(vertical: bool) -> Self {
        if vertical {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

impl Direction {
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse { Self::Reverse } else { Self::Forward }
    }
}

impl Symmetry {
    pub fn from_symmetric(symmetric: bool) -> Self {
        if symmetric {
            Self::Symmetric
        } else {
            Self::Plain
        }
    }
}

/// The band-layout algorithms.
///
/// Eight are reachable through [`Algorithm::select`]. [`Algorithm::HorizontalSymmetricSplit`]
/// (two independent half-width passes) is kept for direct use only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Vertical,
    VerticalSymmetric,
    VerticalReverse,
    VerticalReverseSymmetric,
    Horizontal,
    HorizontalSymmetric,
    HorizontalReverse,
    HorizontalReverseSymmetric,
    HorizontalSymmetricSplit,
}

// Indexed by [orientation][direction][symmetry].
const DISPATCH: [[[Algorithm; 2]; 2]; 2] = [
    [
        [Algorithm::Vertical, Algorithm::VerticalSymmetric],
        [
            Algorithm::VerticalReverse,
            Algorithm::VerticalReverseSymmetric,
        ],
    ],
    [
        [Algorithm::Horizontal, Algorithm::HorizontalSymmetric],
        [
            Algorithm::HorizontalReverse,
            Algorithm::HorizontalReverseSymmetric,
        ],
    ],
];

/// How a mirrored band maps position `p` on an axis of length `len`.
#[derive(Clone, Copy)]
enum Mirror {
    /// `len - 1 - p`
    Inner,
    /// `len - p`
    Outer,
}

impl Mirror {
    fn reflect(self, r: &Range<u32>, len: u32) -> Range<u32> {
        match self {
            Self::Inner => len.saturating_sub(r.end)..len.saturating_sub(r.start),
            Self::Outer => (len + 1).saturating_sub(r.end)..(len + 1).saturating_sub(r.start),
        }
    }
}

struct Axes {
    orientation: Orientation,
    size: FrameSize,
}

impl Axes {
    fn len(&self) -> u32 {
        match self.orientation {
            Orientation::Vertical => self.size.width,
            Orientation::Horizontal => self.size.height,
        }
    }

    /// Span covering `along` on the band axis and `across` on the other one.
    fn span(&self, along: Range<u32>, across: Range<u32>) -> Span {
        match self.orientation {
            Orientation::Vertical => Span {
                xs: along,
                ys: across,
            },
            Orientation::Horizontal => Span {
                xs: across,
                ys: along,
            },
        }
    }

    fn full(&self, along: Range<u32>) -> Span {
        let across = match self.orientation {
            Orientation::Vertical => 0..self.size.height,
            Orientation::Horizontal => 0..self.size.width,
        };
        self.span(along, across)
    }
}

/// Positions `(lo, hi]`, as walked by the reverse loops.
fn descending(lo: u32, hi: u32) -> Range<u32> {
    lo.saturating_add(1)..hi.saturating_add(1)
}

impl Algorithm {
    /// Every algorithm, dispatched ones first.
    pub const ALL: [Algorithm; 9] = [
        Algorithm::Vertical,
        Algorithm::VerticalSymmetric,
        Algorithm::VerticalReverse,
        Algorithm::VerticalReverseSymmetric,
        Algorithm::Horizontal,
        Algorithm::HorizontalSymmetric,
        Algorithm::HorizontalReverse,
        Algorithm::HorizontalReverseSymmetric,
        Algorithm::HorizontalSymmetricSplit,
    ];

    /// Look up the algorithm for a flag combination.
    pub fn select(orientation: Orientation, direction: Direction, symmetry: Symmetry) -> Self {
        let o = match orientation {
            Orientation::Vertical => 0,
            Orientation::Horizontal => 1,
        };
        let d = match direction {
            Direction::Forward => 0,
            Direction::Reverse => 1,
        };
        let s = match symmetry {
            Symmetry::Plain => 0,
            Symmetry::Symmetric => 1,
        };
        DISPATCH[o][d][s]
    }

    pub fn orientation(self) -> Orientation {
        match self {
            Self::Vertical
            | Self::VerticalSymmetric
            | Self::VerticalReverse
            | Self::VerticalReverseSymmetric => Orientation::Vertical,
            Self::Horizontal
            | Self::HorizontalSymmetric
            | Self::HorizontalReverse
            | Self::HorizontalReverseSymmetric
            | Self::HorizontalSymmetricSplit => Orientation::Horizontal,
        }
    }

    /// Lay out the bands for `delay` look-back levels over a frame of `size`.
    ///
    /// `delay <= 1` yields an empty plan: the base frame is the whole output.
    pub fn plan(self, delay: u32, size: FrameSize) -> BandPlan {
        let mut plan = BandPlan::new(size);
        if delay <= 1 {
            return plan;
        }
        let axes = Axes {
            orientation: self.orientation(),
            size,
        };
        match self {
            Self::Vertical | Self::Horizontal => forward(&mut plan, &axes, delay),
            Self::VerticalReverse | Self::HorizontalReverse => reverse(&mut plan, &axes, delay),
            Self::VerticalSymmetric => forward_symmetric(&mut plan, &axes, delay, Mirror::Inner),
            Self::HorizontalSymmetric => {
                forward_symmetric(&mut plan, &axes, delay, Mirror::Outer)
            }
            Self::VerticalReverseSymmetric => {
                reverse_symmetric(&mut plan, &axes, delay, delay / 2)
            }
            Self::HorizontalReverseSymmetric => reverse_symmetric(&mut plan, &axes, delay, delay),
            Self::HorizontalSymmetricSplit => split_halves(&mut plan, &axes, delay),
        }
        plan
    }
}

fn forward(plan: &mut BandPlan, axes: &Axes, delay: u32) {
    let len = axes.len();
    for d in 1..delay {
        let along = boundary(d, len, delay)..boundary(d + 1, len, delay);
        plan.push(d as usize, [axes.full(along)]);
    }
}

fn reverse(plan: &mut BandPlan, axes: &Axes, delay: u32) {
    let len = axes.len();
    for d in 1..delay {
        let hi = boundary(delay - d, len, delay);
        let lo = boundary(delay - d - 1, len, delay);
        plan.push(d as usize, [axes.full(descending(lo, hi))]);
    }
}

fn forward_symmetric(plan: &mut BandPlan, axes: &Axes, delay: u32, mirror: Mirror) {
    let len = axes.len();
    let half = delay / 2;
    for d in 1..half {
        let along = boundary(d, len, delay)..boundary(d + 1, len, delay);
        let mirrored = mirror.reflect(&along, len);
        plan.push(
            (half + d) as usize,
            [axes.full(along), axes.full(mirrored)],
        );
    }
}

/// Bands walk down from the far edge; the first band reaches from `delay - 1` to `half - 2`.
///
/// `bands` is the loop bound: `delay / 2` for columns, `delay` for rows. Once a boundary falls
/// below zero the remaining bands are empty.
fn reverse_symmetric(plan: &mut BandPlan, axes: &Axes, delay: u32, bands: u32) {
    let len = axes.len();
    let half = i64::from(delay / 2);
    for d in 1..bands {
        let hi_k = if d == 1 {
            i64::from(delay - 1)
        } else {
            half - i64::from(d)
        };
        let lo_k = half - i64::from(d + 1);
        let (Some(hi), Some(lo)) = (
            signed_boundary(hi_k, len, delay),
            signed_boundary(lo_k, len, delay),
        ) else {
            continue;
        };
        let along = descending(lo, hi);
        let mirrored = Mirror::Outer.reflect(&along, len);
        plan.push(
            (half + i64::from(d)) as usize,
            [axes.full(along), axes.full(mirrored)],
        );
    }
}

/// Forward row bands over the left half, then reverse row bands over the right half.
fn split_halves(plan: &mut BandPlan, axes: &Axes, delay: u32) {
    let len = axes.len();
    let half_w = axes.size.width / 2;
    for d in 1..delay {
        let rows = boundary(d, len, delay)..boundary(d + 1, len, delay);
        plan.push(d as usize, [axes.span(rows, 0..half_w)]);
    }
    for d in 1..delay {
        let hi = boundary(delay - d, len, delay);
        let lo = boundary(delay - d - 1, len, delay);
        plan.push(
            d as usize,
            [axes.span(descending(lo, hi), half_w..half_w * 2)],
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/algorithm.rs"]
mod tests;
