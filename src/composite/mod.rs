//! Heterogeneous-delay compositing.
//!
//! An [`Algorithm`](algorithm::Algorithm) turns `(delay, frame size)` into a
//! [`BandPlan`](band::BandPlan); applying the plan copies each band from its historical ring slot
//! into the output frame.

/// Algorithm selection and band layouts.
pub mod algorithm;
/// Band geometry and plan application.
pub mod band;

use crate::render::frame::Frame;
use crate::render::ring::RingView;

/// Compose `dst` in place: bands from `ring`, read origin `origin`, `delay` look-back levels.
///
/// Band 0 is left as-is; callers seed `dst` with the base frame first.
pub fn compose(
    algorithm: algorithm::Algorithm,
    delay: u32,
    dst: &mut Frame,
    ring: &RingView<'_>,
    origin: usize,
) -> band::ApplyStats {
    let plan = algorithm.plan(delay, dst.size());
    plan.apply(dst, ring, origin)
}
