//! The frame cycle coordinator.

/// Session timing and fade advancement.
pub mod clock;
/// Priming, the per-cycle loop, and run summaries.
pub mod engine;
/// Effect parameters, cursor math and engine state.
pub mod state;
