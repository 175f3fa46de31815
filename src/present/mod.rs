//! The presentation stage.
//!
//! Finished frames go through [`post`] transforms to a sink; key input read here is the only
//! writer of the run-time controls.

pub mod controls;
pub mod input;
pub mod post;
pub mod presenter;
