//! delay-mirror is a real-time time-delay mirror.
//!
//! Frames from a camera or a video file are kept in a short rolling history. Every output frame
//! is assembled from bands (columns or rows) taken from different moments of that history, so
//! parts of the picture lag behind others.
//!
//! - Configure an [`EngineConfig`]
//! - Build an [`Engine`] from a [`CaptureSource`] and a [`Presenter`]
//! - [`Engine::run`] until the stream ends or the operator quits
#![forbid(unsafe_code)]

mod foundation;

/// Frame acquisition sources.
pub mod capture;
/// Heterogeneous-delay compositing.
pub mod composite;
/// Engine configuration.
pub mod config;
/// Output sinks.
pub mod encode;
/// Post-processing, key controls and output.
pub mod present;
/// Frames and the frame ring.
pub mod render;
/// The frame cycle coordinator.
pub mod session;

pub use crate::foundation::core::{CHANNELS, Fps, FrameIndex, FrameSize, Rgb8};
pub use crate::foundation::error::{DelayError, DelayResult};

pub use crate::capture::ffmpeg::{FfmpegCapture, open_or_unavailable};
pub use crate::capture::source::{CaptureSource, CaptureSpec, ScriptedSource, UnavailableSource};
pub use crate::composite::algorithm::{Algorithm, Direction, Orientation, Symmetry};
pub use crate::config::{Concurrency, EngineConfig, OutputSpec};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, FfplaySink};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, NullSink, SinkConfig};
pub use crate::present::input::{KeySource, NoKeys, ScriptedKeys, StdinKeys};
pub use crate::present::post::{PostConfig, PostProcessor};
pub use crate::present::presenter::{PresentStats, Presenter};
pub use crate::render::frame::Frame;
pub use crate::render::ring::FrameRing;
pub use crate::session::engine::{Engine, RunSummary};
pub use crate::session::state::{CompositionParams, Phase, RuntimeControls, StopReason};
