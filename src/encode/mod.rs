//! Output sinks for presented frames.

pub mod ffmpeg;
pub mod png;
pub mod sink;
