//! Frame acquisition.
//!
//! A [`CaptureSource`](source::CaptureSource) fills one ring slot per cycle and reports end of
//! stream by returning `false`.

pub mod ffmpeg;
pub mod source;
