use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::Context as _;

use crate::capture::source::{CaptureSource, CaptureSpec};
use crate::foundation::core::{Fps, FrameSize};
use crate::foundation::error::{DelayError, DelayResult};
use crate::render::frame::Frame;

/// Metadata reported by `ffprobe` for a video file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbedVideo {
    pub size: FrameSize,
    pub fps: Option<Fps>,
}

/// Probe width, height and frame rate of the first video stream in `path`.
pub fn probe_video(path: &Path) -> DelayResult<ProbedVideo> {
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| DelayError::source_unavailable(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(DelayError::source_unavailable(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(&out.stdout)
}

pub(crate) fn parse_probe_json(json: &[u8]) -> DelayResult<ProbedVideo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        avg_frame_rate: Option<String>,
        r_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| DelayError::source_unavailable(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| DelayError::source_unavailable("no video stream found"))?;
    let (Some(width), Some(height)) = (video.width, video.height) else {
        return Err(DelayError::source_unavailable(
            "ffprobe reported no video dimensions",
        ));
    };
    // "0/0" shows up for variable-rate streams.
    let fps = [video.avg_frame_rate.as_deref(), video.r_frame_rate.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|r| Fps::parse_ratio(r).ok());
    Ok(ProbedVideo {
        size: FrameSize::new(width, height)?,
        fps,
    })
}

/// Capture source that decodes through a spawned `ffmpeg` writing raw `rgb24` to stdout.
pub struct FfmpegCapture {
    spec: CaptureSpec,
    size: FrameSize,
    fps: Option<Fps>,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    frames_read: u64,
}

impl std::fmt::Debug for FfmpegCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegCapture")
            .field("spec", &self.spec)
            .field("size", &self.size)
            .field("fps", &self.fps)
            .field("frames_read", &self.frames_read)
            .finish_non_exhaustive()
    }
}

impl FfmpegCapture {
    /// Open `spec`. Cameras are opened at `requested` size and `fps`; files keep their own size.
    pub fn open(spec: &CaptureSpec, requested: FrameSize, fps: Fps) -> DelayResult<Self> {
        if !is_ffmpeg_on_path() {
            return Err(DelayError::source_unavailable(
                "ffmpeg is required for capture, but was not found on PATH",
            ));
        }
        let (args, size, fps) = match spec {
            CaptureSpec::Camera { id } => (camera_args(*id, requested, fps), requested, Some(fps)),
            CaptureSpec::File { path } => {
                if !path.exists() {
                    return Err(DelayError::source_unavailable(format!(
                        "video file '{}' does not exist",
                        path.display()
                    )));
                }
                let probed = probe_video(path)?;
                (file_args(path), probed.size, probed.fps)
            }
        };

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DelayError::source_unavailable(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DelayError::source_unavailable("failed to open ffmpeg stdout"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| DelayError::source_unavailable("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::info!(source = %spec, size = %size, "opened capture source");
        Ok(Self {
            spec: spec.clone(),
            size,
            fps,
            child: Some(child),
            stdout: Some(stdout),
            stderr_drain: Some(stderr_drain),
            frames_read: 0,
        })
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    fn shutdown(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                tracing::trace!("ffmpeg capture already exited: {e}");
            }
            if let Err(e) = child.wait() {
                tracing::trace!("ffmpeg capture wait failed: {e}");
            }
        }
        if let Some(handle) = self.stderr_drain.take() {
            match handle.join() {
                Ok(Ok(bytes)) if !bytes.is_empty() => {
                    tracing::debug!(
                        stderr = %String::from_utf8_lossy(&bytes).trim(),
                        "ffmpeg capture stderr"
                    );
                }
                Ok(Err(e)) => tracing::debug!("ffmpeg capture stderr read failed: {e}"),
                _ => {}
            }
        }
    }
}

impl CaptureSource for FfmpegCapture {
    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn fps(&self) -> Option<Fps> {
        self.fps
    }

    fn read_into(&mut self, dst: &mut Frame) -> DelayResult<bool> {
        if dst.size() != self.size {
            return Err(DelayError::validation(format!(
                "capture target is {}, source produces {}",
                dst.size(),
                self.size
            )));
        }
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(false);
        };
        match stdout.read_exact(dst.as_bytes_mut()) {
            Ok(()) => {
                self.frames_read += 1;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                tracing::debug!(frames = self.frames_read, "capture stream ended");
                self.shutdown();
                Ok(false)
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("failed to read frame from {}", self.spec))
                .into()),
        }
    }
}

impl Drop for FfmpegCapture {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub(crate) fn camera_args(id: u32, size: FrameSize, fps: Fps) -> Vec<String> {
    vec![
        "-loglevel".into(),
        "error".into(),
        "-f".into(),
        "v4l2".into(),
        "-input_format".into(),
        "mjpeg".into(),
        "-framerate".into(),
        format!("{}/{}", fps.num, fps.den),
        "-video_size".into(),
        size.to_string(),
        "-i".into(),
        format!("/dev/video{id}"),
        "-an".into(),
        "-s".into(),
        size.to_string(),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgb24".into(),
        "pipe:1".into(),
    ]
}

pub(crate) fn file_args(path: &Path) -> Vec<String> {
    vec![
        "-loglevel".into(),
        "error".into(),
        "-i".into(),
        path.to_string_lossy().into_owned(),
        "-an".into(),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgb24".into(),
        "pipe:1".into(),
    ]
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Open an ffmpeg source, falling back to [`UnavailableSource`](super::source::UnavailableSource)
/// when it cannot be opened.
pub fn open_or_unavailable(
    spec: &CaptureSpec,
    requested: FrameSize,
    fps: Fps,
) -> Box<dyn CaptureSource> {
    match FfmpegCapture::open(spec, requested, fps).with_context(|| format!("opening {spec}")) {
        Ok(src) => Box::new(src),
        Err(e) => {
            tracing::error!("cannot open capture source: {e:#}");
            Box::new(super::source::UnavailableSource::new(requested))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/ffmpeg.rs"]
mod tests;
