use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{DelayError, DelayResult};
use crate::render::frame::Frame;

/// Options for [`FfmpegSink`] file output.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FfmpegSinkOpts {
    /// Output video file path; the container follows the extension.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// ffmpeg video encoder name (`libx264`, `mjpeg`, ...).
    pub codec: String,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            codec: "libx264".to_owned(),
        }
    }

    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = codec.into();
        self
    }
}

/// Running child process fed raw `rgb24` frames on stdin.
struct RawVideoPipe {
    tool: &'static str,
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl RawVideoPipe {
    fn spawn(tool: &'static str, args: &[String]) -> DelayResult<Self> {
        let mut child = Command::new(tool)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DelayError::sink_unavailable(format!(
                    "failed to spawn {tool} (is it installed and on PATH?): {e}"
                ))
            })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DelayError::sink_unavailable(format!("failed to open {tool} stdin")))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| DelayError::sink_unavailable(format!("failed to open {tool} stderr")))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });
        Ok(Self {
            tool,
            child,
            stdin: Some(stdin),
            stderr_drain: Some(stderr_drain),
        })
    }

    fn write(&mut self, bytes: &[u8]) -> DelayResult<()> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(DelayError::sink_unavailable(format!(
                "{} sink is already finalized",
                self.tool
            )));
        };
        stdin.write_all(bytes).map_err(|e| {
            DelayError::sink_unavailable(format!("failed to write frame to {}: {e}", self.tool))
        })
    }

    fn finish(mut self) -> DelayResult<()> {
        drop(self.stdin.take());
        let status = self.child.wait().map_err(|e| {
            DelayError::sink_unavailable(format!("failed to wait for {}: {e}", self.tool))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| DelayError::sink_unavailable("stderr drain thread panicked"))??,
            None => Vec::new(),
        };
        if !status.success() {
            return Err(DelayError::sink_unavailable(format!(
                "{} exited with status {}: {}",
                self.tool,
                status,
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        Ok(())
    }
}

fn raw_input_args(cfg: &SinkConfig) -> Vec<String> {
    vec![
        "-loglevel".into(),
        "error".into(),
        "-f".into(),
        "rawvideo".into(),
        "-pixel_format".into(),
        "rgb24".into(),
        "-video_size".into(),
        format!("{}x{}", cfg.width, cfg.height),
        "-framerate".into(),
        fps_arg(cfg.fps),
        "-i".into(),
        "pipe:0".into(),
    ]
}

fn fps_arg(fps: Fps) -> String {
    format!("{}/{}", fps.num, fps.den)
}

/// 4:2:0 output format for `codec`. JPEG-based encoders only accept the full-range variant.
pub(crate) fn output_pix_fmt(codec: &str) -> &'static str {
    match codec {
        "mjpeg" | "ljpeg" => "yuvj420p",
        _ => "yuv420p",
    }
}

pub(crate) fn encoder_args(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Vec<String> {
    let mut args = vec![if opts.overwrite { "-y" } else { "-n" }.to_owned()];
    args.extend(raw_input_args(cfg));
    args.extend(
        ["-an", "-c:v", opts.codec.as_str(), "-pix_fmt", output_pix_fmt(&opts.codec)]
            .into_iter()
            .map(str::to_owned),
    );
    args.push(opts.out_path.to_string_lossy().into_owned());
    args
}

pub(crate) fn player_args(title: &str, fullscreen: bool, cfg: &SinkConfig) -> Vec<String> {
    let mut args = raw_input_args(cfg);
    args.extend(["-window_title".to_owned(), title.to_owned()]);
    if fullscreen {
        args.push("-fs".to_owned());
    }
    args.extend(["-autoexit".to_owned(), "-fflags".to_owned(), "nobuffer".to_owned()]);
    args
}

/// Sink that spawns the system `ffmpeg` and encodes frames into a video file.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    pipe: Option<RawVideoPipe>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            pipe: None,
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> DelayResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(DelayError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(DelayError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p output)",
            ));
        }
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(DelayError::sink_unavailable(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !crate::capture::ffmpeg::is_ffmpeg_on_path() {
            return Err(DelayError::sink_unavailable(
                "ffmpeg is required for file output, but was not found on PATH",
            ));
        }
        self.pipe = Some(RawVideoPipe::spawn("ffmpeg", &encoder_args(&self.opts, &cfg))?);
        tracing::info!(
            path = %self.opts.out_path.display(),
            codec = %self.opts.codec,
            "opened output file"
        );
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> DelayResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| DelayError::sink_unavailable("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(DelayError::validation(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        cfg.check_frame(frame)?;
        self.last_idx = Some(idx);
        let pipe = self
            .pipe
            .as_mut()
            .ok_or_else(|| DelayError::sink_unavailable("ffmpeg sink not started"))?;
        pipe.write(frame.as_bytes())
    }

    fn end(&mut self) -> DelayResult<()> {
        let pipe = self
            .pipe
            .take()
            .ok_or_else(|| DelayError::sink_unavailable("ffmpeg sink not started"))?;
        self.cfg = None;
        pipe.finish()
    }
}

/// Display sink: streams frames into an `ffplay` window.
pub struct FfplaySink {
    title: String,
    fullscreen: bool,
    pipe: Option<RawVideoPipe>,
    cfg: Option<SinkConfig>,
}

impl FfplaySink {
    pub fn new(title: impl Into<String>, fullscreen: bool) -> Self {
        Self {
            title: title.into(),
            fullscreen,
            pipe: None,
            cfg: None,
        }
    }
}

impl FrameSink for FfplaySink {
    fn begin(&mut self, cfg: SinkConfig) -> DelayResult<()> {
        let args = player_args(&self.title, self.fullscreen, &cfg);
        self.pipe = Some(RawVideoPipe::spawn("ffplay", &args)?);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &Frame) -> DelayResult<()> {
        let (Some(cfg), Some(pipe)) = (self.cfg.as_ref(), self.pipe.as_mut()) else {
            return Err(DelayError::sink_unavailable("display sink not started"));
        };
        cfg.check_frame(frame)?;
        pipe.write(frame.as_bytes())
    }

    fn end(&mut self) -> DelayResult<()> {
        self.cfg = None;
        match self.pipe.take() {
            Some(pipe) => pipe.finish(),
            None => Ok(()),
        }
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> DelayResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
