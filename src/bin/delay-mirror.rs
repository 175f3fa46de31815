use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use delay_mirror::{
    CaptureSpec, Concurrency, Engine, EngineConfig, FrameSize, KeySource, NoKeys, OutputSpec,
    StdinKeys,
};

#[derive(Parser, Debug)]
#[command(name = "delay-mirror", version, about = "Real-time time-delay mirror")]
struct Cli {
    /// Capture source: a single digit selects a camera, anything longer is a video file.
    source: Option<String>,

    /// Engine configuration JSON; command-line flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Requested camera size, `WIDTHxHEIGHT`.
    #[arg(long)]
    size: Option<FrameSize>,

    /// Deepest look-back in frames (the ring holds this plus two).
    #[arg(long)]
    max_delay: Option<u32>,

    /// Initial delay.
    #[arg(long)]
    delay: Option<u32>,

    /// Requested camera frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Seconds between automatic orientation switches (0 disables).
    #[arg(long)]
    switch_interval: Option<f64>,

    /// Let automatic switches cycle through the symmetric variants.
    #[arg(long, default_value_t = false)]
    use_symmetric: bool,

    /// Write an encoded video file instead of opening a window.
    #[arg(long, conflicts_with = "frames_dir")]
    out: Option<PathBuf>,

    /// ffmpeg encoder for `--out`.
    #[arg(long, default_value = "libx264")]
    codec: String,

    /// Write numbered PNG frames into this directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Open a normal window instead of fullscreen.
    #[arg(long, default_value_t = false)]
    windowed: bool,

    /// Run acquisition, composition and presentation on one thread.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Ignore keys typed on stdin.
    #[arg(long, default_value_t = false)]
    no_input: bool,

    /// Print the effective configuration as JSON and exit.
    #[arg(long, default_value_t = false)]
    print_config: bool,

    /// More logging (`-v` debug, `-vv` trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = build_config(&cli)?;
    cfg.validate().context("invalid configuration")?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    let input: Box<dyn KeySource> = if cli.no_input {
        Box::new(NoKeys)
    } else {
        Box::new(StdinKeys::spawn())
    };
    let mut engine = Engine::open(&cfg, input).context("failed to start engine")?;
    let summary = engine.run();
    tracing::debug!(summary = %serde_json::to_string(&summary)?, "summary");
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn build_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut cfg = match cli.config.as_ref() {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };

    if let Some(selector) = cli.source.as_deref() {
        cfg.source = CaptureSpec::parse_selector(selector)?;
    }
    if let Some(size) = cli.size {
        cfg.frame_size = size;
    }
    if let Some(n) = cli.max_delay {
        cfg.max_delay = n;
    }
    if let Some(n) = cli.delay {
        cfg.initial_delay = n;
    }
    if let Some(n) = cli.fps {
        cfg.capture_fps = n;
    }
    if let Some(secs) = cli.switch_interval {
        cfg.switching_interval_secs = secs;
    }
    if cli.use_symmetric {
        cfg.use_symmetric = true;
    }
    if cli.sequential {
        cfg.concurrency = Concurrency::Sequential;
    }
    if cli.threads.is_some() {
        cfg.threads = cli.threads;
    }

    if let Some(path) = cli.out.as_ref() {
        cfg.output = OutputSpec::File {
            path: path.clone(),
            codec: cli.codec.clone(),
        };
    } else if let Some(dir) = cli.frames_dir.as_ref() {
        cfg.output = OutputSpec::Frames { dir: dir.clone() };
    } else if cli.windowed
        && let OutputSpec::Display { fullscreen, .. } = &mut cfg.output
    {
        *fullscreen = false;
    }
    Ok(cfg)
}
