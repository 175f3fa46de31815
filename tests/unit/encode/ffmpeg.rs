use super::*;
use crate::capture::ffmpeg::is_ffmpeg_on_path;
use crate::foundation::core::FrameSize;

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig::new(FrameSize::new(w, h).unwrap(), Fps::new(60, 1).unwrap())
}

#[test]
fn encoder_args_feed_rgb24_and_use_the_codec() {
    let opts = FfmpegSinkOpts::new("out/delays.avi").with_codec("mjpeg");
    let args = encoder_args(&opts, &cfg(1920, 1080)).join(" ");
    assert!(args.starts_with("-y "));
    assert!(args.contains("-f rawvideo -pixel_format rgb24 -video_size 1920x1080 -framerate 60/1"));
    assert!(args.contains("-c:v mjpeg -pix_fmt yuvj420p"));
    assert!(args.ends_with("out/delays.avi"));
}

#[test]
fn encoder_pix_fmt_follows_the_codec() {
    let x264 = encoder_args(&FfmpegSinkOpts::new("a.mp4"), &cfg(4, 2)).join(" ");
    assert!(x264.contains("-c:v libx264 -pix_fmt yuv420p "));
    assert_eq!(output_pix_fmt("mjpeg"), "yuvj420p");
    assert_eq!(output_pix_fmt("libx265"), "yuv420p");
}

#[test]
fn file_sink_needs_ffmpeg_on_path() {
    if is_ffmpeg_on_path() {
        return;
    }
    let dir = std::env::temp_dir().join("delay-mirror-no-ffmpeg");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(dir.join("out.mp4")));
    let err = sink.begin(cfg(4, 2)).unwrap_err();
    assert!(matches!(err, DelayError::SinkUnavailable(_)));
    assert!(err.to_string().contains("not found on PATH"));
}

#[test]
fn player_args_request_fullscreen_window() {
    let args = player_args("webcam-delays", true, &cfg(4, 2));
    assert!(args.iter().any(|a| a == "-fs"));
    assert!(args.windows(2).any(|w| w[0] == "-window_title" && w[1] == "webcam-delays"));
    assert!(!player_args("x", false, &cfg(4, 2)).iter().any(|a| a == "-fs"));
}

#[test]
fn ffmpeg_sink_rejects_odd_dimensions_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    assert!(matches!(
        sink.begin(cfg(3, 2)),
        Err(DelayError::Validation(_))
    ));
}

#[test]
fn pushing_to_an_unstarted_sink_fails() {
    let f = Frame::black(FrameSize::new(2, 2).unwrap());
    let mut file = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    assert!(file.push_frame(FrameIndex(0), &f).is_err());
    assert!(file.end().is_err());

    let mut display = FfplaySink::new("t", false);
    assert!(display.push_frame(FrameIndex(0), &f).is_err());
    assert!(display.end().is_ok());
}
