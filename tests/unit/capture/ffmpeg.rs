use super::*;

#[test]
fn probe_json_picks_the_video_stream() {
    let json = br#"{
        "streams": [
            { "codec_type": "audio", "sample_rate": "48000" },
            { "codec_type": "video", "width": 640, "height": 360,
              "avg_frame_rate": "30000/1001", "r_frame_rate": "30000/1001" }
        ]
    }"#;
    let probed = parse_probe_json(json).unwrap();
    assert_eq!(probed.size, FrameSize::new(640, 360).unwrap());
    assert_eq!(probed.fps, Some(Fps::new(30000, 1001).unwrap()));
}

#[test]
fn probe_json_falls_back_to_r_frame_rate() {
    let json = br#"{"streams":[{"codec_type":"video","width":4,"height":2,
        "avg_frame_rate":"0/0","r_frame_rate":"25/1"}]}"#;
    let probed = parse_probe_json(json).unwrap();
    assert_eq!(probed.fps, Some(Fps::new(25, 1).unwrap()));
}

#[test]
fn probe_json_without_video_is_unavailable() {
    let json = br#"{"streams":[{"codec_type":"audio"}]}"#;
    assert!(matches!(
        parse_probe_json(json),
        Err(DelayError::SourceUnavailable(_))
    ));
    assert!(parse_probe_json(b"not json").is_err());
}

#[test]
fn camera_args_request_size_and_rate() {
    let args = camera_args(2, FrameSize::new(1280, 720).unwrap(), Fps::new(60, 1).unwrap());
    let joined = args.join(" ");
    assert!(joined.contains("-f v4l2 -input_format mjpeg -framerate 60/1 -video_size 1280x720"));
    assert!(joined.contains("-i /dev/video2"));
    assert!(joined.ends_with("-pix_fmt rgb24 pipe:1"));
}

#[test]
fn missing_file_fails_to_open() {
    let spec = CaptureSpec::File {
        path: "definitely/not/here.mp4".into(),
    };
    let size = FrameSize::new(4, 4).unwrap();
    let fps = Fps::new(30, 1).unwrap();
    assert!(matches!(
        FfmpegCapture::open(&spec, size, fps),
        Err(DelayError::SourceUnavailable(_))
    ));

    let mut fallback = open_or_unavailable(&spec, size, fps);
    let mut dst = Frame::black(size);
    assert!(!fallback.read_into(&mut dst).unwrap());
}

#[test]
fn camera_without_ffmpeg_reports_a_clear_error() {
    if is_ffmpeg_on_path() {
        return;
    }
    let err = FfmpegCapture::open(
        &CaptureSpec::Camera { id: 0 },
        FrameSize::new(4, 4).unwrap(),
        Fps::new(30, 1).unwrap(),
    )
    .unwrap_err();
    assert!(matches!(err, DelayError::SourceUnavailable(_)));
    assert!(err.to_string().contains("not found on PATH"));
}
