use super::*;
use crate::foundation::core::{Fps, FrameSize};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("delay-mirror-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn writes_numbered_pngs() {
    let dir = scratch_dir("png");
    let size = FrameSize::new(3, 2).unwrap();
    let mut sink = PngSequenceSink::new(&dir).with_prefix("d_");

    sink.begin(SinkConfig::new(size, Fps::new(30, 1).unwrap()))
        .unwrap();
    let mut f = Frame::black(size);
    f.put_pixel(2, 1, [200, 100, 50]);
    sink.push_frame(FrameIndex(7), &f).unwrap();
    sink.end().unwrap();

    let path = sink.path_for(FrameIndex(7));
    assert!(path.ends_with("d_000007.png"));
    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(2, 1).0, [200, 100, 50]);
    assert_eq!(sink.written(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn rejects_frames_of_another_size() {
    let dir = scratch_dir("png-size");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig::new(
        FrameSize::new(2, 2).unwrap(),
        Fps::new(30, 1).unwrap(),
    ))
    .unwrap();
    let f = Frame::black(FrameSize::new(4, 2).unwrap());
    assert!(sink.push_frame(FrameIndex(0), &f).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}
