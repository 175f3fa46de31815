use super::*;

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig::new(FrameSize::new(w, h).unwrap(), Fps::new(30, 1).unwrap())
}

#[test]
fn in_memory_sink_shares_storage_between_clones() {
    let handle = InMemorySink::new();
    let mut sink: Box<dyn FrameSink> = Box::new(handle.clone());

    sink.begin(cfg(2, 2)).unwrap();
    let f = Frame::solid(FrameSize::new(2, 2).unwrap(), [9, 8, 7]);
    sink.push_frame(FrameIndex(0), &f).unwrap();
    sink.push_frame(FrameIndex(1), &f).unwrap();
    sink.end().unwrap();

    assert_eq!(handle.len(), 2);
    assert!(handle.is_ended());
    assert_eq!(handle.config(), Some(cfg(2, 2)));
    assert_eq!(handle.frames()[1].0, FrameIndex(1));
    assert_eq!(handle.last().unwrap().pixel(1, 1), Some([9, 8, 7]));
}

#[test]
fn in_memory_sink_rejects_wrong_size_and_unstarted_pushes() {
    let mut sink = InMemorySink::new();
    let f = Frame::black(FrameSize::new(3, 2).unwrap());
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &f),
        Err(DelayError::SinkUnavailable(_))
    ));

    sink.begin(cfg(2, 2)).unwrap();
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &f),
        Err(DelayError::Validation(_))
    ));
    assert!(sink.is_empty());
}
