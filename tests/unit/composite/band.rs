use super::*;
use crate::render::ring::FrameRing;

fn size(w: u32, h: u32) -> FrameSize {
    FrameSize::new(w, h).unwrap()
}

#[test]
fn boundaries_are_monotonic_and_within_axis() {
    for len in [1u32, 7, 10, 33, 360, 641, 720, 1280, 1920] {
        for delay in 1u32..=64 {
            let mut prev = 0;
            assert_eq!(boundary(0, len, delay), 0);
            for k in 1..=delay {
                let b = boundary(k, len, delay);
                assert!(b >= prev, "len={len} delay={delay} k={k}");
                assert!(b <= len, "len={len} delay={delay} k={k} b={b}");
                prev = b;
            }
        }
    }
}

#[test]
fn divisible_axes_are_evenly_spaced() {
    for (len, delay) in [(60u32, 5u32), (1280, 10), (720, 8), (1920, 120), (12, 12)] {
        let w = len / delay;
        for k in 0..=delay {
            assert_eq!(boundary(k, len, delay), k * w);
        }
    }
}

#[test]
fn truncation_seams_are_deterministic() {
    // 10 / 3 = 3.33..: bands are 3, 3 and 4 pixels wide.
    let b: Vec<u32> = (0..=3).map(|k| boundary(k, 10, 3)).collect();
    assert_eq!(&b[..3], &[0, 3, 6]);
    assert!(b[3] == 9 || b[3] == 10);
    assert_eq!(b, (0..=3).map(|k| boundary(k, 10, 3)).collect::<Vec<_>>());
}

#[test]
fn signed_boundary_rejects_negative_multipliers() {
    assert_eq!(signed_boundary(-1, 100, 4), None);
    assert_eq!(signed_boundary(0, 100, 4), Some(0));
    assert_eq!(signed_boundary(2, 100, 4), Some(50));
}

#[test]
fn push_clips_spans_and_drops_empty_bands() {
    let mut plan = BandPlan::new(size(10, 4));
    plan.push(
        1,
        [Span {
            xs: 8..20,
            ys: 0..4,
        }],
    );
    plan.push(
        2,
        [Span {
            xs: 12..14,
            ys: 0..4,
        }],
    );
    plan.push(3, []);

    assert_eq!(plan.bands().len(), 1);
    assert_eq!(plan.bands()[0].spans[0].xs, 8..10);
    assert_eq!(plan.read_steps().collect::<Vec<_>>(), vec![1]);
    assert_eq!(plan.read_indices(11, 12), vec![0]);
}

#[test]
fn apply_copies_bands_and_skips_the_write_slot() {
    let s = size(6, 2);
    let mut ring = FrameRing::new(2, s).unwrap();
    for i in 0..ring.capacity() {
        *ring.write(i) = Frame::solid(s, [i as u8 + 1, 0, 0]);
    }

    let mut plan = BandPlan::new(s);
    plan.push(
        1,
        [Span {
            xs: 2..4,
            ys: 0..2,
        }],
    );
    plan.push(
        2,
        [Span {
            xs: 4..6,
            ys: 0..2,
        }],
    );

    let mut dst = Frame::black(s);
    let (_slot, view) = ring.split_for_write(2);
    let stats = plan.apply(&mut dst, &view, 0);

    assert_eq!(
        stats,
        ApplyStats {
            bands_applied: 1,
            bands_skipped: 1
        }
    );
    assert_eq!(dst.pixel(0, 0), Some([0, 0, 0]));
    assert_eq!(dst.pixel(3, 1), Some([2, 0, 0]));
    assert_eq!(dst.pixel(5, 1), Some([0, 0, 0]));
}

#[test]
fn step_at_reports_the_last_writer() {
    let mut plan = BandPlan::new(size(8, 1));
    plan.push(
        1,
        [Span {
            xs: 0..6,
            ys: 0..1,
        }],
    );
    plan.push(
        2,
        [Span {
            xs: 4..8,
            ys: 0..1,
        }],
    );
    assert_eq!(plan.step_at(3, 0), Some(1));
    assert_eq!(plan.step_at(4, 0), Some(2));
    assert_eq!(plan.step_at(8, 0), None);
}
