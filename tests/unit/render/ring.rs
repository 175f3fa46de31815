use super::*;

fn size() -> FrameSize {
    FrameSize::new(2, 2).unwrap()
}

#[test]
fn capacity_is_max_delay_plus_two() {
    let ring = FrameRing::new(10, size()).unwrap();
    assert_eq!(ring.capacity(), 12);
    assert_eq!(ring.max_delay(), 10);
    assert!(FrameRing::new(0, size()).is_err());
}

#[test]
fn wrap_is_modulo_capacity() {
    let ring = FrameRing::new(1, size()).unwrap();
    assert_eq!(ring.wrap(0), 0);
    assert_eq!(ring.wrap(3), 0);
    assert_eq!(ring.wrap(7), 1);
}

#[test]
fn split_view_hides_only_the_write_slot() {
    let mut ring = FrameRing::new(3, size()).unwrap();
    for i in 0..ring.capacity() {
        *ring.write(i) = Frame::solid(size(), [i as u8, 0, 0]);
    }

    for hole in 0..5 {
        let (slot, view) = ring.split_for_write(hole);
        assert_eq!(slot.pixel(0, 0), Some([hole as u8, 0, 0]));
        assert_eq!(view.capacity(), 5);
        assert_eq!(view.write_index(), hole);
        for i in 0..5 {
            match view.get(i) {
                Some(f) => {
                    assert_ne!(i, hole);
                    assert_eq!(f.pixel(0, 0), Some([i as u8, 0, 0]));
                }
                None => assert_eq!(i, hole),
            }
        }
        assert!(view.get(5).is_none());
    }
}

#[test]
fn write_slot_and_view_can_be_used_from_two_threads() {
    let mut ring = FrameRing::new(2, size()).unwrap();
    let (slot, view) = ring.split_for_write(1);
    let (a, b) = rayon::join(
        || {
            *slot = Frame::solid(size(), [9, 9, 9]);
            slot.pixel(0, 0)
        },
        || view.get(0).and_then(|f| f.pixel(0, 0)),
    );
    assert_eq!(a, Some([9, 9, 9]));
    assert_eq!(b, Some([0, 0, 0]));
}
