use super::*;

fn size(w: u32, h: u32) -> FrameSize {
    FrameSize::new(w, h).unwrap()
}

#[test]
fn from_raw_validates_length() {
    assert!(Frame::from_raw(2, 2, vec![0u8; 12]).is_ok());
    assert!(Frame::from_raw(2, 2, vec![0u8; 11]).is_err());
    assert!(Frame::from_raw(0, 2, vec![]).is_err());
}

#[test]
fn pixel_access_is_bounds_checked() {
    let mut f = Frame::black(size(3, 2));
    assert!(f.put_pixel(2, 1, [1, 2, 3]));
    assert!(!f.put_pixel(3, 1, [9, 9, 9]));
    assert_eq!(f.pixel(2, 1), Some([1, 2, 3]));
    assert_eq!(f.pixel(0, 2), None);
    assert_eq!(&f.as_bytes()[15..18], &[1, 2, 3]);
}

#[test]
fn copy_rect_copies_only_the_rectangle() {
    let src = Frame::solid(size(4, 3), [200, 100, 50]);
    let mut dst = Frame::black(size(4, 3));
    dst.copy_rect_from(&src, 1..3, 0..3);

    for y in 0..3 {
        assert_eq!(dst.pixel(0, y), Some([0, 0, 0]));
        assert_eq!(dst.pixel(1, y), Some([200, 100, 50]));
        assert_eq!(dst.pixel(2, y), Some([200, 100, 50]));
        assert_eq!(dst.pixel(3, y), Some([0, 0, 0]));
    }
}

#[test]
fn copy_rect_clips_out_of_range_spans() {
    let src = Frame::solid(size(4, 2), [7, 7, 7]);
    let mut dst = Frame::black(size(4, 2));
    dst.copy_rect_from(&src, 3..10, 1..5);
    assert_eq!(dst.pixel(3, 1), Some([7, 7, 7]));
    assert_eq!(dst.pixel(3, 0), Some([0, 0, 0]));

    let before = dst.clone();
    dst.copy_rect_from(&src, 5..9, 0..2);
    assert_eq!(dst, before);
}

#[test]
fn crop_and_blit_round_trip_a_region() {
    let mut f = Frame::black(size(4, 4));
    f.put_pixel(1, 1, [1, 1, 1]);
    f.put_pixel(2, 2, [2, 2, 2]);

    let c = f.crop(1, 1, 2, 2).unwrap();
    assert_eq!(c.size(), size(2, 2));
    assert_eq!(c.pixel(0, 0), Some([1, 1, 1]));
    assert_eq!(c.pixel(1, 1), Some([2, 2, 2]));

    let mut g = Frame::black(size(4, 4));
    g.blit(&c, 2, 2);
    assert_eq!(g.pixel(2, 2), Some([1, 1, 1]));
    assert_eq!(g.pixel(3, 3), Some([2, 2, 2]));

    assert!(f.crop(4, 4, 1, 1).is_err());
}

#[test]
fn rgb_image_conversion_preserves_bytes() {
    let mut f = Frame::black(size(2, 1));
    f.put_pixel(1, 0, [10, 20, 30]);
    let img = f.to_rgb_image();
    assert_eq!(img.get_pixel(1, 0).0, [10, 20, 30]);
    let back = Frame::from_rgb_image(img).unwrap();
    assert_eq!(back, f);
}
