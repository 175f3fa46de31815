use super::*;

fn controls(delay: u32) -> RuntimeControls {
    let mut c = RuntimeControls::default();
    c.params.set_delay(delay);
    c
}

#[test]
fn digits_set_delay_in_steps_of_fifteen() {
    let mut c = controls(50);
    handle_key(u32::from(b'3'), &mut c, 150);
    assert_eq!((c.params.delay, c.params.start_delay), (46, 46));

    handle_key(176, &mut c, 150);
    assert_eq!(c.params.delay, 1);

    handle_key(u32::from(b'9'), &mut c, 100);
    assert_eq!(c.params.delay, 100);

    // High bits are ignored.
    handle_key(0x1_00 | u32::from(b'2'), &mut c, 150);
    assert_eq!(c.params.delay, 31);
}

#[test]
fn plus_and_minus_stay_within_bounds() {
    let mut c = controls(149);
    handle_key(u32::from(b'+'), &mut c, 150);
    handle_key(171, &mut c, 150);
    assert_eq!((c.params.delay, c.params.start_delay), (150, 150));

    let mut c = controls(2);
    handle_key(u32::from(b'-'), &mut c, 150);
    handle_key(173, &mut c, 150);
    assert_eq!((c.params.delay, c.params.start_delay), (1, 1));
}

#[test]
fn toggles_and_selectors() {
    let mut c = controls(10);
    for key in [b' ', b'r', b's', b'v', b'c'] {
        handle_key(u32::from(key), &mut c, 150);
    }
    assert!(c.params.black_screen && c.params.reverse && c.params.symmetric);
    assert!(c.params.vertical && c.crop);

    for key in [b' ', b'r', b's', b'h', b'f'] {
        handle_key(u32::from(key), &mut c, 150);
    }
    assert!(!c.params.black_screen && !c.params.reverse && !c.params.symmetric);
    assert!(!c.params.vertical && !c.crop);

    // Selectors set rather than toggle.
    handle_key(u32::from(b'h'), &mut c, 150);
    assert!(!c.params.vertical);
}

#[test]
fn enter_toggles_heterogeneous_and_sets_a_clamped_delay() {
    let mut c = controls(10);
    assert_eq!(handle_key(13, &mut c, 150), Some(KeyCommand::ToggleHeterogeneous));
    assert!(!c.params.heterogeneous);
    assert_eq!(c.params.delay, 120);

    handle_key(141, &mut c, 60);
    assert!(c.params.heterogeneous);
    assert_eq!((c.params.delay, c.params.start_delay), (60, 60));
}

#[test]
fn backspace_starts_a_fade_only_at_the_ends() {
    let mut c = controls(1);
    handle_key(8, &mut c, 10);
    assert_eq!(c.fade_rate, 0.2);

    c.fade = 0.5;
    c.fade_rate = 0.0;
    handle_key(8, &mut c, 10);
    assert_eq!(c.fade_rate, 0.0);

    c.fade = 1.0;
    handle_key(8, &mut c, 10);
    assert_eq!(c.fade_rate, -0.2);
}

#[test]
fn delete_byte_also_starts_a_fade() {
    assert_eq!(KeyCommand::from_key(127), Some(KeyCommand::StartFade));
    let mut c = controls(1);
    handle_key(127, &mut c, 10);
    assert_eq!(c.fade_rate, 0.2);
}

#[test]
fn escape_quits_and_unknown_keys_do_nothing() {
    let mut c = controls(5);
    let before = c;
    assert_eq!(handle_key(u32::from(b'z'), &mut c, 10), None);
    assert_eq!(c, before);
    assert_eq!(handle_key(27, &mut c, 10), Some(KeyCommand::Quit));
    assert!(c.quit);
}
