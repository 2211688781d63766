use bytemuck::Zeroable;
use seedsum::{first_unsolved_window, parse_target, residual_target, window_target, Element};

#[test]
fn zero_windows_are_skipped() {
    assert_eq!(first_unsolved_window(&[0u8; 32], 8), 7);
    assert_eq!(first_unsolved_window(&[0u8; 32], 1), 0);

    let mut target = [0u8; 32];
    target[5] = 1; // window 1
    assert_eq!(first_unsolved_window(&target, 8), 1);
    target[0] = 1; // window 0
    assert_eq!(first_unsolved_window(&target, 8), 0);
}

#[test]
fn skipping_caps_at_last_stage() {
    let mut target = [0u8; 32];
    target[28] = 1; // only window 7 is set
    assert_eq!(first_unsolved_window(&target, 4), 3);
}

#[test]
fn single_window_target_literal() {
    let (target, num_stages) = parse_target("DEADBEEF").unwrap();
    assert_eq!(num_stages, 1);

    let curr = window_target(&target, 0);
    assert_eq!(curr.buf[..4], [0xEF, 0xBE, 0xAD, 0xDE]);
    assert!(curr.buf[4..].iter().all(|&b| b == 0));
}

#[test]
fn window_target_zeroes_solved_bytes() {
    let mut target = [0u8; 32];
    for (i, b) in target.iter_mut().enumerate() {
        *b = i as u8 + 1;
    }
    let curr = window_target(&target, 8);
    assert_eq!(curr.buf[..8], [0u8; 8]);
    assert_eq!(curr.buf[8..], target[8..]);
}

#[test]
fn residual_discounts_accumulated_window() {
    let (target, num_stages) = parse_target("DEADBEEFCAFEBABE").unwrap();
    assert_eq!(num_stages, 2);
    assert_eq!(target[..8], [0xBE, 0xBA, 0xFE, 0xCA, 0xEF, 0xBE, 0xAD, 0xDE]);

    let mut accum = Element::zeroed();
    accum.buf[4..8].copy_from_slice(&1u32.to_le_bytes());

    let curr = residual_target(&target, &accum, 1);
    assert_eq!(curr.buf[..4], [0u8; 4]);
    // 0xDEADBEEF - 1
    assert_eq!(curr.buf[4..8], [0xEE, 0xBE, 0xAD, 0xDE]);
    assert!(curr.buf[8..].iter().all(|&b| b == 0));
}

#[test]
fn residual_wraps_mod_2_32() {
    let (target, _) = parse_target("DEADBEEFCAFEBABE").unwrap();

    let mut accum = Element::zeroed();
    accum.buf[4..8].copy_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);

    let curr = residual_target(&target, &accum, 1);
    // 0xDEADBEEF - 0xFFFFFFFF mod 2^32
    assert_eq!(curr.buf[4..8], [0xF0, 0xBE, 0xAD, 0xDE]);
    assert_eq!(curr.buf[..4], [0u8; 4]);
    assert!(curr.buf[8..].iter().all(|&b| b == 0));
}
