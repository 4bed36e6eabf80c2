use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [0, 0, 0, 0]), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let src = [100, 110, 120, 200];
    assert_eq!(over([0, 0, 0, 0], src), src);
}

#[test]
fn over_half_alpha_blends() {
    // 50% white over opaque black.
    let out = over([0, 0, 0, 255], [128, 128, 128, 128]);
    assert_eq!(out, [128, 128, 128, 255]);
}

#[test]
fn over_in_place_checks_lengths_and_stride() {
    let mut dst = vec![0u8; 16];
    assert!(over_in_place(&mut dst, &[0u8; 12], 8).is_err());
    assert!(over_in_place(&mut dst, &[0u8; 16], 6).is_err());
    assert!(over_in_place(&mut dst, &[0u8; 16], 0).is_err());
    assert!(over_in_place(&mut dst, &[0u8; 16], 8).is_ok());
}

#[test]
fn over_in_place_composites_every_row() {
    let mut dst = vec![0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255];
    let src = vec![255, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 0, 0, 255, 0, 255];
    over_in_place(&mut dst, &src, 8).unwrap();
    assert_eq!(
        dst,
        vec![255, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255, 0, 255, 0, 255]
    );
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![100u8, 50, 200, 128, 9, 9, 9, 0, 1, 2, 3, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(
        &px[..4],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    for (got, want) in px[..3].iter().zip([100u8, 50, 200]) {
        assert!(got.abs_diff(want) <= 1, "{got} vs {want}");
    }
    assert_eq!(&px[8..], &[1, 2, 3, 255]);
}
