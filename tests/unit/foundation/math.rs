use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_then_unpremultiply_is_identity_for_opaque_pixels() {
    let mut px = vec![12u8, 200, 99, 255, 0, 0, 0, 255];
    let orig = px.clone();
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, orig);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, orig);
}

#[test]
fn transparent_pixels_zero_their_color() {
    let mut px = vec![90u8, 80, 70, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0]);
}

#[test]
fn unpremultiply_recovers_half_alpha_color() {
    let mut px = vec![64u8, 32, 0, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![128, 64, 0, 128]);
}

#[test]
fn alpha_to_u8_clamps_and_rounds() {
    assert_eq!(alpha_to_u8(0.86), 219);
    assert_eq!(alpha_to_u8(1.5), 255);
    assert_eq!(alpha_to_u8(-0.1), 0);
}
