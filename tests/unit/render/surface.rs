use super::*;

#[test]
fn new_surface_is_transparent() {
    let frame = CanvasSurface::new(Canvas::new(4, 3)).unwrap().finish();
    assert_eq!((frame.width, frame.height), (4, 3));
    assert_eq!(frame.data.len(), 4 * 3 * 4);
    assert!(frame.premultiplied);
    assert!(frame.data.iter().all(|b| *b == 0));
}

#[test]
fn oversized_and_empty_canvases_are_rejected() {
    assert!(CanvasSurface::new(Canvas::new(70_000, 10)).is_err());
    assert!(CanvasSurface::new(Canvas::new(0, 10)).is_err());
}

#[test]
fn pixel_lookup_is_bounds_checked() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![1, 2, 3, 4, 5, 6, 7, 8],
        premultiplied: true,
    };
    assert_eq!(frame.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(frame.pixel(2, 0), None);
    assert_eq!(frame.pixel(0, 1), None);
}

#[test]
fn image_paint_checks_byte_length() {
    assert!(image_paint(&[0; 8], 2, 1).is_ok());
    assert!(image_paint(&[0; 7], 2, 1).is_err());
}
