use super::*;
use crate::text::wrap::{WrapParams, wrap_text};

fn shaper() -> TextShaper {
    let bytes = std::fs::read("tests/data/fonts/DejaVuSans-Bold.ttf").unwrap();
    TextShaper::new(Arc::new(bytes)).unwrap()
}

#[test]
fn exposes_family_name_from_bytes() {
    let s = shaper();
    assert!(s.family_name().contains("DejaVu"));
}

#[test]
fn garbage_bytes_are_rejected() {
    assert!(TextShaper::new(Arc::new(b"not a font".to_vec())).is_err());
}

#[test]
fn width_grows_with_text_and_size() {
    let mut s = shaper();
    let short = s.measure_width("Build", 40.0).unwrap();
    let long = s.measure_width("Build Better", 40.0).unwrap();
    let big = s.measure_width("Build Better", 80.0).unwrap();
    assert!(short > 0.0);
    assert!(long > short);
    assert!((big / long - 2.0).abs() < 0.05);
}

#[test]
fn vertical_metrics_scale_with_size() {
    let mut s = shaper();
    let m = s.vertical_metrics(50.0).unwrap();
    assert!(m.ascent > 0.0 && m.descent > 0.0);
    assert!(m.ascent > m.descent);
    let m2 = s.vertical_metrics(100.0).unwrap();
    assert!((m2.ascent / m.ascent - 2.0).abs() < 0.05);
}

#[test]
fn real_font_wrapping_keeps_lines_within_budget() {
    let mut s = shaper();
    let text = "Launch week is here and every single one of our new features ships today";
    let p = WrapParams {
        max_width_px: 400.0,
        font_size_px: 32.0,
        max_lines: None,
        line_height_px: 40.0,
        first_baseline_y: 50.0,
    };
    let lines = wrap_text(text, &p, &mut s).unwrap();
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(s.measure_width(&line.text, 32.0).unwrap() <= 400.0);
    }
}

#[test]
fn non_positive_sizes_are_rejected() {
    let mut s = shaper();
    assert!(s.layout_line("x", 0.0, TextBrushRgba8::default()).is_err());
    assert!(s.layout_line("x", f32::NAN, TextBrushRgba8::default()).is_err());
}
