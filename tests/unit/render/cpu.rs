use std::sync::Arc;

use super::*;
use crate::{
    assets::decode::{LoadedAsset, decode_asset},
    compile::plan::{ImageRole, PlacedLine, TextRole},
    config::branding::GradientPosition,
    effects::gradient::gradient_bands,
    foundation::core::Canvas,
};

#[derive(Debug, PartialEq)]
enum Call {
    Fill(Rgb8),
    Image { w: u32, h: u32, target: LayoutBox },
    Band(f64, f64),
    Rect(LayoutBox),
    Text(String),
}

#[derive(Default)]
struct MockBackend {
    calls: Vec<Call>,
}

impl PaintBackend for MockBackend {
    fn fill(&mut self, color: Rgb8) -> PostcompResult<()> {
        self.calls.push(Call::Fill(color));
        Ok(())
    }

    fn draw_image(&mut self, image: &PreparedImage, target: LayoutBox) -> PostcompResult<()> {
        self.calls.push(Call::Image {
            w: image.width,
            h: image.height,
            target,
        });
        Ok(())
    }

    fn draw_gradient_band(&mut self, band: &GradientBand) -> PostcompResult<()> {
        self.calls.push(Call::Band(band.y0, band.y1));
        Ok(())
    }

    fn fill_rect(&mut self, target: LayoutBox, _color: Rgb8) -> PostcompResult<()> {
        self.calls.push(Call::Rect(target));
        Ok(())
    }

    fn draw_text(&mut self, text: &TextOp) -> PostcompResult<()> {
        self.calls.push(Call::Text(text.lines[0].text.clone()));
        Ok(())
    }
}

fn solid_raster(w: u32, h: u32, px: [u8; 4]) -> LoadedAsset {
    LoadedAsset::Raster(PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(px.repeat((w * h) as usize)),
    })
}

fn text_op(text: &str, x: f64, baseline_y: f64) -> TextOp {
    TextOp {
        role: TextRole::Slogan,
        size_px: 48.0,
        color: Rgb8::WHITE,
        lines: vec![PlacedLine {
            text: text.to_owned(),
            x,
            baseline_y,
        }],
    }
}

#[test]
fn execute_plan_dispatches_in_order() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="5"/>"#;
    let assets = PostAssets {
        background: Some(solid_raster(3, 3, [0, 0, 0, 255])),
        logo: Some(decode_asset(svg).unwrap()),
    };
    let logo_box = LayoutBox::new(10.0, 10.0, 40.0, 20.0);
    let plan = RenderPlan {
        canvas: Canvas::new(100, 100),
        ops: vec![
            DrawOp::Image {
                role: ImageRole::Background,
                target: LayoutBox::new(0.0, 0.0, 100.0, 100.0),
                fallback: Some(Rgb8::BLACK),
            },
            DrawOp::GradientBand {
                band: gradient_bands(
                    Canvas::new(100, 100),
                    Rgb8::BLACK,
                    20.0,
                    GradientPosition::Top,
                )[0],
            },
            DrawOp::Image {
                role: ImageRole::Logo,
                target: logo_box,
                fallback: None,
            },
            DrawOp::Rect {
                target: logo_box,
                color: Rgb8::WHITE,
            },
            DrawOp::Text(text_op("hi", 0.0, 50.0)),
        ],
    };

    let mut backend = MockBackend::default();
    execute_plan(&plan, &assets, &mut backend).unwrap();
    assert_eq!(
        backend.calls,
        vec![
            Call::Image {
                w: 3,
                h: 3,
                target: LayoutBox::new(0.0, 0.0, 100.0, 100.0)
            },
            Call::Band(0.0, 20.0),
            // SVG logos arrive pre-rasterized at box size.
            Call::Image {
                w: 40,
                h: 20,
                target: logo_box
            },
            Call::Rect(logo_box),
            Call::Text("hi".to_owned()),
        ]
    );
}

#[test]
fn execute_plan_fails_on_missing_asset() {
    let plan = RenderPlan {
        canvas: Canvas::new(10, 10),
        ops: vec![DrawOp::Image {
            role: ImageRole::Logo,
            target: LayoutBox::new(0.0, 0.0, 5.0, 5.0),
            fallback: None,
        }],
    };
    let mut backend = MockBackend::default();
    let err = execute_plan(&plan, &PostAssets::default(), &mut backend).unwrap_err();
    assert!(matches!(err, PostcompError::Render(_)));
}

#[test]
fn unpaintable_images_fall_back_instead_of_failing() {
    // Too wide for a u16 pixmap: decoding would have rejected it, painting must too.
    let wide = solid_raster(70_000, 1, [255, 255, 255, 255]);
    let assets = PostAssets {
        background: Some(wide.clone()),
        logo: Some(wide),
    };
    let plan = RenderPlan {
        canvas: Canvas::new(20, 20),
        ops: vec![
            DrawOp::Image {
                role: ImageRole::Background,
                target: LayoutBox::new(0.0, 0.0, 20.0, 20.0),
                fallback: Some(Rgb8::new(0, 120, 0)),
            },
            DrawOp::Image {
                role: ImageRole::Logo,
                target: LayoutBox::new(5.0, 5.0, 10.0, 10.0),
                fallback: None,
            },
        ],
    };
    let frame = render_plan_cpu(&plan, &assets, None).unwrap();
    assert_eq!(frame.pixel(0, 0), Some([0, 120, 0, 255]));
    assert_eq!(frame.pixel(10, 10), Some([0, 120, 0, 255]));
}

#[test]
fn oversized_svg_logo_box_still_paints() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="100000" height="10">
<rect width="100000" height="10" fill="#ff0000"/></svg>"##;
    let assets = PostAssets {
        background: None,
        logo: Some(decode_asset(svg).unwrap()),
    };
    let plan = RenderPlan {
        canvas: Canvas::new(100, 100),
        ops: vec![
            DrawOp::Fill { color: Rgb8::BLACK },
            DrawOp::Image {
                role: ImageRole::Logo,
                target: LayoutBox::new(0.0, 40.0, 1_404_000.0, 140.4),
                fallback: None,
            },
        ],
    };
    let frame = render_plan_cpu(&plan, &assets, None).unwrap();
    assert_eq!(frame.pixel(50, 10), Some([0, 0, 0, 255]));
    assert!(near(frame.pixel(50, 70).unwrap(), [255, 0, 0, 255], 2));
}

fn near(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= tol)
}

#[test]
fn cpu_fill_and_rect() {
    let plan = RenderPlan {
        canvas: Canvas::new(64, 32),
        ops: vec![
            DrawOp::Fill {
                color: Rgb8::new(10, 20, 30),
            },
            DrawOp::Rect {
                target: LayoutBox::new(8.0, 8.0, 16.0, 8.0),
                color: Rgb8::new(200, 100, 0),
            },
        ],
    };
    let frame = render_plan_cpu(&plan, &PostAssets::default(), None).unwrap();
    assert_eq!(frame.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(63, 31), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(12, 10), Some([200, 100, 0, 255]));
    assert_eq!(frame.pixel(30, 10), Some([10, 20, 30, 255]));
}

#[test]
fn cpu_gradient_fades_towards_the_middle() {
    let canvas = Canvas::new(40, 200);
    let mut ops = vec![DrawOp::Fill { color: Rgb8::BLACK }];
    for band in gradient_bands(canvas, Rgb8::new(0, 0, 255), 25.0, GradientPosition::Both) {
        ops.push(DrawOp::GradientBand { band });
    }
    let frame = render_plan_cpu(&RenderPlan { canvas, ops }, &PostAssets::default(), None).unwrap();

    let blue = |y: u32| frame.pixel(20, y).unwrap()[2];
    assert!(near(frame.pixel(20, 0).unwrap(), [0, 0, 217, 255], 2));
    assert!(blue(0) > blue(20));
    assert!(blue(20) > blue(40));
    assert_eq!(frame.pixel(20, 100), Some([0, 0, 0, 255]));
    assert!(blue(199) > blue(170));
    assert!(near(frame.pixel(20, 199).unwrap(), [0, 0, 217, 255], 2));
}

#[test]
fn cpu_image_is_stretched_into_its_box() {
    let assets = PostAssets {
        background: None,
        logo: Some(solid_raster(2, 1, [255, 0, 0, 255])),
    };
    let plan = RenderPlan {
        canvas: Canvas::new(100, 100),
        ops: vec![
            DrawOp::Fill { color: Rgb8::BLACK },
            DrawOp::Image {
                role: ImageRole::Logo,
                target: LayoutBox::new(20.0, 40.0, 60.0, 30.0),
                fallback: None,
            },
        ],
    };
    let frame = render_plan_cpu(&plan, &assets, None).unwrap();
    assert!(near(frame.pixel(50, 55).unwrap(), [255, 0, 0, 255], 2));
    assert_eq!(frame.pixel(10, 10), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(50, 90), Some([0, 0, 0, 255]));
}

#[test]
fn cpu_text_requires_a_shaper() {
    let plan = RenderPlan {
        canvas: Canvas::new(10, 10),
        ops: vec![DrawOp::Text(text_op("x", 0.0, 5.0))],
    };
    assert!(render_plan_cpu(&plan, &PostAssets::default(), None).is_err());
}

#[test]
fn cpu_text_paints_glyphs_near_the_baseline() {
    let font = std::fs::read("tests/data/fonts/DejaVuSans-Bold.ttf").unwrap();
    let shaper = TextShaper::new(Arc::new(font)).unwrap();
    let plan = RenderPlan {
        canvas: Canvas::new(300, 100),
        ops: vec![
            DrawOp::Fill { color: Rgb8::BLACK },
            DrawOp::Text(text_op("Hello", 20.0, 70.0)),
        ],
    };
    let frame = render_plan_cpu(&plan, &PostAssets::default(), Some(shaper)).unwrap();

    let lit = |y0: u32, y1: u32| {
        (y0..y1)
            .flat_map(|y| (0..300).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.pixel(x, y).unwrap()[0] > 128)
            .count()
    };
    assert!(lit(30, 71) > 100, "glyph ink above the baseline");
    assert_eq!(lit(0, 15), 0, "nothing far above a 48px cap height");
    assert_eq!(lit(85, 100), 0, "nothing far below the baseline");
}
