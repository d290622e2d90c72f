use crate::{
    assets::decode::PreparedImage,
    compile::plan::{DrawOp, RenderPlan, TextOp},
    effects::gradient::{GradientBand, rasterize_band},
    foundation::{
        core::{Affine, LayoutBox, Rgb8},
        error::{PostcompError, PostcompResult},
    },
    pipeline::PostAssets,
    render::surface::{CanvasSurface, FrameRGBA, image_paint, prepared_image_paint},
    text::shaper::{TextBrushRgba8, TextShaper},
};

/// Paint primitives a plan is executed against.
///
/// Every method paints over what is already on the surface; nothing is ever read back or
/// reordered.
pub trait PaintBackend {
    /// Fill the whole canvas with an opaque color.
    fn fill(&mut self, color: Rgb8) -> PostcompResult<()>;
    /// Draw `image` stretched into `target`.
    fn draw_image(&mut self, image: &PreparedImage, target: LayoutBox) -> PostcompResult<()>;
    fn draw_gradient_band(&mut self, band: &GradientBand) -> PostcompResult<()>;
    fn fill_rect(&mut self, target: LayoutBox, color: Rgb8) -> PostcompResult<()>;
    fn draw_text(&mut self, text: &TextOp) -> PostcompResult<()>;
}

/// Run every op of `plan` against `backend`, in order.
///
/// An image that was loaded but cannot be painted is treated like one that failed to load: it is
/// skipped with a warning and its fallback color, if any, is filled instead.
pub fn execute_plan(
    plan: &RenderPlan,
    assets: &PostAssets,
    backend: &mut dyn PaintBackend,
) -> PostcompResult<()> {
    for op in &plan.ops {
        match op {
            DrawOp::Fill { color } => backend.fill(*color)?,
            DrawOp::Image {
                role,
                target,
                fallback,
            } => {
                let asset = assets.get(*role).ok_or_else(|| {
                    PostcompError::render(format!("plan draws {role:?} image but none was loaded"))
                })?;
                let painted = asset
                    .image_for_box(*target)
                    .and_then(|image| backend.draw_image(&image, *target));
                if let Err(error) = painted {
                    tracing::warn!(?role, error = %error, "image could not be painted, skipping it");
                    if let Some(color) = fallback {
                        backend.fill(*color)?;
                    }
                }
            }
            DrawOp::GradientBand { band } => backend.draw_gradient_band(band)?,
            DrawOp::Rect { target, color } => backend.fill_rect(*target, *color)?,
            DrawOp::Text(text) => backend.draw_text(text)?,
        }
    }
    Ok(())
}

/// CPU painter over a [`CanvasSurface`] using `vello_cpu`.
pub struct CpuPainter {
    surface: CanvasSurface,
    shaper: Option<TextShaper>,
}

impl CpuPainter {
    pub fn new(surface: CanvasSurface, shaper: Option<TextShaper>) -> Self {
        Self { surface, shaper }
    }

    pub fn finish(self) -> FrameRGBA {
        self.surface.finish()
    }

    fn fill_canvas_rect(&mut self, transform: Affine, w: f64, h: f64) {
        let ctx = self.surface.ctx_mut();
        ctx.set_transform(affine_to_cpu(transform));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
    }
}

impl PaintBackend for CpuPainter {
    fn fill(&mut self, color: Rgb8) -> PostcompResult<()> {
        let canvas = self.surface.canvas();
        let ctx = self.surface.ctx_mut();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(solid(color));
        self.fill_canvas_rect(Affine::IDENTITY, canvas.width_f64(), canvas.height_f64());
        Ok(())
    }

    fn draw_image(&mut self, image: &PreparedImage, target: LayoutBox) -> PostcompResult<()> {
        let paint = prepared_image_paint(image)?;
        let (w, h) = (f64::from(image.width), f64::from(image.height));

        let ctx = self.surface.ctx_mut();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        self.fill_canvas_rect(target.fit_transform(w, h), w, h);
        Ok(())
    }

    fn draw_gradient_band(&mut self, band: &GradientBand) -> PostcompResult<()> {
        let canvas = self.surface.canvas();
        let raster = rasterize_band(band, canvas.width, canvas.height)?;
        if raster.rows == 0 {
            return Ok(());
        }
        let paint = image_paint(&raster.rgba8_premul, raster.width, raster.rows)?;

        let ctx = self.surface.ctx_mut();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        self.fill_canvas_rect(
            Affine::translate((0.0, f64::from(raster.y_start))),
            f64::from(raster.width),
            f64::from(raster.rows),
        );
        Ok(())
    }

    fn fill_rect(&mut self, target: LayoutBox, color: Rgb8) -> PostcompResult<()> {
        let ctx = self.surface.ctx_mut();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(solid(color));
        self.fill_canvas_rect(
            Affine::translate((target.x, target.y)),
            target.width,
            target.height,
        );
        Ok(())
    }

    fn draw_text(&mut self, text: &TextOp) -> PostcompResult<()> {
        let shaper = self
            .shaper
            .as_mut()
            .ok_or_else(|| PostcompError::render("text op without a text shaper"))?;
        let font = shaper.font_data().clone();
        let brush = TextBrushRgba8::from(text.color);
        let ctx = self.surface.ctx_mut();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        for placed in &text.lines {
            let layout = shaper.layout_line(&placed.text, text.size_px, brush)?;
            let Some(first) = layout.lines().next() else {
                continue;
            };
            // Layout glyph positions are relative to a baseline at `metrics().baseline`.
            let dy = placed.baseline_y - f64::from(first.metrics().baseline);
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((placed.x, dy)));

            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };

                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));

                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }
        Ok(())
    }
}

fn solid(color: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, 255)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

/// Paint `plan` onto a fresh surface and return the frame.
#[tracing::instrument(level = "debug", skip_all, fields(ops = plan.ops.len()))]
pub fn render_plan_cpu(
    plan: &RenderPlan,
    assets: &PostAssets,
    shaper: Option<TextShaper>,
) -> PostcompResult<FrameRGBA> {
    let surface = CanvasSurface::new(plan.canvas)?;
    let mut painter = CpuPainter::new(surface, shaper);
    execute_plan(plan, assets, &mut painter)?;
    Ok(painter.finish())
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
