use crate::{
    compile::style::TextBlockStyle,
    effects::gradient::{GradientBand, band_height, gradient_bands},
    foundation::{
        core::{Canvas, LayoutBox, Rgb8},
        error::{PostcompError, PostcompResult},
    },
    layout::{
        anchor::{Edge, resolve_anchor},
        format::resolve_format,
    },
    pipeline::{PostAssets, PostRequest, RenderContext},
    text::wrap::{TextMeasure, WrapParams, wrap_text},
};

/// Paint layer of a draw op. Ops in a plan are always sorted by layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Background = 0,
    Gradient = 1,
    Logo = 2,
    Text = 3,
}

/// Which fetched asset an image op draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRole {
    Background,
    Logo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    Slogan,
    Title,
    Body,
}

/// One line of text with its pen origin (left edge, baseline).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlacedLine {
    pub text: String,
    pub x: f64,
    pub baseline_y: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextOp {
    pub role: TextRole,
    pub size_px: f32,
    pub color: Rgb8,
    pub lines: Vec<PlacedLine>,
}

/// A single immediate-mode paint step.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Flat fill of the whole canvas.
    Fill { color: Rgb8 },
    /// A fetched image stretched into `target`. When the image cannot be painted, `fallback` is
    /// filled over the whole canvas instead.
    Image {
        role: ImageRole,
        target: LayoutBox,
        #[serde(skip_serializing_if = "Option::is_none")]
        fallback: Option<Rgb8>,
    },
    GradientBand { band: GradientBand },
    Rect { target: LayoutBox, color: Rgb8 },
    Text(TextOp),
}

impl DrawOp {
    pub fn layer(&self) -> Layer {
        match self {
            Self::Fill { .. }
            | Self::Image {
                role: ImageRole::Background,
                ..
            } => Layer::Background,
            Self::GradientBand { .. } => Layer::Gradient,
            Self::Image {
                role: ImageRole::Logo,
                ..
            } => Layer::Logo,
            Self::Rect { .. } | Self::Text(_) => Layer::Text,
        }
    }
}

/// Ordered paint steps for one post.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderPlan {
    pub canvas: Canvas,
    pub ops: Vec<DrawOp>,
}

impl RenderPlan {
    pub fn needs_text(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, DrawOp::Text(_)))
    }

    pub fn layers_are_ordered(&self) -> bool {
        self.ops.windows(2).all(|w| w[0].layer() <= w[1].layer())
    }
}

/// Non-blank text content, trimmed.
pub(crate) fn text_content(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// True when `request` asks for any text layer.
pub fn request_has_text(request: &PostRequest) -> bool {
    text_content(request.slogan.as_deref()).is_some()
        || text_content(request.title.as_deref()).is_some()
        || text_content(request.body.as_deref()).is_some()
}

/// Lay out a post into a [`RenderPlan`].
///
/// `assets` holds whatever the fetch stage managed to load; a missing background falls back to
/// the flat color and a missing logo is omitted. `measure` must be the measurer whose font will
/// draw the text and is required whenever the request carries text.
#[tracing::instrument(level = "debug", skip_all, fields(format = %request.format))]
pub fn compile_post(
    request: &PostRequest,
    assets: &PostAssets,
    ctx: &RenderContext,
    measure: Option<&mut dyn TextMeasure>,
) -> PostcompResult<RenderPlan> {
    let canvas = resolve_format(&request.format)?;
    let branding = &request.branding;
    let w = canvas.width_f64();
    let h = canvas.height_f64();

    let mut ops = Vec::new();

    match assets.background {
        Some(_) => ops.push(DrawOp::Image {
            role: ImageRole::Background,
            target: LayoutBox::new(0.0, 0.0, w, h),
            fallback: Some(request.background_color),
        }),
        None => ops.push(DrawOp::Fill {
            color: request.background_color,
        }),
    }

    if branding.gradient_enabled {
        for band in gradient_bands(
            canvas,
            branding.gradient_color,
            branding.gradient_height_percent,
            branding.gradient_position,
        ) {
            ops.push(DrawOp::GradientBand { band });
        }
    }

    if let Some(logo) = &assets.logo {
        let target = resolve_anchor(
            branding.logo_position,
            branding.logo_size_percent,
            canvas,
            logo.aspect_ratio(),
            ctx.padding_px,
        );
        ops.push(DrawOp::Image {
            role: ImageRole::Logo,
            target,
            fallback: None,
        });
    }

    if request_has_text(request) {
        let measure = measure.ok_or_else(|| {
            PostcompError::validation("a font is required to draw slogan, title or body text")
        })?;

        if let Some(slogan) = text_content(request.slogan.as_deref()) {
            let op = layout_slogan(slogan, request, canvas, ctx, measure)?;
            ops.push(DrawOp::Text(op));
        }
        layout_editor_text(request, canvas, ctx, measure, &mut ops)?;
    }

    let plan = RenderPlan { canvas, ops };
    debug_assert!(plan.layers_are_ordered());
    tracing::debug!(ops = plan.ops.len(), "post compiled");
    Ok(plan)
}

fn layout_slogan(
    slogan: &str,
    request: &PostRequest,
    canvas: Canvas,
    ctx: &RenderContext,
    measure: &mut dyn TextMeasure,
) -> PostcompResult<TextOp> {
    let branding = &request.branding;
    let h = canvas.height_f64();
    let size_px = (h * branding.slogan_size_percent / 100.0) as f32;

    // The band height drives placement even when the gradient itself is disabled.
    let band_h = band_height(h, branding.gradient_height_percent);
    let center_y = match branding.slogan_edge() {
        Edge::Top => band_h / 2.0,
        Edge::Bottom => h - band_h / 2.0,
    };

    let baseline_y = measure.vertical_metrics(size_px)?.baseline_for_center(center_y);
    let width = measure.measure_width(slogan, size_px)?;
    let x = canvas.center_x() - width / 2.0;

    Ok(TextOp {
        role: TextRole::Slogan,
        size_px,
        color: ctx.slogan_color,
        lines: vec![PlacedLine {
            text: slogan.to_owned(),
            x,
            baseline_y,
        }],
    })
}

fn layout_editor_text(
    request: &PostRequest,
    canvas: Canvas,
    ctx: &RenderContext,
    measure: &mut dyn TextMeasure,
    ops: &mut Vec<DrawOp>,
) -> PostcompResult<()> {
    let title = text_content(request.title.as_deref());
    let body = text_content(request.body.as_deref());
    if title.is_none() && body.is_none() {
        return Ok(());
    }

    let style = &ctx.editor;
    let mut top = canvas.height_f64() * style.block_top_fraction;

    ops.push(DrawOp::Rect {
        target: LayoutBox::new(
            style.margin_px,
            top - style.accent.gap_px - style.accent.height_px,
            style.accent.width_px,
            style.accent.height_px,
        ),
        color: request.branding.gradient_color,
    });

    let max_width = style.max_text_width(canvas.width_f64());
    for (role, text, block) in [
        (TextRole::Title, title, &style.title),
        (TextRole::Body, body, &style.body),
    ] {
        let Some(text) = text else { continue };
        let (op, bottom) =
            layout_block(role, text, block, top, style.margin_px, max_width, measure)?;
        if !op.lines.is_empty() {
            top = bottom + style.block_gap_px;
        }
        ops.push(DrawOp::Text(op));
    }
    Ok(())
}

/// Wrap one block whose first line box starts at `top`. Returns the op and the bottom of its
/// last line box.
fn layout_block(
    role: TextRole,
    text: &str,
    block: &TextBlockStyle,
    top: f64,
    x: f64,
    max_width: f64,
    measure: &mut dyn TextMeasure,
) -> PostcompResult<(TextOp, f64)> {
    let metrics = measure.vertical_metrics(block.size_px)?;
    let params = WrapParams {
        max_width_px: max_width,
        font_size_px: block.size_px,
        max_lines: block.max_lines,
        line_height_px: block.line_height_px,
        first_baseline_y: top + metrics.ascent,
    };
    let lines = wrap_text(text, &params, measure)?;
    let bottom = lines.last().map_or(top, |l| l.baseline_y + metrics.descent);

    let op = TextOp {
        role,
        size_px: block.size_px,
        color: block.color,
        lines: lines
            .into_iter()
            .map(|l| PlacedLine {
                text: l.text,
                x,
                baseline_y: l.baseline_y,
            })
            .collect(),
    };
    Ok((op, bottom))
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
