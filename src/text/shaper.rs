use std::{borrow::Cow, sync::Arc};

use crate::{
    foundation::{
        core::Rgb8,
        error::{PostcompError, PostcompResult},
    },
    text::wrap::{TextMeasure, VerticalMetrics},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgb8> for TextBrushRgba8 {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// Parley-backed shaper bound to a single font.
///
/// One shaper both measures (for word-wrap) and produces the glyph layouts that get painted, so
/// line breaks always agree with the rendered text. Shapers hold mutable Parley contexts and are
/// created per render from the shared font bytes.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for TextShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextShaper")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl TextShaper {
    /// Register `font_bytes` and bind the shaper to its first family.
    pub fn new(font_bytes: Arc<Vec<u8>>) -> PostcompResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.as_ref().clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PostcompError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PostcompError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.as_ref().clone()),
            0,
        );

        tracing::debug!(family = %family_name, "text shaper ready");
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Font handle for glyph painting.
    pub fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shape `text` as a single unbroken line.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> PostcompResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PostcompError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextMeasure for TextShaper {
    fn measure_width(&mut self, text: &str, size_px: f32) -> PostcompResult<f64> {
        let layout = self.layout_line(text, size_px, TextBrushRgba8::default())?;
        Ok(f64::from(layout.full_width()))
    }

    fn vertical_metrics(&mut self, size_px: f32) -> PostcompResult<VerticalMetrics> {
        let layout = self.layout_line("Hg", size_px, TextBrushRgba8::default())?;
        let line = layout
            .lines()
            .next()
            .ok_or_else(|| PostcompError::render("font produced no line metrics"))?;
        let m = line.metrics();
        Ok(VerticalMetrics {
            ascent: f64::from(m.ascent),
            descent: f64::from(m.descent),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/shaper.rs"]
mod tests;
