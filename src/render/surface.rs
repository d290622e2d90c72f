use std::sync::Arc;

use crate::{
    assets::decode::PreparedImage,
    foundation::{
        core::Canvas,
        error::{PostcompError, PostcompResult},
    },
};

/// A rendered frame in RGBA8 format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// True when color channels are premultiplied by alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// The raster target of one render.
///
/// A surface is created per render, painted in plan order and consumed by [`Self::finish`]; it is
/// never shared or reused.
pub struct CanvasSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl CanvasSurface {
    pub fn new(canvas: Canvas) -> PostcompResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| PostcompError::validation("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| PostcompError::validation("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(PostcompError::validation("canvas must be non-empty"));
        }

        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(u32::from(self.width), u32::from(self.height))
    }

    pub(crate) fn ctx_mut(&mut self) -> &mut vello_cpu::RenderContext {
        &mut self.ctx
    }

    /// Rasterize everything painted so far into a premultiplied frame.
    pub fn finish(mut self) -> FrameRGBA {
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);

        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

/// Wrap premultiplied RGBA8 bytes as an image paint.
pub(crate) fn image_paint(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PostcompResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(rgba8_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

pub(crate) fn prepared_image_paint(img: &PreparedImage) -> PostcompResult<vello_cpu::Image> {
    image_paint(img.rgba8_premul.as_slice(), img.width, img.height)
}

fn pixmap_from_premul_bytes(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PostcompResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PostcompError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PostcompError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PostcompError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
