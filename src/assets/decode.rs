use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::{
    assets::svg_raster::{self, rasterize_svg_to_premul_rgba8},
    foundation::{
        core::LayoutBox,
        error::{PostcompError, PostcompResult},
        math::premultiply_rgba8_in_place,
    },
};

/// Largest width or height accepted for a raster image. The CPU painter addresses image pixmaps
/// with `u16` coordinates.
pub const MAX_IMAGE_DIM: u32 = u16::MAX as u32;

/// Decoded raster image stored as premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

/// Parsed SVG document, rasterized lazily at its final on-canvas size.
#[derive(Clone, Debug)]
pub struct PreparedSvg {
    pub tree: Arc<usvg::Tree>,
}

impl PreparedSvg {
    pub fn aspect_ratio(&self) -> f64 {
        let size = self.tree.size();
        f64::from(size.width()) / f64::from(size.height().max(f32::EPSILON))
    }
}

/// An image asset ready for placement.
#[derive(Clone, Debug)]
pub enum LoadedAsset {
    Raster(PreparedImage),
    Svg(PreparedSvg),
}

impl LoadedAsset {
    /// Intrinsic width / height.
    pub fn aspect_ratio(&self) -> f64 {
        match self {
            Self::Raster(img) => img.aspect_ratio(),
            Self::Svg(svg) => svg.aspect_ratio(),
        }
    }

    /// Pixels to draw into `target`. Raster images are returned as-is and scaled at paint time;
    /// SVGs are rasterized at the box size so they stay sharp. Boxes larger than the SVG raster
    /// limit are rasterized at a proportionally reduced size and scaled up when painted.
    pub fn image_for_box(&self, target: LayoutBox) -> PostcompResult<PreparedImage> {
        match self {
            Self::Raster(img) => Ok(img.clone()),
            Self::Svg(svg) => {
                let (w, h) = svg_raster_size(target);
                let bytes = rasterize_svg_to_premul_rgba8(&svg.tree, w, h)?;
                Ok(PreparedImage {
                    width: w,
                    height: h,
                    rgba8_premul: Arc::new(bytes),
                })
            }
        }
    }
}

fn svg_raster_size(target: LayoutBox) -> (u32, u32) {
    let w = target.width.ceil().max(1.0);
    let h = target.height.ceil().max(1.0);
    let max = f64::from(svg_raster::MAX_DIM);
    let scale = (max / w.max(h)).min(1.0);
    let side = |v: f64| (v * scale).ceil().clamp(1.0, max) as u32;
    (side(w), side(h))
}

/// Decode any raster format supported by `image` into premultiplied RGBA8.
///
/// Images wider or taller than [`MAX_IMAGE_DIM`] are rejected before their pixels are decoded.
pub fn decode_image(bytes: &[u8]) -> PostcompResult<PreparedImage> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("guess image format")?
        .into_dimensions()
        .context("read image dimensions")?;
    if width > MAX_IMAGE_DIM || height > MAX_IMAGE_DIM {
        return Err(PostcompError::fetch(format!(
            "image is {width}x{height}, larger than {MAX_IMAGE_DIM}px per side"
        )));
    }

    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(PostcompError::fetch("decoded image has zero size"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> PostcompResult<PreparedSvg> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(PreparedSvg {
        tree: Arc::new(tree),
    })
}

/// Sniff the leading bytes for an SVG document.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with('<') && text.contains("<svg")
}

pub fn decode_asset(bytes: &[u8]) -> PostcompResult<LoadedAsset> {
    if looks_like_svg(bytes) {
        parse_svg(bytes).map(LoadedAsset::Svg)
    } else {
        decode_image(bytes).map(LoadedAsset::Raster)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
