use crate::foundation::error::{PostcompError, PostcompResult};

// Keeps a hostile or mistyped logo box from allocating gigabytes.
pub(crate) const MAX_DIM: u32 = 16_384;

/// Rasterize `tree` stretched to exactly `width` x `height` pixels.
///
/// tiny-skia pixmaps are premultiplied RGBA8, the same layout the painter expects.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> PostcompResult<Vec<u8>> {
    if width > MAX_DIM || height > MAX_DIM {
        return Err(PostcompError::render(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    let size = tree.size();
    if !size.width().is_finite() || size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(PostcompError::render("svg has invalid width/height"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PostcompError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
