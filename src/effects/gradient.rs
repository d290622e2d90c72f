use crate::{
    config::branding::GradientPosition,
    foundation::{
        core::{Canvas, Rgb8},
        error::{PostcompError, PostcompResult},
        math::alpha_to_u8,
    },
};

/// Alpha at the canvas edge of a gradient band.
pub const GRADIENT_EDGE_ALPHA: f64 = 0.86;

/// Canvas edge a band is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BandEdge {
    Top,
    Bottom,
}

/// A horizontal strip `[y0, y1]` spanning the full canvas width with a linear alpha ramp that is
/// strongest at the attached edge and fades to zero towards the canvas interior.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct GradientBand {
    pub edge: BandEdge,
    pub y0: f64,
    pub y1: f64,
    pub color: Rgb8,
}

impl GradientBand {
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Band alpha at canvas row coordinate `y`; zero outside the band.
    pub fn alpha_at(&self, y: f64) -> f64 {
        let h = self.height();
        if h <= 0.0 || y < self.y0 || y > self.y1 {
            return 0.0;
        }
        let t = (y - self.y0) / h;
        match self.edge {
            BandEdge::Top => GRADIENT_EDGE_ALPHA * (1.0 - t),
            BandEdge::Bottom => GRADIENT_EDGE_ALPHA * t,
        }
    }
}

/// `canvas_height * height_percent / 100`.
pub fn band_height(canvas_height: f64, height_percent: f64) -> f64 {
    canvas_height * height_percent / 100.0
}

/// Bands for `position`, top before bottom.
///
/// The two bands are independent: when they overlap (large percentages on short canvases) they
/// are simply painted one after the other.
pub fn gradient_bands(
    canvas: Canvas,
    color: Rgb8,
    height_percent: f64,
    position: GradientPosition,
) -> Vec<GradientBand> {
    let h = canvas.height_f64();
    let band_h = band_height(h, height_percent);

    let mut out = Vec::with_capacity(2);
    if position.has_top() {
        out.push(GradientBand {
            edge: BandEdge::Top,
            y0: 0.0,
            y1: band_h,
            color,
        });
    }
    if position.has_bottom() {
        out.push(GradientBand {
            edge: BandEdge::Bottom,
            y0: h - band_h,
            y1: h,
            color,
        });
    }
    out
}

/// Premultiplied pixels of one band, ready to be painted at `(0, y_start)`.
#[derive(Clone, Debug)]
pub struct BandRaster {
    pub y_start: u32,
    pub width: u32,
    pub rows: u32,
    pub rgba8_premul: Vec<u8>,
}

/// Rasterize `band` at `width` pixels, sampling the ramp at row centers and clipping to the
/// canvas rows `[0, canvas_height)`.
pub fn rasterize_band(
    band: &GradientBand,
    width: u32,
    canvas_height: u32,
) -> PostcompResult<BandRaster> {
    if !band.y0.is_finite() || !band.y1.is_finite() {
        return Err(PostcompError::render("gradient band bounds must be finite"));
    }
    let y_start = band.y0.floor().clamp(0.0, f64::from(canvas_height)) as u32;
    let y_end = band.y1.ceil().clamp(0.0, f64::from(canvas_height)) as u32;
    let rows = y_end.saturating_sub(y_start);

    let row_len = (width as usize) * 4;
    let mut bytes = vec![0u8; row_len * rows as usize];
    for (i, row) in bytes.chunks_exact_mut(row_len).enumerate() {
        let y = f64::from(y_start) + i as f64 + 0.5;
        let px = band.color.with_alpha(alpha_to_u8(band.alpha_at(y))).to_array();
        for dst in row.chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }

    Ok(BandRaster {
        y_start,
        width,
        rows,
        rgba8_premul: bytes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/gradient.rs"]
mod tests;
