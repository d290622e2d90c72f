use std::io::Read;

use anyhow::Context;

use crate::{
    foundation::{
        core::Rgb8,
        error::{PostcompError, PostcompResult},
    },
    layout::anchor::{Anchor, Edge},
};

/// Where gradient bands are painted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientPosition {
    Top,
    Bottom,
    #[default]
    Both,
}

impl GradientPosition {
    pub fn has_top(self) -> bool {
        matches!(self, Self::Top | Self::Both)
    }

    pub fn has_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::Both)
    }
}

/// Visual preferences of a brand: logo and slogan placement plus the gradient overlay.
///
/// Persisted by the profile service as camelCase JSON; every field is optional and falls back to
/// the defaults below. The compositor only reads it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandingConfig {
    pub logo_position: Anchor,
    pub slogan_position: Anchor,
    /// Logo height as a percentage of canvas height (2..=25).
    pub logo_size_percent: f64,
    /// Slogan font size as a percentage of canvas height (2..=8).
    pub slogan_size_percent: f64,
    pub gradient_enabled: bool,
    pub gradient_color: Rgb8,
    /// Band height as a percentage of canvas height (10..=50).
    pub gradient_height_percent: f64,
    pub gradient_position: GradientPosition,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            logo_position: Anchor::TopCenter,
            slogan_position: Anchor::BottomCenter,
            logo_size_percent: 13.0,
            slogan_size_percent: 4.0,
            gradient_enabled: true,
            gradient_color: Rgb8::new(0x3b, 0x82, 0xf6),
            gradient_height_percent: 25.0,
            gradient_position: GradientPosition::Both,
        }
    }
}

pub const LOGO_SIZE_PERCENT_RANGE: (f64, f64) = (2.0, 25.0);
pub const SLOGAN_SIZE_PERCENT_RANGE: (f64, f64) = (2.0, 8.0);
pub const GRADIENT_HEIGHT_PERCENT_RANGE: (f64, f64) = (10.0, 50.0);

impl BrandingConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json_str(s: &str) -> PostcompResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| PostcompError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a config from a JSON reader.
    pub fn from_reader(mut r: impl Read) -> PostcompResult<Self> {
        let mut s = String::new();
        r.read_to_string(&mut s)
            .context("read branding config")?;
        Self::from_json_str(&s)
    }

    /// Check documented ranges and the slogan anchor restriction.
    ///
    /// The compositor does not call this; out-of-range values still render (and may overflow).
    pub fn validate(&self) -> PostcompResult<()> {
        check_range(
            "logoSizePercent",
            self.logo_size_percent,
            LOGO_SIZE_PERCENT_RANGE,
        )?;
        check_range(
            "sloganSizePercent",
            self.slogan_size_percent,
            SLOGAN_SIZE_PERCENT_RANGE,
        )?;
        check_range(
            "gradientHeightPercent",
            self.gradient_height_percent,
            GRADIENT_HEIGHT_PERCENT_RANGE,
        )?;
        if !matches!(
            self.slogan_position,
            Anchor::TopCenter | Anchor::BottomCenter
        ) {
            return Err(PostcompError::validation(format!(
                "sloganPosition must be top-center or bottom-center, got {}",
                self.slogan_position
            )));
        }
        Ok(())
    }

    /// Edge of the gradient band that hosts the slogan.
    pub fn slogan_edge(&self) -> Edge {
        self.slogan_position.edge()
    }
}

fn check_range(name: &str, v: f64, (lo, hi): (f64, f64)) -> PostcompResult<()> {
    if !v.is_finite() || v < lo || v > hi {
        return Err(PostcompError::validation(format!(
            "{name} must be within {lo}..={hi}, got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/branding.rs"]
mod tests;
