use std::{fmt, str::FromStr};

use crate::foundation::{
    core::{Canvas, LayoutBox},
    error::{PostcompError, PostcompResult},
};

/// Padding between an anchored element and the canvas edge, in pixels.
pub const DEFAULT_PADDING_PX: f64 = 40.0;

/// Horizontal half of an [`Anchor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignX {
    Left,
    Center,
    Right,
}

/// Vertical half of an [`Anchor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// One of six named placement positions (top/bottom x left/center/right).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 6] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    /// Parse an anchor token such as `top-center`, failing with
    /// [`PostcompError::InvalidAnchor`] for anything else.
    pub fn parse(token: &str) -> PostcompResult<Self> {
        match token {
            "top-left" => Ok(Self::TopLeft),
            "top-center" => Ok(Self::TopCenter),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-center" => Ok(Self::BottomCenter),
            "bottom-right" => Ok(Self::BottomRight),
            other => Err(PostcompError::InvalidAnchor(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    pub fn align_x(self) -> AlignX {
        match self {
            Self::TopLeft | Self::BottomLeft => AlignX::Left,
            Self::TopCenter | Self::BottomCenter => AlignX::Center,
            Self::TopRight | Self::BottomRight => AlignX::Right,
        }
    }

    pub fn edge(self) -> Edge {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => Edge::Top,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => Edge::Bottom,
        }
    }
}

/// Resolve an anchored element to an absolute box.
///
/// The element height is `canvas.height * height_percent / 100` and its width follows from
/// `aspect_ratio` (width / height), so the element is never stretched. The box is not clamped:
/// oversized elements extend past the canvas edges.
pub fn resolve_anchor(
    anchor: Anchor,
    height_percent: f64,
    canvas: Canvas,
    aspect_ratio: f64,
    padding_px: f64,
) -> LayoutBox {
    let canvas_w = canvas.width_f64();
    let canvas_h = canvas.height_f64();

    let height = canvas_h * height_percent / 100.0;
    let width = height * aspect_ratio;

    let x = match anchor.align_x() {
        AlignX::Left => padding_px,
        AlignX::Center => (canvas_w - width) / 2.0,
        AlignX::Right => canvas_w - width - padding_px,
    };
    let y = match anchor.edge() {
        Edge::Top => padding_px,
        Edge::Bottom => canvas_h - height - padding_px,
    };

    let out = LayoutBox::new(x, y, width, height);
    if out.overflows(canvas) {
        tracing::debug!(?anchor, ?out, "anchored element extends past the canvas");
    }
    out
}

/// [`resolve_anchor`] for an unparsed anchor token.
pub fn resolve_anchor_token(
    token: &str,
    height_percent: f64,
    canvas: Canvas,
    aspect_ratio: f64,
    padding_px: f64,
) -> PostcompResult<LayoutBox> {
    let anchor = Anchor::parse(token)?;
    Ok(resolve_anchor(
        anchor,
        height_percent,
        canvas,
        aspect_ratio,
        padding_px,
    ))
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = PostcompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Anchor {
    type Error = PostcompError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Anchor> for String {
    fn from(value: Anchor) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/anchor.rs"]
mod tests;
