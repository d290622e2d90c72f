use std::{fmt, str::FromStr};

use crate::foundation::error::{PostcompError, PostcompResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    pub fn center_x(self) -> f64 {
        self.width_f64() / 2.0
    }
}

/// Opaque RGB color, written as `#RRGGBB` (or the `#RGB` shorthand) in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse_hex(s: &str) -> PostcompResult<Self> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| PostcompError::validation(format!("color '{s}' must start with '#'")))?;

        // `from_str_radix` alone would also take a sign.
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PostcompError::validation(format!("invalid hex color '{s}'")));
        }

        let digit = |range: std::ops::Range<usize>| -> PostcompResult<u8> {
            hex.get(range)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| PostcompError::validation(format!("invalid hex color '{s}'")))
        };

        match hex.len() {
            3 => Ok(Self::new(digit(0..1)? * 17, digit(1..2)? * 17, digit(2..3)? * 17)),
            6 => Ok(Self::new(digit(0..2)?, digit(2..4)?, digit(4..6)?)),
            n => Err(PostcompError::validation(format!(
                "color '{s}' must be #RGB or #RRGGBB, got {n} hex digits"
            ))),
        }
    }

    /// Premultiplied RGBA8 for this color at the given straight alpha.
    pub fn with_alpha(self, a: u8) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, a)
    }

    pub fn opaque(self) -> Rgba8Premul {
        self.with_alpha(255)
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb8 {
    type Err = PostcompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = PostcompError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgb8> for String {
    fn from(value: Rgb8) -> Self {
        value.to_string()
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Resolved placement of one element on the canvas, in pixels.
///
/// Boxes are derived on every render and may extend past the canvas edges.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn aspect_ratio(self) -> f64 {
        self.width / self.height
    }

    /// True when any part of the box lies outside `canvas`.
    pub fn overflows(self, canvas: Canvas) -> bool {
        self.x < 0.0
            || self.y < 0.0
            || self.x + self.width > canvas.width_f64()
            || self.y + self.height > canvas.height_f64()
    }

    /// Transform mapping a `src_w` x `src_h` source onto this box.
    pub fn fit_transform(self, src_w: f64, src_h: f64) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y))
            * Affine::scale_non_uniform(self.width / src_w.max(1.0), self.height / src_h.max(1.0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
