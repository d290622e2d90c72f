use crate::foundation::core::Rgb8;

/// Typography of one wrapped text block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextBlockStyle {
    pub size_px: f32,
    pub line_height_px: f64,
    /// Hard cap; extra words are dropped without an ellipsis.
    pub max_lines: Option<usize>,
    pub color: Rgb8,
}

/// The small bar drawn once above the title block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AccentStyle {
    pub width_px: f64,
    pub height_px: f64,
    /// Vertical gap between the bar and the top of the first text line.
    pub gap_px: f64,
}

/// Fixed layout of the title/body editor overlay.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EditorStyle {
    /// Left and right text margin; lines wrap at `canvas width - 2 * margin_px`.
    pub margin_px: f64,
    /// Top of the text block as a fraction of canvas height.
    pub block_top_fraction: f64,
    /// Space between the title's last line box and the body's first.
    pub block_gap_px: f64,
    pub title: TextBlockStyle,
    pub body: TextBlockStyle,
    pub accent: AccentStyle,
}

impl Default for EditorStyle {
    fn default() -> Self {
        Self {
            margin_px: 50.0,
            block_top_fraction: 0.5,
            block_gap_px: 24.0,
            title: TextBlockStyle {
                size_px: 56.0,
                line_height_px: 68.0,
                max_lines: Some(5),
                color: Rgb8::WHITE,
            },
            body: TextBlockStyle {
                size_px: 30.0,
                line_height_px: 42.0,
                max_lines: Some(5),
                color: Rgb8::WHITE,
            },
            accent: AccentStyle {
                width_px: 96.0,
                height_px: 8.0,
                gap_px: 24.0,
            },
        }
    }
}

impl EditorStyle {
    pub fn max_text_width(&self, canvas_width: f64) -> f64 {
        canvas_width - 2.0 * self.margin_px
    }
}
