use crate::foundation::error::PostcompResult;

/// Vertical font metrics at a given size, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct VerticalMetrics {
    /// Distance from the baseline up to the top of the line box.
    pub ascent: f64,
    /// Distance from the baseline down to the bottom of the line box (positive).
    pub descent: f64,
}

impl VerticalMetrics {
    /// Baseline that puts the visual middle of the line box at `center_y`.
    pub fn baseline_for_center(self, center_y: f64) -> f64 {
        center_y + (self.ascent - self.descent) / 2.0
    }
}

/// Width measurement shared by layout and drawing.
///
/// Wrapping only matches the painted result when the same implementation (same font, same size)
/// measures and draws.
pub trait TextMeasure {
    /// Advance width of `text` (trailing whitespace included) at `size_px`.
    fn measure_width(&mut self, text: &str, size_px: f32) -> PostcompResult<f64>;

    fn vertical_metrics(&mut self, size_px: f32) -> PostcompResult<VerticalMetrics>;
}

/// Font-free measurer where every character advances by `advance_em * size`.
///
/// Used for layout previews when no font is configured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasure {
    pub advance_em: f64,
    pub ascent_em: f64,
    pub descent_em: f64,
}

impl Default for FixedAdvanceMeasure {
    fn default() -> Self {
        Self {
            advance_em: 0.55,
            ascent_em: 0.8,
            descent_em: 0.2,
        }
    }
}

impl TextMeasure for FixedAdvanceMeasure {
    fn measure_width(&mut self, text: &str, size_px: f32) -> PostcompResult<f64> {
        Ok(text.chars().count() as f64 * self.advance_em * f64::from(size_px))
    }

    fn vertical_metrics(&mut self, size_px: f32) -> PostcompResult<VerticalMetrics> {
        let size = f64::from(size_px);
        Ok(VerticalMetrics {
            ascent: self.ascent_em * size,
            descent: self.descent_em * size,
        })
    }
}

/// Parameters of one wrapped text block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct WrapParams {
    pub max_width_px: f64,
    pub font_size_px: f32,
    /// Hard cap on output lines; tokens past the cap are dropped without an ellipsis.
    pub max_lines: Option<usize>,
    pub line_height_px: f64,
    /// Baseline of the first line.
    pub first_baseline_y: f64,
}

/// One committed line of a wrapped block.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WrappedLine {
    pub text: String,
    pub baseline_y: f64,
}

/// Greedy word-wrap.
///
/// Tokens are appended (with a trailing space) while the measured line fits `max_width_px`. A
/// token that does not fit starts a new line unless the current line is empty, so a single token
/// wider than the budget sits unbroken on its own line.
pub fn wrap_text(
    text: &str,
    params: &WrapParams,
    measure: &mut dyn TextMeasure,
) -> PostcompResult<Vec<WrappedLine>> {
    let mut lines = Vec::<WrappedLine>::new();
    if params.max_lines == Some(0) {
        return Ok(lines);
    }

    let mut current = String::new();
    let mut baseline_y = params.first_baseline_y;

    for token in text.split_whitespace() {
        let mut tentative = String::with_capacity(current.len() + token.len() + 1);
        tentative.push_str(&current);
        tentative.push_str(token);
        tentative.push(' ');

        let width = measure.measure_width(&tentative, params.font_size_px)?;
        if width > params.max_width_px && !current.is_empty() {
            lines.push(WrappedLine {
                text: current.trim_end().to_string(),
                baseline_y,
            });
            baseline_y += params.line_height_px;

            if params.max_lines.is_some_and(|max| lines.len() >= max) {
                tracing::debug!(
                    max_lines = lines.len(),
                    "text block truncated at line cap"
                );
                return Ok(lines);
            }

            current.clear();
            current.push_str(token);
            current.push(' ');
        } else {
            current = tentative;
        }
    }

    if !current.is_empty() {
        lines.push(WrappedLine {
            text: current.trim_end().to_string(),
            baseline_y,
        });
    }
    Ok(lines)
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
