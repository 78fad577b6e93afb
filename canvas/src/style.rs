//! Style defaults shared by the renderer and the tool manager.
//!
//! Every fallback value that rendering or drawing needs lives here, so a host
//! can override them from one JSON object instead of chasing constants.

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Error loading style defaults.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("invalid style defaults: {0}")]
    Json(#[from] serde_json::Error),
    #[error("style value `{field}` must be positive and finite, got {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// How stroke ends are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    /// Name understood by the 2D canvas `lineCap` property.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Centralized default values for annotation styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleDefaults {
    /// Stroke and text color when an element names none (or an invalid one).
    pub default_color: Color,
    /// Stroke width for arrows, circles, rectangles and freehand strokes.
    pub default_thickness: f64,
    /// Stroke width for plain lines.
    pub default_line_thickness: f64,
    /// Text size when an element gives no `fontSize`.
    pub default_font_size: f64,
    /// Wrap width for text when an element gives no `maxWidth`.
    pub default_max_width: f64,
    /// Length of each arrowhead stroke.
    pub arrow_head_length: f64,
    /// Angle between each arrowhead stroke and the reversed shaft, in degrees.
    pub arrow_head_angle: f64,
    /// Cap style for freehand strokes.
    pub freehand_cap: LineCap,
    /// Initial color of the local drawing tools.
    pub tool_color: Color,
    /// Initial stroke width of the local drawing tools.
    pub tool_stroke_width: f64,
    /// Content of a freshly placed text field.
    pub text_placeholder: String,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            default_color: Color::BLACK,
            default_thickness: 2.0,
            default_line_thickness: 1.0,
            default_font_size: 16.0,
            default_max_width: 1800.0,
            arrow_head_length: 10.0,
            arrow_head_angle: 30.0,
            freehand_cap: LineCap::Round,
            tool_color: Color::rgb(0x66, 0x7e, 0xea),
            tool_stroke_width: 2.0,
            text_placeholder: "Type here...".to_string(),
        }
    }
}

impl StyleDefaults {
    /// Parse defaults from JSON; missing keys keep their default values.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError`] on malformed JSON or a non-positive size.
    pub fn from_json(raw: &str) -> Result<Self, StyleError> {
        let style: Self = serde_json::from_str(raw)?;
        style.validate()?;
        Ok(style)
    }

    /// Check that every size is positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::OutOfRange`] naming the first bad field.
    pub fn validate(&self) -> Result<(), StyleError> {
        let sizes = [
            ("defaultThickness", self.default_thickness),
            ("defaultLineThickness", self.default_line_thickness),
            ("defaultFontSize", self.default_font_size),
            ("defaultMaxWidth", self.default_max_width),
            ("arrowHeadLength", self.arrow_head_length),
            ("arrowHeadAngle", self.arrow_head_angle),
            ("toolStrokeWidth", self.tool_stroke_width),
        ];
        for (field, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(StyleError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Arrowhead angle in radians.
    #[must_use]
    pub fn arrow_head_radians(&self) -> f64 {
        self.arrow_head_angle.to_radians()
    }
}
