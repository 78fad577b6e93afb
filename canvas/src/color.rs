//! Paint colors and the string forms annotations use to describe them.
//!
//! Annotation payloads carry colors as strings. Hex forms follow the overlay's
//! native convention where an 8-digit value is `#AARRGGBB` (alpha first), and
//! a short list of named colors is accepted case-insensitively. Parsing never
//! decides policy: callers pick the fallback through [`stroke_paint`] and
//! [`fill_paint`].

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use serde::{Deserialize, Serialize};

/// Error parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
    #[error("unknown color name `{0}`")]
    UnknownName(String),
}

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#ARGB`, `#RRGGBB`, `#AARRGGBB` or a known color name.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError`] when the string is empty, is malformed hex, or
    /// names an unknown color.
    pub fn parse(raw: &str) -> Result<Self, ColorError> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(ColorError::Empty);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorError::InvalidHex(s.to_string()));
        }
        named(s).ok_or_else(|| ColorError::UnknownName(s.to_string()))
    }

    /// Hex form round-trippable through [`Color::parse`]: `#RRGGBB` when
    /// opaque, `#AARRGGBB` otherwise.
    #[must_use]
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }

    /// CSS `rgba()` form for the 2D canvas context.
    #[must_use]
    pub fn to_css(&self) -> String {
        let alpha = f64::from(self.a) / 255.0;
        format!("rgba({}, {}, {}, {alpha:.3})", self.r, self.g, self.b)
    }

    /// Whether the color paints nothing.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// Resolve a stroke or text color: parse `raw`, or use `fallback` when it is
/// absent or unparseable.
#[must_use]
pub fn stroke_paint(raw: Option<&str>, fallback: Color) -> Color {
    let Some(raw) = raw else {
        return fallback;
    };
    match Color::parse(raw) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable stroke color, using default");
            fallback
        }
    }
}

/// Resolve a fill: `None` for absent, empty or `"transparent"`, otherwise the
/// parsed color. A fill that fails to parse paints nothing.
#[must_use]
pub fn fill_paint(raw: Option<&str>) -> Option<Color> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("transparent") {
        return None;
    }
    match Color::parse(raw) {
        Ok(c) => Some(c),
        Err(e) => {
            tracing::warn!(error = %e, "unparseable fill color, leaving unfilled");
            None
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    let parsed = match hex.len() {
        3 => nibble(0).and_then(|r| Ok(Color::rgb(r, nibble(1)?, nibble(2)?))),
        4 => nibble(0).and_then(|a| Ok(Color::argb(a, nibble(1)?, nibble(2)?, nibble(3)?))),
        6 => byte(0).and_then(|r| Ok(Color::rgb(r, byte(2)?, byte(4)?))),
        8 => byte(0).and_then(|a| Ok(Color::argb(a, byte(2)?, byte(4)?, byte(6)?))),
        _ => return None,
    };
    match parsed {
        Ok(c) => Some(c),
        Err(_) => None,
    }
}

fn named(name: &str) -> Option<Color> {
    let c = match name.to_ascii_lowercase().as_str() {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "lime" => Color::rgb(0, 255, 0),
        "blue" => Color::rgb(0, 0, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        "cyan" | "aqua" => Color::rgb(0, 255, 255),
        "magenta" | "fuchsia" => Color::rgb(255, 0, 255),
        "gold" => Color::rgb(255, 215, 0),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "transparent" => Color::argb(0, 255, 255, 255),
        _ => return None,
    };
    Some(c)
}
