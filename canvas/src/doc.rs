//! Annotation model: documents, element variants, and the wire contract.
//!
//! A remote agent describes what to draw as an [`AnnotationDocument`], an
//! ordered list of [`AnnotationElement`]s where list order is paint order. Each
//! element is one of a closed set of kinds ([`ElementShape`]) plus shared
//! optional style ([`ElementStyle`]).
//!
//! Geometry the kind requires is still optional here. A document describing a
//! circle without a radius is a valid document; the renderer is the one that
//! declines to draw it. Decoding is equally forgiving at the document level:
//! elements that fail to decode or name an unknown kind are dropped one at a
//! time and the rest of the document survives.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// Error decoding annotation payloads.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("invalid annotation document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown annotation kind `{0}`")]
    UnknownKind(String),
}

/// The kind tag of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Text,
    Arrow,
    Circle,
    Rectangle,
    Line,
    Freehand,
}

impl ElementKind {
    /// Case-insensitive lookup of a wire kind name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let kind = match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "arrow" => Self::Arrow,
            "circle" => Self::Circle,
            "rectangle" => Self::Rectangle,
            "line" => Self::Line,
            "freehand" => Self::Freehand,
            _ => return None,
        };
        Some(kind)
    }

    /// Canonical wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Arrow => "arrow",
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
            Self::Line => "line",
            Self::Freehand => "freehand",
        }
    }
}

/// Text weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Per-kind geometry. Fields the kind requires may be absent.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementShape {
    Text {
        content: Option<String>,
        x: Option<f64>,
        y: Option<f64>,
        font_size: Option<f64>,
        font_weight: FontWeight,
        max_width: Option<f64>,
    },
    Arrow {
        from: Option<Point>,
        to: Option<Point>,
    },
    Circle {
        center: Option<Point>,
        radius: Option<f64>,
    },
    Rectangle {
        x: Option<f64>,
        y: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
    },
    Line {
        from: Option<Point>,
        to: Option<Point>,
    },
    Freehand {
        points: Vec<Point>,
    },
}

impl ElementShape {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text { .. } => ElementKind::Text,
            Self::Arrow { .. } => ElementKind::Arrow,
            Self::Circle { .. } => ElementKind::Circle,
            Self::Rectangle { .. } => ElementKind::Rectangle,
            Self::Line { .. } => ElementKind::Line,
            Self::Freehand { .. } => ElementKind::Freehand,
        }
    }
}

/// Optional style shared by every kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStyle {
    /// Stroke color, and text color for text.
    pub color: Option<String>,
    /// Outline color for circles and rectangles; wins over `color`.
    pub stroke_color: Option<String>,
    /// Interior color for circles and rectangles.
    pub fill_color: Option<String>,
    /// Stroke width.
    pub thickness: Option<f64>,
    /// Draw the stroke dashed.
    pub dashed: Option<bool>,
}

/// One visual element of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireElement", into = "WireElement")]
pub struct AnnotationElement {
    pub shape: ElementShape,
    pub style: ElementStyle,
}

impl AnnotationElement {
    #[must_use]
    pub fn new(shape: ElementShape) -> Self {
        Self { shape, style: ElementStyle::default() }
    }

    #[must_use]
    pub fn text(content: impl Into<String>, at: Point) -> Self {
        Self::new(ElementShape::Text {
            content: Some(content.into()),
            x: Some(at.x),
            y: Some(at.y),
            font_size: None,
            font_weight: FontWeight::Normal,
            max_width: None,
        })
    }

    #[must_use]
    pub fn arrow(from: Point, to: Point) -> Self {
        Self::new(ElementShape::Arrow { from: Some(from), to: Some(to) })
    }

    #[must_use]
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new(ElementShape::Circle { center: Some(center), radius: Some(radius) })
    }

    #[must_use]
    pub fn rectangle(at: Point, width: f64, height: f64) -> Self {
        Self::new(ElementShape::Rectangle {
            x: Some(at.x),
            y: Some(at.y),
            width: Some(width),
            height: Some(height),
        })
    }

    #[must_use]
    pub fn line(from: Point, to: Point) -> Self {
        Self::new(ElementShape::Line { from: Some(from), to: Some(to) })
    }

    #[must_use]
    pub fn freehand(points: Vec<Point>) -> Self {
        Self::new(ElementShape::Freehand { points })
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.shape.kind()
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.style.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_stroke_color(mut self, color: impl Into<String>) -> Self {
        self.style.stroke_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.style.fill_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.style.thickness = Some(thickness);
        self
    }

    #[must_use]
    pub fn dashed(mut self) -> Self {
        self.style.dashed = Some(true);
        self
    }

    /// Set the font size. No effect on non-text elements.
    #[must_use]
    pub fn with_font_size(mut self, size: f64) -> Self {
        if let ElementShape::Text { font_size, .. } = &mut self.shape {
            *font_size = Some(size);
        }
        self
    }

    /// Make text bold. No effect on non-text elements.
    #[must_use]
    pub fn bold(mut self) -> Self {
        if let ElementShape::Text { font_weight, .. } = &mut self.shape {
            *font_weight = FontWeight::Bold;
        }
        self
    }

    /// Set the wrap width. No effect on non-text elements.
    #[must_use]
    pub fn with_max_width(mut self, width: f64) -> Self {
        if let ElementShape::Text { max_width, .. } = &mut self.shape {
            *max_width = Some(width);
        }
        self
    }
}

/// An ordered batch of elements received as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireDocument")]
pub struct AnnotationDocument {
    pub elements: Vec<AnnotationElement>,
}

impl AnnotationDocument {
    #[must_use]
    pub fn new(elements: Vec<AnnotationElement>) -> Self {
        Self { elements }
    }

    /// Decode a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Json`] only when the envelope itself is unusable
    /// (not an object, or no `elements` array). Bad elements are skipped.
    pub fn from_json(raw: &str) -> Result<Self, DocError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Decode a document from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Same as [`AnnotationDocument::from_json`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, DocError> {
        Ok(serde_json::from_value(value)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

// =============================================================
// Wire shapes
// =============================================================

/// Document envelope as it appears on the wire. Elements stay untyped until
/// each one is decoded on its own.
#[derive(Debug, Deserialize)]
struct WireDocument {
    elements: Vec<serde_json::Value>,
}

impl From<WireDocument> for AnnotationDocument {
    fn from(wire: WireDocument) -> Self {
        let mut elements = Vec::with_capacity(wire.elements.len());
        for (index, value) in wire.elements.into_iter().enumerate() {
            let decoded = serde_json::from_value::<WireElement>(value)
                .map_err(DocError::from)
                .and_then(AnnotationElement::try_from);
            match decoded {
                Ok(element) => elements.push(element),
                Err(DocError::UnknownKind(kind)) => {
                    tracing::debug!(index, %kind, "skipping annotation element of unknown kind");
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping undecodable annotation element");
                }
            }
        }
        Self { elements }
    }
}

/// Flat element shape shared by every kind on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireElement {
    #[serde(default)]
    pub kind: String,
    /// Legacy tag name, read when `kind` is absent. Never written.
    #[serde(default, rename = "type", skip_serializing)]
    pub legacy_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashed: Option<bool>,
}

impl TryFrom<WireElement> for AnnotationElement {
    type Error = DocError;

    fn try_from(w: WireElement) -> Result<Self, Self::Error> {
        let tag = match w.legacy_kind.as_deref() {
            Some(legacy) if w.kind.is_empty() => legacy,
            _ => w.kind.as_str(),
        };
        let kind = ElementKind::parse(tag).ok_or_else(|| DocError::UnknownKind(tag.to_string()))?;
        let shape = match kind {
            ElementKind::Text => ElementShape::Text {
                content: w.content,
                x: w.x,
                y: w.y,
                font_size: w.font_size,
                font_weight: match w.font_weight.as_deref() {
                    Some(weight) if weight.eq_ignore_ascii_case("bold") => FontWeight::Bold,
                    _ => FontWeight::Normal,
                },
                max_width: w.max_width,
            },
            ElementKind::Arrow => ElementShape::Arrow { from: w.from, to: w.to },
            ElementKind::Circle => ElementShape::Circle { center: w.center, radius: w.radius },
            ElementKind::Rectangle => ElementShape::Rectangle { x: w.x, y: w.y, width: w.width, height: w.height },
            ElementKind::Line => ElementShape::Line { from: w.from, to: w.to },
            ElementKind::Freehand => ElementShape::Freehand { points: w.points.unwrap_or_default() },
        };
        let style = ElementStyle {
            color: w.color,
            stroke_color: w.stroke_color,
            fill_color: w.fill_color,
            thickness: w.thickness,
            dashed: w.dashed,
        };
        Ok(Self { shape, style })
    }
}

impl From<AnnotationElement> for WireElement {
    fn from(e: AnnotationElement) -> Self {
        let mut w = WireElement {
            kind: e.kind().as_str().to_string(),
            color: e.style.color,
            stroke_color: e.style.stroke_color,
            fill_color: e.style.fill_color,
            thickness: e.style.thickness,
            dashed: e.style.dashed,
            ..Default::default()
        };
        match e.shape {
            ElementShape::Text { content, x, y, font_size, font_weight, max_width } => {
                w.content = content;
                w.x = x;
                w.y = y;
                w.font_size = font_size;
                w.font_weight = (font_weight == FontWeight::Bold).then(|| "bold".to_string());
                w.max_width = max_width;
            }
            ElementShape::Arrow { from, to } | ElementShape::Line { from, to } => {
                w.from = from;
                w.to = to;
            }
            ElementShape::Circle { center, radius } => {
                w.center = center;
                w.radius = radius;
            }
            ElementShape::Rectangle { x, y, width, height } => {
                w.x = x;
                w.y = y;
                w.width = width;
                w.height = height;
            }
            ElementShape::Freehand { points } => {
                w.points = Some(points);
            }
        }
        w
    }
}
