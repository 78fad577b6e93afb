//! Annotation renderer: turns documents into surface visuals and back.
//!
//! Rendering is additive and best-effort. Each element is converted on its
//! own by [`Renderer::visual_for`], a pure function of the element and the
//! style defaults; an element that cannot be drawn is logged and skipped so
//! the rest of its document still lands on the surface.
//!
//! [`capture`] goes the other way, describing whatever is currently on the
//! surface as an [`AnnotationDocument`] so local drawings can travel over the
//! same wire format as remote ones.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::color::{Color, fill_paint, stroke_paint};
use crate::doc::{AnnotationDocument, AnnotationElement, ElementShape, ElementStyle, FontWeight};
use crate::geom::Point;
use crate::style::{LineCap, StyleDefaults};
use crate::surface::{Author, ElementId, Shape, Stroke, Surface, TextShape, Visual};

/// Why an element produced no visual.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("{kind} element is missing `{field}`")]
    MissingGeometry { kind: &'static str, field: &'static str },
    #[error("{kind} element has invalid `{field}`")]
    InvalidGeometry { kind: &'static str, field: &'static str },
}

/// Outcome of rendering one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    /// Ids of the visuals added, in document order.
    pub added: Vec<ElementId>,
    /// Number of elements that produced no visual.
    pub skipped: usize,
}

/// Maps annotation elements to surface visuals.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: StyleDefaults,
}

impl Renderer {
    #[must_use]
    pub fn new(style: StyleDefaults) -> Self {
        Self { style }
    }

    #[must_use]
    pub fn style(&self) -> &StyleDefaults {
        &self.style
    }

    /// Paint every renderable element of `doc` on top of `surface`.
    ///
    /// Existing content is never touched. Elements that cannot be drawn are
    /// logged and counted in [`RenderReport::skipped`].
    pub fn render(&self, surface: &mut Surface, doc: &AnnotationDocument) -> RenderReport {
        self.render_as(surface, doc, Author::Remote)
    }

    /// Same as [`Renderer::render`] with an explicit author for the visuals.
    pub fn render_as(&self, surface: &mut Surface, doc: &AnnotationDocument, author: Author) -> RenderReport {
        let mut report = RenderReport::default();
        for (index, element) in doc.elements.iter().enumerate() {
            match self.visual_for(element, author) {
                Ok(visual) => report.added.push(surface.add(visual)),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping annotation element");
                    report.skipped += 1;
                }
            }
        }
        tracing::debug!(added = report.added.len(), skipped = report.skipped, "rendered annotation document");
        report
    }

    /// Remove everything from the surface.
    pub fn clear(&self, surface: &mut Surface) {
        surface.clear();
    }

    /// Build the visual for one element.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the kind's required geometry is absent or
    /// not finite.
    pub fn visual_for(&self, element: &AnnotationElement, author: Author) -> Result<Visual, RenderError> {
        let s = &element.style;
        let kind = element.kind().as_str();
        match &element.shape {
            ElementShape::Text { content, x, y, font_size, font_weight, max_width } => {
                let content = content.clone().ok_or(RenderError::MissingGeometry { kind, field: "content" })?;
                let origin = Point::new(require(*x, kind, "x")?, require(*y, kind, "y")?);
                let font_size = positive_or(*font_size, self.style.default_font_size, kind, "fontSize")?;
                let max_width = positive_or(*max_width, self.style.default_max_width, kind, "maxWidth")?;
                let text = TextShape {
                    content,
                    font_size,
                    weight: *font_weight,
                    max_width,
                    min_width: 0.0,
                    color: stroke_paint(s.color.as_deref(), self.style.default_color),
                };
                Ok(Visual::new(origin, Shape::Text(text), author))
            }
            ElementShape::Arrow { from, to } => {
                let from = require_point(*from, kind, "from")?;
                let to = require_point(*to, kind, "to")?;
                let shape = Shape::Arrow {
                    from,
                    to,
                    head_length: self.style.arrow_head_length,
                    head_angle: self.style.arrow_head_radians(),
                    stroke: self.stroke(s, s.color.as_deref(), self.style.default_thickness, LineCap::Butt),
                };
                Ok(Visual::new(Point::default(), shape, author))
            }
            ElementShape::Circle { center, radius } => {
                let center = require_point(*center, kind, "center")?;
                let radius = non_negative(require(*radius, kind, "radius")?, kind, "radius")?;
                let shape = Shape::Circle {
                    radius,
                    stroke: self.stroke(s, outline_color(s), self.style.default_thickness, LineCap::Butt),
                    fill: fill_paint(s.fill_color.as_deref()),
                };
                Ok(Visual::new(Point::new(center.x - radius, center.y - radius), shape, author))
            }
            ElementShape::Rectangle { x, y, width, height } => {
                let origin = Point::new(require(*x, kind, "x")?, require(*y, kind, "y")?);
                let shape = Shape::Rect {
                    width: non_negative(require(*width, kind, "width")?, kind, "width")?,
                    height: non_negative(require(*height, kind, "height")?, kind, "height")?,
                    stroke: self.stroke(s, outline_color(s), self.style.default_thickness, LineCap::Butt),
                    fill: fill_paint(s.fill_color.as_deref()),
                };
                Ok(Visual::new(origin, shape, author))
            }
            ElementShape::Line { from, to } => {
                let shape = Shape::Line {
                    from: require_point(*from, kind, "from")?,
                    to: require_point(*to, kind, "to")?,
                    stroke: self.stroke(s, s.color.as_deref(), self.style.default_line_thickness, LineCap::Butt),
                };
                Ok(Visual::new(Point::default(), shape, author))
            }
            ElementShape::Freehand { points } => {
                if points.len() < 2 {
                    return Err(RenderError::MissingGeometry { kind, field: "points" });
                }
                if !points.iter().all(|p| p.is_finite()) {
                    return Err(RenderError::InvalidGeometry { kind, field: "points" });
                }
                let shape = Shape::Polyline {
                    points: points.clone(),
                    stroke: self.stroke(s, s.color.as_deref(), self.style.default_thickness, self.style.freehand_cap),
                };
                Ok(Visual::new(Point::default(), shape, author))
            }
        }
    }

    fn stroke(&self, s: &ElementStyle, color: Option<&str>, default_width: f64, cap: LineCap) -> Stroke {
        let width = match s.thickness {
            Some(t) if t.is_finite() && t >= 0.0 => t,
            Some(t) => {
                tracing::warn!(thickness = t, "invalid thickness, using default");
                default_width
            }
            None => default_width,
        };
        Stroke {
            color: stroke_paint(color, self.style.default_color),
            width,
            dashed: s.dashed.unwrap_or(false),
            cap,
        }
    }
}

/// Outline color for closed shapes: `strokeColor`, then `color`.
fn outline_color(s: &ElementStyle) -> Option<&str> {
    s.stroke_color.as_deref().or(s.color.as_deref())
}

fn require(v: Option<f64>, kind: &'static str, field: &'static str) -> Result<f64, RenderError> {
    let v = v.ok_or(RenderError::MissingGeometry { kind, field })?;
    if v.is_finite() { Ok(v) } else { Err(RenderError::InvalidGeometry { kind, field }) }
}

fn require_point(p: Option<Point>, kind: &'static str, field: &'static str) -> Result<Point, RenderError> {
    let p = p.ok_or(RenderError::MissingGeometry { kind, field })?;
    if p.is_finite() { Ok(p) } else { Err(RenderError::InvalidGeometry { kind, field }) }
}

fn non_negative(v: f64, kind: &'static str, field: &'static str) -> Result<f64, RenderError> {
    if v >= 0.0 { Ok(v) } else { Err(RenderError::InvalidGeometry { kind, field }) }
}

fn positive_or(v: Option<f64>, default: f64, kind: &'static str, field: &'static str) -> Result<f64, RenderError> {
    match v {
        None => Ok(default),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(_) => Err(RenderError::InvalidGeometry { kind, field }),
    }
}

// =============================================================
// Capture
// =============================================================

/// Which visuals [`capture`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFilter {
    All,
    Only(Author),
}

/// Describe the surface as a document, in paint order.
///
/// Local text whose content equals `placeholder` (an untouched text field) is
/// left out, as is blank local text. Remote text is kept as received.
#[must_use]
pub fn capture(surface: &Surface, filter: CaptureFilter, placeholder: &str) -> AnnotationDocument {
    let elements = surface
        .iter()
        .filter(|(_, v)| match filter {
            CaptureFilter::All => true,
            CaptureFilter::Only(author) => v.author == author,
        })
        .filter_map(|(_, v)| element_for(v, placeholder))
        .collect();
    AnnotationDocument::new(elements)
}

/// Describe one visual as an annotation element.
#[must_use]
pub fn element_for(visual: &Visual, placeholder: &str) -> Option<AnnotationElement> {
    let o = visual.origin;
    let element = match &visual.shape {
        Shape::Text(text) => {
            let untouched = text.content.trim().is_empty() || text.content == placeholder;
            if visual.author == Author::Local && untouched {
                return None;
            }
            let e = AnnotationElement::text(text.content.clone(), o)
                .with_font_size(text.font_size)
                .with_max_width(text.max_width)
                .with_color(text.color.to_hex());
            if text.weight == FontWeight::Bold { e.bold() } else { e }
        }
        Shape::Arrow { from, to, stroke, .. } => {
            with_stroke(AnnotationElement::arrow(from.offset(o), to.offset(o)), stroke, false)
        }
        Shape::Circle { radius, stroke, fill } => {
            let center = Point::new(o.x + radius, o.y + radius);
            with_fill(with_stroke(AnnotationElement::circle(center, *radius), stroke, true), *fill)
        }
        Shape::Rect { width, height, stroke, fill } => {
            with_fill(with_stroke(AnnotationElement::rectangle(o, *width, *height), stroke, true), *fill)
        }
        Shape::Line { from, to, stroke } => with_stroke(AnnotationElement::line(from.offset(o), to.offset(o)), stroke, false),
        Shape::Polyline { points, stroke } => {
            if points.len() < 2 {
                return None;
            }
            let points = points.iter().map(|p| p.offset(o)).collect();
            with_stroke(AnnotationElement::freehand(points), stroke, false)
        }
    };
    Some(element)
}

fn with_stroke(mut e: AnnotationElement, stroke: &Stroke, outline: bool) -> AnnotationElement {
    let hex = stroke.color.to_hex();
    if outline {
        e.style.stroke_color = Some(hex);
    } else {
        e.style.color = Some(hex);
    }
    e.style.thickness = Some(stroke.width);
    if stroke.dashed {
        e.style.dashed = Some(true);
    }
    e
}

fn with_fill(mut e: AnnotationElement, fill: Option<Color>) -> AnnotationElement {
    if let Some(fill) = fill {
        e.style.fill_color = Some(fill.to_hex());
    }
    e
}
