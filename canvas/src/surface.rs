//! The drawing surface: an arena of live visuals keyed by stable id.
//!
//! Both the renderer and the tool manager paint here. Visuals are looked up by
//! [`ElementId`] for moving, selecting and deleting, and `order` holds the
//! paint order (later ids draw on top). Every shape's geometry is relative to
//! its visual's `origin`, so moving an element only ever rewrites `origin`.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::collections::HashMap;

use uuid::Uuid;

use crate::color::Color;
use crate::consts::{GLYPH_ADVANCE_EM, LINE_HEIGHT_EM};
use crate::doc::FontWeight;
use crate::geom::{Bounds, Point, arrow_head};
use crate::style::LineCap;

/// Unique identifier for a visual on the surface.
pub type ElementId = Uuid;

/// Who put a visual on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    /// Rendered from a remote document.
    Remote,
    /// Drawn with the local tools.
    Local,
}

/// Stroke paint for outlines and lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub dashed: bool,
    pub cap: LineCap,
}

impl Stroke {
    #[must_use]
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dashed: false, cap: LineCap::Butt }
    }
}

/// A block of wrapped text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub content: String,
    pub font_size: f64,
    pub weight: FontWeight,
    /// Wrap width.
    pub max_width: f64,
    /// Width the block occupies even when its content is shorter.
    pub min_width: f64,
    pub color: Color,
}

/// Estimated line breaks and extent of a [`TextShape`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<String>,
    pub line_height: f64,
    pub width: f64,
    pub height: f64,
}

impl TextShape {
    /// Greedy word wrap using a fixed average glyph advance.
    #[must_use]
    pub fn layout(&self) -> TextLayout {
        let advance = (self.font_size * GLYPH_ADVANCE_EM).max(f64::EPSILON);
        let per_line = chars_per_line(self.max_width, advance);
        let mut lines = Vec::new();
        for paragraph in self.content.split('\n') {
            wrap_paragraph(paragraph, per_line, &mut lines);
        }
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let natural = count_to_f64(longest) * advance;
        let width = natural.min(self.max_width).max(self.min_width);
        let line_height = self.font_size * LINE_HEIGHT_EM;
        let height = count_to_f64(lines.len().max(1)) * line_height;
        TextLayout { lines, line_height, width, height }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn chars_per_line(max_width: f64, advance: f64) -> usize {
    let n = (max_width / advance).floor();
    if n.is_finite() && n >= 1.0 { n as usize } else { 1 }
}

#[allow(clippy::cast_precision_loss)]
fn count_to_f64(n: usize) -> f64 {
    n as f64
}

fn wrap_paragraph(paragraph: &str, per_line: usize, out: &mut Vec<String>) {
    let mut line = String::new();
    let mut line_len = 0usize;
    for word in paragraph.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        // Hard-break words longer than a full line.
        while word.len() > per_line {
            if line_len > 0 {
                out.push(std::mem::take(&mut line));
                line_len = 0;
            }
            let rest = word.split_off(per_line);
            out.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        let needed = if line_len == 0 { word.len() } else { line_len + 1 + word.len() };
        if needed > per_line {
            out.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line.extend(word.iter());
        line_len += word.len();
    }
    if line_len > 0 || paragraph.trim().is_empty() {
        out.push(line);
    }
}

/// Geometry and paint of one visual, relative to the visual's origin.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Text(TextShape),
    /// Shaft from `from` to `to` with a two-stroke head at `to`.
    Arrow {
        from: Point,
        to: Point,
        head_length: f64,
        /// Head half-angle in radians.
        head_angle: f64,
        stroke: Stroke,
    },
    /// Circle whose bounding box has its top-left at the origin.
    Circle {
        radius: f64,
        stroke: Stroke,
        fill: Option<Color>,
    },
    Rect {
        width: f64,
        height: f64,
        stroke: Stroke,
        fill: Option<Color>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
}

impl Shape {
    /// Stroke paint, if the shape has an outline.
    #[must_use]
    pub fn stroke(&self) -> Option<&Stroke> {
        match self {
            Self::Text(_) => None,
            Self::Arrow { stroke, .. }
            | Self::Circle { stroke, .. }
            | Self::Rect { stroke, .. }
            | Self::Line { stroke, .. }
            | Self::Polyline { stroke, .. } => Some(stroke),
        }
    }

    /// Straight stroke segments for line-like shapes, in local coordinates.
    #[must_use]
    pub fn segments(&self) -> Vec<(Point, Point)> {
        match self {
            Self::Arrow { from, to, head_length, head_angle, .. } => {
                let [h1, h2] = arrow_head(*from, *to, *head_length, *head_angle);
                vec![(*from, *to), (*to, h1), (*to, h2)]
            }
            Self::Line { from, to, .. } => vec![(*from, *to)],
            Self::Polyline { points, .. } => points.windows(2).map(|w| (w[0], w[1])).collect(),
            Self::Text(_) | Self::Circle { .. } | Self::Rect { .. } => Vec::new(),
        }
    }

    /// Bounding box in local coordinates, ignoring stroke width.
    #[must_use]
    pub fn local_bounds(&self) -> Bounds {
        match self {
            Self::Text(text) => {
                let layout = text.layout();
                Bounds::from_origin(Point::default(), layout.width, layout.height)
            }
            Self::Circle { radius, .. } => Bounds::from_origin(Point::default(), radius * 2.0, radius * 2.0),
            Self::Rect { width, height, .. } => Bounds::from_origin(Point::default(), *width, *height),
            Self::Polyline { points, .. } => Bounds::around(points).unwrap_or_default(),
            Self::Arrow { .. } | Self::Line { .. } => {
                let points: Vec<Point> = self.segments().into_iter().flat_map(|(a, b)| [a, b]).collect();
                Bounds::around(&points).unwrap_or_default()
            }
        }
    }
}

/// One element on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    /// Top-left offset applied to the shape's local geometry.
    pub origin: Point,
    pub shape: Shape,
    pub author: Author,
    /// Drawn with a dashed selection outline.
    pub selected: bool,
}

impl Visual {
    #[must_use]
    pub fn new(origin: Point, shape: Shape, author: Author) -> Self {
        Self { origin, shape, author, selected: false }
    }

    /// Bounding box in surface coordinates.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.shape.local_bounds().translate(self.origin)
    }
}

/// Ordered arena of visuals.
#[derive(Debug, Default)]
pub struct Surface {
    visuals: HashMap<ElementId, Visual>,
    order: Vec<ElementId>,
}

impl Surface {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a visual on top of everything else and return its new id.
    pub fn add(&mut self, visual: Visual) -> ElementId {
        let id = Uuid::new_v4();
        self.visuals.insert(id, visual);
        self.order.push(id);
        id
    }

    /// Remove a visual, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<Visual> {
        let removed = self.visuals.remove(id)?;
        self.order.retain(|o| o != id);
        Some(removed)
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Visual> {
        self.visuals.get(id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Visual> {
        self.visuals.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.visuals.contains_key(id)
    }

    /// Set a visual's origin. Returns false if the id is unknown.
    pub fn move_to(&mut self, id: &ElementId, origin: Point) -> bool {
        let Some(v) = self.visuals.get_mut(id) else {
            return false;
        };
        v.origin = origin;
        true
    }

    /// Remove every visual.
    pub fn clear(&mut self) {
        self.visuals.clear();
        self.order.clear();
    }

    /// Number of visuals on the surface.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the surface holds no visuals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in paint order (bottom first).
    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.order
    }

    /// Visuals in paint order (bottom first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (ElementId, &Visual)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.visuals.get(id).map(|v| (*id, v)))
    }
}
