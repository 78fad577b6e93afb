//! Plain 2D geometry in surface space (pixels, origin top-left, y-down).

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    #[must_use]
    pub fn offset(self, by: Point) -> Self {
        Self { x: self.x + by.x, y: self.y + by.y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn minus(self, other: Point) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Box with its top-left at `origin`.
    #[must_use]
    pub fn from_origin(origin: Point, width: f64, height: f64) -> Self {
        Self { min: origin, max: Point::new(origin.x + width, origin.y + height) }
    }

    /// Smallest box containing every point. `None` for an empty slice.
    #[must_use]
    pub fn around(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut b = Self { min: *first, max: *first };
        for p in rest {
            b.min.x = b.min.x.min(p.x);
            b.min.y = b.min.y.min(p.y);
            b.max.x = b.max.x.max(p.x);
            b.max.y = b.max.y.max(p.y);
        }
        Some(b)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Grow the box by `by` on every side.
    #[must_use]
    pub fn inflate(self, by: f64) -> Self {
        Self {
            min: Point::new(self.min.x - by, self.min.y - by),
            max: Point::new(self.max.x + by, self.max.y + by),
        }
    }

    /// Move the box by `by`.
    #[must_use]
    pub fn translate(self, by: Point) -> Self {
        Self { min: self.min.offset(by), max: self.max.offset(by) }
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Shortest distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Endpoints of the two arrowhead strokes that depart from `to`.
///
/// Each stroke has length `length` and sits at `±angle` radians from the
/// reversed shaft direction. A zero-length shaft points the head along +x.
#[must_use]
pub fn arrow_head(from: Point, to: Point, length: f64, angle: f64) -> [Point; 2] {
    let shaft = (to.y - from.y).atan2(to.x - from.x);
    [
        Point::new(
            to.x - length * (shaft - angle).cos(),
            to.y - length * (shaft - angle).sin(),
        ),
        Point::new(
            to.x - length * (shaft + angle).cos(),
            to.y - length * (shaft + angle).sin(),
        ),
    ]
}
