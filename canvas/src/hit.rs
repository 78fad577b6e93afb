#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HIT_SLOP_PX;
use crate::geom::{Point, distance_to_segment};
use crate::surface::{ElementId, Shape, Surface, Visual};

/// Which part of a visual was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// Inside a closed shape or a text block.
    Body,
    /// On an outline or within reach of a line-like stroke.
    Stroke,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: ElementId,
    pub part: HitPart,
}

/// Find the topmost visual under `pt`, walking paint order from the top.
#[must_use]
pub fn hit_test(surface: &Surface, pt: Point) -> Option<Hit> {
    surface
        .iter()
        .rev()
        .find_map(|(id, visual)| hit_visual(visual, pt).map(|part| Hit { id, part }))
}

/// Test a single visual. `pt` is in surface coordinates.
#[must_use]
pub fn hit_visual(visual: &Visual, pt: Point) -> Option<HitPart> {
    let local = pt.minus(visual.origin);
    match &visual.shape {
        Shape::Text(text) => {
            let layout = text.layout();
            let inside = local.x >= 0.0 && local.y >= 0.0 && local.x <= layout.width && local.y <= layout.height;
            inside.then_some(HitPart::Body)
        }
        Shape::Rect { width, height, stroke, .. } => {
            let reach = reach(stroke.width);
            let inside = local.x >= 0.0 && local.y >= 0.0 && local.x <= *width && local.y <= *height;
            if inside {
                return Some(HitPart::Body);
            }
            let near = local.x >= -reach && local.y >= -reach && local.x <= width + reach && local.y <= height + reach;
            near.then_some(HitPart::Stroke)
        }
        Shape::Circle { radius, stroke, .. } => {
            let d = local.distance(Point::new(*radius, *radius));
            if d <= *radius {
                Some(HitPart::Body)
            } else if d <= radius + reach(stroke.width) {
                Some(HitPart::Stroke)
            } else {
                None
            }
        }
        Shape::Arrow { stroke, .. } | Shape::Line { stroke, .. } | Shape::Polyline { stroke, .. } => {
            let reach = reach(stroke.width);
            let segments = visual.shape.segments();
            let near = segments.iter().any(|(a, b)| distance_to_segment(local, *a, *b) <= reach);
            // A lone point still has a hit area.
            let dot = match &visual.shape {
                Shape::Polyline { points, .. } if points.len() == 1 => local.distance(points[0]) <= reach,
                _ => false,
            };
            (near || dot).then_some(HitPart::Stroke)
        }
    }
}

fn reach(stroke_width: f64) -> f64 {
    (stroke_width / 2.0).max(HIT_SLOP_PX)
}
