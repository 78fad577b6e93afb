//! Calibration guides for checking where remote coordinates land on screen.
//!
//! Both guides are ordinary annotation documents so they go through the same
//! renderer as everything else. The engine keeps them on a separate layer that
//! is never hit-tested and survives `clear()`.

#[cfg(test)]
#[path = "calibration_test.rs"]
mod calibration_test;

use crate::doc::{AnnotationDocument, AnnotationElement};
use crate::geom::Point;

/// Reference screen size the guides are laid out for.
pub const GRID_WIDTH: u32 = 1920;
pub const GRID_HEIGHT: u32 = 1080;

/// Spacing of minor grid lines.
pub const GRID_SPACING: u32 = 100;
/// Spacing of major grid lines.
pub const MAJOR_GRID_SPACING: u32 = 500;

// Line colors carry the guide layer's 0.7 opacity as alpha.
const MINOR_LINE_COLOR: &str = "#B3FFD700";
const MAJOR_LINE_COLOR: &str = "#B300FFFF";
const LABEL_BACKDROP: &str = "#C8000000";
const WAYPOINT_BACKDROP: &str = "#B4000000";
const WAYPOINT_COLOR: &str = "#00FF00";

const ZONE_NAMES: [[&str; 3]; 3] = [
    ["TopLeft", "TopCenter", "TopRight"],
    ["MiddleLeft", "Center", "MiddleRight"],
    ["BottomLeft", "BottomCenter", "BottomRight"],
];
// One color per zone row, at 0.8 opacity.
const ZONE_COLORS: [&str; 3] = ["#CCFF0000", "#CC0000FF", "#CC008000"];

const WAYPOINTS: [(&str, u32, u32); 15] = [
    ("A1", 0, 0),
    ("A10", 1000, 0),
    ("A20", 1920, 0),
    ("B1", 0, 100),
    ("C1", 0, 200),
    ("D1", 0, 300),
    ("E1", 0, 400),
    ("F1", 0, 500),
    ("G1", 0, 600),
    ("H1", 0, 700),
    ("I1", 0, 800),
    ("J1", 0, 900),
    ("K1", 0, 1000),
    ("K20", 1920, 1080),
    ("F10", 960, 540),
];

const MARKER_COLUMNS: [u32; 5] = [100, 580, 1060, 1540, 1820];
const MARKER_ROWS: [u32; 5] = [100, 320, 540, 760, 980];

/// Number of reference markers.
pub const MARKER_COUNT: usize = MARKER_COLUMNS.len() * MARKER_ROWS.len();

fn at(x: u32, y: u32) -> Point {
    Point::new(f64::from(x), f64::from(y))
}

/// The coordinate grid for a `width` × `height` screen.
///
/// Paint order, bottom to top: zone boundaries with their labels, grid lines,
/// coordinate labels at every intersection, then waypoint labels.
#[must_use]
pub fn grid_document(width: u32, height: u32) -> AnnotationDocument {
    let mut elements = Vec::new();
    zone_boundaries(width, height, &mut elements);
    grid_lines(width, height, &mut elements);
    coordinate_labels(width, height, &mut elements);
    waypoint_labels(width, height, &mut elements);
    tracing::debug!(width, height, elements = elements.len(), "built calibration grid");
    AnnotationDocument::new(elements)
}

fn zone_boundaries(width: u32, height: u32, out: &mut Vec<AnnotationElement>) {
    let zone_w = f64::from(width) / 3.0;
    let zone_h = f64::from(height) / 3.0;
    for (row, (names, color)) in ZONE_NAMES.iter().zip(ZONE_COLORS).enumerate() {
        for (col, name) in names.iter().enumerate() {
            let origin = Point::new(zone_w * index_f64(col), zone_h * index_f64(row));
            out.push(
                AnnotationElement::rectangle(origin, zone_w, zone_h)
                    .with_stroke_color(color)
                    .with_thickness(2.0)
                    .dashed(),
            );
            let center = Point::new(origin.x + zone_w / 2.0, origin.y + zone_h / 2.0);
            out.push(
                AnnotationElement::rectangle(Point::new(center.x - 60.0, center.y - 20.0), 120.0, 40.0)
                    .with_stroke_color(color)
                    .with_fill(LABEL_BACKDROP)
                    .with_thickness(2.0),
            );
            out.push(
                AnnotationElement::text(*name, Point::new(center.x - 50.0, center.y - 10.0))
                    .with_font_size(16.0)
                    .with_color("white")
                    .bold(),
            );
        }
    }
}

fn grid_lines(width: u32, height: u32, out: &mut Vec<AnnotationElement>) {
    let line = |from: Point, to: Point, offset: u32| {
        let major = offset % MAJOR_GRID_SPACING == 0;
        AnnotationElement::line(from, to)
            .with_color(if major { MAJOR_LINE_COLOR } else { MINOR_LINE_COLOR })
            .with_thickness(if major { 3.0 } else { 1.0 })
    };
    for x in (0..=width).step_by(GRID_SPACING as usize) {
        out.push(line(at(x, 0), at(x, height), x));
    }
    for y in (0..=height).step_by(GRID_SPACING as usize) {
        out.push(line(at(0, y), at(width, y), y));
    }
}

fn coordinate_labels(width: u32, height: u32, out: &mut Vec<AnnotationElement>) {
    for x in (0..=width).step_by(GRID_SPACING as usize) {
        for y in (0..=height).step_by(GRID_SPACING as usize) {
            out.push(
                AnnotationElement::text(format!("{x},{y}"), at(x + 5, y + 5))
                    .with_font_size(10.0)
                    .with_color("white")
                    .bold(),
            );
        }
    }
}

fn waypoint_labels(width: u32, height: u32, out: &mut Vec<AnnotationElement>) {
    for (code, x, y) in WAYPOINTS {
        if x > width || y > height {
            continue;
        }
        let p = at(x, y);
        out.push(
            AnnotationElement::rectangle(Point::new(p.x - 30.0, p.y - 15.0), 60.0, 30.0)
                .with_stroke_color(WAYPOINT_COLOR)
                .with_fill(WAYPOINT_BACKDROP)
                .with_thickness(2.0),
        );
        out.push(
            AnnotationElement::text(code, Point::new(p.x - 20.0, p.y - 10.0))
                .with_font_size(14.0)
                .with_color(WAYPOINT_COLOR)
                .bold(),
        );
    }
}

#[allow(clippy::cast_precision_loss)]
fn index_f64(i: usize) -> f64 {
    i as f64
}

/// Screen position of marker `number` (1-based, row-major), if it exists.
#[must_use]
pub fn marker_position(number: usize) -> Option<Point> {
    let index = number.checked_sub(1)?;
    let x = *MARKER_COLUMNS.get(index % MARKER_COLUMNS.len())?;
    let y = *MARKER_ROWS.get(index / MARKER_COLUMNS.len())?;
    Some(at(x, y))
}

/// The 25 numbered reference markers with their coordinate captions.
#[must_use]
pub fn marker_document() -> AnnotationDocument {
    let mut elements = Vec::with_capacity(MARKER_COUNT * 4);
    for number in 1..=MARKER_COUNT {
        let Some(p) = marker_position(number) else {
            continue;
        };
        elements.push(
            AnnotationElement::circle(p, 15.0)
                .with_stroke_color("black")
                .with_fill("#B4FFFFFF")
                .with_thickness(1.0),
        );
        elements.push(
            AnnotationElement::circle(p, 20.0)
                .with_stroke_color("black")
                .with_fill("#7800FFFF")
                .with_thickness(3.0),
        );
        elements.push(
            AnnotationElement::text(number.to_string(), Point::new(p.x - 8.0, p.y - 10.0))
                .with_font_size(16.0)
                .with_color("black")
                .bold(),
        );
        elements.push(
            AnnotationElement::text(format!("({}, {})", p.x, p.y), Point::new(p.x - 25.0, p.y + 30.0))
                .with_font_size(12.0)
                .with_color("white")
                .bold(),
        );
    }
    AnnotationDocument::new(elements)
}
