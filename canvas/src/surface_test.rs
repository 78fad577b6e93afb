#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn rect_visual(x: f64, y: f64, w: f64, h: f64) -> Visual {
    Visual::new(
        pt(x, y),
        Shape::Rect { width: w, height: h, stroke: Stroke::solid(Color::BLACK, 2.0), fill: None },
        Author::Remote,
    )
}

fn text_shape(content: &str, font_size: f64, max_width: f64) -> TextShape {
    TextShape {
        content: content.to_string(),
        font_size,
        weight: FontWeight::Normal,
        max_width,
        min_width: 0.0,
        color: Color::BLACK,
    }
}

// =============================================================
// Surface arena
// =============================================================

#[test]
fn new_surface_is_empty() {
    let s = Surface::new();
    assert!(s.is_empty());
    assert_eq!(s.len(), 0);
}

#[test]
fn add_appends_in_paint_order() {
    let mut s = Surface::new();
    let a = s.add(rect_visual(0.0, 0.0, 1.0, 1.0));
    let b = s.add(rect_visual(5.0, 5.0, 1.0, 1.0));
    assert_eq!(s.ids(), &[a, b]);
    let order: Vec<_> = s.iter().map(|(id, _)| id).collect();
    assert_eq!(order, vec![a, b]);
}

#[test]
fn add_assigns_distinct_ids() {
    let mut s = Surface::new();
    let a = s.add(rect_visual(0.0, 0.0, 1.0, 1.0));
    let b = s.add(rect_visual(0.0, 0.0, 1.0, 1.0));
    assert_ne!(a, b);
}

#[test]
fn remove_drops_from_arena_and_order() {
    let mut s = Surface::new();
    let a = s.add(rect_visual(0.0, 0.0, 1.0, 1.0));
    let b = s.add(rect_visual(0.0, 0.0, 1.0, 1.0));
    assert!(s.remove(&a).is_some());
    assert!(!s.contains(&a));
    assert_eq!(s.ids(), &[b]);
}

#[test]
fn remove_unknown_is_none() {
    let mut s = Surface::new();
    assert!(s.remove(&Uuid::new_v4()).is_none());
}

#[test]
fn move_to_rewrites_origin_only() {
    let mut s = Surface::new();
    let a = s.add(rect_visual(0.0, 0.0, 10.0, 20.0));
    assert!(s.move_to(&a, pt(7.0, 8.0)));
    let v = s.get(&a).unwrap();
    assert_eq!(v.origin, pt(7.0, 8.0));
    assert_eq!(v.bounds().max, pt(17.0, 28.0));
}

#[test]
fn move_to_unknown_is_false() {
    let mut s = Surface::new();
    assert!(!s.move_to(&Uuid::new_v4(), pt(1.0, 1.0)));
}

#[test]
fn clear_empties_everything() {
    let mut s = Surface::new();
    s.add(rect_visual(0.0, 0.0, 1.0, 1.0));
    s.add(rect_visual(0.0, 0.0, 1.0, 1.0));
    s.clear();
    assert!(s.is_empty());
    assert_eq!(s.iter().count(), 0);
}

// =============================================================
// Shape geometry
// =============================================================

#[test]
fn arrow_segments_are_shaft_plus_two_head_strokes() {
    let shape = Shape::Arrow {
        from: pt(0.0, 0.0),
        to: pt(100.0, 0.0),
        head_length: 10.0,
        head_angle: std::f64::consts::PI / 6.0,
        stroke: Stroke::solid(Color::BLACK, 2.0),
    };
    let segs = shape.segments();
    assert_eq!(segs.len(), 3);
    assert_eq!(segs[0], (pt(0.0, 0.0), pt(100.0, 0.0)));
    for (start, end) in &segs[1..] {
        assert_eq!(*start, pt(100.0, 0.0));
        assert!((start.distance(*end) - 10.0).abs() < 1e-9);
    }
}

#[test]
fn polyline_segments_connect_consecutive_points() {
    let shape = Shape::Polyline {
        points: vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)],
        stroke: Stroke::solid(Color::BLACK, 2.0),
    };
    assert_eq!(
        shape.segments(),
        vec![(pt(0.0, 0.0), pt(10.0, 0.0)), (pt(10.0, 0.0), pt(10.0, 10.0))]
    );
}

#[test]
fn circle_bounds_are_diameter_square() {
    let shape = Shape::Circle { radius: 5.0, stroke: Stroke::solid(Color::BLACK, 1.0), fill: None };
    let b = shape.local_bounds();
    assert_eq!(b.min, pt(0.0, 0.0));
    assert_eq!(b.max, pt(10.0, 10.0));
}

#[test]
fn line_bounds_span_endpoints() {
    let shape = Shape::Line { from: pt(5.0, 9.0), to: pt(1.0, 2.0), stroke: Stroke::solid(Color::BLACK, 1.0) };
    let b = shape.local_bounds();
    assert_eq!(b.min, pt(1.0, 2.0));
    assert_eq!(b.max, pt(5.0, 9.0));
}

#[test]
fn text_has_no_stroke_and_no_segments() {
    let shape = Shape::Text(text_shape("hi", 16.0, 100.0));
    assert!(shape.stroke().is_none());
    assert!(shape.segments().is_empty());
}

// =============================================================
// Text layout
// =============================================================

#[test]
fn layout_short_text_is_one_line() {
    let layout = text_shape("hello world", 10.0, 1000.0).layout();
    assert_eq!(layout.lines, vec!["hello world".to_string()]);
    assert!((layout.width - 11.0 * 6.0).abs() < 1e-9);
    assert!((layout.height - 12.5).abs() < 1e-9);
}

#[test]
fn layout_wraps_at_max_width() {
    // 10px font => 6px per glyph => 5 glyphs per 30px line.
    let layout = text_shape("aa bb cc", 10.0, 30.0).layout();
    assert_eq!(layout.lines, vec!["aa bb".to_string(), "cc".to_string()]);
    assert!(layout.width <= 30.0);
}

#[test]
fn layout_hard_breaks_long_words() {
    let layout = text_shape("abcdefghijkl", 10.0, 30.0).layout();
    assert_eq!(layout.lines, vec!["abcde".to_string(), "fghij".to_string(), "kl".to_string()]);
}

#[test]
fn layout_keeps_explicit_newlines() {
    let layout = text_shape("one\n\ntwo", 10.0, 1000.0).layout();
    assert_eq!(layout.lines, vec!["one".to_string(), String::new(), "two".to_string()]);
}

#[test]
fn layout_respects_min_width() {
    let mut t = text_shape("a", 10.0, 1000.0);
    t.min_width = 100.0;
    assert_eq!(t.layout().width, 100.0);
}

#[test]
fn layout_empty_content_still_has_one_line_height() {
    let layout = text_shape("", 16.0, 100.0).layout();
    assert_eq!(layout.lines.len(), 1);
    assert!(layout.height > 0.0);
}
