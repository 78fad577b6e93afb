#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::surface::Author;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn key(name: &str) -> Key {
    Key(name.to_string())
}

fn ctrl_shift() -> Modifiers {
    Modifiers { ctrl: true, shift: true, ..Modifiers::default() }
}

fn sample_doc() -> AnnotationDocument {
    AnnotationDocument::from_value(json!({ "elements": [
        { "type": "text", "content": "Step 1", "x": 100, "y": 100 },
        { "type": "arrow", "from": { "x": 100, "y": 130 }, "to": { "x": 300, "y": 130 } },
        { "type": "hexagon", "x": 1 },
        { "type": "circle", "radius": 4 }
    ]}))
    .unwrap()
}

fn draw_rect(core: &mut EngineCore, from: Point, to: Point) -> Vec<Action> {
    core.set_tool(Tool::Rectangle);
    let mut actions = core.on_pointer_down(from, Button::Primary);
    actions.extend(core.on_pointer_move(to));
    actions.extend(core.on_pointer_up(to, Button::Primary));
    actions
}

// =============================================================
// Rendering and clearing
// =============================================================

#[test]
fn render_counts_only_renderable_elements() {
    let mut core = EngineCore::default();
    let report = core.render(&sample_doc());
    // Unknown kind dropped at decode; circle without center skipped at render.
    assert_eq!(report.added.len(), 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(core.surface.len(), 2);
}

#[test]
fn clear_removes_remote_and_local_elements() {
    let mut core = EngineCore::default();
    core.render(&sample_doc());
    draw_rect(&mut core, pt(0.0, 0.0), pt(10.0, 10.0));
    assert_eq!(core.surface.len(), 3);
    core.clear();
    assert!(core.surface.is_empty());
    core.render(&sample_doc());
    assert_eq!(core.surface.len(), 2);
}

#[test]
fn clear_keeps_guides() {
    let mut core = EngineCore::default();
    core.toggle_grid();
    let guides = core.guides.len();
    core.render(&sample_doc());
    core.clear();
    assert_eq!(core.guides.len(), guides);
}

#[test]
fn clear_resets_selection() {
    let mut core = EngineCore::default();
    draw_rect(&mut core, pt(0.0, 0.0), pt(10.0, 10.0));
    core.set_tool(Tool::Select);
    core.on_pointer_down(pt(5.0, 5.0), Button::Primary);
    assert!(core.selection().is_some());
    core.clear();
    assert_eq!(core.selection(), None);
}

// =============================================================
// Inbox
// =============================================================

#[test]
fn pump_renders_posted_documents_in_order() {
    let mut core = EngineCore::default();
    let poster = core.poster();
    poster.post(AnnotationDocument::new(vec![AnnotationElement::line(pt(0.0, 0.0), pt(1.0, 1.0))]));
    poster.post(sample_doc());
    assert!(core.surface.is_empty());
    let report = core.pump();
    assert_eq!(report.added.len(), 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(core.surface.ids(), report.added.as_slice());
    assert_eq!(core.pump(), RenderReport::default());
}

#[test]
fn pump_accepts_documents_from_other_threads() {
    let mut core = EngineCore::default();
    let poster = core.poster();
    std::thread::spawn(move || poster.post(sample_doc())).join().unwrap();
    assert_eq!(core.pump().added.len(), 2);
}

// =============================================================
// Capture
// =============================================================

#[test]
fn capture_local_returns_only_drawn_elements() {
    let mut core = EngineCore::default();
    core.render(&sample_doc());
    draw_rect(&mut core, pt(50.0, 50.0), pt(10.0, 10.0));
    let doc = core.capture(CaptureFilter::Only(Author::Local));
    assert_eq!(doc.len(), 1);
    assert_eq!(
        doc.elements[0],
        AnnotationElement::rectangle(pt(10.0, 10.0), 40.0, 40.0)
            .with_stroke_color("#667EEA")
            .with_thickness(2.0)
    );
    assert_eq!(core.capture(CaptureFilter::All).len(), 3);
}

#[test]
fn captured_document_renders_identically() {
    let mut core = EngineCore::default();
    core.render(&sample_doc());
    let captured = core.capture(CaptureFilter::All);
    let mut other = EngineCore::default();
    other.render(&captured);
    let a: Vec<_> = core.surface.iter().map(|(_, v)| v.clone()).collect();
    let b: Vec<_> = other.surface.iter().map(|(_, v)| v.clone()).collect();
    assert_eq!(a, b);
}

// =============================================================
// Keyboard shortcuts
// =============================================================

#[test]
fn ctrl_shift_q_is_reported_to_host() {
    let mut core = EngineCore::default();
    assert_eq!(core.on_key_down(&key("Q"), ctrl_shift()), vec![Action::ToggleOverlay]);
}

#[test]
fn ctrl_shift_c_clears_annotations() {
    let mut core = EngineCore::default();
    core.render(&sample_doc());
    let actions = core.on_key_down(&key("C"), ctrl_shift());
    assert!(actions.contains(&Action::RenderNeeded));
    assert!(core.surface.is_empty());
}

#[test]
fn clear_shortcut_reports_same_actions_as_clear_all() {
    let mut shortcut = EngineCore::default();
    let mut direct = EngineCore::default();
    let report = shortcut.render(&sample_doc());
    direct.render(&sample_doc());
    let via_key = shortcut.on_key_down(&key("c"), ctrl_shift());
    let deleted: Vec<_> = via_key
        .iter()
        .filter_map(|a| match a {
            Action::ElementDeleted { id } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(deleted, report.added);
    assert_eq!(via_key.len(), direct.clear_all().len());
}

#[test]
fn clear_shortcut_keeps_guides() {
    let mut core = EngineCore::default();
    core.toggle_grid();
    let guides = core.guides.len();
    core.render(&sample_doc());
    core.on_key_down(&key("C"), ctrl_shift());
    assert_eq!(core.guides.len(), guides);
    assert!(core.grid_visible());
}

#[test]
fn ctrl_g_toggles_grid() {
    let mut core = EngineCore::default();
    let ctrl = Modifiers { ctrl: true, ..Modifiers::default() };
    core.on_key_down(&key("g"), ctrl);
    assert!(core.grid_visible());
    assert!(!core.guides.is_empty());
    core.on_key_down(&key("g"), ctrl);
    assert!(!core.grid_visible());
    assert!(core.guides.is_empty());
}

#[test]
fn delete_key_removes_selection() {
    let mut core = EngineCore::default();
    draw_rect(&mut core, pt(0.0, 0.0), pt(10.0, 10.0));
    core.set_tool(Tool::Select);
    core.on_pointer_down(pt(5.0, 5.0), Button::Primary);
    core.on_pointer_up(pt(5.0, 5.0), Button::Primary);
    core.on_key_down(&key("Delete"), Modifiers::default());
    assert!(core.surface.is_empty());
}

#[test]
fn escape_deselects() {
    let mut core = EngineCore::default();
    draw_rect(&mut core, pt(0.0, 0.0), pt(10.0, 10.0));
    core.set_tool(Tool::Select);
    core.on_pointer_down(pt(5.0, 5.0), Button::Primary);
    core.on_pointer_up(pt(5.0, 5.0), Button::Primary);
    let actions = core.on_key_down(&key("Escape"), Modifiers::default());
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert_eq!(core.selection(), None);
}

#[test]
fn unbound_keys_do_nothing() {
    let mut core = EngineCore::default();
    assert!(core.on_key_down(&key("a"), Modifiers::default()).is_empty());
}

// =============================================================
// Guides
// =============================================================

#[test]
fn guides_are_not_hit_tested() {
    let mut core = EngineCore::default();
    core.toggle_grid();
    core.toggle_markers();
    core.set_tool(Tool::Eraser);
    let actions = core.on_pointer_down(pt(100.0, 100.0), Button::Primary);
    assert!(actions.is_empty());
    assert!(core.guides_visible());
}

#[test]
fn markers_and_grid_toggle_independently() {
    let mut core = EngineCore::default();
    assert!(core.toggle_markers());
    let markers_only = core.guides.len();
    assert_eq!(markers_only, 100);
    assert!(core.toggle_grid());
    assert!(core.guides.len() > markers_only);
    assert!(!core.toggle_markers());
    assert!(core.grid_visible());
    assert!(!core.markers_visible());
}

// =============================================================
// Direct operations
// =============================================================

#[test]
fn clear_all_reports_every_deletion() {
    let mut core = EngineCore::default();
    let report = core.render(&sample_doc());
    let actions = core.clear_all();
    let deleted: Vec<_> = actions
        .iter()
        .filter_map(|a| match a {
            Action::ElementDeleted { id } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(deleted, report.added);
    assert!(core.surface.is_empty());
}

#[test]
fn text_flow_through_engine() {
    let mut core = EngineCore::default();
    core.set_tool(Tool::Text);
    let actions = core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    let Some(Action::ElementAdded { id }) = actions.first().cloned() else {
        panic!("expected ElementAdded first, got {actions:?}");
    };
    core.set_text(&id, "answer: 42");
    core.blur_text(&id);
    assert!(core.visual(&id).is_some());
    assert_eq!(core.capture(CaptureFilter::Only(Author::Local)).len(), 1);
}
