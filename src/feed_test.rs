#![allow(clippy::float_cmp)]

use canvas::render::CaptureFilter;
use canvas::surface::Author;
use serde_json::json;

use super::*;

const SESSION: &str = "s-1";

fn message_line(session: &str, kind: &str, content: &str) -> String {
    json!({
        "id": "m1",
        "session_id": session,
        "role": "assistant",
        "content": content,
        "metadata": {
            "type": kind,
            "annotation": { "elements": [{ "type": "line", "from": { "x": 0, "y": 0 }, "to": { "x": 5, "y": 5 } }] }
        }
    })
    .to_string()
}

fn run(core: &mut EngineCore, script: &str) -> Vec<Action> {
    script
        .lines()
        .filter_map(|line| parse_script_line(line).unwrap())
        .flat_map(|step| apply_step(core, step))
        .collect()
}

// =============================================================
// Replay feed
// =============================================================

#[test]
fn bare_document_line_is_a_document() {
    let routed = parse_feed_line(r#"{"elements":[{"type":"circle","center":{"x":1,"y":1},"radius":2}]}"#, None).unwrap();
    assert_eq!(routed.document().map(AnnotationDocument::len), Some(1));
}

#[test]
fn blank_line_is_ignored() {
    assert_eq!(parse_feed_line("   ", Some(SESSION)).unwrap(), Routed::Ignored);
}

#[test]
fn message_for_watched_session_is_routed() {
    let routed = parse_feed_line(&message_line(SESSION, "mixed", "see the line"), Some(SESSION)).unwrap();
    assert_eq!(routed.text(), Some("see the line"));
    assert!(routed.document().is_some());
}

#[test]
fn message_for_other_session_is_ignored() {
    let routed = parse_feed_line(&message_line("s-2", "annotation", ""), Some(SESSION)).unwrap();
    assert_eq!(routed, Routed::Ignored);
}

#[test]
fn without_session_every_message_counts() {
    let routed = parse_feed_line(&message_line("s-2", "annotation", ""), None).unwrap();
    assert!(routed.document().is_some());
}

#[test]
fn malformed_line_is_an_error() {
    assert!(parse_feed_line("{not json", None).is_err());
    assert!(parse_feed_line("[1, 2]", None).is_err());
}

// =============================================================
// Tool scripts
// =============================================================

#[test]
fn comments_and_blanks_are_skipped() {
    assert_eq!(parse_script_line("# draw a box").unwrap(), None);
    assert_eq!(parse_script_line("").unwrap(), None);
}

#[test]
fn steps_decode_by_op() {
    assert_eq!(
        parse_script_line(r#"{"op":"tool","tool":"rectangle"}"#).unwrap(),
        Some(ScriptStep::Tool { tool: Tool::Rectangle })
    );
    assert_eq!(
        parse_script_line(r#"{"op":"color","color":"red"}"#).unwrap(),
        Some(ScriptStep::Color { color: Color::rgb(255, 0, 0) })
    );
    assert_eq!(parse_script_line(r#"{"op":"blur"}"#).unwrap(), Some(ScriptStep::Blur));
}

#[test]
fn unknown_op_is_an_error() {
    assert!(parse_script_line(r#"{"op":"explode"}"#).is_err());
    assert!(parse_script_line(r#"{"op":"color","color":"not-a-color"}"#).is_err());
}

#[test]
fn scripted_rectangle_is_captured() {
    let mut core = EngineCore::default();
    run(
        &mut core,
        r##"
        {"op":"tool","tool":"rectangle"}
        {"op":"color","color":"#FF0000"}
        {"op":"width","width":4}
        {"op":"down","x":30,"y":40}
        {"op":"move","x":10,"y":10}
        {"op":"up","x":10,"y":10}
        "##,
    );
    let doc = core.capture(CaptureFilter::Only(Author::Local));
    assert_eq!(doc.len(), 1);
    let wire = serde_json::to_value(&doc).unwrap();
    let rect = &wire["elements"][0];
    assert_eq!(rect["kind"], "rectangle");
    assert_eq!(rect["width"], 20.0);
    assert_eq!(rect["height"], 30.0);
    assert_eq!(rect["thickness"], 4.0);
}

#[test]
fn scripted_text_targets_the_field_being_edited() {
    let mut core = EngineCore::default();
    run(
        &mut core,
        r#"
        {"op":"tool","tool":"text"}
        {"op":"down","x":10,"y":10}
        {"op":"text","content":"hello"}
        {"op":"blur"}
        "#,
    );
    assert_eq!(core.tools.editing(), None);
    let wire = serde_json::to_value(core.capture(CaptureFilter::Only(Author::Local))).unwrap();
    assert_eq!(wire["elements"][0]["content"], "hello");
}

#[test]
fn text_without_field_does_nothing() {
    let mut core = EngineCore::default();
    assert!(apply_step(&mut core, ScriptStep::Text { content: "x".into() }).is_empty());
    assert!(core.surface.is_empty());
}

#[test]
fn document_step_renders_remote_elements() {
    let mut core = EngineCore::default();
    let actions = run(
        &mut core,
        r#"{"op":"document","document":{"elements":[{"type":"line","from":{"x":0,"y":0},"to":{"x":9,"y":9}}]}}"#,
    );
    assert_eq!(actions.len(), 1);
    assert_eq!(core.capture(CaptureFilter::Only(Author::Local)).len(), 0);
    assert_eq!(core.capture(CaptureFilter::All).len(), 1);
}

#[test]
fn clear_step_empties_surface() {
    let mut core = EngineCore::default();
    run(
        &mut core,
        r#"
        {"op":"tool","tool":"pen"}
        {"op":"down","x":0,"y":0}
        {"op":"move","x":5,"y":5}
        {"op":"up","x":5,"y":5}
        {"op":"clear"}
        "#,
    );
    assert!(core.surface.is_empty());
}
