use serde_json::json;

use super::*;

const SESSION: &str = "6f1c2d3e-0000-4000-8000-000000000001";

fn message(value: serde_json::Value) -> RemoteMessage {
    serde_json::from_value(value).unwrap()
}

fn assistant(kind: &str, content: &str, with_doc: bool) -> RemoteMessage {
    let mut metadata = json!({ "type": kind, "processed_at": "2025-01-01T00:00:00Z" });
    if with_doc {
        metadata["annotation"] = json!({
            "type": "annotation",
            "elements": [{ "type": "text", "content": "x = 2", "x": 10, "y": 10 }]
        });
    }
    message(json!({
        "id": "m1",
        "session_id": SESSION,
        "role": "assistant",
        "content": content,
        "created_at": "2025-01-01T00:00:00Z",
        "metadata": metadata,
    }))
}

// =============================================================
// Decoding
// =============================================================

#[test]
fn decodes_full_row() {
    let m = assistant("annotation", "", true);
    assert_eq!(m.session_id, SESSION);
    let metadata = m.metadata.unwrap();
    assert_eq!(metadata.kind, "annotation");
    assert_eq!(metadata.annotation.unwrap().len(), 1);
    assert_eq!(metadata.processed_at.as_deref(), Some("2025-01-01T00:00:00Z"));
}

#[test]
fn missing_fields_default() {
    let m = message(json!({ "role": "assistant" }));
    assert_eq!(m.session_id, "");
    assert_eq!(m.metadata, None);
}

// =============================================================
// Routing
// =============================================================

#[test]
fn annotation_yields_document() {
    let routed = route(assistant("annotation", "ignored text", true), SESSION);
    assert_eq!(routed.document().map(AnnotationDocument::len), Some(1));
    assert_eq!(routed.text(), None);
}

#[test]
fn mixed_yields_document_and_text() {
    let routed = route(assistant("mixed", "here is the answer", true), SESSION);
    assert!(matches!(routed, Routed::Both { .. }));
    assert_eq!(routed.text(), Some("here is the answer"));
    assert!(routed.document().is_some());
}

#[test]
fn mixed_without_document_is_text() {
    let routed = route(assistant("mixed", "just words", false), SESSION);
    assert_eq!(routed, Routed::Text("just words".to_string()));
}

#[test]
fn text_response_yields_text_only() {
    let routed = route(assistant("text_response", "hello", true), SESSION);
    assert_eq!(routed, Routed::Text("hello".to_string()));
}

#[test]
fn type_match_is_case_insensitive() {
    let routed = route(assistant("Annotation", "", true), SESSION);
    assert!(routed.document().is_some());
}

#[test]
fn empty_text_response_is_ignored() {
    assert_eq!(route(assistant("text_response", "", false), SESSION), Routed::Ignored);
}

#[test]
fn unknown_type_is_ignored() {
    assert_eq!(route(assistant("text_with_image", "hi", true), SESSION), Routed::Ignored);
}

#[test]
fn other_session_is_ignored() {
    assert_eq!(route(assistant("annotation", "", true), "another-session"), Routed::Ignored);
}

#[test]
fn user_role_is_ignored() {
    let mut m = assistant("annotation", "", true);
    m.role = "user".to_string();
    assert_eq!(route(m, SESSION), Routed::Ignored);
}

#[test]
fn missing_metadata_is_ignored() {
    let mut m = assistant("annotation", "", true);
    m.metadata = None;
    assert_eq!(route(m, SESSION), Routed::Ignored);
}
