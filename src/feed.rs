//! Line-oriented inputs for the driver: replay feeds and tool scripts.

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;

use canvas::color::Color;
use canvas::doc::AnnotationDocument;
use canvas::engine::{Action, EngineCore};
use canvas::geom::Point;
use canvas::input::{Button, Tool};
use canvas::message::{RemoteMessage, Routed, route};
use serde::Deserialize;

// =============================================================
// Replay feed
// =============================================================

/// Decode one replay line.
///
/// A line is either a bare document (`{"elements": [...]}`) or a message row.
/// Messages are routed for `session`; without one, each message is taken as
/// belonging to the session it names. Blank lines are ignored.
///
/// # Errors
///
/// Returns the JSON error when the line is neither shape.
pub fn parse_feed_line(line: &str, session: Option<&str>) -> Result<Routed, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Routed::Ignored);
    }
    let value: serde_json::Value = serde_json::from_str(line)?;
    if value.get("elements").is_some() {
        return Ok(Routed::Document(serde_json::from_value(value)?));
    }
    let message: RemoteMessage = serde_json::from_value(value)?;
    let session = session.map_or_else(|| message.session_id.clone(), str::to_owned);
    Ok(route(message, &session))
}

// =============================================================
// Tool scripts
// =============================================================

/// One scripted interaction, as a JSON object tagged by `op`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ScriptStep {
    Tool { tool: Tool },
    Color { color: Color },
    Width { width: f64 },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    /// Replace the content of the text field being edited.
    Text { content: String },
    /// End editing of the current text field.
    Blur,
    Delete,
    Deselect,
    Clear,
    /// Render a remote document on top of the drawing.
    Document { document: AnnotationDocument },
}

/// Decode one script line. Blank lines and `#` comments yield `None`.
///
/// # Errors
///
/// Returns the JSON error for a malformed step.
pub fn parse_script_line(line: &str) -> Result<Option<ScriptStep>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Apply one step to the engine and return what it reported.
pub fn apply_step(core: &mut EngineCore, step: ScriptStep) -> Vec<Action> {
    match step {
        ScriptStep::Tool { tool } => core.set_tool(tool),
        ScriptStep::Color { color } => {
            core.set_color(color);
            Vec::new()
        }
        ScriptStep::Width { width } => {
            core.set_stroke_width(width);
            Vec::new()
        }
        ScriptStep::Down { x, y } => core.on_pointer_down(Point::new(x, y), Button::Primary),
        ScriptStep::Move { x, y } => core.on_pointer_move(Point::new(x, y)),
        ScriptStep::Up { x, y } => core.on_pointer_up(Point::new(x, y), Button::Primary),
        ScriptStep::Text { content } => match core.tools.editing() {
            Some(id) => core.set_text(&id, &content),
            None => {
                tracing::warn!("text step with no field being edited");
                Vec::new()
            }
        },
        ScriptStep::Blur => match core.tools.editing() {
            Some(id) => core.blur_text(&id),
            None => Vec::new(),
        },
        ScriptStep::Delete => core.delete_selected(),
        ScriptStep::Deselect => core.tools.deselect(&mut core.surface),
        ScriptStep::Clear => core.clear_all(),
        ScriptStep::Document { document } => {
            let report = core.render(&document);
            report.added.into_iter().map(|id| Action::ElementAdded { id }).collect()
        }
    }
}
