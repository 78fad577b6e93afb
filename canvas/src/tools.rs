//! Pointer-driven drawing tools.
//!
//! `ToolManager` owns the active tool, the current paint settings, the
//! selection and the gesture in progress. It edits a [`Surface`] it is handed
//! on every call and reports what happened as [`Action`]s for the host.
//!
//! Gestures follow press / move / release. Shapes are added to the surface at
//! press time as zero-size previews and reshaped on every move, so what the
//! user sees while dragging is exactly what gets committed on release. Text is
//! not a gesture: a press places a field and hands editing to the host.
//!
//! Every handler is total. Moves and releases without a press, secondary
//! buttons, and ids that have vanished from the surface are all no-ops.

#[cfg(test)]
#[path = "tools_test.rs"]
mod tools_test;

use crate::color::Color;
use crate::consts::{TEXT_FIELD_MIN_WIDTH, TEXT_SIZE_PER_STROKE};
use crate::doc::FontWeight;
use crate::engine::Action;
use crate::geom::Point;
use crate::hit::hit_test;
use crate::input::{Button, InputState, Tool};
use crate::render::element_for;
use crate::style::{LineCap, StyleDefaults};
use crate::surface::{Author, ElementId, Shape, Stroke, Surface, TextShape, Visual};

/// Interactive tool state.
#[derive(Debug, Clone)]
pub struct ToolManager {
    style: StyleDefaults,
    tool: Tool,
    color: Color,
    stroke_width: f64,
    input: InputState,
    selected: Option<ElementId>,
    /// Text field the host is currently editing.
    editing: Option<ElementId>,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new(StyleDefaults::default())
    }
}

impl ToolManager {
    #[must_use]
    pub fn new(style: StyleDefaults) -> Self {
        Self {
            color: style.tool_color,
            stroke_width: style.tool_stroke_width,
            style,
            tool: Tool::default(),
            input: InputState::Idle,
            selected: None,
            editing: None,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.selected
    }

    #[must_use]
    pub fn editing(&self) -> Option<ElementId> {
        self.editing
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn style(&self) -> &StyleDefaults {
        &self.style
    }

    // --- Settings ---

    /// Switch tools. A gesture in progress is finished as if released.
    pub fn set_tool(&mut self, surface: &mut Surface, tool: Tool) -> Vec<Action> {
        let actions = self.finish_gesture(surface);
        if self.tool != tool {
            tracing::debug!(from = self.tool.as_str(), to = tool.as_str(), "tool changed");
            self.tool = tool;
        }
        actions
    }

    /// Color for elements drawn from now on.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Stroke width for elements drawn from now on. Non-positive or
    /// non-finite widths are ignored.
    pub fn set_stroke_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.stroke_width = width;
        } else {
            tracing::warn!(width, "ignoring invalid stroke width");
        }
    }

    // --- Pointer events ---

    /// Pointer pressed at `pt`.
    pub fn on_pointer_down(&mut self, surface: &mut Surface, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        // A release we never saw; close that gesture out first.
        let mut actions = self.finish_gesture(surface);
        match self.tool {
            Tool::Select => actions.extend(self.press_select(surface, pt)),
            Tool::Pen => {
                let shape = Shape::Polyline { points: vec![pt], stroke: self.stroke(self.style.freehand_cap) };
                let id = surface.add(Visual::new(Point::default(), shape, Author::Local));
                self.input = InputState::DrawingStroke { id };
                actions.push(Action::ElementAdded { id });
            }
            Tool::Arrow | Tool::Circle | Tool::Rectangle => {
                let id = surface.add(self.preview(pt));
                self.input = InputState::DrawingShape { id, anchor: pt };
                actions.push(Action::ElementAdded { id });
            }
            Tool::Text => actions.extend(self.place_text(surface, pt)),
            Tool::Eraser => {
                self.input = InputState::Erasing;
                actions.extend(self.erase_at(surface, pt));
            }
        }
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Pointer moved to `pt`. Only has an effect during a gesture.
    pub fn on_pointer_move(&mut self, surface: &mut Surface, pt: Point) -> Vec<Action> {
        let mut actions = match self.input.clone() {
            InputState::Idle => return Vec::new(),
            InputState::DraggingSelection { id, offset } => {
                let origin = pt.minus(offset);
                if surface.move_to(&id, origin) {
                    vec![Action::ElementMoved { id, origin }]
                } else {
                    self.input = InputState::Idle;
                    Vec::new()
                }
            }
            InputState::DrawingStroke { id } => {
                match surface.get_mut(&id).map(|v| &mut v.shape) {
                    Some(Shape::Polyline { points, .. }) => points.push(pt),
                    _ => self.input = InputState::Idle,
                }
                Vec::new()
            }
            InputState::DrawingShape { id, anchor } => {
                match surface.get_mut(&id) {
                    Some(visual) => resize_preview(visual, anchor, pt),
                    None => self.input = InputState::Idle,
                }
                Vec::new()
            }
            InputState::Erasing => self.erase_at(surface, pt),
        };
        if self.input != InputState::Idle || !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Pointer released. Commits whatever the gesture produced.
    pub fn on_pointer_up(&mut self, surface: &mut Surface, _pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let mut actions = self.finish_gesture(surface);
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Text editing ---

    /// Replace the content of a text field being edited.
    pub fn set_text(&mut self, surface: &mut Surface, id: &ElementId, content: &str) -> Vec<Action> {
        match surface.get_mut(id).map(|v| &mut v.shape) {
            Some(Shape::Text(text)) => {
                text.content = content.to_string();
                vec![Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    /// A text field lost focus. Blank fields and untouched placeholders are
    /// removed; anything else is committed. Remote text is never touched.
    pub fn blur_text(&mut self, surface: &mut Surface, id: &ElementId) -> Vec<Action> {
        if self.editing == Some(*id) {
            self.editing = None;
        }
        let Some(visual) = surface.get(id) else {
            return Vec::new();
        };
        let Shape::Text(text) = &visual.shape else {
            return Vec::new();
        };
        if visual.author != Author::Local {
            return Vec::new();
        }
        if text.content.trim().is_empty() || text.content == self.style.text_placeholder {
            tracing::debug!(%id, "discarding empty text field");
            return self.remove(surface, id);
        }
        match element_for(visual, &self.style.text_placeholder) {
            Some(element) => vec![Action::ElementCommitted { id: *id, element }],
            None => Vec::new(),
        }
    }

    // --- Direct operations ---

    /// Remove the selected element, if any.
    pub fn delete_selected(&mut self, surface: &mut Surface) -> Vec<Action> {
        let Some(id) = self.selected else {
            return Vec::new();
        };
        if matches!(self.input, InputState::DraggingSelection { .. }) {
            self.input = InputState::Idle;
        }
        let mut actions = self.remove(surface, &id);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Remove every element on the surface.
    pub fn clear_all(&mut self, surface: &mut Surface) -> Vec<Action> {
        let mut actions: Vec<Action> = surface.ids().iter().map(|id| Action::ElementDeleted { id: *id }).collect();
        if self.selected.is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        surface.clear();
        self.reset();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Drop the selection.
    pub fn deselect(&mut self, surface: &mut Surface) -> Vec<Action> {
        self.select(surface, None)
    }

    /// Forget gesture, selection and editing state, e.g. after the surface
    /// was cleared elsewhere.
    pub fn reset(&mut self) {
        self.input = InputState::Idle;
        self.selected = None;
        self.editing = None;
    }

    // --- Internals ---

    fn press_select(&mut self, surface: &mut Surface, pt: Point) -> Vec<Action> {
        let hit = hit_test(surface, pt);
        let actions = self.select(surface, hit.map(|h| h.id));
        if let Some(hit) = hit
            && let Some(visual) = surface.get(&hit.id)
        {
            self.input = InputState::DraggingSelection { id: hit.id, offset: pt.minus(visual.origin) };
        }
        actions
    }

    fn select(&mut self, surface: &mut Surface, id: Option<ElementId>) -> Vec<Action> {
        if self.selected == id {
            return Vec::new();
        }
        if let Some(prev) = self.selected
            && let Some(v) = surface.get_mut(&prev)
        {
            v.selected = false;
        }
        if let Some(next) = id
            && let Some(v) = surface.get_mut(&next)
        {
            v.selected = true;
        }
        self.selected = id;
        vec![Action::SelectionChanged(id), Action::RenderNeeded]
    }

    fn place_text(&mut self, surface: &mut Surface, pt: Point) -> Vec<Action> {
        let mut actions = match self.editing {
            Some(prev) => self.blur_text(surface, &prev),
            None => Vec::new(),
        };
        let text = TextShape {
            content: self.style.text_placeholder.clone(),
            font_size: self.style.default_font_size + TEXT_SIZE_PER_STROKE * self.stroke_width,
            weight: FontWeight::Normal,
            max_width: self.style.default_max_width,
            min_width: TEXT_FIELD_MIN_WIDTH,
            color: self.color,
        };
        let id = surface.add(Visual::new(pt, Shape::Text(text), Author::Local));
        self.editing = Some(id);
        actions.push(Action::ElementAdded { id });
        actions.push(Action::EditTextRequested { id, text: self.style.text_placeholder.clone(), select_all: true });
        actions
    }

    /// Remove the topmost element under `pt`.
    fn erase_at(&mut self, surface: &mut Surface, pt: Point) -> Vec<Action> {
        match hit_test(surface, pt) {
            Some(hit) => self.remove(surface, &hit.id),
            None => Vec::new(),
        }
    }

    fn remove(&mut self, surface: &mut Surface, id: &ElementId) -> Vec<Action> {
        if surface.remove(id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::ElementDeleted { id: *id }];
        if self.selected == Some(*id) {
            self.selected = None;
            actions.push(Action::SelectionChanged(None));
        }
        if self.editing == Some(*id) {
            self.editing = None;
        }
        actions
    }

    /// End the current gesture as if the pointer had been released.
    fn finish_gesture(&mut self, surface: &mut Surface) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::Erasing | InputState::DraggingSelection { .. } => Vec::new(),
            InputState::DrawingStroke { id } => {
                let too_short = match surface.get(&id).map(|v| &v.shape) {
                    Some(Shape::Polyline { points, .. }) => points.len() < 2,
                    _ => return Vec::new(),
                };
                if too_short {
                    tracing::debug!(%id, "dropping stroke without movement");
                    return self.remove(surface, &id);
                }
                self.commit(surface, id)
            }
            InputState::DrawingShape { id, .. } => self.commit(surface, id),
        }
    }

    fn commit(&self, surface: &Surface, id: ElementId) -> Vec<Action> {
        let Some(visual) = surface.get(&id) else {
            return Vec::new();
        };
        match element_for(visual, &self.style.text_placeholder) {
            Some(element) => {
                tracing::debug!(%id, kind = element.kind().as_str(), "gesture committed");
                vec![Action::ElementCommitted { id, element }]
            }
            None => Vec::new(),
        }
    }

    fn stroke(&self, cap: LineCap) -> Stroke {
        Stroke { color: self.color, width: self.stroke_width, dashed: false, cap }
    }

    /// Zero-size preview for the active shape tool, anchored at `pt`.
    fn preview(&self, pt: Point) -> Visual {
        let stroke = self.stroke(LineCap::Butt);
        let (origin, shape) = match self.tool {
            Tool::Arrow => (
                Point::default(),
                Shape::Arrow {
                    from: pt,
                    to: pt,
                    head_length: self.style.arrow_head_length,
                    head_angle: self.style.arrow_head_radians(),
                    stroke,
                },
            ),
            Tool::Circle => (pt, Shape::Circle { radius: 0.0, stroke, fill: None }),
            _ => (pt, Shape::Rect { width: 0.0, height: 0.0, stroke, fill: None }),
        };
        Visual::new(origin, shape, Author::Local)
    }
}

/// Reshape a preview so it spans from `anchor` to `pt`.
fn resize_preview(visual: &mut Visual, anchor: Point, pt: Point) {
    match &mut visual.shape {
        Shape::Arrow { to, .. } => *to = pt.minus(visual.origin),
        Shape::Circle { radius, .. } => {
            let r = anchor.distance(pt);
            *radius = r;
            visual.origin = Point::new(anchor.x - r, anchor.y - r);
        }
        Shape::Rect { width, height, .. } => {
            *width = (pt.x - anchor.x).abs();
            *height = (pt.y - anchor.y).abs();
            visual.origin = Point::new(anchor.x.min(pt.x), anchor.y.min(pt.y));
        }
        Shape::Text(_) | Shape::Line { .. } | Shape::Polyline { .. } => {}
    }
}
