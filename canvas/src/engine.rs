use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::calibration::{GRID_HEIGHT, GRID_WIDTH, grid_document, marker_document};
use crate::color::Color;
use crate::doc::{AnnotationDocument, AnnotationElement};
use crate::geom::Point;
use crate::inbox::{DocumentInbox, DocumentPoster};
use crate::input::{Button, Key, Modifiers, Shortcut, Tool};
use crate::paint;
use crate::render::{CaptureFilter, RenderReport, Renderer, capture};
use crate::style::StyleDefaults;
use crate::surface::{ElementId, Surface, Visual};
use crate::tools::ToolManager;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A local visual appeared (preview, stroke or text field).
    ElementAdded { id: ElementId },
    /// A local gesture finished; `element` describes the result.
    ElementCommitted { id: ElementId, element: AnnotationElement },
    ElementMoved { id: ElementId, origin: Point },
    ElementDeleted { id: ElementId },
    SelectionChanged(Option<ElementId>),
    /// The host should open an editor over text field `id`.
    EditTextRequested { id: ElementId, text: String, select_all: bool },
    /// Show or hide the whole overlay window.
    ToggleOverlay,
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub surface: Surface,
    /// Calibration layer, drawn under `surface` and never hit-tested.
    pub guides: Surface,
    pub renderer: Renderer,
    pub tools: ToolManager,
    poster: DocumentPoster,
    inbox: DocumentInbox,
    grid_visible: bool,
    markers_visible: bool,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(StyleDefaults::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(style: StyleDefaults) -> Self {
        let (poster, inbox) = DocumentInbox::channel();
        Self {
            surface: Surface::new(),
            guides: Surface::new(),
            renderer: Renderer::new(style.clone()),
            tools: ToolManager::new(style),
            poster,
            inbox,
            grid_visible: false,
            markers_visible: false,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }

    // --- Data inputs ---

    /// Paint a document on top of the current annotations.
    pub fn render(&mut self, doc: &AnnotationDocument) -> RenderReport {
        self.renderer.render(&mut self.surface, doc)
    }

    /// Remove every annotation, remote and local. Guides stay.
    pub fn clear(&mut self) {
        self.renderer.clear(&mut self.surface);
        self.tools.reset();
        tracing::debug!("annotations cleared");
    }

    /// A handle other tasks use to queue documents for [`EngineCore::pump`].
    #[must_use]
    pub fn poster(&self) -> DocumentPoster {
        self.poster.clone()
    }

    /// Render every queued document, in arrival order.
    pub fn pump(&mut self) -> RenderReport {
        let mut report = RenderReport::default();
        for doc in self.inbox.drain() {
            let r = self.renderer.render(&mut self.surface, &doc);
            report.added.extend(r.added);
            report.skipped += r.skipped;
        }
        report
    }

    /// Describe the current annotations as a document.
    #[must_use]
    pub fn capture(&self, filter: CaptureFilter) -> AnnotationDocument {
        capture(&self.surface, filter, &self.tools.style().text_placeholder)
    }

    // --- Tool settings ---

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.tools.set_tool(&mut self.surface, tool)
    }

    pub fn set_color(&mut self, color: Color) {
        self.tools.set_color(color);
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.tools.set_stroke_width(width);
    }

    pub fn set_text(&mut self, id: &ElementId, content: &str) -> Vec<Action> {
        self.tools.set_text(&mut self.surface, id, content)
    }

    pub fn blur_text(&mut self, id: &ElementId) -> Vec<Action> {
        self.tools.blur_text(&mut self.surface, id)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        self.tools.on_pointer_down(&mut self.surface, pt, button)
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        self.tools.on_pointer_move(&mut self.surface, pt)
    }

    pub fn on_pointer_up(&mut self, pt: Point, button: Button) -> Vec<Action> {
        self.tools.on_pointer_up(&mut self.surface, pt, button)
    }

    /// Handle a key press. Only global shortcuts do anything.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let Some(shortcut) = Shortcut::from_key(key, modifiers) else {
            return Vec::new();
        };
        tracing::debug!(?shortcut, "shortcut");
        match shortcut {
            Shortcut::ToggleOverlay => vec![Action::ToggleOverlay],
            Shortcut::Clear => self.clear_all(),
            Shortcut::ToggleGrid => {
                self.toggle_grid();
                vec![Action::RenderNeeded]
            }
            Shortcut::DeleteSelected => self.delete_selected(),
            Shortcut::Deselect => self.tools.deselect(&mut self.surface),
        }
    }

    // --- Direct operations ---

    pub fn delete_selected(&mut self) -> Vec<Action> {
        self.tools.delete_selected(&mut self.surface)
    }

    pub fn clear_all(&mut self) -> Vec<Action> {
        self.tools.clear_all(&mut self.surface)
    }

    /// Show or hide the coordinate grid. Returns the new visibility.
    pub fn toggle_grid(&mut self) -> bool {
        self.grid_visible = !self.grid_visible;
        self.rebuild_guides();
        self.grid_visible
    }

    /// Show or hide the reference markers. Returns the new visibility.
    pub fn toggle_markers(&mut self) -> bool {
        self.markers_visible = !self.markers_visible;
        self.rebuild_guides();
        self.markers_visible
    }

    fn rebuild_guides(&mut self) {
        self.guides.clear();
        if self.grid_visible {
            self.renderer.render(&mut self.guides, &grid_document(GRID_WIDTH, GRID_HEIGHT));
        }
        if self.markers_visible {
            self.renderer.render(&mut self.guides, &marker_document());
        }
        tracing::debug!(grid = self.grid_visible, markers = self.markers_visible, "guides rebuilt");
    }

    // --- Queries ---

    #[must_use]
    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    #[must_use]
    pub fn markers_visible(&self) -> bool {
        self.markers_visible
    }

    /// Whether any guide layer is showing.
    #[must_use]
    pub fn guides_visible(&self) -> bool {
        self.grid_visible || self.markers_visible
    }

    /// The currently selected element, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.tools.selection()
    }

    /// Look up a visual by id.
    #[must_use]
    pub fn visual(&self, id: &ElementId) -> Option<&Visual> {
        self.surface.get(id)
    }
}

/// The full overlay engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, style: StyleDefaults) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        Ok(Self { canvas, ctx, core: EngineCore::new(style) })
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.viewport_width = width_css;
        self.core.viewport_height = height_css;
        self.core.dpr = dpr;
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
    }

    // --- Delegated data inputs ---

    pub fn render(&mut self, doc: &AnnotationDocument) -> RenderReport {
        self.core.render(doc)
    }

    pub fn clear(&mut self) {
        self.core.clear();
    }

    pub fn pump(&mut self) -> RenderReport {
        self.core.pump()
    }

    #[must_use]
    pub fn poster(&self) -> DocumentPoster {
        self.core.poster()
    }

    // --- Delegated input events ---

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(pt, button)
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(pt)
    }

    pub fn on_pointer_up(&mut self, pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(pt, button)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    // --- Paint ---

    /// Draw guides and annotations to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn paint(&self) -> Result<(), JsValue> {
        let guides = self.core.guides_visible().then_some(&self.core.guides);
        paint::draw(
            &self.ctx,
            guides,
            &self.core.surface,
            self.core.viewport_width,
            self.core.viewport_height,
            self.core.dpr,
        )
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.core.selection()
    }
}
