//! Shared numeric constants for the canvas crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Minimum distance in pixels at which a thin stroke still counts as hit.
pub const HIT_SLOP_PX: f64 = 3.0;

// ── Text layout ─────────────────────────────────────────────────

/// Average glyph advance as a fraction of the font size.
pub const GLYPH_ADVANCE_EM: f64 = 0.6;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_EM: f64 = 1.25;

/// Minimum width of an editable text field in pixels.
pub const TEXT_FIELD_MIN_WIDTH: f64 = 100.0;

/// Extra font size per unit of tool stroke width for placed text.
pub const TEXT_SIZE_PER_STROKE: f64 = 2.0;

// ── Strokes ─────────────────────────────────────────────────────

/// Dash pattern for dashed strokes, in multiples of the stroke width (on, off).
pub const DASH_PATTERN: [f64; 2] = [4.0, 2.0];

/// Dash segment length of the selection outline in pixels.
pub const SELECTION_DASH_PX: f64 = 4.0;

/// Gap between a selected element and its outline in pixels.
pub const SELECTION_PADDING_PX: f64 = 3.0;
