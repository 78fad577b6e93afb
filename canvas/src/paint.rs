//! Painting: draws surfaces to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads surfaces and produces pixels; it never mutates them.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::paint`]) handles the result.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{DASH_PATTERN, SELECTION_DASH_PX, SELECTION_PADDING_PX};
use crate::doc::FontWeight;
use crate::geom::Point;
use crate::surface::{Shape, Stroke, Surface, TextShape, Visual};

/// Selection outline color.
const SELECTION_COLOR: &str = "#1E90FF";

/// Draw the guide layer (if shown) and then the annotation surface.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    guides: Option<&Surface>,
    surface: &Surface,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);

    if let Some(guides) = guides {
        draw_surface(ctx, guides)?;
    }
    draw_surface(ctx, surface)?;

    for (_, visual) in surface.iter().filter(|(_, v)| v.selected) {
        draw_selection(ctx, visual)?;
    }
    Ok(())
}

fn draw_surface(ctx: &CanvasRenderingContext2d, surface: &Surface) -> Result<(), JsValue> {
    for (_, visual) in surface.iter() {
        draw_visual(ctx, visual)?;
    }
    Ok(())
}

// =============================================================
// Shape dispatch
// =============================================================

fn draw_visual(ctx: &CanvasRenderingContext2d, visual: &Visual) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(visual.origin.x, visual.origin.y)?;
    match &visual.shape {
        Shape::Text(text) => draw_text(ctx, text)?,
        Shape::Rect { width, height, stroke, fill } => {
            ctx.begin_path();
            ctx.rect(0.0, 0.0, *width, *height);
            if let Some(fill) = fill {
                ctx.set_fill_style_str(&fill.to_css());
                ctx.fill();
            }
            stroke_path(ctx, stroke)?;
        }
        Shape::Circle { radius, stroke, fill } => {
            ctx.begin_path();
            ctx.arc(*radius, *radius, *radius, 0.0, TAU)?;
            if let Some(fill) = fill {
                ctx.set_fill_style_str(&fill.to_css());
                ctx.fill();
            }
            stroke_path(ctx, stroke)?;
        }
        Shape::Arrow { stroke, .. } | Shape::Line { stroke, .. } => {
            ctx.begin_path();
            for (a, b) in visual.shape.segments() {
                ctx.move_to(a.x, a.y);
                ctx.line_to(b.x, b.y);
            }
            stroke_path(ctx, stroke)?;
        }
        Shape::Polyline { points, stroke } => draw_polyline(ctx, points, stroke)?,
    }
    ctx.restore();
    Ok(())
}

fn draw_polyline(ctx: &CanvasRenderingContext2d, points: &[Point], stroke: &Stroke) -> Result<(), JsValue> {
    let Some((first, rest)) = points.split_first() else {
        return Ok(());
    };
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    if rest.is_empty() {
        // Zero-length segment so round caps still show a dot.
        ctx.line_to(first.x, first.y);
    }
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.set_line_join("round");
    stroke_path(ctx, stroke)
}

fn draw_text(ctx: &CanvasRenderingContext2d, text: &TextShape) -> Result<(), JsValue> {
    let layout = text.layout();
    let weight = match text.weight {
        FontWeight::Normal => "normal",
        FontWeight::Bold => "bold",
    };
    ctx.set_font(&format!("{weight} {:.0}px sans-serif", text.font_size));
    ctx.set_text_baseline("top");
    ctx.set_fill_style_str(&text.color.to_css());
    let mut y = 0.0;
    for line in &layout.lines {
        ctx.fill_text(line, 0.0, y)?;
        y += layout.line_height;
    }
    Ok(())
}

// =============================================================
// Stroke helpers
// =============================================================

fn stroke_path(ctx: &CanvasRenderingContext2d, stroke: &Stroke) -> Result<(), JsValue> {
    if stroke.width <= 0.0 || stroke.color.is_transparent() {
        return Ok(());
    }
    ctx.set_stroke_style_str(&stroke.color.to_css());
    ctx.set_line_width(stroke.width);
    ctx.set_line_cap(stroke.cap.as_css());
    if stroke.dashed {
        set_dash(ctx, DASH_PATTERN[0] * stroke.width, DASH_PATTERN[1] * stroke.width)?;
    }
    ctx.stroke();
    if stroke.dashed {
        ctx.set_line_dash(&js_sys::Array::new())?;
    }
    Ok(())
}

fn set_dash(ctx: &CanvasRenderingContext2d, on: f64, off: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    dash_array.push(&on.into());
    dash_array.push(&off.into());
    ctx.set_line_dash(&dash_array)
}

fn draw_selection(ctx: &CanvasRenderingContext2d, visual: &Visual) -> Result<(), JsValue> {
    let b = visual.bounds().inflate(SELECTION_PADDING_PX);
    ctx.save();
    set_dash(ctx, SELECTION_DASH_PX, SELECTION_DASH_PX)?;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(b.min.x, b.min.y, b.width(), b.height());
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}
