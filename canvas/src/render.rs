//! Rendering: paints a display list to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Geometry is decided upstream in [`crate::display`]; here every primitive
//! is mapped to colors and `Canvas2D` calls. It does not mutate any
//! application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::{Camera, Point};
use crate::display::{Outline, Paint, Primitive};
use crate::doc::ChairKind;
use crate::geom::Placement;
use crate::input::SelectionRect;

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;

/// Alpha applied to the read-only background layer.
const BACKGROUND_ALPHA: f64 = 0.35;

const ACCENT: &str = "#1E90FF";
const INK: &str = "#2B2B2B";

/// Draw a frame.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    primitives: &[Primitive],
    camera: &Camera,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.scale(camera.zoom, camera.zoom)?;
    ctx.translate(-camera.x, -camera.y)?;

    for primitive in primitives {
        draw_primitive(ctx, primitive, camera.zoom)?;
    }
    Ok(())
}

// =============================================================
// Dispatch
// =============================================================

fn draw_primitive(ctx: &CanvasRenderingContext2d, primitive: &Primitive, zoom: f64) -> Result<(), JsValue> {
    match primitive {
        Primitive::Wall { corners, stroke_start, stroke_end, background, .. } => {
            with_layer(ctx, *background, || draw_wall(ctx, corners, *stroke_start, *stroke_end, zoom))
        }
        Primitive::Shape { placement, outline, paint, background, .. } => {
            with_layer(ctx, *background, || draw_shape(ctx, placement, *outline, *paint, zoom))
        }
        Primitive::Chair { placement, kind, background } => {
            with_layer(ctx, *background, || draw_chair(ctx, placement, *kind, zoom))
        }
        Primitive::Line { from, to, paint, background } => with_layer(ctx, *background, || {
            ctx.set_stroke_style_str(stroke_for(*paint));
            ctx.set_line_width(1.0 / zoom);
            ctx.begin_path();
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke();
            Ok(())
        }),
        Primitive::Arc { center, radius, start_deg, end_deg, background } => with_layer(ctx, *background, || {
            ctx.set_stroke_style_str(INK);
            ctx.set_line_width(1.0 / zoom);
            set_dash(ctx, SELECTION_DASH_PX / zoom)?;
            ctx.begin_path();
            ctx.arc(center.x, center.y, *radius, start_deg.to_radians(), end_deg.to_radians())?;
            ctx.stroke();
            clear_dash(ctx)
        }),
        Primitive::Label { at, text, background } => with_layer(ctx, *background, || draw_label(ctx, *at, text, INK, zoom)),
        Primitive::Dimension { from, to, text } => draw_dimension(ctx, *from, *to, text, zoom),
        Primitive::SelectionOutline { corners } => {
            ctx.save();
            ctx.set_stroke_style_str(ACCENT);
            ctx.set_line_width(1.0 / zoom);
            set_dash(ctx, SELECTION_DASH_PX / zoom)?;
            trace_polygon(ctx, corners);
            ctx.stroke();
            clear_dash(ctx)?;
            ctx.restore();
            Ok(())
        }
        Primitive::Handle { at, radius } => {
            ctx.save();
            ctx.set_fill_style_str("#fff");
            ctx.set_stroke_style_str(ACCENT);
            ctx.set_line_width(1.0 / zoom);
            ctx.begin_path();
            ctx.arc(at.x, at.y, *radius, 0.0, 2.0 * PI)?;
            ctx.fill();
            ctx.stroke();
            ctx.restore();
            Ok(())
        }
        Primitive::Marquee(m) => draw_marquee(ctx, *m, zoom),
    }
}

/// Run `f` inside a save/restore pair, dimmed when drawing the background layer.
fn with_layer(
    ctx: &CanvasRenderingContext2d,
    background: bool,
    f: impl FnOnce() -> Result<(), JsValue>,
) -> Result<(), JsValue> {
    ctx.save();
    if background {
        ctx.set_global_alpha(BACKGROUND_ALPHA);
    }
    let result = f();
    ctx.restore();
    result
}

// =============================================================
// Shape renderers
// =============================================================

fn draw_wall(
    ctx: &CanvasRenderingContext2d,
    corners: &[Point; 4],
    stroke_start: bool,
    stroke_end: bool,
    zoom: f64,
) -> Result<(), JsValue> {
    ctx.set_fill_style_str(fill_for(Paint::Wall));
    trace_polygon(ctx, corners);
    ctx.fill();

    // Long faces always; end caps only where no junction hides them.
    ctx.set_stroke_style_str(INK);
    ctx.set_line_width(1.0 / zoom);
    ctx.begin_path();
    let [sl, el, er, sr] = corners;
    ctx.move_to(sl.x, sl.y);
    ctx.line_to(el.x, el.y);
    ctx.move_to(sr.x, sr.y);
    ctx.line_to(er.x, er.y);
    if stroke_end {
        ctx.move_to(el.x, el.y);
        ctx.line_to(er.x, er.y);
    }
    if stroke_start {
        ctx.move_to(sl.x, sl.y);
        ctx.line_to(sr.x, sr.y);
    }
    ctx.stroke();
    Ok(())
}

fn draw_shape(
    ctx: &CanvasRenderingContext2d,
    placement: &Placement,
    outline: Outline,
    paint: Paint,
    zoom: f64,
) -> Result<(), JsValue> {
    if placement.width <= 0.0 || placement.height <= 0.0 {
        return Ok(());
    }
    translate_and_rotate(ctx, placement)?;
    let (hw, hh) = (placement.width / 2.0, placement.height / 2.0);

    ctx.begin_path();
    match outline {
        Outline::Rect => ctx.rect(-hw, -hh, placement.width, placement.height),
        Outline::Ellipse => ctx.ellipse(0.0, 0.0, hw, hh, 0.0, 0.0, 2.0 * PI)?,
        Outline::Semicircle => {
            ctx.ellipse(0.0, hh, hw, placement.height, 0.0, PI, 2.0 * PI)?;
            ctx.close_path();
        }
    }

    ctx.set_fill_style_str(fill_for(paint));
    ctx.fill();
    if matches!(paint, Paint::Ghost | Paint::InvalidGhost) {
        set_dash(ctx, SELECTION_DASH_PX / zoom)?;
    }
    ctx.set_stroke_style_str(stroke_for(paint));
    ctx.set_line_width(1.0 / zoom);
    ctx.stroke();
    Ok(())
}

fn draw_chair(ctx: &CanvasRenderingContext2d, placement: &Placement, kind: ChairKind, zoom: f64) -> Result<(), JsValue> {
    translate_and_rotate(ctx, placement)?;
    let (hw, hh) = (placement.width / 2.0, placement.height / 2.0);
    let fill = match kind {
        ChairKind::Chair => "#D9CBB8",
        ChairKind::Wheelchair => "#B8D4E8",
        ChairKind::Child => "#E8D8B8",
    };
    ctx.set_fill_style_str(fill);
    ctx.fill_rect(-hw, -hh, placement.width, placement.height);
    ctx.set_stroke_style_str(INK);
    ctx.set_line_width(1.0 / zoom);
    ctx.stroke_rect(-hw, -hh, placement.width, placement.height);

    // Backrest on the side away from the table.
    ctx.begin_path();
    ctx.move_to(-hw, -hh + placement.height * 0.2);
    ctx.line_to(hw, -hh + placement.height * 0.2);
    ctx.stroke();
    Ok(())
}

fn draw_label(ctx: &CanvasRenderingContext2d, at: Point, text: &str, color: &str, zoom: f64) -> Result<(), JsValue> {
    let font_px = (12.0 / zoom).clamp(6.0, 48.0);
    ctx.set_fill_style_str(color);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font(&format!("{font_px:.1}px sans-serif"));
    ctx.fill_text(text, at.x, at.y)?;
    Ok(())
}

fn draw_dimension(ctx: &CanvasRenderingContext2d, from: Point, to: Point, text: &str, zoom: f64) -> Result<(), JsValue> {
    let d = to.sub(from);
    let len = d.length();
    if len <= f64::EPSILON {
        return Ok(());
    }
    let tick = Point::new(-d.y / len, d.x / len).scale(4.0 / zoom);

    ctx.save();
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(1.0 / zoom);
    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    for p in [from, to] {
        ctx.move_to(p.x - tick.x, p.y - tick.y);
        ctx.line_to(p.x + tick.x, p.y + tick.y);
    }
    ctx.stroke();

    let mid = from.lerp(to, 0.5);
    draw_label(ctx, mid, text, ACCENT, zoom)?;
    ctx.restore();
    Ok(())
}

fn draw_marquee(ctx: &CanvasRenderingContext2d, marquee: SelectionRect, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    set_dash(ctx, SELECTION_DASH_PX / zoom)?;
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_fill_style_str("rgba(30, 144, 255, 0.12)");
    ctx.set_line_width(1.0 / zoom);
    ctx.fill_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    ctx.stroke_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    clear_dash(ctx)?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

fn fill_for(paint: Paint) -> &'static str {
    match paint {
        Paint::Wall => "#4A4A4A",
        Paint::Column => "#7A7A7A",
        Paint::Table => "#C9A27E",
        Paint::Bar => "#8B5E3C",
        Paint::Opening => "#FFFFFF",
        Paint::Fixture => INK,
        Paint::Ghost => "rgba(30, 144, 255, 0.25)",
        Paint::InvalidGhost => "rgba(220, 60, 60, 0.2)",
    }
}

fn stroke_for(paint: Paint) -> &'static str {
    match paint {
        Paint::Ghost => ACCENT,
        Paint::InvalidGhost => "#DC3C3C",
        _ => INK,
    }
}

/// Translate to the placement's center and rotate by its rotation angle.
fn translate_and_rotate(ctx: &CanvasRenderingContext2d, placement: &Placement) -> Result<(), JsValue> {
    let c = placement.center();
    ctx.translate(c.x, c.y)?;
    ctx.rotate(placement.rotation.to_radians())?;
    Ok(())
}

fn trace_polygon(ctx: &CanvasRenderingContext2d, points: &[Point]) {
    ctx.begin_path();
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            ctx.move_to(p.x, p.y);
        } else {
            ctx.line_to(p.x, p.y);
        }
    }
    ctx.close_path();
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash_world: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    dash_array.push(&dash_world.into());
    dash_array.push(&dash_world.into());
    ctx.set_line_dash(&dash_array)
}

fn clear_dash(ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
    ctx.set_line_dash(&js_sys::Array::new())
}
