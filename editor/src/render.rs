//! Rendering: paints the retained plan shapes onto a browser 2D context.
//!
//! All painting onto a [`web_sys::CanvasRenderingContext2d`] happens here.
//! The plan view keeps shapes on a [`CanvasSurface`]; [`draw`] reads them back
//! in draw order and produces pixels. It does not mutate application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::Camera;
use crate::consts::{GRID_CELL, HANDLE_RADIUS_PX};
use crate::doc::Bounds;
use crate::geom::{Edge, Vertex};
use crate::hit::Side;
use crate::view::plan::{MemorySurface2d, Shape2d, ShapeId, ShapeStyle, Surface2d};

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;

const SELECTION_COLOR: &str = "#1E90FF";
const GRID_COLOR: &str = "#e5e5e5";
const LABEL_FILL: &str = "rgba(255, 255, 255, 0.9)";
const LABEL_TEXT: &str = "#333";

/// The browser-side 2D surface: retains shapes until the next paint.
#[derive(Debug, Default)]
pub struct CanvasSurface {
    shapes: MemorySurface2d,
    render_pending: bool,
}

impl CanvasSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Retained shapes in draw order.
    #[must_use]
    pub fn retained(&self) -> &MemorySurface2d {
        &self.shapes
    }

    /// Whether a repaint was requested since the last [`CanvasSurface::mark_rendered`].
    #[must_use]
    pub fn render_pending(&self) -> bool {
        self.render_pending
    }

    pub fn mark_rendered(&mut self) {
        self.render_pending = false;
    }
}

impl Surface2d for CanvasSurface {
    fn add_shape(&mut self, shape: Shape2d) -> ShapeId {
        self.shapes.add_shape(shape)
    }

    fn update_shape(&mut self, id: ShapeId, shape: Shape2d) {
        self.shapes.update_shape(id, shape);
    }

    fn remove_shape(&mut self, id: ShapeId) {
        self.shapes.remove_shape(id);
    }

    fn set_interactive(&mut self, id: ShapeId, interactive: bool) {
        self.shapes.set_interactive(id, interactive);
    }

    fn request_render(&mut self) {
        self.render_pending = true;
    }
}

/// Draw the plan: background grid, shapes bottom first, then selection chrome.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    shapes: &MemorySurface2d,
    camera: &Camera,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    // Layer 1: clear and set up transforms.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    // Layer 2: grid over the visible plan area.
    let top_left = camera.screen_to_world(Vertex::new(0.0, 0.0));
    let bottom_right = camera.screen_to_world(Vertex::new(viewport_w, viewport_h));
    draw_grid(ctx, top_left, bottom_right, camera.zoom);

    // Layer 3: shapes in draw order.
    for (_, shape) in shapes.shapes() {
        draw_shape(ctx, shape)?;
    }

    // Layer 4: selection chrome on top of everything.
    for (_, shape) in shapes.shapes() {
        match shape {
            Shape2d::Rect { center, width, height, style } if style.selected => {
                let b = Bounds {
                    left: center.x - width / 2.0,
                    top: center.y - height / 2.0,
                    right: center.x + width / 2.0,
                    bottom: center.y + height / 2.0,
                };
                draw_rect_selection(ctx, &b, camera.zoom)?;
            }
            Shape2d::Line { edge, style, .. } if style.selected => draw_line_selection(ctx, edge, camera.zoom)?,
            _ => {}
        }
    }

    Ok(())
}

fn draw_grid(ctx: &CanvasRenderingContext2d, top_left: Vertex, bottom_right: Vertex, zoom: f64) {
    ctx.save();
    ctx.set_stroke_style_str(GRID_COLOR);
    ctx.set_line_width(1.0 / zoom);
    ctx.begin_path();

    let mut x = (top_left.x / GRID_CELL).floor() * GRID_CELL;
    while x <= bottom_right.x {
        ctx.move_to(x, top_left.y);
        ctx.line_to(x, bottom_right.y);
        x += GRID_CELL;
    }
    let mut y = (top_left.y / GRID_CELL).floor() * GRID_CELL;
    while y <= bottom_right.y {
        ctx.move_to(top_left.x, y);
        ctx.line_to(bottom_right.x, y);
        y += GRID_CELL;
    }

    ctx.stroke();
    ctx.restore();
}

// =============================================================
// Shape renderers
// =============================================================

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape2d) -> Result<(), JsValue> {
    match shape {
        Shape2d::Rect { center, width, height, style } => {
            draw_rect(ctx, *center, *width, *height, style);
            Ok(())
        }
        Shape2d::Line { edge, width, style } => {
            draw_line(ctx, edge, *width, style);
            Ok(())
        }
        Shape2d::Label { origin, width, height, text, visible } => {
            if *visible {
                draw_label(ctx, *origin, *width, *height, text)?;
            }
            Ok(())
        }
    }
}

fn draw_rect(ctx: &CanvasRenderingContext2d, center: Vertex, width: f64, height: f64, style: &ShapeStyle) {
    ctx.save();
    ctx.set_global_alpha(style.opacity);
    let x = center.x - width / 2.0;
    let y = center.y - height / 2.0;

    ctx.set_fill_style_str(style.fill);
    ctx.fill_rect(x, y, width, height);

    ctx.set_stroke_style_str(style.stroke);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(x, y, width, height);
    ctx.restore();
}

fn draw_line(ctx: &CanvasRenderingContext2d, edge: &Edge, width: f64, style: &ShapeStyle) {
    ctx.save();
    ctx.set_global_alpha(style.opacity);
    ctx.set_stroke_style_str(style.stroke);
    ctx.set_line_width(width);
    ctx.set_line_cap("square");
    ctx.begin_path();
    ctx.move_to(edge.start.x, edge.start.y);
    ctx.line_to(edge.end.x, edge.end.y);
    ctx.stroke();
    ctx.restore();
}

fn draw_label(ctx: &CanvasRenderingContext2d, origin: Vertex, width: f64, height: f64, text: &str) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_fill_style_str(LABEL_FILL);
    ctx.fill_rect(origin.x, origin.y, width, height);
    ctx.set_stroke_style_str(LABEL_TEXT);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(origin.x, origin.y, width, height);

    ctx.set_fill_style_str(LABEL_TEXT);
    ctx.set_font("16px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(text, origin.x + width / 2.0, origin.y + height / 2.0)?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Selection
// =============================================================

fn set_dash(ctx: &CanvasRenderingContext2d, dash_world: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    dash_array.push(&dash_world.into());
    dash_array.push(&dash_world.into());
    ctx.set_line_dash(&dash_array)
}

fn draw_rect_selection(ctx: &CanvasRenderingContext2d, b: &Bounds, zoom: f64) -> Result<(), JsValue> {
    ctx.save();

    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);
    set_dash(ctx, SELECTION_DASH_PX / zoom)?;
    ctx.stroke_rect(b.left, b.top, b.width(), b.height());
    ctx.set_line_dash(&js_sys::Array::new())?;

    // Side handles only; corners do not resize.
    let handle_size_world = HANDLE_RADIUS_PX / zoom;
    ctx.set_fill_style_str("#fff");
    for side in Side::ALL {
        let pos = side.handle_point(b);
        ctx.fill_rect(
            pos.x - handle_size_world,
            pos.y - handle_size_world,
            handle_size_world * 2.0,
            handle_size_world * 2.0,
        );
        ctx.stroke_rect(
            pos.x - handle_size_world,
            pos.y - handle_size_world,
            handle_size_world * 2.0,
            handle_size_world * 2.0,
        );
    }

    ctx.restore();
    Ok(())
}

fn draw_line_selection(ctx: &CanvasRenderingContext2d, edge: &Edge, zoom: f64) -> Result<(), JsValue> {
    let handle_radius = (HANDLE_RADIUS_PX * 0.6) / zoom;

    ctx.save();
    ctx.set_fill_style_str("#fff");
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);

    for pt in [edge.start, edge.end] {
        ctx.begin_path();
        ctx.arc(pt.x, pt.y, handle_radius, 0.0, 2.0 * PI)?;
        ctx.fill();
        ctx.stroke();
    }

    ctx.restore();
    Ok(())
}
