//! 2D plan view: entity proxies as canvas shapes.

#[cfg(test)]
#[path = "plan_test.rs"]
mod plan_test;

use std::collections::HashMap;

use tracing::debug;

use crate::doc::{Bounds, Change, DocStore, Entity, ObjectId};
use crate::geom::{Edge, Vertex, cm_to_px};
use crate::view::View;

/// Handle to a shape on a [`Surface2d`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

/// Fill and stroke of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub opacity: f64,
    /// Draw selection chrome (outline and side handles).
    pub selected: bool,
}

impl ShapeStyle {
    pub const TERRAIN: ShapeStyle = ShapeStyle { fill: "lightgreen", stroke: "green", opacity: 1.0, selected: false };
    pub const GHOST: ShapeStyle = ShapeStyle { fill: "lightgreen", stroke: "green", opacity: 0.5, selected: false };
    pub const WALL: ShapeStyle = ShapeStyle { fill: "black", stroke: "black", opacity: 1.0, selected: false };
    pub const RUBBER_BAND: ShapeStyle = ShapeStyle { fill: "black", stroke: "black", opacity: 0.6, selected: false };

    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// A drawable on the 2D surface, in plan coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape2d {
    Rect { center: Vertex, width: f64, height: f64, style: ShapeStyle },
    Line { edge: Edge, width: f64, style: ShapeStyle },
    Label { origin: Vertex, width: f64, height: f64, text: String, visible: bool },
}

impl Shape2d {
    /// Rectangle covering `bounds`.
    #[must_use]
    pub fn rect(bounds: &Bounds, style: ShapeStyle) -> Self {
        Self::Rect { center: bounds.center(), width: bounds.width(), height: bounds.height(), style }
    }
}

/// The 2D rendering collaborator.
pub trait Surface2d {
    /// Add a shape on top of everything already drawn.
    fn add_shape(&mut self, shape: Shape2d) -> ShapeId;

    /// Replace a shape's geometry and style, keeping its place in the draw order.
    fn update_shape(&mut self, id: ShapeId, shape: Shape2d);

    fn remove_shape(&mut self, id: ShapeId);

    /// Whether the shape reacts to pointer input.
    fn set_interactive(&mut self, id: ShapeId, interactive: bool);

    /// Ask for a repaint at the next opportunity.
    fn request_render(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
struct Retained {
    id: ShapeId,
    shape: Shape2d,
    interactive: bool,
}

/// Retained-mode surface that keeps shapes in draw order.
#[derive(Debug, Default)]
pub struct MemorySurface2d {
    shapes: Vec<Retained>,
    next_id: u64,
    render_requests: usize,
}

impl MemorySurface2d {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&Shape2d> {
        self.shapes.iter().find(|r| r.id == id).map(|r| &r.shape)
    }

    #[must_use]
    pub fn is_interactive(&self, id: ShapeId) -> bool {
        self.shapes.iter().any(|r| r.id == id && r.interactive)
    }

    /// Shapes bottom first.
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape2d)> {
        self.shapes.iter().map(|r| (r.id, &r.shape))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn render_requests(&self) -> usize {
        self.render_requests
    }
}

impl Surface2d for MemorySurface2d {
    fn add_shape(&mut self, shape: Shape2d) -> ShapeId {
        self.next_id += 1;
        let id = ShapeId(self.next_id);
        self.shapes.push(Retained { id, shape, interactive: true });
        id
    }

    fn update_shape(&mut self, id: ShapeId, shape: Shape2d) {
        if let Some(r) = self.shapes.iter_mut().find(|r| r.id == id) {
            r.shape = shape;
        }
    }

    fn remove_shape(&mut self, id: ShapeId) {
        self.shapes.retain(|r| r.id != id);
    }

    fn set_interactive(&mut self, id: ShapeId, interactive: bool) {
        if let Some(r) = self.shapes.iter_mut().find(|r| r.id == id) {
            r.interactive = interactive;
        }
    }

    fn request_render(&mut self) {
        self.render_requests += 1;
    }
}

/// Keeps one shape per entity on a [`Surface2d`].
pub struct PlanView<P: Surface2d> {
    surface: P,
    proxies: HashMap<ObjectId, ShapeId>,
    selected: Option<ObjectId>,
}

impl<P: Surface2d> PlanView<P> {
    #[must_use]
    pub fn new(surface: P) -> Self {
        Self { surface, proxies: HashMap::new(), selected: None }
    }

    #[must_use]
    pub fn surface(&self) -> &P {
        &self.surface
    }

    /// Direct access for tool overlays (ghosts, rubber bands, labels).
    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    /// The shape standing for an entity.
    #[must_use]
    pub fn proxy(&self, id: &ObjectId) -> Option<ShapeId> {
        self.proxies.get(id).copied()
    }

    /// Move the selection highlight to `id`.
    pub fn set_selected(&mut self, doc: &DocStore, id: Option<ObjectId>) {
        let previous = std::mem::replace(&mut self.selected, id);
        if previous == id {
            return;
        }
        for changed in [previous, id].into_iter().flatten() {
            self.refresh(doc, &changed);
        }
        self.surface.request_render();
    }

    /// Enable or disable pointer interaction on every entity proxy.
    pub fn set_interactive_all(&mut self, interactive: bool) {
        for shape in self.proxies.values() {
            self.surface.set_interactive(*shape, interactive);
        }
    }

    /// Show a terrain at in-progress bounds without touching the store.
    pub fn preview_terrain(&mut self, id: &ObjectId, bounds: &Bounds) {
        let Some(shape) = self.proxy(id) else {
            return;
        };
        let style = ShapeStyle::TERRAIN.with_selected(self.selected == Some(*id));
        self.surface.update_shape(shape, Shape2d::rect(bounds, style));
        self.surface.request_render();
    }

    /// Redraw an entity's proxy from the store.
    pub fn refresh(&mut self, doc: &DocStore, id: &ObjectId) {
        if let (Some(shape), Some(entity)) = (self.proxy(id), doc.get(id)) {
            let drawn = self.shape_for(entity);
            self.surface.update_shape(shape, drawn);
        }
    }

    fn shape_for(&self, entity: &Entity) -> Shape2d {
        let selected = self.selected == Some(entity.id());
        match entity {
            Entity::Terrain(t) => Shape2d::rect(&t.bounds(), ShapeStyle::TERRAIN.with_selected(selected)),
            Entity::Wall(w) => Shape2d::Line {
                edge: w.edge,
                width: cm_to_px(w.thickness),
                style: ShapeStyle::WALL.with_selected(selected),
            },
        }
    }
}

impl<P: Surface2d> View for PlanView<P> {
    fn apply(&mut self, doc: &DocStore, change: &Change) {
        match change {
            Change::Added(id) => {
                let Some(entity) = doc.get(id) else {
                    return;
                };
                let drawn = self.shape_for(entity);
                let shape = self.surface.add_shape(drawn);
                if let Some(stale) = self.proxies.insert(*id, shape) {
                    self.surface.remove_shape(stale);
                }
                debug!(%id, ?shape, "plan proxy added");
            }
            Change::Updated(id) => self.refresh(doc, id),
            Change::Removed(id) => {
                if let Some(shape) = self.proxies.remove(id) {
                    self.surface.remove_shape(shape);
                    debug!(%id, ?shape, "plan proxy removed");
                }
                if self.selected == Some(*id) {
                    self.selected = None;
                }
            }
        }
        self.surface.request_render();
    }

    fn proxy_count(&self) -> usize {
        self.proxies.len()
    }
}
