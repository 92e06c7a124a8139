//! Wall drawing: a chain of segments laid down click by click, with a rubber
//! band following the pointer from the last point.
//!
//! Every click commits the rubber band (if it has length) and starts a new
//! one from its end. Enter turns the committed chain into walls; Escape drops
//! it. Both exits run through the same teardown, so the overlay never outlives
//! the session.

#[cfg(test)]
#[path = "wall_test.rs"]
mod wall_test;

use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::doc::Wall;
use crate::geom::{Edge, Vertex, cm_to_px};
use crate::view::plan::{Shape2d, ShapeId, ShapeStyle, Surface2d};

/// Guidance shown while walls are being drawn.
pub const WALL_GUIDANCE: &str = "Click to add wall points. Press Enter to finish or Esc to cancel.";

/// Which snapping rule decided a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    /// Aligned with the last point on at least one axis.
    Axis,
    /// Landed on the start of a committed segment.
    Endpoint,
}

/// A pointer position after snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub point: Vertex,
    pub kind: Option<SnapKind>,
}

/// Snap a free endpoint.
///
/// Each axis within `threshold` of `last` is aligned to it first. Then, if the
/// result lies within `threshold` of an anchor, the anchor wins.
#[must_use]
pub fn snap(free: Vertex, last: Option<Vertex>, anchors: &[Vertex], threshold: f64) -> Snapped {
    let mut point = free;
    let mut kind = None;

    if let Some(last) = last {
        if (free.x - last.x).abs() < threshold {
            point.x = last.x;
            kind = Some(SnapKind::Axis);
        }
        if (free.y - last.y).abs() < threshold {
            point.y = last.y;
            kind = Some(SnapKind::Axis);
        }
    }

    if let Some(anchor) = anchors.iter().find(|a| a.distance(point) < threshold) {
        return Snapped { point: *anchor, kind: Some(SnapKind::Endpoint) };
    }

    Snapped { point, kind }
}

/// What a click did to the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Click {
    /// First point placed; the rubber band starts here.
    Started(Vertex),
    /// The rubber band was committed as a segment.
    Committed(Edge),
    /// The rubber band had no length and was kept open.
    Rejected,
}

#[derive(Debug)]
struct Band {
    edge: Edge,
    shape: ShapeId,
}

/// An in-progress wall chain.
#[derive(Debug)]
pub struct WallSession {
    committed: Vec<(Edge, ShapeId)>,
    band: Option<Band>,
    snap_threshold: f64,
    thickness_cm: f64,
    height_cm: f64,
}

impl WallSession {
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        debug!("wall drawing started");
        Self {
            committed: Vec::new(),
            band: None,
            snap_threshold: config.snap_threshold,
            thickness_cm: config.wall_thickness_cm,
            height_cm: config.wall_height_cm,
        }
    }

    /// Segments committed so far, in drawing order.
    pub fn segments(&self) -> impl Iterator<Item = &Edge> {
        self.committed.iter().map(|(e, _)| e)
    }

    /// The segment following the pointer, if a first point was placed.
    #[must_use]
    pub fn rubber_band(&self) -> Option<Edge> {
        self.band.as_ref().map(|b| b.edge)
    }

    fn anchors(&self) -> Vec<Vertex> {
        self.committed.iter().map(|(e, _)| e.start).collect()
    }

    fn snap(&self, free: Vertex) -> Snapped {
        let last = self.band.as_ref().map(|b| b.edge.start);
        snap(free, last, &self.anchors(), self.snap_threshold)
    }

    /// Move the rubber band's free end to the snapped pointer.
    pub fn pointer_move<P: Surface2d>(&mut self, surface: &mut P, at: Vertex) {
        let snapped = self.snap(at);
        let width = cm_to_px(self.thickness_cm);
        if let Some(band) = &mut self.band {
            band.edge.end = snapped.point;
            surface.update_shape(band.shape, Shape2d::Line { edge: band.edge, width, style: ShapeStyle::RUBBER_BAND });
            surface.request_render();
        }
    }

    /// Handle a click (pointer release) at `at`.
    pub fn click<P: Surface2d>(&mut self, surface: &mut P, at: Vertex) -> Click {
        let width = cm_to_px(self.thickness_cm);
        let snapped = self.snap(at);

        let Some(band) = self.band.take() else {
            let edge = Edge::new(snapped.point, snapped.point);
            let shape = surface.add_shape(Shape2d::Line { edge, width, style: ShapeStyle::RUBBER_BAND });
            self.band = Some(Band { edge, shape });
            surface.request_render();
            return Click::Started(snapped.point);
        };

        let edge = Edge::new(band.edge.start, snapped.point);
        if edge.is_degenerate() {
            warn!(x = at.x, y = at.y, "zero-length wall segment ignored");
            self.band = Some(Band { edge, shape: band.shape });
            return Click::Rejected;
        }

        surface.update_shape(band.shape, Shape2d::Line { edge, width, style: ShapeStyle::WALL });
        self.committed.push((edge, band.shape));

        let next = Edge::new(edge.end, edge.end);
        let shape = surface.add_shape(Shape2d::Line { edge: next, width, style: ShapeStyle::RUBBER_BAND });
        self.band = Some(Band { edge: next, shape });
        surface.request_render();
        debug!(segments = self.committed.len(), "wall segment committed");
        Click::Committed(edge)
    }

    /// Drop the overlay and return the walls to add, in drawing order.
    pub fn confirm<P: Surface2d>(self, surface: &mut P) -> Vec<Wall> {
        let (thickness, height) = (self.thickness_cm, self.height_cm);
        let walls: Vec<Wall> = self
            .finish(surface)
            .into_iter()
            .map(|edge| Wall { thickness, height, ..Wall::new(edge) })
            .collect();
        debug!(walls = walls.len(), "wall drawing confirmed");
        walls
    }

    /// Drop the overlay and the chain.
    pub fn cancel<P: Surface2d>(self, surface: &mut P) {
        let discarded = self.finish(surface).len();
        debug!(discarded, "wall drawing cancelled");
    }

    fn finish<P: Surface2d>(self, surface: &mut P) -> Vec<Edge> {
        if let Some(band) = self.band {
            surface.remove_shape(band.shape);
        }
        let edges = self
            .committed
            .into_iter()
            .map(|(edge, shape)| {
                surface.remove_shape(shape);
                edge
            })
            .collect();
        surface.request_render();
        edges
    }
}
