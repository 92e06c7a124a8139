//! Terrain editing: side-handle resizing, dimension labels, and exact edge
//! lengths typed by the user.

#[cfg(test)]
#[path = "edit_test.rs"]
mod edit_test;

use serde::{Deserialize, Serialize};

use crate::consts::{LABEL_CHAR_WIDTH, LABEL_HEIGHT, LABEL_OFFSET, LABEL_PADDING, MIN_TERRAIN_CM};
use crate::doc::{Bounds, DocError, ObjectId, Terrain, TerrainPatch};
use crate::geom::{Edge, Vertex, cm_to_px, px_to_cm};
use crate::hit::Side;
use crate::view::plan::{Shape2d, ShapeId, Surface2d};

/// Which side of a terrain moves when an edge length is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeDirection {
    /// Grow or shrink toward the left; the right side stays put.
    Left,
    /// Grow or shrink toward the right; the left side stays put.
    Right,
    /// Grow or shrink upward; the bottom side stays put.
    Above,
    /// Grow or shrink downward; the top side stays put.
    Below,
}

impl ResizeDirection {
    /// The two choices offered for an edge: horizontal edges (0, 2) change
    /// the width, vertical edges (1, 3) change the height.
    #[must_use]
    pub fn choices(edge_index: usize) -> [Self; 2] {
        if edge_index % 2 == 0 { [Self::Left, Self::Right] } else { [Self::Above, Self::Below] }
    }

    fn keeps_far_side(self) -> bool {
        matches!(self, Self::Left | Self::Above)
    }
}

/// Dimension value shown for an edge, in whole plan pixels converted to cm.
#[must_use]
pub fn edge_value_cm(edge: &Edge) -> f64 {
    // Shave float noise so an exact pixel size does not round up.
    px_to_cm((edge.size() - 1e-6).ceil())
}

/// A dimension label next to one terrain edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    /// 0 top, 1 right, 2 bottom, 3 left.
    pub edge_index: usize,
    pub value_cm: f64,
    pub text: String,
    /// Top-left corner of the label box.
    pub origin: Vertex,
    pub width: f64,
    pub height: f64,
}

impl EdgeLabel {
    #[must_use]
    pub fn new(edge_index: usize, edge: &Edge) -> Self {
        let value_cm = edge_value_cm(edge);
        let text = format!("{value_cm} cm");
        #[allow(clippy::cast_precision_loss)]
        let width = text.chars().count() as f64 * LABEL_CHAR_WIDTH + LABEL_PADDING;
        // The side of the box facing the edge sits LABEL_OFFSET away from it.
        let c = edge.center();
        let origin = match edge_index {
            0 => c.offset(-width / 2.0, -LABEL_OFFSET - LABEL_HEIGHT),
            1 => c.offset(LABEL_OFFSET, -LABEL_HEIGHT / 2.0),
            2 => c.offset(-width / 2.0, LABEL_OFFSET),
            _ => c.offset(-LABEL_OFFSET - width, -LABEL_HEIGHT / 2.0),
        };
        Self {
            edge_index,
            value_cm,
            text,
            origin,
            width,
            height: LABEL_HEIGHT,
        }
    }

    #[must_use]
    pub fn contains(&self, p: Vertex) -> bool {
        p.x >= self.origin.x
            && p.x <= self.origin.x + self.width
            && p.y >= self.origin.y
            && p.y <= self.origin.y + self.height
    }

    fn shape(&self, visible: bool) -> Shape2d {
        Shape2d::Label {
            origin: self.origin,
            width: self.width,
            height: self.height,
            text: self.text.clone(),
            visible,
        }
    }
}

/// Labels for an outline, in edge order.
#[must_use]
pub fn edge_labels(edges: &[Edge; 4]) -> [EdgeLabel; 4] {
    [
        EdgeLabel::new(0, &edges[0]),
        EdgeLabel::new(1, &edges[1]),
        EdgeLabel::new(2, &edges[2]),
        EdgeLabel::new(3, &edges[3]),
    ]
}

/// Bounds after dragging `side` by `delta`, never thinner than the minimum terrain size.
#[must_use]
pub fn resize_bounds(orig: &Bounds, side: Side, delta: Vertex) -> Bounds {
    let min = cm_to_px(MIN_TERRAIN_CM);
    let mut b = *orig;
    match side {
        Side::Top => b.top = (orig.top + delta.y).min(orig.bottom - min),
        Side::Bottom => b.bottom = (orig.bottom + delta.y).max(orig.top + min),
        Side::Left => b.left = (orig.left + delta.x).min(orig.right - min),
        Side::Right => b.right = (orig.right + delta.x).max(orig.left + min),
    }
    b
}

/// Patch that gives a terrain exactly `bounds`.
#[must_use]
pub fn bounds_patch(bounds: &Bounds) -> TerrainPatch {
    let (width, height) = bounds.size_cm();
    TerrainPatch { width: Some(width), height: Some(height), center: Some(bounds.center()) }
}

/// Patch that sets one edge of `terrain` to `cm`.
///
/// Horizontal edges change the width, vertical edges the height. `Left` and
/// `Above` keep the far side fixed, `Right` and `Below` keep the near side
/// (left or top) fixed.
///
/// # Errors
///
/// Returns [`DocError::DegenerateGeometry`] if `cm` is not a positive number,
/// or [`DocError::InvalidEdge`] if `edge_index` is not 0 to 3.
pub fn edge_length_patch(
    terrain: &Terrain,
    edge_index: usize,
    direction: ResizeDirection,
    cm: f64,
) -> Result<TerrainPatch, DocError> {
    if edge_index > 3 {
        return Err(DocError::InvalidEdge { index: edge_index });
    }
    if !(cm.is_finite() && cm > 0.0) {
        return Err(DocError::DegenerateGeometry { reason: format!("edge length {cm} must be positive") });
    }
    let b = terrain.bounds();
    let half = cm_to_px(cm) / 2.0;
    let far = direction.keeps_far_side();
    let patch = if edge_index % 2 == 0 {
        let x = if far { b.right - half } else { b.left + half };
        TerrainPatch { width: Some(cm), center: Some(Vertex::new(x, terrain.center.y)), ..TerrainPatch::default() }
    } else {
        let y = if far { b.bottom - half } else { b.top + half };
        TerrainPatch { height: Some(cm), center: Some(Vertex::new(terrain.center.x, y)), ..TerrainPatch::default() }
    };
    Ok(patch)
}

/// Dimension labels attached to the selected terrain.
///
/// Owns one label shape per edge and removes them all on [`TerrainEditor::detach`].
#[derive(Debug)]
pub struct TerrainEditor {
    id: ObjectId,
    labels: [EdgeLabel; 4],
    shapes: [ShapeId; 4],
    visible: bool,
}

impl TerrainEditor {
    /// Add labels for `terrain`.
    pub fn attach<P: Surface2d>(surface: &mut P, terrain: &Terrain) -> Self {
        let labels = edge_labels(&terrain.edges());
        let shapes = [
            surface.add_shape(labels[0].shape(true)),
            surface.add_shape(labels[1].shape(true)),
            surface.add_shape(labels[2].shape(true)),
            surface.add_shape(labels[3].shape(true)),
        ];
        surface.request_render();
        Self { id: terrain.id, labels, shapes, visible: true }
    }

    /// The terrain these labels describe.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[must_use]
    pub fn labels(&self) -> &[EdgeLabel; 4] {
        &self.labels
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Recompute labels for an outline (committed or in progress).
    pub fn sync<P: Surface2d>(&mut self, surface: &mut P, edges: &[Edge; 4]) {
        self.labels = edge_labels(edges);
        self.redraw(surface);
    }

    /// Show or hide every label.
    pub fn set_visible<P: Surface2d>(&mut self, surface: &mut P, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.redraw(surface);
        }
    }

    /// The visible label under `p`, if any.
    #[must_use]
    pub fn label_at(&self, p: Vertex) -> Option<&EdgeLabel> {
        if !self.visible {
            return None;
        }
        self.labels.iter().find(|l| l.contains(p))
    }

    /// Remove every label from the surface.
    pub fn detach<P: Surface2d>(self, surface: &mut P) {
        for shape in self.shapes {
            surface.remove_shape(shape);
        }
        surface.request_render();
    }

    fn redraw<P: Surface2d>(&self, surface: &mut P) {
        for (label, shape) in self.labels.iter().zip(self.shapes) {
            surface.update_shape(shape, label.shape(self.visible));
        }
        surface.request_render();
    }
}
