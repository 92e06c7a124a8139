//! Hit-testing against plan entities and the selected terrain's handles.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Camera;
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{Bounds, DocStore, Entity, ObjectId};
use crate::geom::{Vertex, cm_to_px};

/// Which part of an entity was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(Side),
}

/// A side of a terrain rectangle. Only side handles resize; corners do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Midpoint of this side, where its handle is drawn.
    #[must_use]
    pub fn handle_point(self, b: &Bounds) -> Vertex {
        let c = b.center();
        match self {
            Self::Top => Vertex::new(c.x, b.top),
            Self::Right => Vertex::new(b.right, c.y),
            Self::Bottom => Vertex::new(c.x, b.bottom),
            Self::Left => Vertex::new(b.left, c.y),
        }
    }

    /// CSS cursor shown while this side is dragged.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Top | Self::Bottom => "ns-resize",
            Self::Left | Self::Right => "ew-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// Test which entity (if any) is under `world_pt`.
///
/// Handles of the selected terrain are checked first, then entities from the
/// top of the draw order down.
#[must_use]
pub fn hit_test(world_pt: Vertex, doc: &DocStore, camera: &Camera, selected_id: Option<ObjectId>) -> Option<Hit> {
    let slop = camera.screen_dist_to_world(HANDLE_RADIUS_PX);

    if let Some(terrain) = selected_id.and_then(|id| doc.terrain(&id)) {
        let bounds = terrain.bounds();
        for side in Side::ALL {
            if side.handle_point(&bounds).distance(world_pt) <= slop {
                return Some(Hit { object_id: terrain.id, part: HitPart::ResizeHandle(side) });
            }
        }
    }

    doc.entities().iter().rev().find_map(|entity| {
        let inside = match entity {
            Entity::Terrain(t) => t.bounds().contains(world_pt),
            Entity::Wall(w) => w.edge.distance_to(world_pt) <= (cm_to_px(w.thickness) / 2.0).max(slop),
        };
        inside.then(|| Hit { object_id: entity.id(), part: HitPart::Body })
    })
}
