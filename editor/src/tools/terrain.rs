//! Terrain placement: a ghost rectangle that follows the pointer until the
//! user clicks to place it or presses Escape.

#[cfg(test)]
#[path = "terrain_test.rs"]
mod terrain_test;

use tracing::debug;

use crate::config::EditorConfig;
use crate::doc::{Bounds, Terrain};
use crate::geom::{Vertex, cm_to_px};
use crate::view::plan::{Shape2d, ShapeId, ShapeStyle, Surface2d};

/// Guidance shown while a terrain is being placed.
pub const TERRAIN_GUIDANCE: &str = "Click to place the terrain. Press Esc to cancel.";

/// An in-progress terrain placement.
///
/// The ghost lives only on the 2D surface. Nothing reaches the store until
/// the session is committed.
#[derive(Debug)]
pub struct TerrainSession {
    ghost: ShapeId,
    center: Vertex,
    width_cm: f64,
    height_cm: f64,
}

impl TerrainSession {
    /// Spawn the ghost centered at `at`.
    pub fn begin<P: Surface2d>(surface: &mut P, at: Vertex, config: &EditorConfig) -> Self {
        let mut session = Self {
            ghost: ShapeId(0),
            center: at,
            width_cm: config.terrain_width_cm,
            height_cm: config.terrain_height_cm,
        };
        session.ghost = surface.add_shape(session.shape());
        surface.request_render();
        debug!(x = at.x, y = at.y, "terrain placement started");
        session
    }

    #[must_use]
    pub fn center(&self) -> Vertex {
        self.center
    }

    #[must_use]
    pub fn ghost(&self) -> ShapeId {
        self.ghost
    }

    /// Pixel bounds of the ghost.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let hw = cm_to_px(self.width_cm) / 2.0;
        let hh = cm_to_px(self.height_cm) / 2.0;
        Bounds {
            left: self.center.x - hw,
            top: self.center.y - hh,
            right: self.center.x + hw,
            bottom: self.center.y + hh,
        }
    }

    /// Re-center the ghost on the pointer.
    pub fn move_to<P: Surface2d>(&mut self, surface: &mut P, at: Vertex) {
        self.center = at;
        surface.update_shape(self.ghost, self.shape());
        surface.request_render();
    }

    /// Remove the ghost and return the terrain to add.
    pub fn commit<P: Surface2d>(self, surface: &mut P) -> Terrain {
        let terrain = Terrain::new(self.width_cm, self.height_cm, self.center);
        debug!(id = %terrain.id, "terrain placement committed");
        self.finish(surface);
        terrain
    }

    /// Remove the ghost without creating anything.
    pub fn cancel<P: Surface2d>(self, surface: &mut P) {
        debug!("terrain placement cancelled");
        self.finish(surface);
    }

    fn finish<P: Surface2d>(self, surface: &mut P) {
        surface.remove_shape(self.ghost);
        surface.request_render();
    }

    fn shape(&self) -> Shape2d {
        Shape2d::rect(&self.bounds(), ShapeStyle::GHOST)
    }
}
