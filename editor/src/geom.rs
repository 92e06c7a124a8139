//! Geometry primitives and unit conversion.
//!
//! Plan coordinates are pixels (device-independent editor units). Entity
//! dimensions are centimeters. The 3D scene uses meters.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CM_PER_SCENE_UNIT, PX_PER_M, SEAM_PX};

/// A point on the plan.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Vertex) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// A line segment between two plan points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: Vertex,
    pub end: Vertex,
}

impl Edge {
    #[must_use]
    pub fn new(start: Vertex, end: Vertex) -> Self {
        Self { start, end }
    }

    /// Euclidean length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Displayed size: the length minus the outline seam.
    #[must_use]
    pub fn size(&self) -> f64 {
        self.length() - SEAM_PX
    }

    /// Midpoint of the segment.
    #[must_use]
    pub fn center(&self) -> Vertex {
        Vertex::new((self.start.x + self.end.x) / 2.0, (self.start.y + self.end.y) / 2.0)
    }

    /// A zero-length segment cannot be rendered or turned into a wall.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.length() <= f64::EPSILON
    }

    /// Shortest distance from `p` to any point on the segment.
    #[must_use]
    pub fn distance_to(&self, p: Vertex) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq <= f64::EPSILON {
            return self.start.distance(p);
        }
        let t = (((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len_sq).clamp(0.0, 1.0);
        Vertex::new(self.start.x + t * dx, self.start.y + t * dy).distance(p)
    }
}

/// Convert centimeters to plan pixels.
#[must_use]
pub fn cm_to_px(cm: f64) -> f64 {
    cm * PX_PER_M / 100.0
}

/// Convert plan pixels to centimeters.
#[must_use]
pub fn px_to_cm(px: f64) -> f64 {
    px / PX_PER_M * 100.0
}

/// Convert centimeters to 3D scene units.
#[must_use]
pub fn cm_to_scene(cm: f64) -> f64 {
    cm / CM_PER_SCENE_UNIT
}
