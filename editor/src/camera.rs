//! Viewport cameras: pan/zoom for the plan and an orbit camera for the 3D view.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{
    INITIAL_ZOOM, MAX_ZOOM, MIN_ZOOM, ORBIT_INITIAL_DISTANCE, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE,
    ORBIT_ZOOM_STEP, WHEEL_PAN_FACTOR, WHEEL_ZOOM_BASE, ZOOM_STEP,
};
use crate::geom::Vertex;
use crate::input::{Modifiers, WheelDelta};

/// Camera state for pan/zoom on the plan.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = one plan unit per CSS pixel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: INITIAL_ZOOM }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to plan coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vertex) -> Vertex {
        Vertex {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a plan point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Vertex) -> Vertex {
        Vertex {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to plan distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Set the zoom, clamped to the allowed range, keeping `screen` fixed.
    pub fn zoom_to_point(&mut self, screen: Vertex, zoom: f64) {
        let anchor = self.screen_to_world(screen);
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan_x = screen.x - anchor.x * self.zoom;
        self.pan_y = screen.y - anchor.y * self.zoom;
    }

    /// Apply a wheel event.
    ///
    /// Meta pans horizontally, shift pans on both axes, and a plain wheel
    /// zooms exponentially around the pointer.
    pub fn wheel(&mut self, screen: Vertex, delta: WheelDelta, modifiers: Modifiers) {
        if modifiers.meta {
            self.pan_by(-delta.dx * WHEEL_PAN_FACTOR, 0.0);
            return;
        }
        if modifiers.shift {
            self.pan_by(-delta.dx * WHEEL_PAN_FACTOR, -delta.dy * WHEEL_PAN_FACTOR);
            return;
        }
        let zoom = self.zoom * WHEEL_ZOOM_BASE.powf(delta.dy);
        self.zoom_to_point(screen, zoom);
    }

    /// Zoom in one step around the viewport center.
    pub fn zoom_in(&mut self, viewport_center: Vertex) {
        self.zoom_to_point(viewport_center, self.zoom + ZOOM_STEP);
    }

    /// Zoom out one step around the viewport center.
    pub fn zoom_out(&mut self, viewport_center: Vertex) {
        self.zoom_to_point(viewport_center, self.zoom - ZOOM_STEP);
    }

    /// Zoom relative to the zoom the editor started at, for display.
    #[must_use]
    pub fn zoom_readout(&self, initial_zoom: f64) -> f64 {
        self.zoom / initial_zoom
    }
}

/// Camera for the 3D view, orbiting a target on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub position: [f64; 3],
    pub target: [f64; 3],
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self { position: [0.0, ORBIT_INITIAL_DISTANCE, 0.0], target: [0.0; 3] }
    }
}

impl OrbitCamera {
    /// Distance from the camera to its target.
    #[must_use]
    pub fn distance(&self) -> f64 {
        let [px, py, pz] = self.position;
        let [tx, ty, tz] = self.target;
        ((px - tx).powi(2) + (py - ty).powi(2) + (pz - tz).powi(2)).sqrt()
    }

    /// Zoom relative to the starting distance, for display.
    #[must_use]
    pub fn zoom_readout(&self) -> f64 {
        ORBIT_INITIAL_DISTANCE / self.distance()
    }

    /// Move the camera down one step, stopping at the minimum distance.
    pub fn zoom_in(&mut self) {
        self.set_height(self.position[1] - ORBIT_ZOOM_STEP);
    }

    /// Move the camera up one step, stopping at the maximum distance.
    pub fn zoom_out(&mut self) {
        self.set_height(self.position[1] + ORBIT_ZOOM_STEP);
    }

    fn set_height(&mut self, y: f64) {
        let [px, _, pz] = self.position;
        let [tx, ty, tz] = self.target;
        let horizontal_sq = (px - tx).powi(2) + (pz - tz).powi(2);
        let min_dy = (ORBIT_MIN_DISTANCE.powi(2) - horizontal_sq).max(0.0).sqrt();
        let max_dy = (ORBIT_MAX_DISTANCE.powi(2) - horizontal_sq).max(0.0).sqrt();
        self.position[1] = ty + (y - ty).clamp(min_dy, max_dy);
    }
}
