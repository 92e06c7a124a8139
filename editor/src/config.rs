//! Host-tunable editor settings.

use crate::consts::{
    DEFAULT_TERRAIN_HEIGHT_CM, DEFAULT_TERRAIN_WIDTH_CM, DEFAULT_WALL_HEIGHT_CM, DEFAULT_WALL_THICKNESS_CM,
    INITIAL_ZOOM, SNAP_THRESHOLD,
};

/// Settings a host may override when constructing the engine.
///
/// `Default` carries the values from [`crate::consts`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Distance in plan units within which a wall endpoint snaps.
    pub snap_threshold: f64,
    /// Size of a freshly placed terrain, in centimeters.
    pub terrain_width_cm: f64,
    pub terrain_height_cm: f64,
    /// Section of a freshly drawn wall, in centimeters.
    pub wall_thickness_cm: f64,
    pub wall_height_cm: f64,
    /// Starting zoom of the plan camera.
    pub initial_zoom: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold: SNAP_THRESHOLD,
            terrain_width_cm: DEFAULT_TERRAIN_WIDTH_CM,
            terrain_height_cm: DEFAULT_TERRAIN_HEIGHT_CM,
            wall_thickness_cm: DEFAULT_WALL_THICKNESS_CM,
            wall_height_cm: DEFAULT_WALL_HEIGHT_CM,
            initial_zoom: INITIAL_ZOOM,
        }
    }
}
