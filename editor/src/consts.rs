//! Shared numeric constants for the editor crate.

// ── Units ───────────────────────────────────────────────────────

/// Plan-view scale: pixels per meter. 1 px = 2 cm.
pub const PX_PER_M: f64 = 50.0;

/// Centimeters per 3D scene unit (meters).
pub const CM_PER_SCENE_UNIT: f64 = 100.0;

/// Width of the outline stroke drawn around shapes. Edge sizes subtract it.
pub const SEAM_PX: f64 = 1.0;

// ── Entity defaults ─────────────────────────────────────────────

/// Width of a freshly drawn terrain, in centimeters.
pub const DEFAULT_TERRAIN_WIDTH_CM: f64 = 1200.0;

/// Height (depth on the plan) of a freshly drawn terrain, in centimeters.
pub const DEFAULT_TERRAIN_HEIGHT_CM: f64 = 2500.0;

/// Smallest terrain side a resize gesture may produce, in centimeters.
pub const MIN_TERRAIN_CM: f64 = 10.0;

/// Wall thickness in centimeters.
pub const DEFAULT_WALL_THICKNESS_CM: f64 = 10.0;

/// Wall height in centimeters.
pub const DEFAULT_WALL_HEIGHT_CM: f64 = 250.0;

// ── Snapping and hit-testing ────────────────────────────────────

/// Distance in plan units within which a wall endpoint snaps.
pub const SNAP_THRESHOLD: f64 = 10.0;

/// Screen-space hit slop in pixels for handles and thin walls.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Dimension labels ────────────────────────────────────────────

/// Offset of a dimension label from its edge midpoint, in plan units.
pub const LABEL_OFFSET: f64 = 40.0;

/// Label box height in plan units.
pub const LABEL_HEIGHT: f64 = 42.0;

/// Label box width per character of text, in plan units.
pub const LABEL_CHAR_WIDTH: f64 = 10.0;

/// Horizontal padding added to the label box width.
pub const LABEL_PADDING: f64 = 20.0;

// ── 2D viewport ─────────────────────────────────────────────────

pub const INITIAL_ZOOM: f64 = 0.5;
pub const MIN_ZOOM: f64 = 0.05;
pub const MAX_ZOOM: f64 = 15.0;

/// Step applied by the zoom buttons.
pub const ZOOM_STEP: f64 = 0.1;

/// Base of the exponential wheel zoom: `zoom *= WHEEL_ZOOM_BASE ^ delta_y`.
pub const WHEEL_ZOOM_BASE: f64 = 0.999;

/// Multiplier applied to wheel deltas when the wheel pans instead of zooming.
pub const WHEEL_PAN_FACTOR: f64 = 2.0;

/// Background grid cell size in plan units.
pub const GRID_CELL: f64 = 100.0;

// ── 3D viewport ─────────────────────────────────────────────────

/// Starting camera height above the ground plane.
pub const ORBIT_INITIAL_DISTANCE: f64 = 50.0;
pub const ORBIT_MAX_DISTANCE: f64 = ORBIT_INITIAL_DISTANCE * 10.0;
pub const ORBIT_MIN_DISTANCE: f64 = ORBIT_INITIAL_DISTANCE / 30.0;

/// Height change applied by the 3D zoom buttons.
pub const ORBIT_ZOOM_STEP: f64 = ORBIT_INITIAL_DISTANCE * 10.0 / 100.0;

// ── Persistence ─────────────────────────────────────────────────

/// Storage key holding the serialized schema.
pub const SCHEMA_KEY: &str = "floorPlan";

/// Storage key holding the last used view mode.
pub const VIEW_MODE_KEY: &str = "viewMode";
