//! Document model: floorplan entities, sparse patches, and the schema store.
//!
//! This module defines what is on the plan (`Terrain`, `Wall`, the tagged
//! `Entity` union), sparse-update types for incremental edits (`Patch`), the
//! persisted aggregate (`Schema`), and the runtime store that owns every live
//! entity (`DocStore`).
//!
//! Every mutation on `DocStore` returns the structural [`Change`]s it made so
//! the engine can forward them to persistence and to each view. Geometry is
//! validated here before anything is stored: a terrain with a non-positive
//! side or a zero-length wall never enters the store, no matter which tool or
//! host call produced it.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::consts::{DEFAULT_WALL_HEIGHT_CM, DEFAULT_WALL_THICKNESS_CM, SEAM_PX};
use crate::geom::{Edge, Vertex, cm_to_px, px_to_cm};

/// Unique identifier for an entity.
pub type ObjectId = Uuid;

/// Read a stored id. Ids that are not UUIDs map to a stable name-based UUID,
/// so a plan written by another tool keeps its entities and their identity.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(Uuid::parse_str(&raw).unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_OID, raw.as_bytes())))
}

/// Errors raised when a mutation would break a store invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocError {
    /// The entity would be unrenderable (zero-area terrain, zero-length wall).
    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry { reason: String },

    /// An entity with this id already exists.
    #[error("duplicate entity id {0}")]
    DuplicateId(ObjectId),

    /// The patch targets a different kind of entity than the one stored.
    #[error("patch kind does not match entity {id}")]
    KindMismatch { id: ObjectId },

    /// A terrain has four edges, indexed 0 to 3.
    #[error("terrain has no edge {index}")]
    InvalidEdge { index: usize },
}

impl DocError {
    fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry { reason: reason.into() }
    }
}

/// Discriminant for the two entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Terrain,
    Wall,
}

// =============================================================
// Terrain
// =============================================================

/// Axis-aligned pixel-space bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn center(&self) -> Vertex {
        Vertex::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    #[must_use]
    pub fn contains(&self, p: Vertex) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// The rendered outline in order top, right, bottom, left
    /// (tl→tr, tr→br, br→bl, bl→tl).
    ///
    /// The outline is outset by half the seam on every side, so `edge.size()`
    /// equals the pixel extent of the corresponding side.
    #[must_use]
    pub fn outline(&self) -> [Edge; 4] {
        let half = SEAM_PX / 2.0;
        let tl = Vertex::new(self.left - half, self.top - half);
        let tr = Vertex::new(self.right + half, self.top - half);
        let br = Vertex::new(self.right + half, self.bottom + half);
        let bl = Vertex::new(self.left - half, self.bottom + half);
        [Edge::new(tl, tr), Edge::new(tr, br), Edge::new(br, bl), Edge::new(bl, tl)]
    }

    /// Terrain dimensions in centimeters for these bounds: `(width, height)`.
    #[must_use]
    pub fn size_cm(&self) -> (f64, f64) {
        (px_to_cm(self.width()), px_to_cm(self.height()))
    }
}

/// A rectangular ground patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    #[serde(default = "Uuid::new_v4", deserialize_with = "deserialize_id")]
    pub id: ObjectId,
    /// Horizontal extent in centimeters.
    pub width: f64,
    /// Vertical extent on the plan in centimeters.
    pub height: f64,
    /// Center on the plan, in pixels.
    pub center: Vertex,
}

impl Terrain {
    /// Create a terrain with a fresh id.
    #[must_use]
    pub fn new(width: f64, height: f64, center: Vertex) -> Self {
        Self { id: Uuid::new_v4(), width, height, center }
    }

    #[must_use]
    pub fn width_px(&self) -> f64 {
        cm_to_px(self.width)
    }

    #[must_use]
    pub fn height_px(&self) -> f64 {
        cm_to_px(self.height)
    }

    /// Pixel-space bounding box, without the outline seam.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let hw = self.width_px() / 2.0;
        let hh = self.height_px() / 2.0;
        Bounds {
            left: self.center.x - hw,
            top: self.center.y - hh,
            right: self.center.x + hw,
            bottom: self.center.y + hh,
        }
    }

    /// The four outline edges in order top, right, bottom, left.
    #[must_use]
    pub fn edges(&self) -> [Edge; 4] {
        self.bounds().outline()
    }

    /// Check that both sides are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::DegenerateGeometry`] otherwise.
    pub fn validate(&self) -> Result<(), DocError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(DocError::degenerate(format!("terrain width {} must be positive", self.width)));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(DocError::degenerate(format!("terrain height {} must be positive", self.height)));
        }
        if !(self.center.x.is_finite() && self.center.y.is_finite()) {
            return Err(DocError::degenerate("terrain center must be finite"));
        }
        Ok(())
    }

    fn apply(&mut self, patch: &TerrainPatch) {
        if let Some(w) = patch.width {
            self.width = w;
        }
        if let Some(h) = patch.height {
            self.height = h;
        }
        if let Some(c) = patch.center {
            self.center = c;
        }
    }
}

// =============================================================
// Wall
// =============================================================

fn default_wall_thickness() -> f64 {
    DEFAULT_WALL_THICKNESS_CM
}

fn default_wall_height() -> f64 {
    DEFAULT_WALL_HEIGHT_CM
}

/// A vertical partition following a line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    #[serde(default = "Uuid::new_v4", deserialize_with = "deserialize_id")]
    pub id: ObjectId,
    /// Centerline on the plan, in pixels.
    pub edge: Edge,
    /// Thickness in centimeters.
    #[serde(default = "default_wall_thickness")]
    pub thickness: f64,
    /// Height in centimeters.
    #[serde(default = "default_wall_height")]
    pub height: f64,
}

impl Wall {
    /// Create a wall with a fresh id and default thickness and height.
    #[must_use]
    pub fn new(edge: Edge) -> Self {
        Self {
            id: Uuid::new_v4(),
            edge,
            thickness: DEFAULT_WALL_THICKNESS_CM,
            height: DEFAULT_WALL_HEIGHT_CM,
        }
    }

    /// Heading of the wall in radians, sign-flipped for the 3D axis convention.
    #[must_use]
    pub fn angle(&self) -> f64 {
        -(self.edge.end.y - self.edge.start.y).atan2(self.edge.end.x - self.edge.start.x)
    }

    /// Length of the centerline in pixels.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.edge.length()
    }

    #[must_use]
    pub fn center(&self) -> Vertex {
        self.edge.center()
    }

    /// Check that the centerline has length and the section is positive.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::DegenerateGeometry`] otherwise.
    pub fn validate(&self) -> Result<(), DocError> {
        if self.edge.is_degenerate() || !self.edge.length().is_finite() {
            return Err(DocError::degenerate("wall start and end coincide"));
        }
        if !(self.thickness.is_finite() && self.thickness > 0.0) {
            return Err(DocError::degenerate(format!("wall thickness {} must be positive", self.thickness)));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(DocError::degenerate(format!("wall height {} must be positive", self.height)));
        }
        Ok(())
    }

    fn apply(&mut self, patch: &WallPatch) {
        if let Some(e) = patch.edge {
            self.edge = e;
        }
        if let Some(t) = patch.thickness {
            self.thickness = t;
        }
        if let Some(h) = patch.height {
            self.height = h;
        }
    }
}

// =============================================================
// Entity
// =============================================================

/// A persisted domain object, tagged with its kind on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "objectType")]
pub enum Entity {
    Terrain(Terrain),
    Wall(Wall),
}

impl Entity {
    #[must_use]
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Terrain(t) => t.id,
            Self::Wall(w) => w.id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Terrain(_) => EntityKind::Terrain,
            Self::Wall(_) => EntityKind::Wall,
        }
    }

    /// # Errors
    ///
    /// Returns [`DocError::DegenerateGeometry`] for unrenderable geometry.
    pub fn validate(&self) -> Result<(), DocError> {
        match self {
            Self::Terrain(t) => t.validate(),
            Self::Wall(w) => w.validate(),
        }
    }

    #[must_use]
    pub fn as_terrain(&self) -> Option<&Terrain> {
        match self {
            Self::Terrain(t) => Some(t),
            Self::Wall(_) => None,
        }
    }

    #[must_use]
    pub fn as_wall(&self) -> Option<&Wall> {
        match self {
            Self::Wall(w) => Some(w),
            Self::Terrain(_) => None,
        }
    }
}

impl From<Terrain> for Entity {
    fn from(t: Terrain) -> Self {
        Self::Terrain(t)
    }
}

impl From<Wall> for Entity {
    fn from(w: Wall) -> Self {
        Self::Wall(w)
    }
}

// =============================================================
// Patches
// =============================================================

/// Sparse update for a terrain. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<Vertex>,
}

/// Sparse update for a wall. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WallPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<Edge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Sparse update addressed to one entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "objectType")]
pub enum Patch {
    Terrain(TerrainPatch),
    Wall(WallPatch),
}

impl From<TerrainPatch> for Patch {
    fn from(p: TerrainPatch) -> Self {
        Self::Terrain(p)
    }
}

impl From<WallPatch> for Patch {
    fn from(p: WallPatch) -> Self {
        Self::Wall(p)
    }
}

// =============================================================
// Schema
// =============================================================

/// The aggregate root as persisted: every entity in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SchemaRecord")]
pub struct Schema {
    pub objects: Vec<Entity>,
}

/// On-disk layouts accepted when loading a schema.
///
/// Records stay raw JSON until the layout is known, so one unreadable record
/// is dropped on its own instead of failing the whole schema.
#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaRecord {
    Tagged { objects: Vec<Value> },
    Legacy(LegacySchema),
}

/// Older layout: one untagged array per entity kind.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LegacySchema {
    #[serde(default)]
    walls: Vec<Value>,
    #[serde(default)]
    terrains: Vec<Value>,
}

impl From<SchemaRecord> for Schema {
    fn from(record: SchemaRecord) -> Self {
        let objects = match record {
            SchemaRecord::Tagged { objects } => objects.into_iter().filter_map(read_record::<Entity>).collect(),
            SchemaRecord::Legacy(legacy) => legacy
                .terrains
                .into_iter()
                .filter_map(read_record::<Terrain>)
                .map(Entity::Terrain)
                .chain(legacy.walls.into_iter().filter_map(read_record::<Wall>).map(Entity::Wall))
                .collect(),
        };
        Self { objects }
    }
}

fn read_record<T: serde::de::DeserializeOwned>(raw: Value) -> Option<T> {
    match serde_json::from_value(raw) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(error = %e, "dropping unreadable entity from loaded schema");
            None
        }
    }
}

// =============================================================
// Store
// =============================================================

/// A structural change made to the store, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added(ObjectId),
    Updated(ObjectId),
    Removed(ObjectId),
}

impl Change {
    #[must_use]
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Added(id) | Self::Updated(id) | Self::Removed(id) => *id,
        }
    }
}

/// In-memory owner of every entity on the plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocStore {
    schema: Schema,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a loaded schema, dropping records that are
    /// degenerate or reuse an earlier id.
    #[must_use]
    pub fn from_schema(schema: Schema) -> Self {
        let mut seen = HashSet::new();
        let mut objects = Vec::with_capacity(schema.objects.len());
        for entity in schema.objects {
            let id = entity.id();
            if let Err(e) = entity.validate() {
                warn!(%id, error = %e, "dropping invalid entity from loaded schema");
                continue;
            }
            if !seen.insert(id) {
                warn!(%id, "dropping duplicate entity from loaded schema");
                continue;
            }
            objects.push(entity);
        }
        Self { schema: Schema { objects } }
    }

    /// Append entities in order. Either all are added or none are.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::DegenerateGeometry`] if any entity fails
    /// validation, or [`DocError::DuplicateId`] if an id is already taken.
    pub fn add_entities(&mut self, entities: Vec<Entity>) -> Result<Vec<Change>, DocError> {
        let mut batch = HashSet::new();
        for entity in &entities {
            entity.validate()?;
            let id = entity.id();
            if self.get(&id).is_some() || !batch.insert(id) {
                return Err(DocError::DuplicateId(id));
            }
        }
        let changes = entities.iter().map(|e| Change::Added(e.id())).collect();
        self.schema.objects.extend(entities);
        Ok(changes)
    }

    /// Merge a patch into an existing entity.
    ///
    /// An unknown id is a logged no-op and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::KindMismatch`] if the patch is for the other kind,
    /// or [`DocError::DegenerateGeometry`] if the merged entity is invalid.
    /// The stored entity is unchanged on error.
    pub fn update_entity(&mut self, id: &ObjectId, patch: &Patch) -> Result<Option<Change>, DocError> {
        let Some(slot) = self.schema.objects.iter_mut().find(|e| e.id() == *id) else {
            warn!(%id, "update for unknown entity ignored");
            return Ok(None);
        };
        let mut merged = slot.clone();
        match (&mut merged, patch) {
            (Entity::Terrain(t), Patch::Terrain(p)) => t.apply(p),
            (Entity::Wall(w), Patch::Wall(p)) => w.apply(p),
            _ => return Err(DocError::KindMismatch { id: *id }),
        }
        merged.validate()?;
        *slot = merged;
        Ok(Some(Change::Updated(*id)))
    }

    /// Remove an entity. An unknown id is a logged no-op.
    pub fn delete_entity(&mut self, id: &ObjectId) -> Option<Change> {
        let Some(index) = self.schema.objects.iter().position(|e| e.id() == *id) else {
            warn!(%id, "delete for unknown entity ignored");
            return None;
        };
        self.schema.objects.remove(index);
        Some(Change::Removed(*id))
    }

    /// Serialize the whole store.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error.
    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.schema)
    }

    /// Rebuild a store from JSON produced by [`DocStore::serialize`] or by the
    /// older two-array layout.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if the blob is not a schema.
    pub fn deserialize(json: &str) -> Result<Self, serde_json::Error> {
        let schema: Schema = serde_json::from_str(json)?;
        Ok(Self::from_schema(schema))
    }

    /// Return an entity by id.
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&Entity> {
        self.schema.objects.iter().find(|e| e.id() == *id)
    }

    #[must_use]
    pub fn terrain(&self, id: &ObjectId) -> Option<&Terrain> {
        self.get(id).and_then(Entity::as_terrain)
    }

    #[must_use]
    pub fn wall(&self, id: &ObjectId) -> Option<&Wall> {
        self.get(id).and_then(Entity::as_wall)
    }

    /// All entities in insertion (draw) order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.schema.objects
    }

    pub fn terrains(&self) -> impl Iterator<Item = &Terrain> {
        self.schema.objects.iter().filter_map(Entity::as_terrain)
    }

    pub fn walls(&self) -> impl Iterator<Item = &Wall> {
        self.schema.objects.iter().filter_map(Entity::as_wall)
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of entities currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schema.objects.len()
    }

    /// Returns `true` if the store contains no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schema.objects.is_empty()
    }
}
