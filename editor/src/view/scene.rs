//! 3D scene view: entity proxies as named meshes.
//!
//! Terrains become flat planes and walls become boxes standing on the ground.
//! Plan pixels are converted to centimeters and then to scene meters, and the
//! plan's y axis maps onto the scene's z axis.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;

use tracing::debug;

use crate::camera::OrbitCamera;
use crate::doc::{Change, DocStore, Entity, ObjectId, Terrain, Wall};
use crate::geom::{Vertex, cm_to_scene, px_to_cm};
use crate::view::View;

/// Geometry and placement of a mesh, in scene units.
#[derive(Debug, Clone, PartialEq)]
pub enum Mesh3d {
    /// A horizontal plane lying on the ground.
    Plane { width: f64, depth: f64, position: [f64; 3] },
    /// An upright box rotated about the vertical axis.
    Box { length: f64, height: f64, thickness: f64, position: [f64; 3], rotation_y: f64 },
}

impl Mesh3d {
    #[must_use]
    pub fn position(&self) -> [f64; 3] {
        match self {
            Self::Plane { position, .. } | Self::Box { position, .. } => *position,
        }
    }

    #[must_use]
    pub fn rotation_y(&self) -> f64 {
        match self {
            Self::Plane { .. } => 0.0,
            Self::Box { rotation_y, .. } => *rotation_y,
        }
    }

    /// Whether two meshes differ only by transform.
    #[must_use]
    pub fn same_geometry(&self, other: &Mesh3d) -> bool {
        match (self, other) {
            (Self::Plane { width: w1, depth: d1, .. }, Self::Plane { width: w2, depth: d2, .. }) => {
                w1 == w2 && d1 == d2
            }
            (
                Self::Box { length: l1, height: h1, thickness: t1, .. },
                Self::Box { length: l2, height: h2, thickness: t2, .. },
            ) => l1 == l2 && h1 == h2 && t1 == t2,
            _ => false,
        }
    }
}

/// The 3D rendering collaborator.
pub trait Surface3d {
    fn add_mesh(&mut self, name: &str, mesh: Mesh3d);

    /// Move or rotate an existing mesh without rebuilding its geometry.
    fn set_transform(&mut self, name: &str, position: [f64; 3], rotation_y: f64);

    /// Remove a mesh and release its geometry.
    fn remove_mesh(&mut self, name: &str);

    fn set_camera(&mut self, camera: &OrbitCamera);
}

/// Retained scene graph that records meshes by name.
#[derive(Debug, Default)]
pub struct MemorySurface3d {
    meshes: Vec<(String, Mesh3d)>,
    camera: OrbitCamera,
    geometries_built: usize,
}

impl MemorySurface3d {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mesh(&self, name: &str) -> Option<&Mesh3d> {
        self.meshes.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (&str, &Mesh3d)> {
        self.meshes.iter().map(|(n, m)| (n.as_str(), m))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    #[must_use]
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// How many geometries were built over the surface's lifetime.
    #[must_use]
    pub fn geometries_built(&self) -> usize {
        self.geometries_built
    }
}

impl Surface3d for MemorySurface3d {
    fn add_mesh(&mut self, name: &str, mesh: Mesh3d) {
        self.geometries_built += 1;
        self.meshes.retain(|(n, _)| n != name);
        self.meshes.push((name.to_owned(), mesh));
    }

    fn set_transform(&mut self, name: &str, position: [f64; 3], rotation_y: f64) {
        let Some((_, mesh)) = self.meshes.iter_mut().find(|(n, _)| n == name) else {
            return;
        };
        match mesh {
            Mesh3d::Plane { position: p, .. } => *p = position,
            Mesh3d::Box { position: p, rotation_y: r, .. } => {
                *p = position;
                *r = rotation_y;
            }
        }
    }

    fn remove_mesh(&mut self, name: &str) {
        self.meshes.retain(|(n, _)| n != name);
    }

    fn set_camera(&mut self, camera: &OrbitCamera) {
        self.camera = *camera;
    }
}

fn ground_position(p: Vertex, y: f64) -> [f64; 3] {
    [cm_to_scene(px_to_cm(p.x)), y, cm_to_scene(px_to_cm(p.y))]
}

fn terrain_mesh(t: &Terrain) -> Mesh3d {
    Mesh3d::Plane {
        width: cm_to_scene(t.width),
        depth: cm_to_scene(t.height),
        position: ground_position(t.center, 0.0),
    }
}

fn wall_mesh(w: &Wall) -> Mesh3d {
    let height = cm_to_scene(w.height);
    Mesh3d::Box {
        length: cm_to_scene(px_to_cm(w.length())),
        height,
        thickness: cm_to_scene(w.thickness),
        position: ground_position(w.center(), height / 2.0),
        rotation_y: w.angle(),
    }
}

/// Mesh standing for an entity.
#[must_use]
pub fn mesh_for(entity: &Entity) -> Mesh3d {
    match entity {
        Entity::Terrain(t) => terrain_mesh(t),
        Entity::Wall(w) => wall_mesh(w),
    }
}

/// Keeps one mesh per entity on a [`Surface3d`], named by entity id.
pub struct SceneView<S: Surface3d> {
    surface: S,
    meshes: HashMap<ObjectId, Mesh3d>,
}

impl<S: Surface3d> SceneView<S> {
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self { surface, meshes: HashMap::new() }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Whether an entity currently has a mesh.
    #[must_use]
    pub fn has_proxy(&self, id: &ObjectId) -> bool {
        self.meshes.contains_key(id)
    }
}

impl<S: Surface3d> View for SceneView<S> {
    fn apply(&mut self, doc: &DocStore, change: &Change) {
        match change {
            Change::Added(id) => {
                let Some(entity) = doc.get(id) else {
                    return;
                };
                let mesh = mesh_for(entity);
                self.surface.add_mesh(&id.to_string(), mesh.clone());
                self.meshes.insert(*id, mesh);
                debug!(%id, "scene proxy added");
            }
            Change::Updated(id) => {
                let (Some(entity), Some(current)) = (doc.get(id), self.meshes.get_mut(id)) else {
                    return;
                };
                let mesh = mesh_for(entity);
                let name = id.to_string();
                if current.same_geometry(&mesh) {
                    self.surface.set_transform(&name, mesh.position(), mesh.rotation_y());
                } else {
                    self.surface.remove_mesh(&name);
                    self.surface.add_mesh(&name, mesh.clone());
                }
                *current = mesh;
            }
            Change::Removed(id) => {
                if self.meshes.remove(id).is_some() {
                    self.surface.remove_mesh(&id.to_string());
                    debug!(%id, "scene proxy removed");
                }
            }
        }
    }

    fn proxy_count(&self) -> usize {
        self.meshes.len()
    }
}
