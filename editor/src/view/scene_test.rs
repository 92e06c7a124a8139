#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{Patch, TerrainPatch, WallPatch};
use crate::geom::Edge;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn synced(entities: Vec<Entity>) -> (DocStore, SceneView<MemorySurface3d>) {
    let mut doc = DocStore::new();
    let mut view = SceneView::new(MemorySurface3d::new());
    for change in doc.add_entities(entities).unwrap() {
        view.apply(&doc, &change);
    }
    (doc, view)
}

#[test]
fn terrain_becomes_ground_plane_in_meters() {
    let t = Terrain::new(1200.0, 2500.0, Vertex::new(100.0, 50.0));
    let mesh = mesh_for(&t.clone().into());
    let Mesh3d::Plane { width, depth, position } = mesh else {
        panic!("terrain should map to a plane");
    };
    assert!(approx_eq(width, 12.0));
    assert!(approx_eq(depth, 25.0));
    // 100 px = 200 cm = 2 m; 50 px = 1 m.
    assert!(approx_eq(position[0], 2.0));
    assert_eq!(position[1], 0.0);
    assert!(approx_eq(position[2], 1.0));
}

#[test]
fn wall_becomes_standing_box() {
    let w = Wall::new(Edge::new(Vertex::new(0.0, 0.0), Vertex::new(0.0, 100.0)));
    let Mesh3d::Box { length, height, thickness, position, rotation_y } = mesh_for(&w.clone().into()) else {
        panic!("wall should map to a box");
    };
    assert!(approx_eq(length, 2.0));
    assert!(approx_eq(height, 2.5));
    assert!(approx_eq(thickness, 0.1));
    assert!(approx_eq(position[1], 1.25));
    assert!(approx_eq(position[2], 1.0));
    assert!(approx_eq(rotation_y, w.angle()));
}

#[test]
fn meshes_are_named_by_entity_id() {
    let t = Terrain::new(100.0, 100.0, Vertex::new(0.0, 0.0));
    let (_, view) = synced(vec![t.clone().into()]);
    assert!(view.surface().mesh(&t.id.to_string()).is_some());
    assert!(view.has_proxy(&t.id));
    assert_eq!(view.proxy_count(), 1);
}

#[test]
fn moving_terrain_updates_transform_in_place() {
    let t = Terrain::new(100.0, 100.0, Vertex::new(0.0, 0.0));
    let (mut doc, mut view) = synced(vec![t.clone().into()]);
    let patch = Patch::from(TerrainPatch { center: Some(Vertex::new(50.0, 0.0)), ..Default::default() });
    let change = doc.update_entity(&t.id, &patch).unwrap().unwrap();
    view.apply(&doc, &change);
    assert_eq!(view.surface().geometries_built(), 1);
    let mesh = view.surface().mesh(&t.id.to_string()).unwrap();
    assert!(approx_eq(mesh.position()[0], 1.0));
}

#[test]
fn resizing_terrain_recreates_plane() {
    let t = Terrain::new(100.0, 100.0, Vertex::new(0.0, 0.0));
    let (mut doc, mut view) = synced(vec![t.clone().into()]);
    let patch = Patch::from(TerrainPatch { width: Some(300.0), ..Default::default() });
    let change = doc.update_entity(&t.id, &patch).unwrap().unwrap();
    view.apply(&doc, &change);
    assert_eq!(view.surface().geometries_built(), 2);
    assert_eq!(view.surface().len(), 1);
    let Some(Mesh3d::Plane { width, .. }) = view.surface().mesh(&t.id.to_string()) else {
        panic!("terrain should map to a plane");
    };
    assert!(approx_eq(*width, 3.0));
}

#[test]
fn changing_wall_height_recreates_box() {
    let w = Wall::new(Edge::new(Vertex::new(0.0, 0.0), Vertex::new(10.0, 0.0)));
    let (mut doc, mut view) = synced(vec![w.clone().into()]);
    let patch = Patch::from(WallPatch { height: Some(300.0), ..Default::default() });
    let change = doc.update_entity(&w.id, &patch).unwrap().unwrap();
    view.apply(&doc, &change);
    assert_eq!(view.surface().geometries_built(), 2);
    assert!(approx_eq(view.surface().mesh(&w.id.to_string()).unwrap().position()[1], 1.5));
}

#[test]
fn removal_disposes_mesh() {
    let t = Terrain::new(100.0, 100.0, Vertex::new(0.0, 0.0));
    let (mut doc, mut view) = synced(vec![t.clone().into()]);
    let change = doc.delete_entity(&t.id).unwrap();
    view.apply(&doc, &change);
    assert!(view.surface().is_empty());
    assert!(!view.has_proxy(&t.id));
}

#[test]
fn camera_is_forwarded() {
    let mut surface = MemorySurface3d::new();
    let mut cam = OrbitCamera::default();
    cam.zoom_in();
    surface.set_camera(&cam);
    assert_eq!(surface.camera(), &cam);
}
