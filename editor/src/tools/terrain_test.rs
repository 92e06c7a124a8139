#![allow(clippy::float_cmp)]

use super::*;
use crate::view::plan::MemorySurface2d;

fn start(at: Vertex) -> (MemorySurface2d, TerrainSession) {
    let mut surface = MemorySurface2d::new();
    let session = TerrainSession::begin(&mut surface, at, &EditorConfig::default());
    (surface, session)
}

#[test]
fn begin_spawns_translucent_ghost() {
    let (surface, session) = start(Vertex::new(100.0, 100.0));
    assert_eq!(surface.len(), 1);
    let Some(Shape2d::Rect { center, width, height, style }) = surface.get(session.ghost()) else {
        panic!("ghost should be a rect");
    };
    assert_eq!(*center, Vertex::new(100.0, 100.0));
    // 1200 x 2500 cm at 2 cm per pixel.
    assert_eq!(*width, 600.0);
    assert_eq!(*height, 1250.0);
    assert!(style.opacity < 1.0);
}

#[test]
fn move_recenters_ghost() {
    let (mut surface, mut session) = start(Vertex::new(0.0, 0.0));
    session.move_to(&mut surface, Vertex::new(40.0, -20.0));
    assert_eq!(session.center(), Vertex::new(40.0, -20.0));
    let Some(Shape2d::Rect { center, .. }) = surface.get(session.ghost()) else {
        panic!("ghost should be a rect");
    };
    assert_eq!(*center, Vertex::new(40.0, -20.0));
}

#[test]
fn commit_returns_terrain_and_removes_ghost() {
    let (mut surface, mut session) = start(Vertex::new(0.0, 0.0));
    session.move_to(&mut surface, Vertex::new(500.0, 500.0));
    let terrain = session.commit(&mut surface);
    assert!(surface.is_empty());
    assert_eq!(terrain.center, Vertex::new(500.0, 500.0));
    assert_eq!(terrain.width, 1200.0);
    assert_eq!(terrain.height, 2500.0);
    assert!(terrain.validate().is_ok());
}

#[test]
fn cancel_removes_ghost() {
    let (mut surface, session) = start(Vertex::new(0.0, 0.0));
    session.cancel(&mut surface);
    assert!(surface.is_empty());
}

#[test]
fn configured_size_is_used() {
    let mut surface = MemorySurface2d::new();
    let config = EditorConfig { terrain_width_cm: 200.0, terrain_height_cm: 100.0, ..EditorConfig::default() };
    let session = TerrainSession::begin(&mut surface, Vertex::new(0.0, 0.0), &config);
    let b = session.bounds();
    assert_eq!(b.width(), 100.0);
    assert_eq!(b.height(), 50.0);
}
