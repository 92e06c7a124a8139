#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// --- Vertex ---

#[test]
fn vertex_distance_is_euclidean() {
    let a = Vertex::new(0.0, 0.0);
    let b = Vertex::new(3.0, 4.0);
    assert!(approx_eq(a.distance(b), 5.0));
    assert!(approx_eq(b.distance(a), 5.0));
}

#[test]
fn vertex_offset() {
    let v = Vertex::new(1.0, 2.0).offset(-1.0, 3.0);
    assert_eq!(v, Vertex::new(0.0, 5.0));
}

// --- Edge ---

#[test]
fn edge_size_subtracts_seam() {
    let e = Edge::new(Vertex::new(0.0, 0.0), Vertex::new(101.0, 0.0));
    assert!(approx_eq(e.length(), 101.0));
    assert!(approx_eq(e.size(), 100.0));
}

#[test]
fn edge_center_is_midpoint() {
    let e = Edge::new(Vertex::new(-10.0, 4.0), Vertex::new(10.0, 8.0));
    assert_eq!(e.center(), Vertex::new(0.0, 6.0));
}

#[test]
fn edge_zero_length_is_degenerate() {
    let p = Vertex::new(5.0, 5.0);
    assert!(Edge::new(p, p).is_degenerate());
    assert!(!Edge::new(p, p.offset(0.5, 0.0)).is_degenerate());
}

#[test]
fn edge_distance_to_projects_onto_segment() {
    let e = Edge::new(Vertex::new(0.0, 0.0), Vertex::new(100.0, 0.0));
    assert!(approx_eq(e.distance_to(Vertex::new(50.0, 7.0)), 7.0));
    // Beyond the end the distance is measured to the endpoint.
    assert!(approx_eq(e.distance_to(Vertex::new(103.0, 4.0)), 5.0));
}

#[test]
fn edge_distance_to_degenerate_uses_start() {
    let p = Vertex::new(1.0, 1.0);
    assert!(approx_eq(Edge::new(p, p).distance_to(Vertex::new(4.0, 5.0)), 5.0));
}

// --- Units ---

#[test]
fn one_pixel_is_two_centimeters() {
    assert!(approx_eq(cm_to_px(2.0), 1.0));
    assert!(approx_eq(px_to_cm(1.0), 2.0));
    assert!(approx_eq(cm_to_px(1200.0), 600.0));
}

#[test]
fn unit_conversion_inverts() {
    for cm in [0.0, 10.0, 333.3, 2500.0] {
        assert!(approx_eq(px_to_cm(cm_to_px(cm)), cm));
    }
}

#[test]
fn scene_units_are_meters() {
    assert!(approx_eq(cm_to_scene(250.0), 2.5));
}
