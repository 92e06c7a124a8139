#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;

fn terrain_at(x: f64, y: f64) -> Terrain {
    Terrain::new(1200.0, 2500.0, Vertex::new(x, y))
}

fn wall_between(ax: f64, ay: f64, bx: f64, by: f64) -> Wall {
    Wall::new(Edge::new(Vertex::new(ax, ay), Vertex::new(bx, by)))
}

fn store_with(entities: Vec<Entity>) -> DocStore {
    let mut doc = DocStore::new();
    doc.add_entities(entities).unwrap();
    doc
}

// =============================================================
// Terrain geometry
// =============================================================

#[test]
fn terrain_pixel_extent_uses_scale() {
    let t = terrain_at(0.0, 0.0);
    assert_eq!(t.width_px(), 600.0);
    assert_eq!(t.height_px(), 1250.0);
}

#[test]
fn terrain_bounds_center_on_center() {
    let t = Terrain::new(200.0, 100.0, Vertex::new(500.0, 500.0));
    let b = t.bounds();
    assert_eq!(b.left, 450.0);
    assert_eq!(b.right, 550.0);
    assert_eq!(b.top, 475.0);
    assert_eq!(b.bottom, 525.0);
    assert_eq!(b.center(), t.center);
    assert!(b.contains(Vertex::new(500.0, 500.0)));
    assert!(!b.contains(Vertex::new(449.0, 500.0)));
}

#[test]
fn terrain_edges_run_clockwise_from_top() {
    let t = Terrain::new(200.0, 100.0, Vertex::new(0.0, 0.0));
    let [top, right, bottom, left] = t.edges();
    assert!(top.start.y < 0.0 && top.end.y < 0.0);
    assert!(top.start.x < top.end.x);
    assert!(right.start.x > 0.0 && right.end.x > 0.0);
    assert!(bottom.start.x > bottom.end.x);
    assert!(left.start.x < 0.0);
    assert_eq!(left.end, top.start);
}

#[test]
fn terrain_edge_size_matches_pixel_extent() {
    let t = Terrain::new(1200.0, 2500.0, Vertex::new(500.0, 500.0));
    let edges = t.edges();
    assert_eq!(edges[0].size(), 600.0);
    assert_eq!(edges[1].size(), 1250.0);
    assert_eq!(edges[2].size(), 600.0);
    assert_eq!(edges[3].size(), 1250.0);
}

#[test]
fn terrain_validate_rejects_non_positive_sides() {
    let mut t = terrain_at(0.0, 0.0);
    assert!(t.validate().is_ok());
    t.width = 0.0;
    assert!(matches!(t.validate(), Err(DocError::DegenerateGeometry { .. })));
    t.width = 10.0;
    t.height = -5.0;
    assert!(matches!(t.validate(), Err(DocError::DegenerateGeometry { .. })));
    t.height = f64::NAN;
    assert!(t.validate().is_err());
}

// =============================================================
// Wall geometry
// =============================================================

#[test]
fn wall_defaults() {
    let w = wall_between(0.0, 0.0, 100.0, 0.0);
    assert_eq!(w.thickness, 10.0);
    assert_eq!(w.height, 250.0);
}

#[test]
fn wall_angle_is_sign_flipped() {
    let w = wall_between(0.0, 0.0, 0.0, 100.0);
    assert!((w.angle() + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    let flat = wall_between(0.0, 0.0, 100.0, 0.0);
    assert_eq!(flat.angle(), 0.0);
}

#[test]
fn wall_length_and_center() {
    let w = wall_between(0.0, 0.0, 30.0, 40.0);
    assert_eq!(w.length(), 50.0);
    assert_eq!(w.center(), Vertex::new(15.0, 20.0));
}

#[test]
fn wall_validate_rejects_zero_length() {
    let w = wall_between(5.0, 5.0, 5.0, 5.0);
    assert!(matches!(w.validate(), Err(DocError::DegenerateGeometry { .. })));
}

// =============================================================
// Entity serde
// =============================================================

#[test]
fn entity_is_tagged_with_object_type() {
    let t = terrain_at(1.0, 2.0);
    let value = serde_json::to_value(Entity::from(t.clone())).unwrap();
    assert_eq!(value["objectType"], "Terrain");
    assert_eq!(value["width"], 1200.0);
    assert_eq!(value["center"]["x"], 1.0);

    let w = wall_between(0.0, 0.0, 10.0, 0.0);
    let value = serde_json::to_value(Entity::from(w)).unwrap();
    assert_eq!(value["objectType"], "Wall");
    assert_eq!(value["edge"]["end"]["x"], 10.0);
}

#[test]
fn entity_without_tag_is_rejected() {
    let raw = json!({ "id": Uuid::nil(), "width": 1.0, "height": 1.0, "center": { "x": 0.0, "y": 0.0 } });
    assert!(serde_json::from_value::<Entity>(raw).is_err());
}

#[test]
fn wall_record_without_section_gets_defaults() {
    let raw = json!({
        "objectType": "Wall",
        "id": Uuid::nil(),
        "edge": { "start": { "x": 0.0, "y": 0.0 }, "end": { "x": 5.0, "y": 0.0 } },
    });
    let entity: Entity = serde_json::from_value(raw).unwrap();
    let wall = entity.as_wall().unwrap();
    assert_eq!(wall.thickness, 10.0);
    assert_eq!(wall.height, 250.0);
}

// =============================================================
// DocStore: add
// =============================================================

#[test]
fn add_preserves_insertion_order() {
    let a = terrain_at(0.0, 0.0);
    let b = wall_between(0.0, 0.0, 1.0, 0.0);
    let c = terrain_at(5.0, 5.0);
    let ids = [a.id, b.id, c.id];
    let doc = store_with(vec![a.into(), b.into(), c.into()]);
    let order: Vec<_> = doc.entities().iter().map(Entity::id).collect();
    assert_eq!(order, ids);
}

#[test]
fn add_reports_one_change_per_entity() {
    let a = wall_between(0.0, 0.0, 1.0, 0.0);
    let b = wall_between(1.0, 0.0, 1.0, 1.0);
    let mut doc = DocStore::new();
    let changes = doc.add_entities(vec![a.clone().into(), b.clone().into()]).unwrap();
    assert_eq!(changes, vec![Change::Added(a.id), Change::Added(b.id)]);
}

#[test]
fn add_is_atomic_on_invalid_entity() {
    let good = wall_between(0.0, 0.0, 1.0, 0.0);
    let bad = wall_between(2.0, 2.0, 2.0, 2.0);
    let mut doc = DocStore::new();
    let result = doc.add_entities(vec![good.into(), bad.into()]);
    assert!(matches!(result, Err(DocError::DegenerateGeometry { .. })));
    assert!(doc.is_empty());
}

#[test]
fn add_rejects_existing_id() {
    let t = terrain_at(0.0, 0.0);
    let mut doc = store_with(vec![t.clone().into()]);
    let result = doc.add_entities(vec![t.clone().into()]);
    assert_eq!(result, Err(DocError::DuplicateId(t.id)));
    assert_eq!(doc.len(), 1);
}

#[test]
fn add_rejects_duplicate_within_batch() {
    let t = terrain_at(0.0, 0.0);
    let mut doc = DocStore::new();
    let result = doc.add_entities(vec![t.clone().into(), t.clone().into()]);
    assert_eq!(result, Err(DocError::DuplicateId(t.id)));
    assert!(doc.is_empty());
}

// =============================================================
// DocStore: update
// =============================================================

#[test]
fn update_merges_present_fields_only() {
    let t = terrain_at(0.0, 0.0);
    let mut doc = store_with(vec![t.clone().into()]);
    let patch = Patch::from(TerrainPatch { width: Some(400.0), ..Default::default() });
    let change = doc.update_entity(&t.id, &patch).unwrap();
    assert_eq!(change, Some(Change::Updated(t.id)));
    let updated = doc.terrain(&t.id).unwrap();
    assert_eq!(updated.width, 400.0);
    assert_eq!(updated.height, 2500.0);
    assert_eq!(updated.center, t.center);
}

#[test]
fn update_unknown_id_is_noop() {
    let mut doc = store_with(vec![terrain_at(0.0, 0.0).into()]);
    let before = doc.clone();
    let patch = Patch::from(TerrainPatch { width: Some(1.0), ..Default::default() });
    assert_eq!(doc.update_entity(&Uuid::new_v4(), &patch), Ok(None));
    assert_eq!(doc, before);
}

#[test]
fn update_rejects_negative_width_and_keeps_entity() {
    let t = terrain_at(0.0, 0.0);
    let mut doc = store_with(vec![t.clone().into()]);
    let patch = Patch::from(TerrainPatch { width: Some(-1.0), ..Default::default() });
    assert!(matches!(doc.update_entity(&t.id, &patch), Err(DocError::DegenerateGeometry { .. })));
    assert_eq!(doc.terrain(&t.id), Some(&t));
}

#[test]
fn update_rejects_kind_mismatch() {
    let w = wall_between(0.0, 0.0, 1.0, 0.0);
    let mut doc = store_with(vec![w.clone().into()]);
    let patch = Patch::from(TerrainPatch { width: Some(1.0), ..Default::default() });
    assert_eq!(doc.update_entity(&w.id, &patch), Err(DocError::KindMismatch { id: w.id }));
}

#[test]
fn update_wall_edge() {
    let w = wall_between(0.0, 0.0, 1.0, 0.0);
    let mut doc = store_with(vec![w.clone().into()]);
    let edge = Edge::new(Vertex::new(0.0, 0.0), Vertex::new(0.0, 9.0));
    let patch = Patch::from(WallPatch { edge: Some(edge), ..Default::default() });
    doc.update_entity(&w.id, &patch).unwrap();
    assert_eq!(doc.wall(&w.id).unwrap().edge, edge);
}

// =============================================================
// DocStore: delete
// =============================================================

#[test]
fn delete_removes_entity() {
    let t = terrain_at(0.0, 0.0);
    let mut doc = store_with(vec![t.clone().into()]);
    assert_eq!(doc.delete_entity(&t.id), Some(Change::Removed(t.id)));
    assert!(doc.get(&t.id).is_none());
}

#[test]
fn delete_twice_is_safe() {
    let t = terrain_at(0.0, 0.0);
    let keep = terrain_at(9.0, 9.0);
    let mut doc = store_with(vec![t.clone().into(), keep.clone().into()]);
    assert!(doc.delete_entity(&t.id).is_some());
    assert!(doc.delete_entity(&t.id).is_none());
    assert_eq!(doc.len(), 1);
    assert!(doc.get(&keep.id).is_some());
}

// =============================================================
// DocStore: serialization
// =============================================================

#[test]
fn serialize_round_trip_mixed_schema() {
    let doc = store_with(vec![
        terrain_at(500.0, 500.0).into(),
        wall_between(0.0, 0.0, 100.0, 0.0).into(),
        wall_between(100.0, 0.0, 100.0, 100.0).into(),
        Terrain::new(333.3, 12.5, Vertex::new(-7.25, 0.1)).into(),
    ]);
    let json = doc.serialize().unwrap();
    let back = DocStore::deserialize(&json).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn deserialized_entities_keep_derived_geometry() {
    let w = wall_between(0.0, 0.0, 30.0, 40.0);
    let doc = store_with(vec![w.clone().into()]);
    let back = DocStore::deserialize(&doc.serialize().unwrap()).unwrap();
    let loaded = back.wall(&w.id).unwrap();
    assert_eq!(loaded.length(), 50.0);
    assert_eq!(loaded.angle(), w.angle());
}

#[test]
fn serialized_layout_is_tagged_object_list() {
    let doc = store_with(vec![terrain_at(0.0, 0.0).into()]);
    let value: serde_json::Value = serde_json::from_str(&doc.serialize().unwrap()).unwrap();
    assert_eq!(value["objects"][0]["objectType"], "Terrain");
}

#[test]
fn deserialize_accepts_legacy_two_array_layout() {
    let raw = json!({
        "walls": [{ "id": Uuid::nil(), "edge": { "start": { "x": 0.0, "y": 0.0 }, "end": { "x": 1.0, "y": 0.0 } }, "thickness": 10.0, "height": 230.0 }],
        "terrains": [{ "width": 100.0, "height": 100.0, "center": { "x": 5.0, "y": 5.0 } }],
    });
    let doc = DocStore::deserialize(&raw.to_string()).unwrap();
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.entities()[0].kind(), EntityKind::Terrain);
    assert_eq!(doc.wall(&Uuid::nil()).unwrap().height, 230.0);
}

#[test]
fn deserialize_rejects_unknown_layout() {
    assert!(DocStore::deserialize(r#"{"shapes": []}"#).is_err());
    assert!(DocStore::deserialize(r#"{"objects": {"objectType": "Terrain"}}"#).is_err());
    assert!(DocStore::deserialize("not json").is_err());
}

#[test]
fn deserialize_keeps_records_with_foreign_ids() {
    let good = terrain_at(0.0, 0.0);
    let json = json!({
        "objects": [
            serde_json::to_value(Entity::from(good.clone())).unwrap(),
            {"objectType": "Terrain", "id": "t1", "width": 200.0, "height": 100.0, "center": {"x": 50.0, "y": 60.0}},
        ]
    })
    .to_string();

    let doc = DocStore::deserialize(&json).unwrap();
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.terrain(&good.id), Some(&good));

    let foreign = doc.terrains().find(|t| t.id != good.id).unwrap();
    assert_eq!(foreign.center, Vertex::new(50.0, 60.0));
    let again = DocStore::deserialize(&json).unwrap();
    assert!(again.terrain(&foreign.id).is_some());
}

#[test]
fn deserialize_drops_only_unreadable_records() {
    let good = terrain_at(0.0, 0.0);
    let wall = wall_between(0.0, 0.0, 100.0, 0.0);
    let json = json!({
        "objects": [
            serde_json::to_value(Entity::from(good.clone())).unwrap(),
            {"objectType": "Door"},
            {"objectType": "Terrain", "width": "wide"},
            serde_json::to_value(Entity::from(wall.clone())).unwrap(),
        ]
    })
    .to_string();

    let doc = DocStore::deserialize(&json).unwrap();
    let kept: Vec<ObjectId> = doc.entities().iter().map(Entity::id).collect();
    assert_eq!(kept, vec![good.id, wall.id]);
}

#[test]
fn legacy_layout_drops_only_unreadable_records() {
    let json = json!({
        "terrains": [{"id": 7, "width": 100.0, "height": 100.0, "center": {"x": 0.0, "y": 0.0}}],
        "walls": [{"id": "w-1", "edge": {"start": {"x": 0.0, "y": 0.0}, "end": {"x": 10.0, "y": 0.0}}}],
    })
    .to_string();

    let doc = DocStore::deserialize(&json).unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.walls().count(), 1);
}

#[test]
fn deserialize_drops_degenerate_and_duplicate_records() {
    let t = terrain_at(0.0, 0.0);
    let mut flat = t.clone();
    flat.id = Uuid::new_v4();
    flat.height = 0.0;
    let schema = Schema { objects: vec![t.clone().into(), t.clone().into(), flat.into()] };
    let json = serde_json::to_string(&schema).unwrap();
    let doc = DocStore::deserialize(&json).unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.terrain(&t.id), Some(&t));
}

#[test]
fn terrains_and_walls_filter_by_kind() {
    let doc = store_with(vec![
        terrain_at(0.0, 0.0).into(),
        wall_between(0.0, 0.0, 1.0, 0.0).into(),
        wall_between(1.0, 0.0, 2.0, 0.0).into(),
    ]);
    assert_eq!(doc.terrains().count(), 1);
    assert_eq!(doc.walls().count(), 2);
}

#[test]
fn outline_is_outset_by_half_a_seam() {
    let b = Terrain::new(200.0, 100.0, Vertex::new(0.0, 0.0)).bounds();
    let [top, right, ..] = b.outline();
    assert_eq!(top.start, Vertex::new(-50.5, -25.5));
    assert_eq!(right.end, Vertex::new(50.5, 25.5));
    assert_eq!(b.size_cm(), (200.0, 100.0));
}
