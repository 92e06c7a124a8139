//! Floorplan editor: terrain patches and walls drawn on a 2D plan and
//! mirrored into a 3D scene.
//!
//! The crate compiles to WebAssembly for the browser and to a plain library
//! for the headless binary and tests. It owns the document model, its
//! persistence, the drawing and editing tools, and the synchronization of
//! every entity with a 2D proxy and a 3D proxy. The host layer wires DOM
//! events to the engine, draws the 3D meshes, and reacts to the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Entities, patches, the schema, and the store |
//! | [`geom`] | Vertices, edges, unit conversion |
//! | [`storage`] | Key/value persistence of the schema and view mode |
//! | [`tools`] | Terrain placement, wall drawing, terrain editing |
//! | [`view`] | 2D and 3D proxies kept in sync with the store |
//! | [`camera`] | Pan/zoom plan camera and 3D orbit camera |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against entities and handles |
//! | [`render`] | Canvas painting of the retained plan shapes |
//! | [`config`] | Host-tunable settings |
//! | [`consts`] | Shared numeric constants (scale, zoom limits, label layout, etc.) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod render;
pub mod storage;
pub mod tools;
pub mod view;
