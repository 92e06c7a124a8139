//! View synchronization: one live proxy per entity per rendering surface.
//!
//! The engine forwards every [`Change`] from the store to each [`View`]. A
//! view owns the map from entity id to its proxy on the surface, so a proxy
//! is created on `Added`, updated in place on `Updated`, and disposed on
//! `Removed`. Nothing else holds proxy handles, which keeps a proxy from
//! outliving its entity.
//!
//! | Module | Surface |
//! |--------|---------|
//! | [`plan`] | 2D canvas shapes ([`plan::Surface2d`]) |
//! | [`scene`] | 3D meshes ([`scene::Surface3d`]) |

pub mod plan;
pub mod scene;

use crate::doc::{Change, DocStore};

/// A presentation layer kept in sync with the store.
pub trait View {
    /// Apply one structural change. `doc` already reflects it.
    fn apply(&mut self, doc: &DocStore, change: &Change);

    /// Create proxies for every entity, in draw order.
    fn rebuild(&mut self, doc: &DocStore) {
        for entity in doc.entities() {
            self.apply(doc, &Change::Added(entity.id()));
        }
    }

    /// Number of live entity proxies.
    fn proxy_count(&self) -> usize;
}
