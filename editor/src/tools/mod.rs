//! Interactive tools layered over the plan view.
//!
//! | Module | Role |
//! |--------|------|
//! | [`terrain`] | Ghost placement of a new terrain |
//! | [`wall`] | Chain drawing with axis and endpoint snapping |
//! | [`edit`] | Resize math, dimension labels, typed edge lengths |
//!
//! Drawing tools run as a [`Session`] owned by the engine. A session only
//! touches the 2D surface; the entities it produces reach the store when it
//! is finished with `commit = true`.

pub mod edit;
pub mod terrain;
pub mod wall;

use crate::doc::Entity;
use crate::input::Tool;
use crate::view::plan::Surface2d;

use self::terrain::TerrainSession;
use self::wall::WallSession;

/// The active drawing tool and its temporary state.
#[derive(Debug)]
pub enum Session {
    Terrain(TerrainSession),
    Wall(WallSession),
}

impl Session {
    #[must_use]
    pub fn tool(&self) -> Tool {
        match self {
            Self::Terrain(_) => Tool::Terrain,
            Self::Wall(_) => Tool::Wall,
        }
    }

    /// Guidance text for the host while this session runs.
    #[must_use]
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Terrain(_) => terrain::TERRAIN_GUIDANCE,
            Self::Wall(_) => wall::WALL_GUIDANCE,
        }
    }

    /// Tear down the overlay. With `commit`, return the entities to add.
    pub fn finish<P: Surface2d>(self, surface: &mut P, commit: bool) -> Vec<Entity> {
        match (self, commit) {
            (Self::Terrain(s), true) => vec![s.commit(surface).into()],
            (Self::Wall(s), true) => s.confirm(surface).into_iter().map(Entity::from).collect(),
            (Self::Terrain(s), false) => {
                s.cancel(surface);
                Vec::new()
            }
            (Self::Wall(s), false) => {
                s.cancel(surface);
                Vec::new()
            }
        }
    }
}
