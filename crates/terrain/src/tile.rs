use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use terrascroll_common::Transform;

use crate::mesh::TileMesh;

/// Stable index of a tile inside its manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub usize);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a tile is in its scroll cycle, as of the last `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileState {
    /// Moving forward through the visible span.
    #[default]
    Advancing,
    /// Passed the forward boundary on the last advance and was moved back.
    JustRecycled,
}

/// One terrain segment: baked mesh plus a scroll-axis position.
///
/// Only [`crate::TerrainTileManager`] can move a tile; everything else reads.
#[derive(Debug, Clone)]
pub struct TerrainTile {
    id: TileId,
    name: String,
    mesh: TileMesh,
    pub(crate) position: f32,
    pub(crate) state: TileState,
    pub(crate) recycle_count: u64,
}

impl TerrainTile {
    pub(crate) fn new(id: TileId, mesh: TileMesh, position: f32) -> Self {
        Self {
            id,
            name: format!("Terrain-{id}"),
            mesh,
            position,
            state: TileState::Advancing,
            recycle_count: 0,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &TileMesh {
        &self.mesh
    }

    /// Tile origin along the scroll axis (world Z).
    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    /// How many times this tile has been moved back.
    pub fn recycle_count(&self) -> u64 {
        self.recycle_count
    }

    /// World transform for a renderer, with the tile origin at `elevation`.
    pub fn transform(&self, elevation: f32) -> Transform {
        Transform::from_translation(Vec3::new(0.0, elevation, self.position))
    }
}
