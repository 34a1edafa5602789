use std::sync::Arc;
use terrascroll_noise::NoiseField;

use crate::config::{ConfigError, TerrainConfig};
use crate::mesh::TileMesh;
use crate::tile::{TerrainTile, TileId, TileState};

/// Owns a fixed set of tiles laid end to end along +Z and scrolls them.
///
/// Each tile is a two-state machine. `advance` moves every tile forward; a tile
/// whose position passes `+tile_length / 2` jumps to the move-back offset and
/// is marked [`TileState::JustRecycled`] in the same write.
///
/// A delta that carries a tile more than a whole tile length past the boundary
/// still lands on the fixed move-back offset. Under a badly dropped frame this
/// shows as a pop; the overshoot is discarded, never carried.
#[derive(Debug)]
pub struct TerrainTileManager {
    config: TerrainConfig,
    noise: Arc<NoiseField>,
    tiles: Vec<TerrainTile>,
    half_extent: f32,
    move_back_offset: f32,
}

impl TerrainTileManager {
    /// Validate `config`, then bake `tile_count` tiles. Tile `i` starts at
    /// `-i · tile_length`, so the set initially covers the span behind the origin.
    pub fn new(config: TerrainConfig, noise: Arc<NoiseField>) -> Result<Self, ConfigError> {
        config.validate()?;
        let _span = tracing::info_span!(
            "terrain_setup",
            tiles = config.tile_count,
            segments = config.segments,
            seed = noise.seed()
        )
        .entered();

        let mut manager = Self {
            half_extent: config.half_extent(),
            move_back_offset: config.move_back_offset(),
            tiles: Vec::with_capacity(config.tile_count),
            config,
            noise,
        };
        for i in 0..manager.config.tile_count {
            let start = 0.0 - i as f32 * manager.config.tile_length;
            let tile = manager.bake_tile(TileId(i), start);
            manager.tiles.push(tile);
        }

        tracing::info!(
            tiles = manager.tiles.len(),
            half_extent = manager.half_extent,
            move_back = manager.move_back_offset,
            "terrain tiles ready"
        );
        Ok(manager)
    }

    /// Bake a standalone tile at `start_offset`.
    ///
    /// Heights depend only on tile-local coordinates and the configuration, so
    /// two calls with the same offset give identical meshes. The tile is not
    /// added to the manager; the owned tile set never grows after setup.
    pub fn build_tile(&self, start_offset: f32) -> TerrainTile {
        self.bake_tile(TileId(self.tiles.len()), start_offset)
    }

    fn bake_tile(&self, id: TileId, start_offset: f32) -> TerrainTile {
        let mesh = TileMesh::bake(&self.noise, &self.config);
        TerrainTile::new(id, mesh, start_offset)
    }

    /// Move every tile by `delta` along the scroll axis, recycling any tile
    /// that ends up past the forward boundary. Zero and negative deltas are
    /// fine; moving backwards never recycles.
    pub fn advance(&mut self, delta: f32) {
        for tile in &mut self.tiles {
            let next = tile.position + delta;
            if next > self.half_extent {
                tracing::debug!(
                    tile = %tile.id(),
                    from = next,
                    to = self.move_back_offset,
                    "recycling terrain tile"
                );
                tile.position = self.move_back_offset;
                tile.state = TileState::JustRecycled;
                tile.recycle_count += 1;
            } else {
                tile.position = next;
                tile.state = TileState::Advancing;
            }
        }
    }

    pub fn tiles(&self) -> &[TerrainTile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&TerrainTile> {
        self.tiles.get(id.0)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Current scroll-axis position of every tile, in id order.
    pub fn positions(&self) -> Vec<f32> {
        self.tiles.iter().map(TerrainTile::position).collect()
    }

    /// Forward visibility boundary, `tile_length / 2`.
    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    pub fn move_back_offset(&self) -> f32 {
        self.move_back_offset
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn noise(&self) -> &Arc<NoiseField> {
        &self.noise
    }

    /// FNV-1a over tile positions and mesh fingerprints, for comparing runs.
    pub fn fingerprint(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for tile in &self.tiles {
            mix(&mut h, &tile.position().to_le_bytes());
            mix(&mut h, &tile.mesh().fingerprint().to_le_bytes());
        }
        h
    }
}
