//! Terrain: noise-baked tiles and the infinite-scroll recycler.
//!
//! # Invariants
//! - Tile heights are baked once at construction and never resampled.
//! - The tile count is fixed after setup; `advance` only moves tiles.
//! - A recycled tile lands exactly on the move-back offset, no overshoot carried.
//! - Only the manager writes tile positions; renderers read them.

mod config;
mod manager;
mod mesh;
mod tile;

pub use config::{ConfigError, MAX_SEGMENTS, TerrainConfig};
pub use manager::TerrainTileManager;
pub use mesh::TileMesh;
pub use terrascroll_noise::{HeightProfile, NoiseField, Octave, SeamMode};
pub use tile::{TerrainTile, TileId, TileState};
