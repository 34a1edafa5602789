//! wgpu render backend for terrascroll.
//!
//! Draws the scrolling terrain tiles and an instanced box standing in for the
//! character. Tile meshes are uploaded once; each frame only the per-tile
//! instance transforms are rewritten.
//!
//! # Invariants
//! - Renderer never mutates scene state.
//! - GPU buffers hold baked heights; nothing is resampled per frame.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
