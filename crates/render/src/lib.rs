//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers only read the scene; tile positions belong to the terrain manager.
//! - Tile meshes are read once for upload; positions are read every frame.
//!
//! The GPU backend lives in `terrascroll-render-wgpu`. The text renderer here
//! drives headless runs and tests through the same trait.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    concat!("terrascroll-render v", env!("CARGO_PKG_VERSION"))
}
