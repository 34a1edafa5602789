use glam::Vec3;
use std::fmt::Write;
use terrascroll_scene::{OrbitCamera, SceneContext};
use terrascroll_terrain::TileState;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_camera(&OrbitCamera::default())
    }
}

impl RenderView {
    pub fn from_camera(camera: &OrbitCamera) -> Self {
        Self {
            eye: camera.position(),
            target: camera.target,
            fov_degrees: camera.fov.to_degrees(),
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and a view, then produces output. It never
/// moves tiles; scroll state is owned by the terrain manager.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &SceneContext, view: &RenderView) -> Self::Output;
}

/// Text renderer for headless runs, logging and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneContext, view: &RenderView) -> String {
        let terrain = scene.terrain();
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "=== Scene (frame={}, elapsed={:.2}s, seed={}) ===",
            scene.frame(),
            scene.elapsed(),
            scene.noise().seed()
        );
        let _ = writeln!(
            out,
            "Tiles: {}  boundary=+{:.1}  move_back={:.1}",
            terrain.tile_count(),
            terrain.half_extent(),
            terrain.move_back_offset()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );

        for tile in terrain.tiles() {
            let (lo, hi) = tile.mesh().height_range();
            let state = match tile.state() {
                TileState::Advancing => "advancing",
                TileState::JustRecycled => "recycled",
            };
            let _ = writeln!(
                out,
                "  [{}] z={:.2} state={} recycles={} verts={} heights=[{:.2}, {:.2}]",
                tile.name(),
                tile.position(),
                state,
                tile.recycle_count(),
                tile.mesh().vertex_count(),
                lo,
                hi
            );
        }

        out
    }
}
