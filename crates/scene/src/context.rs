use glam::Vec3;
use std::sync::Arc;
use terrascroll_common::{Rgb, Transform};
use terrascroll_noise::NoiseField;
use terrascroll_terrain::TerrainTileManager;

use crate::camera::OrbitCamera;
use crate::config::{SceneConfig, SceneError};
use crate::lights::LightRig;

/// All per-session scene state, owned by the render loop driver.
///
/// The noise field is shared read-only with the terrain manager; tile
/// positions change only through [`SceneContext::step`].
#[derive(Debug)]
pub struct SceneContext {
    noise: Arc<NoiseField>,
    terrain: TerrainTileManager,
    pub camera: OrbitCamera,
    lights: LightRig,
    character: Transform,
    character_spin: f32,
    background: Rgb,
    terrain_color: Rgb,
    frame: u64,
    elapsed: f64,
}

impl SceneContext {
    /// Seed the noise field, bake the terrain and place the camera.
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        let noise = Arc::new(match config.seed {
            Some(seed) => NoiseField::new(seed),
            None => NoiseField::from_time(),
        });
        let terrain = TerrainTileManager::new(config.terrain, Arc::clone(&noise))?;
        tracing::info!(seed = noise.seed(), tiles = terrain.tile_count(), "scene created");

        Ok(Self {
            noise,
            terrain,
            camera: OrbitCamera::default(),
            lights: config.lights,
            character: Transform::from_translation(Vec3::new(0.0, -40.0, 0.0))
                .with_scale(Vec3::new(20.0, 40.0, 20.0)),
            character_spin: config.character_spin,
            background: config.background,
            terrain_color: config.terrain_color,
            frame: 0,
            elapsed: 0.0,
        })
    }

    /// Advance one frame of `dt` seconds.
    ///
    /// Terrain moves `scroll_speed · dt`; a negative `dt` scrolls it backwards.
    /// The character turntable only ever spins forward.
    pub fn step(&mut self, dt: f32) {
        self.frame += 1;
        self.elapsed += f64::from(dt.max(0.0));
        let delta = self.terrain.config().scroll_speed * dt;
        self.terrain.advance(delta);
        self.character.rotate_y(self.character_spin * dt.max(0.0));
        tracing::trace!(frame = self.frame, delta, "scene stepped");
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn terrain(&self) -> &TerrainTileManager {
        &self.terrain
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    /// Transform of the character stand-in box.
    pub fn character(&self) -> &Transform {
        &self.character
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn terrain_color(&self) -> Rgb {
        self.terrain_color
    }

    /// Frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seconds of forward time stepped so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// World transform of every tile, in tile id order.
    pub fn tile_transforms(&self) -> Vec<Transform> {
        let elevation = self.terrain.config().elevation;
        self.terrain
            .tiles()
            .iter()
            .map(|t| t.transform(elevation))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrascroll_terrain::{ConfigError, TerrainConfig};

    fn small_config() -> SceneConfig {
        SceneConfig {
            seed: Some(42),
            terrain: TerrainConfig {
                segments: 4,
                tile_length: 100.0,
                tile_width: 100.0,
                scroll_speed: 60.0,
                cross_fade: 0.0,
                ..TerrainConfig::default()
            },
            ..SceneConfig::default()
        }
    }

    #[test]
    fn new_scene_starts_at_frame_zero() {
        let scene = SceneContext::new(small_config()).unwrap();
        assert_eq!(scene.frame(), 0);
        assert_eq!(scene.noise().seed(), 42);
        assert_eq!(scene.terrain().tile_count(), 2);
        assert!(Arc::ptr_eq(&scene.noise, scene.terrain().noise()));
    }

    #[test]
    fn step_scrolls_by_speed_times_dt() {
        let mut scene = SceneContext::new(small_config()).unwrap();
        scene.step(0.5);
        assert_eq!(scene.terrain().positions(), vec![30.0, -70.0]);
        assert_eq!(scene.frame(), 1);
        assert_eq!(scene.elapsed(), 0.5);
    }

    #[test]
    fn step_spins_the_character() {
        let mut scene = SceneContext::new(small_config()).unwrap();
        let before = scene.character().rotation;
        scene.step(1.0 / 60.0);
        assert_ne!(scene.character().rotation, before);
        assert_eq!(scene.character().position, Vec3::new(0.0, -40.0, 0.0));
    }

    #[test]
    fn negative_dt_scrolls_back_without_spinning() {
        let mut scene = SceneContext::new(small_config()).unwrap();
        let before = scene.character().rotation;
        scene.step(-0.5);
        assert_eq!(scene.terrain().positions(), vec![-30.0, -130.0]);
        assert_eq!(scene.character().rotation, before);
        assert_eq!(scene.elapsed(), 0.0);
    }

    #[test]
    fn tile_transforms_use_elevation() {
        let scene = SceneContext::new(small_config()).unwrap();
        let transforms = scene.tile_transforms();
        assert_eq!(transforms.len(), 2);
        assert_eq!(transforms[1].position, Vec3::new(0.0, -60.0, -100.0));
    }

    #[test]
    fn same_seed_gives_same_scene() {
        let mut a = SceneContext::new(small_config()).unwrap();
        let mut b = SceneContext::new(small_config()).unwrap();
        for _ in 0..500 {
            a.step(1.0 / 60.0);
            b.step(1.0 / 60.0);
        }
        assert_eq!(a.terrain().fingerprint(), b.terrain().fingerprint());
    }

    #[test]
    fn bad_terrain_config_is_rejected() {
        let mut config = small_config();
        config.terrain.tile_count = 0;
        let err = SceneContext::new(config).unwrap_err();
        assert!(matches!(err, SceneError::Config(ConfigError::ZeroTileCount)));
    }
}
