use serde::{Deserialize, Serialize};
use std::path::Path;
use terrascroll_common::{Palette, Rgb};
use terrascroll_terrain::{ConfigError, TerrainConfig};

use crate::lights::LightRig;

/// Errors from loading or validating a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid terrain configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Everything needed to build a [`crate::SceneContext`].
///
/// Every field has a default, so a YAML file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Noise seed. `None` seeds from the clock.
    pub seed: Option<u32>,
    /// Character stand-in turntable rate, radians per second.
    pub character_spin: f32,
    pub background: Rgb,
    pub terrain_color: Rgb,
    pub lights: LightRig,
    pub terrain: TerrainConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            character_spin: 0.6,
            background: Palette::NIGHT_OWL_BLUE,
            terrain_color: Palette::CLASSIC_BLUE,
            lights: LightRig::default(),
            terrain: TerrainConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SceneError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.terrain.validate()?;
        Ok(config)
    }

    /// Read and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "scene config loaded");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, SceneError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn with_seed(mut self, seed: Option<u32>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use terrascroll_terrain::SeamMode;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = SceneConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn partial_yaml_overrides_fields() {
        let yaml = r#"
seed: 1234
terrain:
  segments: 8
  tile_length: 200.0
  seam: wrapped
  octaves:
    - { frequency: [0.02, 0.02, 0.02], amplitude: 30.0 }
"#;
        let config = SceneConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.terrain.segments, 8);
        assert_eq!(config.terrain.tile_length, 200.0);
        assert_eq!(config.terrain.tile_width, 1500.0);
        assert_eq!(config.terrain.seam, SeamMode::Wrapped);
        assert_eq!(config.terrain.octaves.octaves().len(), 1);
        assert_eq!(config.terrain.octaves.octaves()[0].amplitude, 30.0);
    }

    #[test]
    fn yaml_round_trips() {
        let config = SceneConfig::default().with_seed(Some(9));
        let text = config.to_yaml().unwrap();
        assert!(text.contains("background: '#011627'") || text.contains("background: \"#011627\""));
        let back = SceneConfig::from_yaml_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn invalid_terrain_fails_fast() {
        let err = SceneConfig::from_yaml_str("terrain: { segments: 0 }").unwrap_err();
        assert!(matches!(err, SceneError::Config(ConfigError::ZeroSegments)));
    }

    #[test]
    fn bad_colour_is_a_yaml_error() {
        let err = SceneConfig::from_yaml_str("background: blue").unwrap_err();
        assert!(matches!(err, SceneError::Yaml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "character_spin: 1.5").unwrap();
        let config = SceneConfig::load(file.path()).unwrap();
        assert_eq!(config.character_spin, 1.5);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneConfig::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, SceneError::Io(_)));
    }

    #[test]
    fn cli_seed_overrides_only_when_given() {
        let config = SceneConfig {
            seed: Some(5),
            ..SceneConfig::default()
        };
        assert_eq!(config.clone().with_seed(None).seed, Some(5));
        assert_eq!(config.with_seed(Some(6)).seed, Some(6));
    }
}
