use serde::{Deserialize, Serialize};
use terrascroll_noise::{HeightProfile, SeamMode};

/// Construction-time terrain configuration.
///
/// Lengths are world units; `scroll_speed` is world units per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Grid cells per side. A tile has `(segments + 1)²` vertices.
    pub segments: u32,
    /// Tile size along the scroll axis (Z).
    pub tile_length: f32,
    /// Tile size across the scroll axis (X).
    pub tile_width: f32,
    pub tile_count: usize,
    pub scroll_speed: f32,
    /// Overlap reserved between consecutive tiles when one is recycled.
    pub cross_fade: f32,
    /// World Y of every tile origin.
    pub elevation: f32,
    pub seam: SeamMode,
    pub octaves: HeightProfile,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            segments: 20,
            tile_length: 1500.0,
            tile_width: 1500.0,
            tile_count: 2,
            scroll_speed: 60.0,
            cross_fade: 10.0,
            elevation: -60.0,
            seam: SeamMode::TileLocal,
            octaves: HeightProfile::reference(),
        }
    }
}

/// Largest resolution whose `(segments + 1)²` vertices fit in `u32` indices.
pub const MAX_SEGMENTS: u32 = 65_534;

/// Misconfiguration detected before any tile is built.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("tile resolution must be at least 1 segment")]
    ZeroSegments,
    #[error("tile resolution {0} exceeds the maximum of 65534 segments")]
    TooManySegments(u32),
    #[error("at least one terrain tile is required")]
    ZeroTileCount,
    #[error("{name} must be finite and positive, got {value}")]
    InvalidDimension { name: &'static str, value: f32 },
    #[error("cross-fade must be finite, non-negative and under half the tile length, got {0}")]
    InvalidCrossFade(f32),
    #[error("scroll speed must be finite, got {0}")]
    InvalidScrollSpeed(f32),
    #[error("height profile needs at least one octave")]
    NoOctaves,
    #[error("octave {index} is invalid: {reason}")]
    InvalidOctave { index: usize, reason: &'static str },
    #[error("octave {index} must have a higher frequency and no larger amplitude than octave {}", .index - 1)]
    OctaveOrdering { index: usize },
}

impl TerrainConfig {
    /// Check every field. Called by the manager before building tiles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segments == 0 {
            return Err(ConfigError::ZeroSegments);
        }
        if self.segments > MAX_SEGMENTS {
            return Err(ConfigError::TooManySegments(self.segments));
        }
        if self.tile_count == 0 {
            return Err(ConfigError::ZeroTileCount);
        }
        for (name, value) in [
            ("tile_length", self.tile_length),
            ("tile_width", self.tile_width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDimension { name, value });
            }
        }
        if !self.elevation.is_finite() {
            return Err(ConfigError::InvalidDimension {
                name: "elevation",
                value: self.elevation,
            });
        }
        if !self.cross_fade.is_finite()
            || self.cross_fade < 0.0
            || 2.0 * self.cross_fade >= self.tile_length
        {
            return Err(ConfigError::InvalidCrossFade(self.cross_fade));
        }
        if !self.scroll_speed.is_finite() {
            return Err(ConfigError::InvalidScrollSpeed(self.scroll_speed));
        }
        self.validate_octaves()
    }

    fn validate_octaves(&self) -> Result<(), ConfigError> {
        let octaves = self.octaves.octaves();
        if octaves.is_empty() {
            return Err(ConfigError::NoOctaves);
        }
        for (index, octave) in octaves.iter().enumerate() {
            if !octave.frequency.is_finite() || octave.frequency.min_element() < 0.0 {
                return Err(ConfigError::InvalidOctave {
                    index,
                    reason: "frequency components must be finite and non-negative",
                });
            }
            if !octave.amplitude.is_finite() || octave.amplitude < 0.0 {
                return Err(ConfigError::InvalidOctave {
                    index,
                    reason: "amplitude must be finite and non-negative",
                });
            }
        }
        for (i, pair) in octaves.windows(2).enumerate() {
            let (lower, higher) = (&pair[0], &pair[1]);
            if higher.peak_frequency() <= lower.peak_frequency()
                || higher.amplitude > lower.amplitude
            {
                return Err(ConfigError::OctaveOrdering { index: i + 1 });
            }
        }
        Ok(())
    }

    pub fn half_extent(&self) -> f32 {
        self.tile_length / 2.0
    }

    /// Position a tile jumps to once it passes the forward boundary:
    /// `-(L/2) + 2·cross_fade - L`.
    pub fn move_back_offset(&self) -> f32 {
        -self.half_extent() + 2.0 * self.cross_fade - self.tile_length
    }

    pub fn vertices_per_side(&self) -> usize {
        self.segments as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrascroll_noise::Octave;

    #[test]
    fn default_config_is_valid() {
        let config = TerrainConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.tile_count, 2);
        assert_eq!(config.octaves.octaves().len(), 3);
    }

    #[test]
    fn move_back_offset_formula() {
        let config = TerrainConfig {
            tile_length: 100.0,
            cross_fade: 10.0,
            ..TerrainConfig::default()
        };
        assert_eq!(config.half_extent(), 50.0);
        assert_eq!(config.move_back_offset(), -130.0);
    }

    #[test]
    fn rejects_zero_segments() {
        let config = TerrainConfig {
            segments: 0,
            ..TerrainConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSegments));
    }

    #[test]
    fn rejects_segments_that_overflow_indices() {
        let config = TerrainConfig {
            segments: MAX_SEGMENTS + 1,
            ..TerrainConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManySegments(MAX_SEGMENTS + 1))
        );
        let largest = u64::from(MAX_SEGMENTS + 1);
        assert!(largest * largest - 1 <= u64::from(u32::MAX));

        let at_limit = TerrainConfig {
            segments: MAX_SEGMENTS,
            ..TerrainConfig::default()
        };
        assert_eq!(at_limit.validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_tiles() {
        let config = TerrainConfig {
            tile_count: 0,
            ..TerrainConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTileCount));
    }

    #[test]
    fn rejects_bad_dimensions() {
        let config = TerrainConfig {
            tile_width: -1.0,
            ..TerrainConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimension {
                name: "tile_width",
                ..
            })
        ));

        let config = TerrainConfig {
            tile_length: f32::NAN,
            ..TerrainConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimension {
                name: "tile_length",
                ..
            })
        ));
    }

    #[test]
    fn rejects_cross_fade_out_of_range() {
        for cross_fade in [-1.0, 50.0, 75.0, f32::INFINITY] {
            let config = TerrainConfig {
                tile_length: 100.0,
                cross_fade,
                ..TerrainConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidCrossFade(_))),
                "cross_fade {cross_fade} accepted"
            );
        }
    }

    #[test]
    fn negative_speed_is_allowed() {
        let config = TerrainConfig {
            scroll_speed: -30.0,
            ..TerrainConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_empty_octaves() {
        let config = TerrainConfig {
            octaves: HeightProfile::new(Vec::new()),
            ..TerrainConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoOctaves));
    }

    #[test]
    fn rejects_amplitude_growing_with_frequency() {
        let config = TerrainConfig {
            octaves: HeightProfile::new(vec![
                Octave::uniform(0.01, 10.0),
                Octave::uniform(0.05, 20.0),
            ]),
            ..TerrainConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::OctaveOrdering { index: 1 })
        );
    }

    #[test]
    fn rejects_unsorted_frequencies() {
        let config = TerrainConfig {
            octaves: HeightProfile::new(vec![
                Octave::uniform(0.05, 10.0),
                Octave::uniform(0.01, 5.0),
            ]),
            ..TerrainConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::OctaveOrdering { index: 1 })
        );
    }

    #[test]
    fn rejects_non_finite_octave() {
        let config = TerrainConfig {
            octaves: HeightProfile::new(vec![Octave::uniform(f64::NAN, 1.0)]),
            ..TerrainConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOctave { index: 0, .. })
        ));
    }

    #[test]
    fn errors_are_descriptive() {
        let msg = ConfigError::OctaveOrdering { index: 2 }.to_string();
        assert!(msg.contains("octave 2"));
        assert!(msg.contains("octave 1"));
    }
}
