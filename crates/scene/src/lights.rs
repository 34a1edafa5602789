use glam::Vec3;
use serde::{Deserialize, Serialize};
use terrascroll_common::{Palette, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

/// Sky/ground gradient light, blended by surface normal Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HemisphereLight {
    pub sky: Rgb,
    pub ground: Rgb,
    pub intensity: f32,
}

/// Light from `position` toward the origin. No shadows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from the surface toward the light.
    pub fn direction_to_light(&self) -> Vec3 {
        self.position.normalize_or(Vec3::Y)
    }
}

/// The lights a renderer should apply, as plain data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub hemisphere: HemisphereLight,
    pub directional: DirectionalLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: Palette::LIGHT_CREAM,
                intensity: 0.35,
            },
            hemisphere: HemisphereLight {
                sky: Palette::LIGHT_CREAM,
                ground: Palette::BLACK,
                intensity: 0.95,
            },
            directional: DirectionalLight {
                color: Palette::LIGHT_CREAM,
                intensity: 0.5,
                position: Vec3::new(0.0, 100.0, 100.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rig_lights_from_above_and_front() {
        let rig = LightRig::default();
        let dir = rig.directional.direction_to_light();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.y > 0.0 && dir.z > 0.0);
        assert_eq!(rig.hemisphere.ground, Palette::BLACK);
    }

    #[test]
    fn zero_position_falls_back_to_up() {
        let light = DirectionalLight {
            position: Vec3::ZERO,
            ..LightRig::default().directional
        };
        assert_eq!(light.direction_to_light(), Vec3::Y);
    }
}
