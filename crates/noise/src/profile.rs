use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::field::NoiseField;

/// One noise layer: per-axis frequency and an amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Octave {
    pub frequency: DVec3,
    pub amplitude: f64,
}

impl Octave {
    /// Octave with the same frequency on every axis.
    pub fn uniform(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency: DVec3::splat(frequency),
            amplitude,
        }
    }

    /// Largest per-axis frequency; octaves are ordered by this value.
    pub fn peak_frequency(&self) -> f64 {
        self.frequency.max_element()
    }
}

/// How the scroll-axis coordinate is fed to the noise when baking a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeamMode {
    /// Sample at tile-local coordinates. Every tile gets the same heights and
    /// a small step is visible where two tiles meet.
    #[default]
    TileLocal,
    /// Wrap the scroll axis around a circle whose circumference is the tile
    /// length, using the fourth noise dimension. Front and back edges match.
    Wrapped,
}

/// Fractal height composition over a fixed octave list.
///
/// `height(x, y, z) = Σ noise(f·x, f·y, f·z, 0) · amplitude`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeightProfile {
    octaves: Vec<Octave>,
}

impl Default for HeightProfile {
    fn default() -> Self {
        Self::reference()
    }
}

impl HeightProfile {
    pub fn new(octaves: Vec<Octave>) -> Self {
        Self { octaves }
    }

    /// Three octaves: broad base shape, rolling detail, fine grain.
    pub fn reference() -> Self {
        Self::new(vec![
            Octave::uniform(0.01, 60.0),
            Octave::uniform(0.03, 10.0),
            Octave {
                frequency: DVec3::new(0.1, 0.125, 0.125),
                amplitude: 1.0,
            },
        ])
    }

    pub fn octaves(&self) -> &[Octave] {
        &self.octaves
    }

    /// Upper bound on `|height|`, the sum of all amplitudes.
    pub fn max_amplitude(&self) -> f64 {
        self.octaves.iter().map(|o| o.amplitude.abs()).sum()
    }

    /// Fractal height at an arbitrary point, noise time fixed at zero.
    pub fn height(&self, field: &NoiseField, x: f64, y: f64, z: f64) -> f64 {
        self.octaves
            .iter()
            .map(|o| {
                let f = o.frequency;
                field.sample(f.x * x, f.y * y, f.z * z, 0.0) * o.amplitude
            })
            .sum()
    }

    /// Height of a flat surface point before displacement.
    ///
    /// `x` runs across the tile and `s` along the scroll axis, both tile-local.
    /// `period` is the tile length; it is only used by [`SeamMode::Wrapped`].
    pub fn surface_height(
        &self,
        field: &NoiseField,
        x: f64,
        s: f64,
        seam: SeamMode,
        period: f64,
    ) -> f64 {
        match seam {
            SeamMode::TileLocal => self.height(field, x, s, 0.0),
            SeamMode::Wrapped => {
                let radius = period / TAU;
                let theta = TAU * s / period;
                let (sin, cos) = theta.sin_cos();
                self.octaves
                    .iter()
                    .map(|o| {
                        let f = o.frequency;
                        let ring = f.y * radius;
                        field.sample(f.x * x, ring * cos, 0.0, ring * sin) * o.amplitude
                    })
                    .sum()
            }
        }
    }
}
