use glam::Vec3;
use terrascroll_noise::NoiseField;

use crate::config::TerrainConfig;

/// Baked tile geometry in tile-local space.
///
/// The plane lies in XZ centred on the tile origin: `tile_width` along X,
/// `tile_length` along Z (the scroll axis), heights displace along +Y.
/// Vertices are row-major, row = Z index from back (-Z) to front (+Z),
/// column = X index from left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMesh {
    segments: u32,
    positions: Vec<Vec3>,
    heights: Vec<f32>,
    indices: Vec<u32>,
}

impl TileMesh {
    /// Sample the height profile once per vertex and triangulate the grid.
    pub fn bake(field: &NoiseField, config: &TerrainConfig) -> Self {
        let _span = tracing::info_span!("bake_tile_mesh", segments = config.segments).entered();

        let n = config.vertices_per_side();
        let seg = config.segments as f32;
        let (width, length) = (config.tile_width, config.tile_length);
        let period = f64::from(length);

        let mut positions = Vec::with_capacity(n * n);
        let mut heights = Vec::with_capacity(n * n);
        for row in 0..n {
            let z = -length / 2.0 + row as f32 * length / seg;
            for col in 0..n {
                let x = -width / 2.0 + col as f32 * width / seg;
                let h = config.octaves.surface_height(
                    field,
                    f64::from(x),
                    f64::from(z),
                    config.seam,
                    period,
                ) as f32;
                positions.push(Vec3::new(x, h, z));
                heights.push(h);
            }
        }

        let mut indices = Vec::with_capacity(config.segments as usize * config.segments as usize * 6);
        let stride = n as u32;
        for row in 0..config.segments {
            for col in 0..config.segments {
                let back_left = row * stride + col;
                let back_right = back_left + 1;
                let front_left = back_left + stride;
                let front_right = front_left + 1;
                // Counter-clockwise seen from +Y.
                indices.extend_from_slice(&[
                    back_left,
                    front_left,
                    back_right,
                    back_right,
                    front_left,
                    front_right,
                ]);
            }
        }

        tracing::debug!(
            vertices = positions.len(),
            triangles = indices.len() / 3,
            "tile mesh baked"
        );

        Self {
            segments: config.segments,
            positions,
            heights,
            indices,
        }
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn vertices_per_side(&self) -> usize {
        self.segments as usize + 1
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Height at a grid row (Z index) and column (X index).
    pub fn height_at(&self, row: usize, col: usize) -> Option<f32> {
        let n = self.vertices_per_side();
        if row >= n || col >= n {
            return None;
        }
        self.heights.get(row * n + col).copied()
    }

    /// One row of heights, back row first.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        let n = self.vertices_per_side();
        (row < n).then(|| &self.heights[row * n..(row + 1) * n])
    }

    /// Lowest and highest baked height.
    pub fn height_range(&self) -> (f32, f32) {
        self.heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }

    /// FNV-1a over the height bit patterns. Equal bakes give equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for height in &self.heights {
            for b in height.to_le_bytes() {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrascroll_noise::SeamMode;

    fn small_config(segments: u32) -> TerrainConfig {
        TerrainConfig {
            segments,
            tile_length: 100.0,
            tile_width: 80.0,
            ..TerrainConfig::default()
        }
    }

    #[test]
    fn grid_has_expected_counts() {
        let field = NoiseField::new(1);
        let mesh = TileMesh::bake(&field, &small_config(2));
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.heights().len(), 9);
        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(mesh.indices().len(), 24);
        assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn single_segment_is_two_triangles() {
        let field = NoiseField::new(1);
        let mesh = TileMesh::bake(&field, &small_config(1));
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), &[0, 2, 1, 1, 2, 3]);
    }

    #[test]
    fn corners_span_the_tile() {
        let field = NoiseField::new(1);
        let mesh = TileMesh::bake(&field, &small_config(4));
        let first = mesh.positions()[0];
        let last = *mesh.positions().last().unwrap();
        assert_eq!((first.x, first.z), (-40.0, -50.0));
        assert_eq!((last.x, last.z), (40.0, 50.0));
    }

    #[test]
    fn positions_carry_baked_heights() {
        let field = NoiseField::new(9);
        let mesh = TileMesh::bake(&field, &small_config(3));
        for (p, h) in mesh.positions().iter().zip(mesh.heights()) {
            assert_eq!(p.y, *h);
        }
    }

    #[test]
    fn triangles_face_up() {
        let field = NoiseField::new(2);
        let mut config = small_config(3);
        config.octaves = terrascroll_noise::HeightProfile::new(vec![
            terrascroll_noise::Octave::uniform(0.01, 0.0),
        ]);
        let mesh = TileMesh::bake(&field, &config);
        for tri in mesh.indices().chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.positions()[tri[k] as usize]);
            let normal = (b - a).cross(c - a);
            assert!(normal.y > 0.0);
        }
    }

    #[test]
    fn bake_is_deterministic() {
        let field = NoiseField::new(77);
        let config = small_config(8);
        let a = TileMesh::bake(&field, &config);
        let b = TileMesh::bake(&field, &config);
        assert_eq!(a.heights(), b.heights());
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn heights_stay_within_amplitude() {
        let field = NoiseField::new(4);
        let config = small_config(16);
        let mesh = TileMesh::bake(&field, &config);
        let bound = config.octaves.max_amplitude() as f32;
        let (lo, hi) = mesh.height_range();
        assert!(lo >= -bound && hi <= bound);
        assert!(lo < hi);
    }

    #[test]
    fn wrapped_seam_matches_front_and_back_rows() {
        let field = NoiseField::new(21);
        let config = TerrainConfig {
            seam: SeamMode::Wrapped,
            ..small_config(10)
        };
        let mesh = TileMesh::bake(&field, &config);
        let back = mesh.row(0).unwrap();
        let front = mesh.row(10).unwrap();
        for (b, f) in back.iter().zip(front) {
            assert!((b - f).abs() < 1e-4, "{b} vs {f}");
        }
    }

    #[test]
    fn height_at_bounds() {
        let field = NoiseField::new(4);
        let mesh = TileMesh::bake(&field, &small_config(2));
        assert_eq!(mesh.height_at(1, 1), Some(mesh.heights()[4]));
        assert_eq!(mesh.height_at(3, 0), None);
        assert!(mesh.row(3).is_none());
    }
}
