use noise::{NoiseFn, OpenSimplex};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Deterministic 4D coherent noise sampler.
///
/// Wraps an OpenSimplex permutation table seeded once at construction. The
/// field holds no other state, so `sample` is a pure function of its inputs
/// and the field can be shared freely across threads.
#[derive(Clone)]
pub struct NoiseField {
    seed: u32,
    simplex: OpenSimplex,
}

impl NoiseField {
    /// Create a field with an explicit seed for reproducible terrain.
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            simplex: OpenSimplex::new(seed),
        }
    }

    /// Create a field seeded from the wall clock. Every run differs.
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let seed = (splitmix64(nanos) >> 32) as u32;
        tracing::debug!(seed, "noise field seeded from time");
        Self::new(seed)
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Sample the field at `(x, y, z, t)`. Always in `[-1, 1]`.
    ///
    /// OpenSimplex's normalisation is approximate, so the result is clamped to
    /// keep the bound exact.
    pub fn sample(&self, x: f64, y: f64, z: f64, t: f64) -> f64 {
        self.simplex.get([x, y, z, t]).clamp(-1.0, 1.0)
    }
}

impl fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

/// Splitmix64 step, used to spread clock bits across the whole seed.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn same_arguments_give_identical_bits() {
        let field = NoiseField::new(42);
        let a = field.sample(1.3, -2.7, 0.5, 0.0);
        let b = field.sample(1.3, -2.7, 0.5, 0.0);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn same_seed_gives_same_field() {
        let f1 = NoiseField::new(7);
        let f2 = NoiseField::new(7);
        for i in 0..100 {
            let x = i as f64 * 0.37;
            assert_eq!(
                f1.sample(x, x * 0.5, -x, 0.25).to_bits(),
                f2.sample(x, x * 0.5, -x, 0.25).to_bits()
            );
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let f1 = NoiseField::new(1);
        let f2 = NoiseField::new(2);
        let differs = (0..50).any(|i| {
            let x = i as f64 * 0.61 + 0.1;
            f1.sample(x, 0.3, x, 0.0) != f2.sample(x, 0.3, x, 0.0)
        });
        assert!(differs);
    }

    #[test]
    fn samples_stay_in_unit_range() {
        let field = NoiseField::new(1234);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..10_000 {
            let x = rng.gen_range(-1000.0..1000.0);
            let y = rng.gen_range(-1000.0..1000.0);
            let z = rng.gen_range(-1000.0..1000.0);
            let t = rng.gen_range(-10.0..10.0);
            let v = field.sample(x, y, z, t);
            assert!((-1.0..=1.0).contains(&v), "sample {v} out of range");
        }
    }

    #[test]
    fn neighbouring_points_are_close() {
        let field = NoiseField::new(5);
        let a = field.sample(10.0, 4.0, 0.0, 0.0);
        let b = field.sample(10.001, 4.0, 0.0, 0.0);
        assert!((a - b).abs() < 0.01);
    }

    #[test]
    fn field_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoiseField>();
    }

    #[test]
    fn time_seeded_fields_still_sample() {
        let field = NoiseField::from_time();
        let v = field.sample(0.5, 0.5, 0.5, 0.5);
        assert!(v.is_finite());
        assert_eq!(NoiseField::new(field.seed()).sample(0.5, 0.5, 0.5, 0.5), v);
    }
}
