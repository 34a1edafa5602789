//! Noise: deterministic coherent noise and fractal height composition.
//!
//! # Invariants
//! - A `NoiseField` is immutable after construction; samples are pure.
//! - Samples are bounded to `[-1, 1]`.
//! - A `HeightProfile` sums a fixed octave list; it never owns the field.

mod field;
mod profile;

pub use field::NoiseField;
pub use profile::{HeightProfile, Octave, SeamMode};
