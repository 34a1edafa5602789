//! Shared types used across the terrascroll crates.

mod color;
mod types;

pub use color::{ColorParseError, Palette, Rgb};
pub use types::Transform;
