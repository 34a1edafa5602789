//! Scene: the explicitly owned context a render loop drives.
//!
//! # Invariants
//! - One `SceneContext` per session; created at startup, dropped at shutdown.
//! - Stepping the scene is the only way terrain positions change.
//! - Camera and character motion never feed back into terrain generation.

mod camera;
mod config;
mod context;
mod lights;

pub use camera::OrbitCamera;
pub use config::{SceneConfig, SceneError};
pub use context::SceneContext;
pub use lights::{AmbientLight, DirectionalLight, HemisphereLight, LightRig};
