//! Orbit camera.
//!
//! The camera is parameterized by a look-at target, a distance and two angles
//! (yaw around world up, pitch above the horizon). The eye position is always
//! derived from those; `set_position` is the inverse mapping.
//!
//! Matrices are `glam::Mat4` in column-major storage, right-handed, with a
//! `[-1, 1]` clip-space depth range.

mod config;
mod orbit;

pub use config::{CameraConfig, MAX_PITCH_LIMIT};
pub use orbit::OrbitCamera;
