//! Orbview engine crate.
//!
//! Platform runtime, GPU context, input, an orbit camera and an immediate-mode
//! renderer for points, lines and triangles.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod paint;
pub mod camera;
pub mod render;
