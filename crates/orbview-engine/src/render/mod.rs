//! Immediate-mode rendering.
//!
//! Scene code records points, lines and triangles every frame through
//! [`ImmediateRenderer`]; at the end of the frame the batches are packed into one
//! vertex stream and handed to a [`FrameBackend`], which turns them into GPU work.
//!
//! Convention:
//! - vertex positions are world-space `glam::Vec3`
//! - the vertex shader applies a single `projection * view` uniform
//! - classes are drawn in a fixed order: points, lines, triangles

mod backend;
mod batch;
mod error;
mod gpu_backend;
mod immediate;

pub use backend::{DrawCall, FrameBackend, FrameReport, FrameSubmission, SubmitOutcome};
pub use batch::{Batch, GpuVertex, PrimitiveClass, Vertex, DEFAULT_POINT_SIZE};
pub use error::FrameError;
pub use gpu_backend::{GpuBackend, ImmediatePipelines};
pub use immediate::{FramePhase, ImmediateRenderer, RendererConfig};
