use std::ops::Range;

use glam::Mat4;

use crate::paint::Color;

use super::{GpuVertex, PrimitiveClass};

/// One draw over a contiguous range of the frame's vertex stream.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub class: PrimitiveClass,
    pub first_vertex: u32,
    pub vertex_count: u32,
}

impl DrawCall {
    #[inline]
    pub fn vertex_range(&self) -> Range<u32> {
        self.first_vertex..self.first_vertex + self.vertex_count
    }
}

/// Everything a backend needs to render one frame.
///
/// `vertices` holds every non-empty batch back to back in draw order; each
/// entry of `draws` addresses its slice of it.
#[derive(Debug, Copy, Clone)]
pub struct FrameSubmission<'a> {
    pub clear_color: Color,
    pub view_projection: Mat4,
    pub vertices: &'a [GpuVertex],
    pub draws: &'a [DrawCall],
}

/// Result of handing a frame to the backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// Commands were submitted and the surface image presented.
    Presented,
    /// No surface image was available; nothing was drawn. Retry next frame.
    Skipped,
    /// The backend cannot continue (e.g. out of memory).
    Fatal,
}

/// GPU-facing collaborator of the immediate renderer.
///
/// An implementation acquires the presentable surface, uploads the uniform and
/// vertex data, encodes one draw per [`DrawCall`] in order, submits the command
/// buffer and presents.
pub trait FrameBackend {
    fn submit(&mut self, frame: &FrameSubmission<'_>) -> SubmitOutcome;
}

/// Summary returned by `ImmediateRenderer::end_frame`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameReport {
    pub outcome: SubmitOutcome,
    /// Draw calls handed to the backend.
    pub draw_calls: usize,
    /// Vertices handed to the backend across all draw calls.
    pub vertex_count: usize,
}
