use glam::{Mat4, Vec3};

use crate::paint::Color;

use super::{
    Batch, DrawCall, FrameBackend, FrameError, FrameReport, FrameSubmission, GpuVertex,
    PrimitiveClass, SubmitOutcome, Vertex,
};

/// Startup configuration of the immediate renderer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererConfig {
    /// Per-class vertex cap. Adds beyond it are rejected.
    pub max_vertices_per_batch: usize,
    /// Initial clear color; can be changed later with `set_clear_color`.
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_vertices_per_batch: 1000,
            clear_color: Color::BLACK,
        }
    }
}

/// Where the renderer is in the per-frame protocol.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FramePhase {
    Idle,
    Batching,
}

/// Accumulates primitives during a frame and hands them to a backend at its end.
///
/// Frame protocol:
/// - `begin_frame` clears all three batches
/// - `begin_*` clears one class; `add_*` appends to it; `end_*` is a marker
/// - `draw_*` is `begin_*` + `add_*` + `end_*` for a single shape, so it discards
///   anything that class accumulated earlier in the frame
/// - `end_frame` packs the batches and submits them
///
/// View, projection and model matrices persist across frames until replaced.
pub struct ImmediateRenderer {
    phase: FramePhase,
    batches: [Batch; 3],

    view: Mat4,
    projection: Mat4,
    model: Mat4,

    clear_color: Color,
    viewport: (u32, u32),

    // Reused across frames.
    staging: Vec<GpuVertex>,
    draws: Vec<DrawCall>,
}

impl ImmediateRenderer {
    pub fn new(config: RendererConfig) -> Self {
        let cap = config.max_vertices_per_batch;
        Self {
            phase: FramePhase::Idle,
            batches: PrimitiveClass::DRAW_ORDER.map(|class| Batch::new(class, cap)),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
            clear_color: config.clear_color,
            viewport: (0, 0),
            staging: Vec::with_capacity(cap * PrimitiveClass::DRAW_ORDER.len()),
            draws: Vec::with_capacity(PrimitiveClass::DRAW_ORDER.len()),
        }
    }

    #[inline]
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    #[inline]
    pub fn batch(&self, class: PrimitiveClass) -> &Batch {
        &self.batches[class.index()]
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    #[inline]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Stored model matrix. Not part of the uniform uploaded at `end_frame`.
    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        self.model
    }

    /// Combined transform uploaded to the shader: `projection * view`.
    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    // ---------------------------------------------------------------------
    // State setters (valid in any phase)
    // ---------------------------------------------------------------------

    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.view = view;
    }

    pub fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    pub fn set_model_matrix(&mut self, model: Mat4) {
        self.model = model;
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Records the framebuffer size. The backend renders to the full surface.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if self.viewport != (width, height) {
            log::debug!("viewport set to {width}x{height}");
            self.viewport = (width, height);
        }
    }

    // ---------------------------------------------------------------------
    // Frame protocol
    // ---------------------------------------------------------------------

    /// Starts recording a frame and clears every batch.
    pub fn begin_frame(&mut self) -> Result<(), FrameError> {
        if self.phase == FramePhase::Batching {
            let err = FrameError::FrameAlreadyStarted;
            log::warn!("{err}");
            return Err(err);
        }

        for batch in &mut self.batches {
            batch.clear();
        }
        self.phase = FramePhase::Batching;
        Ok(())
    }

    /// Packs non-empty batches in draw order and submits them to `backend`.
    ///
    /// The renderer is idle afterwards whatever the backend reports. Batches keep
    /// their contents until the next `begin_frame`.
    pub fn end_frame<B: FrameBackend>(
        &mut self,
        backend: &mut B,
    ) -> Result<FrameReport, FrameError> {
        self.require_batching("end_frame")?;
        self.phase = FramePhase::Idle;

        self.staging.clear();
        self.draws.clear();

        for class in PrimitiveClass::DRAW_ORDER {
            let batch = &self.batches[class.index()];
            if batch.is_empty() {
                continue;
            }

            let first_vertex = self.staging.len() as u32;
            self.staging
                .extend(batch.vertices().iter().map(|v| v.to_gpu()));
            self.draws.push(DrawCall {
                class,
                first_vertex,
                vertex_count: batch.len() as u32,
            });
        }

        let submission = FrameSubmission {
            clear_color: self.clear_color,
            view_projection: self.view_projection(),
            vertices: &self.staging,
            draws: &self.draws,
        };

        log::trace!(
            "end_frame: {} draws, {} vertices",
            submission.draws.len(),
            submission.vertices.len()
        );

        let outcome = backend.submit(&submission);
        match outcome {
            SubmitOutcome::Presented => {}
            SubmitOutcome::Skipped => log::debug!("frame skipped by backend"),
            SubmitOutcome::Fatal => log::error!("backend reported a fatal error"),
        }

        Ok(FrameReport {
            outcome,
            draw_calls: self.draws.len(),
            vertex_count: self.staging.len(),
        })
    }

    // ---------------------------------------------------------------------
    // Points
    // ---------------------------------------------------------------------

    pub fn begin_points(&mut self) -> Result<(), FrameError> {
        self.begin_class(PrimitiveClass::Points, "begin_points")
    }

    pub fn add_point(&mut self, position: Vec3, color: Color, size: f32) -> Result<(), FrameError> {
        self.push(
            PrimitiveClass::Points,
            "add_point",
            &[Vertex::new(position, color, size)],
        )
    }

    pub fn end_points(&mut self) -> Result<(), FrameError> {
        self.require_batching("end_points")
    }

    /// Replaces the points batch with a single point.
    pub fn draw_point(&mut self, position: Vec3, color: Color, size: f32) -> Result<(), FrameError> {
        self.begin_points()?;
        self.add_point(position, color, size)?;
        self.end_points()
    }

    // ---------------------------------------------------------------------
    // Lines
    // ---------------------------------------------------------------------

    pub fn begin_lines(&mut self) -> Result<(), FrameError> {
        self.begin_class(PrimitiveClass::Lines, "begin_lines")
    }

    pub fn add_line(&mut self, start: Vec3, end: Vec3, color: Color) -> Result<(), FrameError> {
        self.push(
            PrimitiveClass::Lines,
            "add_line",
            &[Vertex::new(start, color, 1.0), Vertex::new(end, color, 1.0)],
        )
    }

    pub fn end_lines(&mut self) -> Result<(), FrameError> {
        self.require_batching("end_lines")
    }

    /// Replaces the lines batch with a single segment.
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: Color) -> Result<(), FrameError> {
        self.begin_lines()?;
        self.add_line(start, end, color)?;
        self.end_lines()
    }

    // ---------------------------------------------------------------------
    // Triangles
    // ---------------------------------------------------------------------

    pub fn begin_triangles(&mut self) -> Result<(), FrameError> {
        self.begin_class(PrimitiveClass::Triangles, "begin_triangles")
    }

    pub fn add_triangle(
        &mut self,
        p0: Vec3,
        p1: Vec3,
        p2: Vec3,
        color: Color,
    ) -> Result<(), FrameError> {
        self.push(
            PrimitiveClass::Triangles,
            "add_triangle",
            &[
                Vertex::new(p0, color, 1.0),
                Vertex::new(p1, color, 1.0),
                Vertex::new(p2, color, 1.0),
            ],
        )
    }

    pub fn end_triangles(&mut self) -> Result<(), FrameError> {
        self.require_batching("end_triangles")
    }

    /// Replaces the triangles batch with a single triangle.
    pub fn draw_triangle(
        &mut self,
        p0: Vec3,
        p1: Vec3,
        p2: Vec3,
        color: Color,
    ) -> Result<(), FrameError> {
        self.begin_triangles()?;
        self.add_triangle(p0, p1, p2, color)?;
        self.end_triangles()
    }

    // ---------------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------------

    fn require_batching(&self, operation: &'static str) -> Result<(), FrameError> {
        if self.phase == FramePhase::Batching {
            return Ok(());
        }
        let err = FrameError::FrameNotStarted { operation };
        log::warn!("{err}");
        Err(err)
    }

    fn begin_class(&mut self, class: PrimitiveClass, operation: &'static str) -> Result<(), FrameError> {
        self.require_batching(operation)?;
        self.batches[class.index()].clear();
        Ok(())
    }

    fn push(
        &mut self,
        class: PrimitiveClass,
        operation: &'static str,
        shape: &[Vertex],
    ) -> Result<(), FrameError> {
        self.require_batching(operation)?;
        self.batches[class.index()]
            .push_shape(shape)
            .inspect_err(|err| log::warn!("{operation}: {err}"))
    }
}

impl Default for ImmediateRenderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}
