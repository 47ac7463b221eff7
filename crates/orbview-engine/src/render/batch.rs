use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::paint::Color;

use super::FrameError;

/// Point size used when scene code does not pick one.
pub const DEFAULT_POINT_SIZE: f32 = 5.0;

/// Primitive class of a batch; each class owns one pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveClass {
    Points,
    Lines,
    Triangles,
}

impl PrimitiveClass {
    /// Order in which non-empty batches are drawn. Later classes draw on top.
    pub const DRAW_ORDER: [PrimitiveClass; 3] = [
        PrimitiveClass::Points,
        PrimitiveClass::Lines,
        PrimitiveClass::Triangles,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PrimitiveClass::Points => 0,
            PrimitiveClass::Lines => 1,
            PrimitiveClass::Triangles => 2,
        }
    }

    /// Vertices appended per shape: 1 per point, 2 per segment, 3 per triangle.
    #[inline]
    pub const fn vertices_per_primitive(self) -> usize {
        match self {
            PrimitiveClass::Points => 1,
            PrimitiveClass::Lines => 2,
            PrimitiveClass::Triangles => 3,
        }
    }

    #[inline]
    pub const fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveClass::Points => wgpu::PrimitiveTopology::PointList,
            PrimitiveClass::Lines => wgpu::PrimitiveTopology::LineList,
            PrimitiveClass::Triangles => wgpu::PrimitiveTopology::TriangleList,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveClass::Points => "points",
            PrimitiveClass::Lines => "lines",
            PrimitiveClass::Triangles => "triangles",
        }
    }
}

impl fmt::Display for PrimitiveClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One recorded vertex. Lives until the next `begin_frame`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Color,
    /// Point size hint; carried in the vertex layout, not used by the fragment stage.
    pub size: f32,
}

impl Vertex {
    #[inline]
    pub const fn new(position: Vec3, color: Color, size: f32) -> Self {
        Self { position, color, size }
    }

    #[inline]
    pub fn to_gpu(self) -> GpuVertex {
        GpuVertex {
            position: self.position.to_array(),
            color: self.color.to_array(),
            size: self.size,
        }
    }
}

/// GPU layout of [`Vertex`]: 32 bytes, tightly packed.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub size: f32,
}

impl GpuVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4, // color
        2 => Float32    // size
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Ordered vertices of one primitive class.
///
/// Shapes are appended whole, so the length is always a multiple of
/// [`PrimitiveClass::vertices_per_primitive`]. A shape that would overflow the
/// capacity is rejected and leaves the batch untouched.
#[derive(Debug, Clone)]
pub struct Batch {
    class: PrimitiveClass,
    vertices: Vec<Vertex>,
    capacity: usize,
}

impl Batch {
    pub fn new(class: PrimitiveClass, capacity: usize) -> Self {
        Self {
            class,
            vertices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn class(&self) -> PrimitiveClass {
        self.class
    }

    /// Maximum number of vertices this batch accepts per frame.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn primitive_count(&self) -> usize {
        self.vertices.len() / self.class.vertices_per_primitive()
    }

    /// Clears recorded vertices. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Appends one shape.
    pub fn push_shape(&mut self, shape: &[Vertex]) -> Result<(), FrameError> {
        debug_assert_eq!(
            shape.len(),
            self.class.vertices_per_primitive(),
            "shape arity does not match the {} batch",
            self.class
        );

        let requested = self.vertices.len() + shape.len();
        if requested > self.capacity {
            return Err(FrameError::CapacityExceeded {
                class: self.class,
                capacity: self.capacity,
                requested,
            });
        }

        self.vertices.extend_from_slice(shape);
        Ok(())
    }
}
