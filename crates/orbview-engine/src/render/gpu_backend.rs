use bytemuck::{Pod, Zeroable};
use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};

use super::{FrameBackend, FrameSubmission, GpuVertex, PrimitiveClass, SubmitOutcome};

// ── uniform ───────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

// ── persistent resources ──────────────────────────────────────────────────

/// GPU resources of the immediate renderer, kept across frames.
///
/// Pipelines are built lazily for the current surface format and rebuilt if it
/// changes. The vertex buffer is preallocated for three full batches and grows
/// only if a submission exceeds it.
pub struct ImmediatePipelines {
    pipeline_format: Option<wgpu::TextureFormat>,
    /// One pipeline per primitive class, indexed by `PrimitiveClass::index`.
    pipelines: Option<[wgpu::RenderPipeline; 3]>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    camera_ubo: Option<wgpu::Buffer>,

    vertex_vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    min_vertex_capacity: usize,
}

impl ImmediatePipelines {
    pub fn new(max_vertices_per_batch: usize) -> Self {
        Self {
            pipeline_format: None,
            pipelines: None,
            bind_group_layout: None,
            bind_group: None,
            camera_ubo: None,
            vertex_vbo: None,
            vertex_capacity: 0,
            min_vertex_capacity: max_vertices_per_batch.max(1) * PrimitiveClass::DRAW_ORDER.len(),
        }
    }

    /// Vertex slots currently allocated on the GPU.
    pub fn vertex_capacity(&self) -> usize {
        self.vertex_capacity
    }

    fn prepare(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat, vertices: usize) {
        self.ensure_pipelines(device, format);
        self.ensure_bindings(device);
        self.ensure_vertex_capacity(device, vertices);
    }

    fn ensure_pipelines(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.pipelines.is_some() {
            return;
        }

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orbview immediate shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/immediate.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orbview immediate bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<CameraUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orbview immediate pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipelines = PrimitiveClass::DRAW_ORDER.map(|class| {
            let label = format!("orbview {class} pipeline");
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label.as_str()),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[GpuVertex::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: class.topology(),
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        });

        log::debug!("immediate pipelines built for {format:?}");

        self.pipeline_format = Some(format);
        self.pipelines = Some(pipelines);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.camera_ubo = None;
    }

    fn ensure_bindings(&mut self, device: &wgpu::Device) {
        if self.bind_group.is_some() && self.camera_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let camera_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orbview camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orbview immediate bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_ubo.as_entire_binding(),
            }],
        });

        self.camera_ubo = Some(camera_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_vertex_capacity(&mut self, device: &wgpu::Device, required: usize) {
        if required <= self.vertex_capacity && self.vertex_vbo.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(self.min_vertex_capacity);
        if self.vertex_vbo.is_some() {
            log::debug!("growing immediate vertex buffer to {new_cap} vertices");
        }

        self.vertex_vbo = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orbview immediate vbo"),
            size: (new_cap * std::mem::size_of::<GpuVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = new_cap;
    }
}

// ── backend ───────────────────────────────────────────────────────────────

/// [`FrameBackend`] that renders a submission to the window surface.
///
/// Borrowed for one frame; the persistent state lives in [`ImmediatePipelines`].
pub struct GpuBackend<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
    window: &'a Window,
    resources: &'a mut ImmediatePipelines,
}

impl<'a, 'w> GpuBackend<'a, 'w> {
    pub fn new(
        gpu: &'a mut Gpu<'w>,
        window: &'a Window,
        resources: &'a mut ImmediatePipelines,
    ) -> Self {
        Self { gpu, window, resources }
    }
}

/// Frame outcome for a surface acquisition failure.
fn outcome_for(action: SurfaceErrorAction) -> SubmitOutcome {
    match action {
        SurfaceErrorAction::Fatal => SubmitOutcome::Fatal,
        SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => SubmitOutcome::Skipped,
    }
}

impl FrameBackend for GpuBackend<'_, '_> {
    fn submit(&mut self, frame: &FrameSubmission<'_>) -> SubmitOutcome {
        let mut gpu_frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => return outcome_for(self.gpu.handle_surface_error(err)),
        };

        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let res = &mut *self.resources;

        res.prepare(device, self.gpu.surface_format(), frame.vertices.len());

        if let Some(ubo) = res.camera_ubo.as_ref() {
            let u = CameraUniform {
                view_proj: frame.view_projection.to_cols_array_2d(),
            };
            queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }

        if let Some(vbo) = res.vertex_vbo.as_ref() {
            if !frame.vertices.is_empty() {
                queue.write_buffer(vbo, 0, bytemuck::cast_slice(frame.vertices));
            }
        }

        {
            let mut rpass = gpu_frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("orbview immediate pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &gpu_frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let (Some(pipelines), Some(bind_group), Some(vbo)) = (
                res.pipelines.as_ref(),
                res.bind_group.as_ref(),
                res.vertex_vbo.as_ref(),
            ) {
                rpass.set_bind_group(0, bind_group, &[]);
                rpass.set_vertex_buffer(0, vbo.slice(..));

                for draw in frame.draws {
                    rpass.set_pipeline(&pipelines[draw.class.index()]);
                    rpass.draw(draw.vertex_range(), 0..1);
                }
            }
        }

        self.window.pre_present_notify();
        self.gpu.submit(gpu_frame);
        SubmitOutcome::Presented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_surface_errors_skip_the_frame() {
        assert_eq!(outcome_for(SurfaceErrorAction::Reconfigured), SubmitOutcome::Skipped);
        assert_eq!(outcome_for(SurfaceErrorAction::SkipFrame), SubmitOutcome::Skipped);
    }

    #[test]
    fn fatal_surface_error_is_fatal() {
        assert_eq!(outcome_for(SurfaceErrorAction::Fatal), SubmitOutcome::Fatal);
    }
}
