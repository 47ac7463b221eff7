use winit::window::{Window, WindowId};

use crate::device::Gpu;
use crate::input::{InputFrame, InputState};
use crate::render::{GpuBackend, ImmediatePipelines};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Window handle and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the framebuffer size in physical pixels.
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let phys = self.window.inner_size();
        (phys.width, phys.height)
    }

    /// Returns `width / height` of the framebuffer, or `None` while minimized.
    pub fn aspect_ratio(&self) -> Option<f32> {
        let (w, h) = self.framebuffer_size();
        (w > 0 && h > 0).then(|| w as f32 / h as f32)
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Borrows the window surface as a frame backend for the immediate renderer.
    pub fn backend<'b>(&'b mut self, resources: &'b mut ImmediatePipelines) -> GpuBackend<'b, 'w> {
        GpuBackend::new(self.gpu, self.window.window, resources)
    }
}
