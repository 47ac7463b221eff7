use orbview_engine::camera::{CameraConfig, OrbitCamera};
use orbview_engine::core::{App, AppControl, FrameCtx};
use orbview_engine::input::Key;
use orbview_engine::render::{
    FrameError, ImmediatePipelines, ImmediateRenderer, RendererConfig, SubmitOutcome,
};

use crate::scene::DemoScene;

/// The viewer: one orbit camera looking at the demo scene.
pub struct ViewerApp {
    camera: OrbitCamera,
    renderer: ImmediateRenderer,
    pipelines: ImmediatePipelines,
    scene: DemoScene,
}

impl ViewerApp {
    pub fn new(camera: CameraConfig, renderer: RendererConfig) -> Self {
        Self {
            camera: OrbitCamera::new(camera),
            renderer: ImmediateRenderer::new(renderer),
            pipelines: ImmediatePipelines::new(renderer.max_vertices_per_batch),
            scene: DemoScene::default(),
        }
    }

    /// Applies this frame's input to the camera and pushes its matrices to the renderer.
    fn update_camera(&mut self, ctx: &FrameCtx<'_, '_>) {
        if ctx.input_frame.keys_pressed.contains(&Key::R) {
            self.camera.reset();
            log::info!("camera reset");
        }

        self.camera.process_input(ctx.input, ctx.time.dt);

        let wheel = ctx.input_frame.wheel_lines();
        if wheel != 0.0 {
            self.camera.zoom_wheel(wheel);
        }

        if let Some(aspect) = ctx.window.aspect_ratio() {
            self.camera.set_aspect(aspect);
        }
        let (w, h) = ctx.window.framebuffer_size();
        self.renderer.set_viewport(w, h);

        self.renderer.set_view_matrix(self.camera.view_matrix());
        self.renderer.set_projection_matrix(self.camera.projection_matrix());
    }

    fn render(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<SubmitOutcome, FrameError> {
        self.renderer.begin_frame()?;

        // Submit whatever was recorded even if the scene bailed, so the
        // renderer is idle again for the next frame.
        let recorded = self.scene.render(&mut self.renderer);

        let mut backend = ctx.backend(&mut self.pipelines);
        let report = self.renderer.end_frame(&mut backend)?;
        recorded?;

        Ok(report.outcome)
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            log::info!("escape pressed, exiting");
            ctx.runtime.exit();
            return AppControl::Continue;
        }

        self.update_camera(ctx);
        self.scene.update(ctx.time.dt);

        match self.render(ctx) {
            Ok(SubmitOutcome::Fatal) => {
                log::error!("rendering cannot continue");
                AppControl::Exit
            }
            Ok(_) => AppControl::Continue,
            Err(err) => {
                log::error!("frame recording failed: {err}");
                AppControl::Exit
            }
        }
    }
}
