use anyhow::Context;

use orbview_engine::camera::CameraConfig;
use orbview_engine::device::GpuInit;
use orbview_engine::logging::{init_logging, LoggingConfig};
use orbview_engine::render::RendererConfig;
use orbview_engine::window::{Runtime, RuntimeConfig};

mod scene;
mod viewer;

use viewer::ViewerApp;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("orbview {}", env!("CARGO_PKG_VERSION"));
    log::info!("controls: left-drag orbit · W/S A/D E/Q move · Z/X or wheel zoom · R reset · Esc quit");

    let app = ViewerApp::new(CameraConfig::default(), RendererConfig::default());

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), app)
        .context("orbview runtime error")
}
