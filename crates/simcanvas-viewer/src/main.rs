//! Replays recorded simulation frames in a window.
//!
//! Each line of the input file is one frame: a JSON array of portrayal
//! objects, as a simulation server would send them to the browser canvas.

mod args;
mod frames;
mod viewer;

use anyhow::Result;

use simcanvas_engine::device::GpuInit;
use simcanvas_engine::logging::{init_logging, LoggingConfig};
use simcanvas_engine::window::{Runtime, RuntimeConfig};

use crate::args::{ViewerConfig, USAGE};
use crate::frames::FrameSource;
use crate::viewer::Viewer;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let Some(config) = ViewerConfig::from_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let frames = FrameSource::open(&config.frames)?;
    if frames.is_empty() {
        log::warn!("{} contains no frames", config.frames.display());
    }
    log::info!(
        "replaying {} frame(s) from {} at {} steps/s, assets in {}",
        frames.len(),
        config.frames.display(),
        config.steps_per_second,
        config.assets.display()
    );

    let app = Viewer::new(&config, frames);
    let (width, height) = app.canvas_size();
    let window = RuntimeConfig::default()
        .with_title("simcanvas")
        .with_size(width as f64, height as f64);

    Runtime::run(window, GpuInit::default(), app)
}
