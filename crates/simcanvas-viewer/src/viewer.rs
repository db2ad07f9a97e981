use image::RgbaImage;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use simcanvas_engine::coords::{Rect, Vec2, Viewport};
use simcanvas_engine::core::{App, AppControl, FrameCtx};
use simcanvas_engine::paint::Color;
use simcanvas_engine::render::CanvasPresenter;
use simcanvas_engine::time::StepPacer;
use simcanvas_viz::document::Document;
use simcanvas_viz::images::FsImageLoader;
use simcanvas_viz::{ModuleConfig, SimpleContinuousModule};

use crate::args::ViewerConfig;
use crate::frames::FrameSource;

/// Window background around the canvas.
const CLEAR: Color = Color { r: 0.94, g: 0.94, b: 0.94, a: 1.0 };

/// Cursor over the recorded frames.
#[derive(Debug)]
pub struct Replay {
    frames: FrameSource,
    next: usize,
}

impl Replay {
    pub fn new(frames: FrameSource) -> Self {
        Self { frames, next: 0 }
    }

    /// Next frame and its index, or `None` once every frame was shown.
    pub fn next_frame(&mut self) -> Option<(usize, &str)> {
        let index = self.next;
        let frame = self.frames.get(index)?;
        self.next += 1;
        Some((index, frame))
    }

    pub fn restart(&mut self) {
        self.next = 0;
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.frames.len()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

/// Plays recorded frames into a canvas module and presents it in the window.
pub struct Viewer {
    // Keeps the module's container alive.
    _document: Document,
    module: SimpleContinuousModule,
    replay: Replay,
    pacer: StepPacer,
    presenter: CanvasPresenter,
    composited: Option<RgbaImage>,
    dirty: bool,
    title: Option<String>,
}

impl Viewer {
    pub fn new(config: &ViewerConfig, frames: FrameSource) -> Self {
        let mut document = Document::new();
        let module = SimpleContinuousModule::mount(
            &mut document,
            ModuleConfig::default()
                .with_size(config.width, config.height)
                .with_background_color(Color::from_srgb_u8(255, 255, 255, 255)),
            FsImageLoader::new(&config.assets),
        );

        let mut pacer = StepPacer::new(config.steps_per_second);
        pacer.set_paused(config.start_paused);

        let mut viewer = Self {
            _document: document,
            module,
            replay: Replay::new(frames),
            pacer,
            presenter: CanvasPresenter::new(),
            composited: None,
            dirty: true,
            title: None,
        };
        viewer.show_next();
        viewer
    }

    /// Size of the composited element, border included.
    pub fn canvas_size(&self) -> (u32, u32) {
        self.module.element().outer_size()
    }

    /// Renders the next frame. Returns false at the end of the recording.
    fn show_next(&mut self) -> bool {
        let total = self.replay.len();
        let Some((index, frame)) = self.replay.next_frame() else {
            return false;
        };
        if let Err(e) = self.module.render_json(frame) {
            log::warn!("frame {index}: {e}");
        }
        if self.replay.is_finished() {
            log::info!("replay finished after {total} frame(s)");
        }
        self.title = Some(format!("simcanvas: frame {}/{}", index + 1, total));
        self.dirty = true;
        true
    }

    fn restart(&mut self) {
        log::info!("restarting replay");
        self.replay.restart();
        self.module.reset();
        self.show_next();
    }
}

impl App for Viewer {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed || event.repeat {
            return AppControl::Continue;
        }

        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => return AppControl::Exit,
            PhysicalKey::Code(KeyCode::Space) => {
                self.pacer.toggle_paused();
                log::info!("{}", if self.pacer.is_paused() { "paused" } else { "resumed" });
            }
            PhysicalKey::Code(KeyCode::KeyR) => self.restart(),
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        for _ in 0..self.pacer.advance(ctx.time.dt) {
            if !self.show_next() {
                break;
            }
        }

        let loading = self.module.visualization().images().has_in_flight();
        if self.module.pump() > 0 || loading {
            self.dirty = true;
        }
        if self.dirty || self.composited.is_none() {
            self.composited = Some(self.module.composite());
            self.dirty = false;
        }
        if let Some(title) = self.title.take() {
            ctx.window.set_title(&title);
        }

        let Some(bitmap) = self.composited.as_ref() else {
            return AppControl::Continue;
        };
        let (w, h) = ctx.window.logical_size();
        let dest = centered(Viewport::new(w, h), bitmap.width(), bitmap.height());
        let presenter = &mut self.presenter;

        ctx.render(CLEAR, |rctx, target| presenter.render(rctx, target, bitmap, dest))
    }
}

/// Largest rect with the bitmap's aspect ratio that fits the viewport, centered.
fn centered(viewport: Viewport, width: u32, height: u32) -> Rect {
    let (bw, bh) = (width as f32, height as f32);
    let scale = viewport.fit_scale(bw, bh);
    Rect::from_center_size(
        Vec2::new(viewport.width * 0.5, viewport.height * 0.5),
        Vec2::new(bw * scale, bh * scale),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_walks_frames_and_restarts() {
        let frames = FrameSource::from_reader("[]\n[]\n".as_bytes()).unwrap();
        let mut replay = Replay::new(frames);
        assert_eq!(replay.next_frame().map(|(i, _)| i), Some(0));
        assert_eq!(replay.next_frame().map(|(i, _)| i), Some(1));
        assert!(replay.is_finished());
        assert!(replay.next_frame().is_none());

        replay.restart();
        assert!(!replay.is_finished());
        assert_eq!(replay.next_frame().map(|(i, _)| i), Some(0));
    }

    #[test]
    fn canvas_is_centered_and_fitted() {
        let r = centered(Viewport::new(800.0, 600.0), 502, 502);
        assert!((r.size.x - 600.0).abs() < 1e-3 && (r.size.y - 600.0).abs() < 1e-3);
        assert!((r.origin.x - 100.0).abs() < 1e-3 && r.origin.y.abs() < 1e-3);
    }
}
