use image::RgbaImage;

use simcanvas_engine::canvas::{RasterContext, SharedContext};

use crate::config::ModuleConfig;
use crate::descriptor::Descriptor;
use crate::document::{CanvasElement, Container, Document};
use crate::images::{ImageCache, ImageLoader, ImageState};
use crate::portrayal::{parse_frame, PortrayalError};
use crate::visualization::ContinuousVisualization;

/// Canvas module for a continuous-space simulation.
///
/// Owns one canvas element mounted in a host container and the renderer that
/// draws into it. The host calls [`render`](Self::render) once per simulation
/// step and [`pump`](Self::pump) on every UI tick so loaded images appear.
#[derive(Debug)]
pub struct SimpleContinuousModule {
    config: ModuleConfig,
    element: CanvasElement,
    canvas_draw: ContinuousVisualization<SharedContext<RasterContext>>,
}

impl SimpleContinuousModule {
    /// Creates a canvas of `config.width × config.height`, appends it to
    /// `mount` and binds a renderer to its 2D context.
    pub fn new(mount: &mut Container, config: ModuleConfig, loader: impl ImageLoader) -> Self {
        let element = CanvasElement::new(config.width, config.height, config.style.clone());
        mount.append_child(element.clone());

        let mut images = ImageCache::with_mode(loader, config.load_mode);
        if let Some(bg) = &config.style.background_image {
            images.request(bg);
        }

        let canvas_draw =
            ContinuousVisualization::new(config.width, config.height, element.context(), images);

        log::info!(
            "mounted {}x{} canvas in `{}`",
            config.width,
            config.height,
            mount.id()
        );
        Self { config, element, canvas_draw }
    }

    /// Mounts into the document container named by `config.mount_id`,
    /// creating the container if it does not exist yet.
    pub fn mount(document: &mut Document, config: ModuleConfig, loader: impl ImageLoader) -> Self {
        let id = config.mount_id.clone();
        Self::new(document.container(&id), config, loader)
    }

    #[inline]
    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    #[inline]
    pub fn element(&self) -> &CanvasElement {
        &self.element
    }

    #[inline]
    pub fn visualization(&self) -> &ContinuousVisualization<SharedContext<RasterContext>> {
        &self.canvas_draw
    }

    /// Clears the canvas and draws `data`.
    pub fn render(&mut self, data: &[Descriptor]) {
        self.canvas_draw.reset_canvas();
        self.canvas_draw.draw(data);
    }

    /// Parses a JSON frame and renders it. The canvas is left untouched when
    /// the frame itself is unreadable; bad entries are skipped.
    pub fn render_json(&mut self, frame: &str) -> Result<usize, PortrayalError> {
        let data = parse_frame(frame)?;
        self.render(&data);
        Ok(data.len())
    }

    /// Clears the canvas.
    pub fn reset(&mut self) {
        self.canvas_draw.reset_canvas();
    }

    /// Applies finished image loads. Returns how many queued images were drawn.
    pub fn pump(&mut self) -> usize {
        self.canvas_draw.pump()
    }

    /// The element as displayed: background, canvas and border.
    pub fn composite(&self) -> RgbaImage {
        let background = self
            .config
            .style
            .background_image
            .as_deref()
            .and_then(|id| match self.canvas_draw.images().peek(id) {
                ImageState::Ready(img) => Some(img),
                _ => None,
            });
        self.element.composite(background.as_deref())
    }
}
