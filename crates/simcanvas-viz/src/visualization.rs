use std::f32::consts::TAU;

use simcanvas_engine::canvas::Context2d;
use simcanvas_engine::coords::{Rect, Vec2};
use simcanvas_engine::paint::Color;

use crate::descriptor::{Descriptor, Shape};
use crate::images::{ImageCache, ImageState, CUSTOM_PREFIX};

/// An image whose load had not finished when it was drawn.
#[derive(Debug, Clone, PartialEq)]
struct PendingImage {
    id: String,
    dest: Rect,
}

/// Draws descriptors onto a fixed-size 2D context.
///
/// Rects and circles are drawn immediately. Images already in the cache are
/// drawn immediately too; the rest are queued and drawn by [`pump`](Self::pump)
/// once their load completes, unless [`reset_canvas`](Self::reset_canvas)
/// runs first.
pub struct ContinuousVisualization<C> {
    width: u32,
    height: u32,
    context: C,
    images: ImageCache,
    pending: Vec<PendingImage>,
}

impl<C: Context2d> ContinuousVisualization<C> {
    pub fn new(width: u32, height: u32, context: C, images: ImageCache) -> Self {
        Self { width, height, context, images, pending: Vec::new() }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn context(&self) -> &C {
        &self.context
    }

    #[inline]
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    #[inline]
    pub fn images_mut(&mut self) -> &mut ImageCache {
        &mut self.images
    }

    /// Image draws waiting for their load to complete.
    #[inline]
    pub fn pending_images(&self) -> usize {
        self.pending.len()
    }

    /// Draws `objects` in order; later objects cover earlier ones.
    pub fn draw(&mut self, objects: &[Descriptor]) {
        for d in objects {
            log::trace!("draw {} at ({}, {})", d.shape.kind(), d.x, d.y);
            match &d.shape {
                Shape::Rect { w, h, color, filled } => {
                    self.draw_rectangle(d.x, d.y, *w, *h, *color, *filled)
                }
                Shape::Circle { r, color, filled } => {
                    self.draw_circle(d.x, d.y, *r, *color, *filled)
                }
                Shape::Image { id, w, h } => self.draw_custom_image(id, d.x, d.y, *w, *h),
            }
        }
    }

    /// Clears the whole canvas, discards the current path and drops image draws
    /// that are still waiting on a load.
    pub fn reset_canvas(&mut self) {
        self.context
            .clear_rect(Rect::new(0.0, 0.0, self.width as f32, self.height as f32));
        self.context.begin_path();
        if !self.pending.is_empty() {
            log::debug!("reset dropped {} pending image draw(s)", self.pending.len());
            self.pending.clear();
        }
    }

    /// Collects finished loads and draws the queued images that are now ready,
    /// in the order they were queued. Returns how many were drawn.
    pub fn pump(&mut self) -> usize {
        self.images.poll();
        if self.pending.is_empty() {
            return 0;
        }

        let mut drawn = 0;
        let mut still_waiting = Vec::new();
        for p in std::mem::take(&mut self.pending) {
            match self.images.peek(&p.id) {
                ImageState::Ready(img) => {
                    self.context.draw_image(&img, p.dest);
                    drawn += 1;
                }
                ImageState::Loading => still_waiting.push(p),
                ImageState::Failed => {}
            }
        }
        self.pending = still_waiting;
        drawn
    }

    #[inline]
    fn to_pixels(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y).scale(self.width as f32, self.height as f32)
    }

    fn draw_rectangle(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Option<Color>,
        filled: bool,
    ) {
        let size = Vec2::new(w, h).scale(self.width as f32, self.height as f32);
        let rect = Rect::from_center_size(self.to_pixels(x, y), size);

        self.context.begin_path();
        if let Some(color) = color {
            self.context.set_stroke_style(color);
            self.context.set_fill_style(color);
        }
        if filled {
            self.context.fill_rect(rect);
        } else {
            self.context.stroke_rect(rect);
        }
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, color: Option<Color>, filled: bool) {
        if !(radius.is_finite() && radius >= 0.0) {
            log::warn!("skipping circle with radius {radius}");
            return;
        }
        let center = self.to_pixels(x, y);

        self.context.begin_path();
        self.context.arc(center, radius, 0.0, TAU, false);
        self.context.close_path();

        if let Some(color) = color {
            self.context.set_stroke_style(color);
        }
        self.context.stroke();

        if filled {
            if let Some(color) = color {
                self.context.set_fill_style(color);
            }
            self.context.fill();
        }
    }

    fn draw_custom_image(&mut self, id: &str, x: f32, y: f32, w: f32, h: f32) {
        let center = self.to_pixels(x, y);
        let dest = Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h);

        match self.images.request(id) {
            ImageState::Ready(img) => self.context.draw_image(&img, dest),
            ImageState::Loading => {
                log::trace!("queued {CUSTOM_PREFIX}{id}");
                self.pending.push(PendingImage { id: id.to_string(), dest });
            }
            ImageState::Failed => {}
        }
    }
}

impl<C> std::fmt::Debug for ContinuousVisualization<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContinuousVisualization")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("images", &self.images)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use simcanvas_engine::canvas::{ArcParams, RasterContext};
    use simcanvas_engine::scene::{DrawCmd, DrawList, ImageCmd};

    use super::*;
    use crate::images::{LoadMode, MemoryImageLoader};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn red() -> Color {
        Color::from_srgb_u8(255, 0, 0, 255)
    }

    fn blue() -> Color {
        Color::from_srgb_u8(0, 0, 255, 255)
    }

    fn inline_cache() -> ImageCache {
        ImageCache::with_mode(
            MemoryImageLoader::new().with_image("boid.png", RgbaImage::from_pixel(4, 4, Rgba(BLUE))),
            LoadMode::Inline,
        )
    }

    fn recorder(w: u32, h: u32) -> ContinuousVisualization<DrawList> {
        ContinuousVisualization::new(w, h, DrawList::new(w, h), inline_cache())
    }

    fn raster(w: u32, h: u32) -> ContinuousVisualization<RasterContext> {
        ContinuousVisualization::new(w, h, RasterContext::new(w, h), inline_cache())
    }

    fn approx_rect(r: Rect, x: f32, y: f32, w: f32, h: f32) -> bool {
        let close = |a: f32, b: f32| (a - b).abs() < 1e-3;
        close(r.origin.x, x) && close(r.origin.y, y) && close(r.size.x, w) && close(r.size.y, h)
    }

    #[test]
    fn rect_is_centered_and_scaled_to_the_canvas() {
        let mut viz = recorder(400, 400);
        viz.draw(&[Descriptor::rect(0.5, 0.5, 0.2, 0.1, red(), true)]);

        let items = viz.context().items();
        assert_eq!(items[0], DrawCmd::BeginPath);
        assert_eq!(items[1], DrawCmd::StrokeStyle(red()));
        assert_eq!(items[2], DrawCmd::FillStyle(red()));
        match items[3] {
            DrawCmd::FillRect(r) => assert!(approx_rect(r, 160.0, 180.0, 80.0, 40.0), "{r:?}"),
            ref other => panic!("expected fill_rect, got {other:?}"),
        }
    }

    #[test]
    fn unfilled_rect_is_only_stroked() {
        let mut viz = recorder(400, 400);
        viz.draw(&[Descriptor::rect(0.5, 0.5, 0.2, 0.1, red(), false)]);

        let paints: Vec<_> = viz.context().paint_calls().cloned().collect();
        assert_eq!(paints.len(), 1);
        assert!(matches!(paints[0], DrawCmd::StrokeRect(r) if approx_rect(r, 160.0, 180.0, 80.0, 40.0)));
    }

    #[test]
    fn circle_radius_is_in_pixels() {
        let mut viz = recorder(400, 400);
        viz.draw(&[Descriptor::circle(0.5, 0.5, 10.0, blue(), false)]);

        assert_eq!(
            viz.context().items(),
            &[
                DrawCmd::BeginPath,
                DrawCmd::Arc(ArcParams {
                    center: Vec2::new(200.0, 200.0),
                    radius: 10.0,
                    start_angle: 0.0,
                    end_angle: TAU,
                    anticlockwise: false,
                }),
                DrawCmd::ClosePath,
                DrawCmd::StrokeStyle(blue()),
                DrawCmd::Stroke,
            ]
        );
    }

    #[test]
    fn filled_circle_is_stroked_then_filled() {
        let mut viz = recorder(400, 400);
        viz.draw(&[Descriptor::circle(0.5, 0.5, 10.0, blue(), true)]);

        let tail: Vec<_> = viz.context().items()[3..].to_vec();
        assert_eq!(
            tail,
            vec![DrawCmd::StrokeStyle(blue()), DrawCmd::Stroke, DrawCmd::FillStyle(blue()), DrawCmd::Fill]
        );
    }

    #[test]
    fn filled_and_stroked_circles_rasterize_differently() {
        let mut filled = raster(400, 400);
        filled.draw(&[Descriptor::circle(0.5, 0.5, 10.0, blue(), true)]);
        assert_eq!(filled.context().pixel(200, 200), BLUE);
        assert_eq!(filled.context().pixel(200, 195), BLUE);

        let mut ring = raster(400, 400);
        ring.draw(&[Descriptor::circle(0.5, 0.5, 10.0, blue(), false)]);
        assert_eq!(ring.context().pixel(200, 200), [0; 4]);
        assert!(ring.context().pixel(209, 199)[3] > 0);
    }

    #[test]
    fn colorless_shape_keeps_the_previous_style() {
        let mut viz = raster(100, 100);
        viz.draw(&[
            Descriptor::rect(0.2, 0.2, 0.1, 0.1, red(), true),
            Descriptor::circle(0.7, 0.7, 10.0, None, true),
        ]);
        assert_eq!(viz.context().pixel(70, 70), RED);

        let mut rec = recorder(100, 100);
        rec.draw(&[Descriptor::circle(0.5, 0.5, 10.0, None, true)]);
        assert!(rec
            .context()
            .items()
            .iter()
            .all(|c| !matches!(c, DrawCmd::StrokeStyle(_) | DrawCmd::FillStyle(_))));
    }

    #[test]
    fn reset_then_empty_draw_is_blank() {
        let mut viz = raster(50, 50);
        viz.draw(&[
            Descriptor::rect(0.5, 0.5, 0.5, 0.5, red(), true),
            Descriptor::circle(0.2, 0.2, 5.0, blue(), false),
        ]);
        assert!(!viz.context().is_blank());

        viz.reset_canvas();
        viz.draw(&[]);
        assert!(viz.context().is_blank());
        assert!(viz.context().path().is_empty());
    }

    #[test]
    fn later_descriptors_cover_earlier_ones() {
        let mut viz = raster(100, 100);
        viz.draw(&[
            Descriptor::rect(0.5, 0.5, 0.4, 0.4, red(), true),
            Descriptor::rect(0.5, 0.5, 0.2, 0.2, blue(), true),
        ]);
        assert_eq!(viz.context().pixel(50, 50), BLUE);
        assert_eq!(viz.context().pixel(32, 32), RED);

        viz.reset_canvas();
        viz.draw(&[
            Descriptor::rect(0.5, 0.5, 0.2, 0.2, blue(), true),
            Descriptor::rect(0.5, 0.5, 0.4, 0.4, red(), true),
        ]);
        assert_eq!(viz.context().pixel(50, 50), RED);
    }

    #[test]
    fn unknown_image_id_is_not_an_error() {
        let mut viz = recorder(100, 100);
        viz.draw(&[Descriptor::image("no/such/thing.png", 0.5, 0.5, 10.0, 10.0)]);
        assert_eq!(viz.pending_images(), 1);

        assert_eq!(viz.pump(), 0);
        assert_eq!(viz.pending_images(), 0);
        assert_eq!(viz.context().paint_calls().count(), 0);

        // Known failures are not queued again.
        viz.draw(&[Descriptor::image("no/such/thing.png", 0.5, 0.5, 10.0, 10.0)]);
        assert_eq!(viz.pending_images(), 0);
    }

    #[test]
    fn image_is_drawn_centered_once_loaded() {
        let mut viz = recorder(400, 400);
        viz.draw(&[Descriptor::image("boid.png", 0.25, 0.5, 50.0, 30.0)]);
        assert_eq!(viz.context().paint_calls().count(), 0);

        assert_eq!(viz.pump(), 1);
        assert_eq!(
            viz.context().items(),
            &[DrawCmd::DrawImage(ImageCmd {
                source_size: (4, 4),
                dest: Rect::new(75.0, 185.0, 50.0, 30.0),
            })]
        );
    }

    #[test]
    fn cached_images_draw_in_insertion_order() {
        let mut viz = recorder(100, 100);
        viz.draw(&[Descriptor::image("boid.png", 0.5, 0.5, 4.0, 4.0)]);
        viz.pump();
        viz.reset_canvas();

        let mut list_len_before = viz.context().len();
        viz.draw(&[
            Descriptor::image("boid.png", 0.5, 0.5, 4.0, 4.0),
            Descriptor::rect(0.5, 0.5, 0.1, 0.1, red(), true),
        ]);
        let items = &viz.context().items()[list_len_before..];
        assert!(matches!(items[0], DrawCmd::DrawImage(_)));
        assert!(matches!(items.last(), Some(DrawCmd::FillRect(_))));
        assert_eq!(viz.pending_images(), 0);
        list_len_before = viz.context().len();
        assert_eq!(viz.pump(), 0);
        assert_eq!(viz.context().len(), list_len_before);
    }

    #[test]
    fn reset_discards_stale_image_draws() {
        let mut viz = raster(20, 20);
        viz.draw(&[Descriptor::image("boid.png", 0.5, 0.5, 4.0, 4.0)]);
        assert_eq!(viz.pending_images(), 1);

        viz.reset_canvas();
        assert_eq!(viz.pump(), 0);
        assert!(viz.context().is_blank());

        // The load itself still landed in the cache.
        assert!(viz.images().get("boid.png").is_some());
    }

    #[test]
    fn negative_radius_is_skipped() {
        let mut viz = recorder(100, 100);
        viz.draw(&[
            Descriptor::circle(0.5, 0.5, -1.0, red(), true),
            Descriptor::rect(0.5, 0.5, 0.1, 0.1, red(), true),
        ]);
        assert_eq!(viz.context().paint_calls().count(), 1);
    }
}
