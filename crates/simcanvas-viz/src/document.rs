//! Minimal host document: named containers holding canvas elements.
//!
//! A canvas element owns an RGBA bitmap shared with whoever draws into it, plus
//! the cosmetic style used when the element is composited for display.

use std::collections::BTreeMap;

use image::RgbaImage;

use simcanvas_engine::canvas::{Context2d, RasterContext, SharedContext};
use simcanvas_engine::coords::{Rect, Vec2};
use simcanvas_engine::paint::Color;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BorderStyle {
    Solid,
    #[default]
    Dotted,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Border {
    /// Pixels.
    pub width: u32,
    pub color: Color,
    pub style: BorderStyle,
}

impl Default for Border {
    fn default() -> Self {
        Self { width: 1, color: Color::BLACK, style: BorderStyle::Dotted }
    }
}

/// How a background image is sized against the canvas (no repeat, top-left anchored).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BackgroundSize {
    /// Scale to cover the whole canvas, cropping overflow.
    #[default]
    Cover,
    /// Scale to fit inside the canvas, leaving uncovered area.
    Contain,
    /// Scale each axis independently to the canvas size.
    Stretch,
}

impl BackgroundSize {
    /// Destination rect for a `iw × ih` image on a `w × h` box.
    pub fn fit(self, iw: u32, ih: u32, w: u32, h: u32) -> Rect {
        let (iw, ih, w, h) = (iw as f32, ih as f32, w as f32, h as f32);
        if iw <= 0.0 || ih <= 0.0 {
            return Rect::default();
        }
        let s = match self {
            BackgroundSize::Stretch => return Rect::new(0.0, 0.0, w, h),
            BackgroundSize::Cover => (w / iw).max(h / ih),
            BackgroundSize::Contain => (w / iw).min(h / ih),
        };
        Rect::new(0.0, 0.0, iw * s, ih * s)
    }
}

/// Cosmetic style of a canvas element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanvasStyle {
    pub border: Option<Border>,
    pub background_color: Option<Color>,
    /// Image identifier, resolved like custom images.
    pub background_image: Option<String>,
    pub background_size: BackgroundSize,
}

impl CanvasStyle {
    /// `border: 1px dotted`, no background.
    pub fn dotted() -> Self {
        Self { border: Some(Border::default()), ..Self::default() }
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn without_border(mut self) -> Self {
        self.border = None;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_background_image(mut self, id: impl Into<String>) -> Self {
        self.background_image = Some(id.into());
        self
    }

    pub fn with_background_size(mut self, size: BackgroundSize) -> Self {
        self.background_size = size;
        self
    }

    #[inline]
    pub fn border_width(&self) -> u32 {
        self.border.map_or(0, |b| b.width)
    }
}

/// A canvas element. Clones share the same bitmap.
#[derive(Debug, Clone)]
pub struct CanvasElement {
    width: u32,
    height: u32,
    style: CanvasStyle,
    context: SharedContext<RasterContext>,
}

impl CanvasElement {
    pub fn new(width: u32, height: u32, style: CanvasStyle) -> Self {
        Self {
            width,
            height,
            style,
            context: SharedContext::new(RasterContext::new(width, height)),
        }
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
    pub fn style(&self) -> &CanvasStyle {
        &self.style
    }

    /// The element's 2D context.
    pub fn context(&self) -> SharedContext<RasterContext> {
        self.context.clone()
    }

    /// True when both handles refer to the same element.
    pub fn same_element(&self, other: &CanvasElement) -> bool {
        self.context.ptr_eq(&other.context)
    }

    /// Copy of the canvas pixels (without style).
    pub fn snapshot(&self) -> RgbaImage {
        self.context.borrow().bitmap().clone()
    }

    /// Size of [`composite`](Self::composite) output: canvas plus border on each side.
    pub fn outer_size(&self) -> (u32, u32) {
        let bw = self.style.border_width();
        (self.width + 2 * bw, self.height + 2 * bw)
    }

    /// Renders the element as displayed: background, canvas pixels, then border.
    ///
    /// `background` is the decoded background image, if the style names one and
    /// it has loaded.
    pub fn composite(&self, background: Option<&RgbaImage>) -> RgbaImage {
        let mut inner = RasterContext::new(self.width, self.height);
        let full = Rect::new(0.0, 0.0, self.width as f32, self.height as f32);

        if let Some(color) = self.style.background_color {
            inner.set_fill_style(color);
            inner.fill_rect(full);
        }
        if let Some(img) = background {
            let dest = self
                .style
                .background_size
                .fit(img.width(), img.height(), self.width, self.height);
            inner.draw_image(img, dest);
        }
        inner.draw_image(self.context.borrow().bitmap(), full);

        let Some(border) = self.style.border.filter(|b| b.width > 0) else {
            return inner.into_bitmap();
        };

        let (ow, oh) = self.outer_size();
        let bw = border.width as f32;
        let mut outer = RasterContext::new(ow, oh);
        outer.draw_image(inner.bitmap(), Rect::new(bw, bw, self.width as f32, self.height as f32));
        outer.set_fill_style(border.color);
        for edge in border_edges(ow as f32, oh as f32, bw) {
            match border.style {
                BorderStyle::Solid => outer.fill_rect(edge),
                BorderStyle::Dotted => {
                    for dot in dots_along(edge, bw) {
                        outer.fill_rect(dot);
                    }
                }
            }
        }
        outer.into_bitmap()
    }
}

/// Top, bottom, left, right bands of a `w × h` box with border width `bw`.
fn border_edges(w: f32, h: f32, bw: f32) -> [Rect; 4] {
    [
        Rect::new(0.0, 0.0, w, bw),
        Rect::new(0.0, h - bw, w, bw),
        Rect::new(0.0, bw, bw, h - 2.0 * bw),
        Rect::new(w - bw, bw, bw, h - 2.0 * bw),
    ]
}

/// Square dots of side `bw` along a band, one dot every `2 * bw`.
fn dots_along(edge: Rect, bw: f32) -> impl Iterator<Item = Rect> {
    let horizontal = edge.size.x >= edge.size.y;
    let len = if horizontal { edge.size.x } else { edge.size.y };
    let count = (len / (2.0 * bw)).ceil().max(0.0) as usize;
    (0..count).map(move |i| {
        let offset = i as f32 * 2.0 * bw;
        let origin = if horizontal {
            Vec2::new(edge.origin.x + offset, edge.origin.y)
        } else {
            Vec2::new(edge.origin.x, edge.origin.y + offset)
        };
        Rect::from_origin_size(origin, Vec2::new(bw, bw))
    })
}

/// A named mount point for canvas elements.
#[derive(Debug, Default)]
pub struct Container {
    id: String,
    children: Vec<CanvasElement>,
}

impl Container {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), children: Vec::new() }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn append_child(&mut self, element: CanvasElement) {
        self.children.push(element);
    }

    /// Detaches `element`. Returns false when it was not a child.
    pub fn remove_child(&mut self, element: &CanvasElement) -> bool {
        let before = self.children.len();
        self.children.retain(|c| !c.same_element(element));
        self.children.len() != before
    }

    #[inline]
    pub fn children(&self) -> &[CanvasElement] {
        &self.children
    }
}

/// The host page: containers by id, in id order.
#[derive(Debug, Default)]
pub struct Document {
    containers: BTreeMap<String, Container>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the container `id`, creating it if needed.
    pub fn container(&mut self, id: &str) -> &mut Container {
        self.containers
            .entry(id.to_string())
            .or_insert_with(|| Container::new(id))
    }

    pub fn get(&self, id: &str) -> Option<&Container> {
        self.containers.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Container> {
        self.containers.get_mut(id)
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.values()
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 128, 0, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    #[test]
    fn background_fit_modes() {
        assert_eq!(BackgroundSize::Cover.fit(100, 50, 200, 200), Rect::new(0.0, 0.0, 400.0, 200.0));
        assert_eq!(BackgroundSize::Contain.fit(100, 50, 200, 200), Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(BackgroundSize::Stretch.fit(100, 50, 200, 200), Rect::new(0.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn clones_share_pixels() {
        let el = CanvasElement::new(4, 4, CanvasStyle::default());
        let mut ctx = el.context();
        ctx.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(el.clone().snapshot().get_pixel(0, 0).0, BLACK);
    }

    #[test]
    fn composite_layers_background_canvas_and_border() {
        let style = CanvasStyle::default()
            .with_border(Border { width: 1, color: Color::BLACK, style: BorderStyle::Solid })
            .with_background_color(Color::from_srgb_u8(0, 128, 0, 255));
        let el = CanvasElement::new(6, 6, style);
        let mut ctx = el.context();
        ctx.set_fill_style(Color::from_srgb_u8(255, 0, 0, 255));
        ctx.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0));

        let out = el.composite(None);
        assert_eq!(out.dimensions(), (8, 8));
        assert_eq!(out.get_pixel(0, 0).0, BLACK);
        assert_eq!(out.get_pixel(7, 4).0, BLACK);
        assert_eq!(out.get_pixel(1, 1).0, RED);
        assert_eq!(out.get_pixel(5, 5).0, GREEN);
    }

    #[test]
    fn dotted_border_leaves_gaps() {
        let el = CanvasElement::new(6, 6, CanvasStyle::dotted());
        let out = el.composite(None);
        assert_eq!(out.get_pixel(0, 0).0, BLACK);
        assert_eq!(out.get_pixel(1, 0).0[3], 0);
        assert_eq!(out.get_pixel(2, 0).0, BLACK);
    }

    #[test]
    fn background_image_is_cropped_to_the_canvas() {
        let el = CanvasElement::new(4, 4, CanvasStyle::default());
        let bg = RgbaImage::from_pixel(2, 1, Rgba(RED));
        let out = el.composite(Some(&bg));
        assert_eq!(out.dimensions(), (4, 4));
        assert!(out.pixels().all(|p| p.0[0] >= 254 && p.0[1] == 0 && p.0[3] >= 254));
    }

    #[test]
    fn containers_track_children() {
        let mut doc = Document::new();
        let el = CanvasElement::new(2, 2, CanvasStyle::default());
        doc.container("elements").append_child(el.clone());
        assert_eq!(doc.get("elements").map(|c| c.children().len()), Some(1));

        assert!(doc.get_mut("elements").unwrap().remove_child(&el));
        assert!(!doc.get_mut("elements").unwrap().remove_child(&el));
        assert!(doc.get("missing").is_none());
    }
}
