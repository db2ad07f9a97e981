use image::RgbaImage;

use crate::canvas::{ArcParams, Context2d};
use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::{DrawCmd, ImageCmd};

/// Recording canvas: a `Context2d` that stores each call instead of drawing it.
///
/// Performance characteristics:
/// - every call is an O(1) push
/// - `clear()` keeps allocated capacity for reuse across frames
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    width: u32,
    height: u32,
    items: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, items: Vec::new() }
    }

    /// Forgets recorded calls. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear_commands(&mut self) {
        self.items.clear();
    }

    /// Recorded calls in issue order.
    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Calls that change pixels, in issue order.
    pub fn paint_calls(&self) -> impl Iterator<Item = &DrawCmd> {
        self.items.iter().filter(|c| c.is_paint())
    }

    #[inline]
    fn push(&mut self, cmd: DrawCmd) {
        self.items.push(cmd);
    }
}

impl Context2d for DrawList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.push(DrawCmd::ClearRect(rect));
    }

    fn begin_path(&mut self) {
        self.push(DrawCmd::BeginPath);
    }

    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32, anticlockwise: bool) {
        self.push(DrawCmd::Arc(ArcParams { center, radius, start_angle, end_angle, anticlockwise }));
    }

    fn close_path(&mut self) {
        self.push(DrawCmd::ClosePath);
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.push(DrawCmd::StrokeStyle(color));
    }

    fn set_fill_style(&mut self, color: Color) {
        self.push(DrawCmd::FillStyle(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.push(DrawCmd::LineWidth(width));
    }

    fn stroke(&mut self) {
        self.push(DrawCmd::Stroke);
    }

    fn fill(&mut self) {
        self.push(DrawCmd::Fill);
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.push(DrawCmd::FillRect(rect));
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.push(DrawCmd::StrokeRect(rect));
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) {
        self.push(DrawCmd::DrawImage(ImageCmd { source_size: image.dimensions(), dest }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_issue_order() {
        let mut list = DrawList::new(400, 400);
        list.begin_path();
        list.set_fill_style(Color::BLACK);
        list.fill_rect(Rect::new(1.0, 2.0, 3.0, 4.0));
        list.clear();

        assert_eq!(
            list.items(),
            &[
                DrawCmd::BeginPath,
                DrawCmd::FillStyle(Color::BLACK),
                DrawCmd::FillRect(Rect::new(1.0, 2.0, 3.0, 4.0)),
                DrawCmd::ClearRect(Rect::new(0.0, 0.0, 400.0, 400.0)),
            ]
        );
        assert_eq!(list.paint_calls().count(), 2);
    }

    #[test]
    fn image_calls_keep_only_the_source_size() {
        let mut list = DrawList::new(10, 10);
        list.draw_image(&RgbaImage::new(3, 2), Rect::new(0.0, 0.0, 6.0, 4.0));
        assert_eq!(
            list.items()[0],
            DrawCmd::DrawImage(ImageCmd { source_size: (3, 2), dest: Rect::new(0.0, 0.0, 6.0, 4.0) })
        );
    }
}
