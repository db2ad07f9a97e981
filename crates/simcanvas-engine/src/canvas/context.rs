use image::RgbaImage;

use crate::coords::{Rect, Vec2};
use crate::paint::Color;

/// The subset of the HTML canvas 2D context used by simulation renderers.
///
/// Coordinates are canvas pixels. Angles are radians, measured from +X towards +Y
/// (clockwise on screen). Styles persist until changed; the current path persists
/// until [`begin_path`](Context2d::begin_path).
pub trait Context2d {
    /// Bitmap size in pixels as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Sets every pixel whose center lies in `rect` to transparent black.
    fn clear_rect(&mut self, rect: Rect);

    /// Discards the current path.
    fn begin_path(&mut self);

    /// Appends a circular arc to the current path, connected to the previous point.
    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32, anticlockwise: bool);

    /// Closes the current subpath.
    fn close_path(&mut self);

    fn set_stroke_style(&mut self, color: Color);
    fn set_fill_style(&mut self, color: Color);
    fn set_line_width(&mut self, width: f32);

    /// Strokes the current path with the stroke style.
    fn stroke(&mut self);

    /// Fills the current path with the fill style (nonzero winding).
    fn fill(&mut self);

    /// Fills `rect` with the fill style without touching the current path.
    fn fill_rect(&mut self, rect: Rect);

    /// Strokes the outline of `rect` with the stroke style without touching the current path.
    fn stroke_rect(&mut self, rect: Rect);

    /// Draws `image` scaled into `dest`.
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect);

    /// Clears the whole bitmap.
    fn clear(&mut self) {
        let (w, h) = self.size();
        self.clear_rect(Rect::new(0.0, 0.0, w as f32, h as f32));
    }
}
