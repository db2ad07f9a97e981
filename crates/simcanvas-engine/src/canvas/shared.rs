use std::cell::{Ref, RefCell};
use std::rc::Rc;

use image::RgbaImage;

use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::Context2d;

/// A context shared between the element that owns a canvas and the renderer drawing into it.
///
/// Single-threaded by construction (`Rc`): every call borrows the inner context for
/// the duration of that call only, so the owner can read pixels between draws.
#[derive(Debug)]
pub struct SharedContext<C> {
    inner: Rc<RefCell<C>>,
}

impl<C> SharedContext<C> {
    pub fn new(ctx: C) -> Self {
        Self { inner: Rc::new(RefCell::new(ctx)) }
    }

    /// Immutable view of the underlying context.
    ///
    /// # Panics
    /// Panics if called from inside a draw call on the same context.
    pub fn borrow(&self) -> Ref<'_, C> {
        self.inner.borrow()
    }

    /// True when both handles refer to the same canvas.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<C> Clone for SharedContext<C> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<C: Context2d> Context2d for SharedContext<C> {
    fn size(&self) -> (u32, u32) {
        self.inner.borrow().size()
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.inner.borrow_mut().clear_rect(rect);
    }

    fn begin_path(&mut self) {
        self.inner.borrow_mut().begin_path();
    }

    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32, anticlockwise: bool) {
        self.inner.borrow_mut().arc(center, radius, start_angle, end_angle, anticlockwise);
    }

    fn close_path(&mut self) {
        self.inner.borrow_mut().close_path();
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.inner.borrow_mut().set_stroke_style(color);
    }

    fn set_fill_style(&mut self, color: Color) {
        self.inner.borrow_mut().set_fill_style(color);
    }

    fn set_line_width(&mut self, width: f32) {
        self.inner.borrow_mut().set_line_width(width);
    }

    fn stroke(&mut self) {
        self.inner.borrow_mut().stroke();
    }

    fn fill(&mut self) {
        self.inner.borrow_mut().fill();
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.inner.borrow_mut().fill_rect(rect);
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.inner.borrow_mut().stroke_rect(rect);
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) {
        self.inner.borrow_mut().draw_image(image, dest);
    }

    fn clear(&mut self) {
        self.inner.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RasterContext;

    #[test]
    fn clones_draw_into_the_same_bitmap() {
        let owner = SharedContext::new(RasterContext::new(4, 4));
        let mut renderer = owner.clone();
        assert!(owner.ptr_eq(&renderer));

        renderer.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(owner.borrow().pixel(0, 0), [0, 0, 0, 255]);
    }
}
