/// Viewport size in logical pixels.
///
/// The presenter uses this as the basis for converting pixel positions to NDC.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Largest scale at which a `w × h` box still fits inside the viewport.
    #[inline]
    pub fn fit_scale(self, w: f32, h: f32) -> f32 {
        if w <= 0.0 || h <= 0.0 || !self.is_valid() {
            return 1.0;
        }
        (self.width / w).min(self.height / h)
    }
}
