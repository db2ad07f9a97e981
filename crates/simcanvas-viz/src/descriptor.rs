use simcanvas_engine::coords::Vec2;
use simcanvas_engine::paint::Color;

/// What to draw for one agent. Chosen once, when the descriptor is built.
///
/// A `None` color leaves the context's current stroke and fill styles as they
/// are, so a colorless shape inherits whatever the previous shape set.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Rectangle centered on the position. `w`/`h` are fractions of the canvas size.
    Rect { w: f32, h: f32, color: Option<Color>, filled: bool },
    /// Circle centered on the position. `r` is in pixels and is not scaled.
    Circle { r: f32, color: Option<Color>, filled: bool },
    /// Custom image served under `local/custom/<id>`, centered on the position.
    /// `w`/`h` are in pixels.
    Image { id: String, w: f32, h: f32 },
}

impl Shape {
    /// Short name used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Rect { .. } => "rect",
            Shape::Circle { .. } => "circle",
            Shape::Image { .. } => "image",
        }
    }
}

/// A drawable object: a normalized position plus a shape.
///
/// `x` and `y` are in `[0, 1]` relative to the canvas width and height.
/// Descriptors are consumed by a single draw call and never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub x: f32,
    pub y: f32,
    pub shape: Shape,
}

impl Descriptor {
    pub fn new(x: f32, y: f32, shape: Shape) -> Self {
        Self { x, y, shape }
    }

    pub fn rect(
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: impl Into<Option<Color>>,
        filled: bool,
    ) -> Self {
        Self::new(x, y, Shape::Rect { w, h, color: color.into(), filled })
    }

    pub fn circle(x: f32, y: f32, r: f32, color: impl Into<Option<Color>>, filled: bool) -> Self {
        Self::new(x, y, Shape::Circle { r, color: color.into(), filled })
    }

    pub fn image(id: impl Into<String>, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(x, y, Shape::Image { id: id.into(), w, h })
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Position in canvas pixels for a `width × height` canvas.
    #[inline]
    pub fn pixel_position(&self, width: u32, height: u32) -> Vec2 {
        self.position().scale(width as f32, height as f32)
    }
}
