//! Geometry shared by the canvas context, the rasterizer and the presenter.
//!
//! Canvas space:
//! - pixels of the canvas bitmap
//! - origin top-left, +X right, +Y down
//! - pixel `(i, j)` covers the square `[i, i+1) × [j, j+1)`; its center is `(i+0.5, j+0.5)`

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
