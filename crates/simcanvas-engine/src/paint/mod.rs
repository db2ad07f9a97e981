//! Color model shared by the canvas context, the rasterizer and the presenter.
//!
//! Scope:
//! - color representation (linear premultiplied alpha, sRGB byte conversion)
//! - CSS color parsing for styles coming from the simulation side

pub mod color;
pub mod css;

pub use color::Color;
pub use css::ColorParseError;
