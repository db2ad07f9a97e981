//! Simcanvas engine crate.
//!
//! This crate owns the 2D canvas (CPU rasterizer + recorder) used by the
//! visualization layer, and the platform + GPU runtime pieces used to show a
//! canvas in a window.

pub mod canvas;
pub mod coords;
pub mod paint;
pub mod scene;

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
