//! GPU device + surface management for presenting canvases in a window.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue
//! - creates & configures the window Surface
//! - acquires frames and hands out encoders/views

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame, SurfaceErrorAction};
pub use init::GpuInit;
