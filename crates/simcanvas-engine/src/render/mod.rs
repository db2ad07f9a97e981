//! GPU presentation.
//!
//! Canvases are rasterized on the CPU; the GPU side only uploads the finished
//! bitmap and draws it as a textured quad.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down)
//! - the vertex shader converts to NDC using a viewport uniform

mod ctx;
mod present;

pub use ctx::{RenderCtx, RenderTarget};
pub use present::CanvasPresenter;
