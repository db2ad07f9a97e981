//! Immediate-mode 2D canvas.
//!
//! Responsibilities:
//! - define the drawing-context contract used by visualization renderers ([`Context2d`])
//! - provide a CPU implementation backed by an RGBA bitmap ([`RasterContext`])
//! - share one context between its owner and a renderer on the UI thread ([`SharedContext`])
//!
//! The recording implementation used for inspection lives in `scene`.

mod context;
mod path;
mod raster;
mod shared;

pub use context::Context2d;
pub use path::{ArcParams, Path, SubPath};
pub use raster::RasterContext;
pub use shared::SharedContext;
