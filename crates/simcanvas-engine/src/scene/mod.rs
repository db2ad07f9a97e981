//! Recorded canvas command streams.
//!
//! Responsibilities:
//! - store every `Context2d` call in issue order, renderer-agnostic
//! - make renderer output inspectable without rasterizing (tests, debugging)

mod cmd;
mod list;

pub use cmd::{DrawCmd, ImageCmd};
pub use list::DrawList;
