//! Continuous-space canvas module on top of `simcanvas-engine`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use simcanvas_viz::prelude::*;
//!
//! let mut doc = Document::new();
//! let mut module = SimpleContinuousModule::mount(
//!     &mut doc,
//!     ModuleConfig::default().with_size(900, 900),
//!     FsImageLoader::new("assets"),
//! );
//!
//! // Once per simulation step:
//! module.render(&[
//!     Descriptor::circle(0.5, 0.5, 4.0, Color::parse_css("red")?, true),
//!     Descriptor::image("agents/toddler.png", 0.2, 0.3, 50.0, 50.0),
//! ]);
//!
//! // On every UI tick, so images that finished loading get drawn:
//! module.pump();
//! ```
//!
//! Frames can also arrive as JSON portrayals; see [`portrayal`].

pub mod config;
pub mod descriptor;
pub mod document;
pub mod images;
pub mod module;
pub mod portrayal;
pub mod space;
pub mod visualization;

pub use config::ModuleConfig;
pub use descriptor::{Descriptor, Shape};
pub use module::SimpleContinuousModule;
pub use visualization::ContinuousVisualization;

/// Everything a host needs to drive a canvas module.
pub mod prelude {
    pub use crate::config::ModuleConfig;
    pub use crate::descriptor::{Descriptor, Shape};
    pub use crate::document::{
        BackgroundSize, Border, BorderStyle, CanvasElement, CanvasStyle, Container, Document,
    };
    pub use crate::images::{
        FsImageLoader, ImageCache, ImageError, ImageLoader, LoadMode, MemoryImageLoader,
    };
    pub use crate::module::SimpleContinuousModule;
    pub use crate::portrayal::{parse_frame, parse_portrayal, Portrayal, PortrayalError};
    pub use crate::space::{ContinuousSpace, SimpleCanvas, SpaceError};
    pub use crate::visualization::ContinuousVisualization;

    pub use simcanvas_engine::canvas::Context2d;
    pub use simcanvas_engine::coords::{Rect, Vec2};
    pub use simcanvas_engine::paint::Color;
}
