use simcanvas_engine::paint::Color;

use crate::document::CanvasStyle;
use crate::images::LoadMode;

/// Settings for a [`SimpleContinuousModule`](crate::SimpleContinuousModule).
///
/// ```rust,ignore
/// let cfg = ModuleConfig::default()
///     .with_size(900, 900)
///     .with_style(CanvasStyle::default().with_background_image("resources/roadmap.png"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleConfig {
    /// Canvas width in pixels. Fixed for the module's lifetime.
    pub width: u32,
    /// Canvas height in pixels. Fixed for the module's lifetime.
    pub height: u32,
    /// Id of the container the canvas is appended to.
    pub mount_id: String,
    pub load_mode: LoadMode,
    pub style: CanvasStyle,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            mount_id: "elements".to_string(),
            load_mode: LoadMode::default(),
            style: CanvasStyle::dotted(),
        }
    }
}

impl ModuleConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_mount_id(mut self, id: impl Into<String>) -> Self {
        self.mount_id = id.into();
        self
    }

    pub fn with_load_mode(mut self, mode: LoadMode) -> Self {
        self.load_mode = mode;
        self
    }

    pub fn with_style(mut self, style: CanvasStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.style.background_color = Some(color);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ModuleConfig::default();
        assert_eq!((cfg.width, cfg.height), (500, 500));
        assert_eq!(cfg.mount_id, "elements");
        assert_eq!(cfg.style.border_width(), 1);
    }

    #[test]
    fn builders_chain() {
        let cfg = ModuleConfig::default()
            .with_size(900, 600)
            .with_mount_id("sim")
            .with_load_mode(LoadMode::Inline)
            .with_background_color(Color::BLACK);
        assert_eq!((cfg.width, cfg.height), (900, 600));
        assert_eq!(cfg.mount_id, "sim");
        assert_eq!(cfg.load_mode, LoadMode::Inline);
        assert_eq!(cfg.style.background_color, Some(Color::BLACK));
    }
}
