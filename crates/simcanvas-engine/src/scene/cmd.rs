use crate::canvas::ArcParams;
use crate::coords::Rect;
use crate::paint::Color;

/// Image draw payload. Only the source size is kept; pixels stay with the caller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageCmd {
    pub source_size: (u32, u32),
    pub dest: Rect,
}

/// One canvas call, as issued.
///
/// Extending the scene:
/// - add a method to `canvas::Context2d`
/// - add a matching variant here
/// - record it in `DrawList`'s `Context2d` impl
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    ClearRect(Rect),
    BeginPath,
    Arc(ArcParams),
    ClosePath,
    StrokeStyle(Color),
    FillStyle(Color),
    LineWidth(f32),
    Stroke,
    Fill,
    FillRect(Rect),
    StrokeRect(Rect),
    DrawImage(ImageCmd),
}

impl DrawCmd {
    /// True for calls that change pixels (as opposed to state or path setup).
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            DrawCmd::ClearRect(_)
                | DrawCmd::Stroke
                | DrawCmd::Fill
                | DrawCmd::FillRect(_)
                | DrawCmd::StrokeRect(_)
                | DrawCmd::DrawImage(_)
        )
    }
}
