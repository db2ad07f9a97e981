use simcanvas_engine::coords::Vec2;

use crate::config::ModuleConfig;
use crate::descriptor::{Descriptor, Shape};

/// Bounds of a continuous simulation space were unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("continuous space needs finite bounds with min < max, got x {x_min}..{x_max}, y {y_min}..{y_max}")]
pub struct SpaceError {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

/// Rectangular continuous space in model units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ContinuousSpace {
    x_min: f32,
    x_max: f32,
    y_min: f32,
    y_max: f32,
}

impl ContinuousSpace {
    pub fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Result<Self, SpaceError> {
        let ok = [x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite())
            && x_min < x_max
            && y_min < y_max;
        if !ok {
            return Err(SpaceError { x_min, x_max, y_min, y_max });
        }
        Ok(Self { x_min, x_max, y_min, y_max })
    }

    /// Space spanning `[0, width] × [0, height]`.
    pub fn with_size(width: f32, height: f32) -> Result<Self, SpaceError> {
        Self::new(0.0, width, 0.0, height)
    }

    /// Maps a model position to `[0, 1]` canvas coordinates. Positions outside
    /// the bounds map outside `[0, 1]`.
    #[inline]
    pub fn normalize(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            (pos.x - self.x_min) / (self.x_max - self.x_min),
            (pos.y - self.y_min) / (self.y_max - self.y_min),
        )
    }
}

/// Server-side half of a continuous canvas: turns agents into descriptors.
///
/// The portrayal function decides how an agent looks; returning `None` hides it.
pub struct SimpleCanvas<F> {
    portrayal: F,
    canvas_width: u32,
    canvas_height: u32,
}

impl<F> SimpleCanvas<F> {
    pub fn new(portrayal: F, canvas_width: u32, canvas_height: u32) -> Self {
        Self { portrayal, canvas_width, canvas_height }
    }

    /// Controller configuration matching this canvas' pixel size.
    pub fn module_config(&self) -> ModuleConfig {
        ModuleConfig::default().with_size(self.canvas_width, self.canvas_height)
    }

    /// Builds one frame of descriptors, in agent order.
    pub fn render<'a, A, I>(&self, space: &ContinuousSpace, agents: I) -> Vec<Descriptor>
    where
        A: 'a,
        F: Fn(&A) -> Option<Shape>,
        I: IntoIterator<Item = (Vec2, &'a A)>,
    {
        agents
            .into_iter()
            .filter_map(|(pos, agent)| {
                let shape = (self.portrayal)(agent)?;
                let p = space.normalize(pos);
                Some(Descriptor::new(p.x, p.y, shape))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use simcanvas_engine::paint::Color;

    use super::*;

    enum Agent {
        Toddler,
        Toy { active: bool },
        Ghost,
    }

    fn portrayal(agent: &Agent) -> Option<Shape> {
        match agent {
            Agent::Toddler => Some(Shape::Image { id: "toddler.png".into(), w: 50.0, h: 50.0 }),
            Agent::Toy { active } => Some(Shape::Rect {
                w: 0.025,
                h: 0.025,
                color: Some(if *active { Color::from_srgb_u8(255, 0, 0, 255) } else { Color::BLACK }),
                filled: true,
            }),
            Agent::Ghost => None,
        }
    }

    #[test]
    fn normalize_uses_space_bounds() {
        let space = ContinuousSpace::new(-10.0, 10.0, 0.0, 300.0).unwrap();
        assert_eq!(space.normalize(Vec2::new(0.0, 150.0)), Vec2::new(0.5, 0.5));
        assert_eq!(space.normalize(Vec2::new(-10.0, 300.0)), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn degenerate_bounds_are_rejected() {
        assert!(ContinuousSpace::new(0.0, 0.0, 0.0, 1.0).is_err());
        assert!(ContinuousSpace::with_size(1.0, f32::NAN).is_err());
    }

    #[test]
    fn render_skips_hidden_agents_and_keeps_order() {
        let canvas = SimpleCanvas::new(portrayal, 900, 900);
        let space = ContinuousSpace::with_size(300.0, 300.0).unwrap();
        let agents = [
            (Vec2::new(150.0, 75.0), Agent::Toddler),
            (Vec2::new(0.0, 0.0), Agent::Ghost),
            (Vec2::new(300.0, 300.0), Agent::Toy { active: true }),
        ];

        let frame = canvas.render(&space, agents.iter().map(|(p, a)| (*p, a)));
        assert_eq!(frame.len(), 2);
        assert_eq!((frame[0].x, frame[0].y), (0.5, 0.25));
        assert_eq!(frame[0].shape.kind(), "image");
        assert_eq!((frame[1].x, frame[1].y), (1.0, 1.0));
    }

    #[test]
    fn module_config_carries_canvas_size() {
        let canvas = SimpleCanvas::new(portrayal, 900, 600);
        let cfg = canvas.module_config();
        assert_eq!((cfg.width, cfg.height), (900, 600));
    }
}
